use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and input-detection utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for the built deck
    // @params: input_file, output_dir, target_language
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        // Create the output filename with language code and deck extension
        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(target_language);
        output_filename.push_str(".deck.csv");

        // Join with the output directory
        output_dir.join(output_filename)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Detect whether a file is a timed-text feed or a rendered panel snapshot
    pub fn detect_input_kind<P: AsRef<Path>>(path: P) -> Result<InputKind> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        // Check file extension first
        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();

            match ext_str.as_str() {
                // Timed-text feed formats: json3 captions and XML variants
                "json" | "json3" | "xml" | "srv1" | "srv3" | "ttml" => {
                    return Ok(InputKind::Feed);
                }
                "html" | "htm" => {
                    return Ok(InputKind::PanelSnapshot);
                }
                _ => {}
            }
        }

        // Fall back to examining file contents
        let content = Self::read_to_string(path)?;
        let head: String = content.trim_start().chars().take(256).collect();
        let head_lower = head.to_lowercase();

        if head.starts_with('{') || head.starts_with('[') {
            return Ok(InputKind::Feed);
        }
        if head_lower.starts_with("<!doctype html") || head_lower.starts_with("<html") {
            return Ok(InputKind::PanelSnapshot);
        }
        if head.starts_with('<') {
            // Generic markup defaults to a timed-text feed
            return Ok(InputKind::Feed);
        }

        Ok(InputKind::Unknown)
    }
}

/// Enum representing the supported input kinds
#[derive(Debug, PartialEq, Eq)]
pub enum InputKind {
    /// Timed-text feed (json3 or XML timed text)
    Feed,
    /// Saved HTML snapshot of a rendered transcript panel
    PanelSnapshot,
    /// Unknown input kind
    Unknown,
}
