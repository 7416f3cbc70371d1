/*!
 * Tests for file utilities and input-kind detection
 */

use anyhow::Result;

use capdeck::file_utils::{FileManager, InputKind};

use crate::common;

/// Test file and directory existence checks
#[test]
fn test_existence_checks_shouldDistinguishFilesAndDirs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(&temp_dir.path().to_path_buf(), "a.txt", "content")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::dir_exists(&file));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing")));
    Ok(())
}

/// Test recursive directory creation
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAll() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));

    // Idempotent on an existing directory
    FileManager::ensure_dir(&nested)?;
    Ok(())
}

/// Test the deck output path naming scheme
#[test]
fn test_generate_output_path_shouldAppendLanguageAndDeckSuffix() {
    let path = FileManager::generate_output_path("captions/video.json3", "out", "en");
    assert_eq!(path.to_string_lossy(), "out/video.en.deck.csv");

    let path = FileManager::generate_output_path("aula.html", "decks", "pt");
    assert_eq!(path.to_string_lossy(), "decks/aula.pt.deck.csv");
}

/// Test that write_to_file creates missing parent directories
#[test]
fn test_write_to_file_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("deep").join("deck.csv");

    FileManager::write_to_file(&path, "Front,Back\n")?;
    assert_eq!(FileManager::read_to_string(&path)?, "Front,Back\n");
    Ok(())
}

/// Test input-kind detection by file extension
#[test]
fn test_detect_input_kind_withKnownExtensions_shouldUseThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    for name in ["a.json", "b.json3", "c.xml", "d.srv3", "e.ttml"] {
        let file = common::create_test_file(&dir, name, "irrelevant")?;
        assert_eq!(FileManager::detect_input_kind(&file)?, InputKind::Feed);
    }

    for name in ["page.html", "page.htm"] {
        let file = common::create_test_file(&dir, name, "irrelevant")?;
        assert_eq!(FileManager::detect_input_kind(&file)?, InputKind::PanelSnapshot);
    }
    Ok(())
}

/// Test content sniffing for extensionless files
#[test]
fn test_detect_input_kind_withoutExtension_shouldSniffContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();

    let json = common::create_test_file(&dir, "feed", r#"{"events":[]}"#)?;
    assert_eq!(FileManager::detect_input_kind(&json)?, InputKind::Feed);

    let html = common::create_test_file(&dir, "page", "<!DOCTYPE html><html></html>")?;
    assert_eq!(FileManager::detect_input_kind(&html)?, InputKind::PanelSnapshot);

    // Generic markup defaults to a timed-text feed
    let xml = common::create_test_file(&dir, "timedtext", "<transcript></transcript>")?;
    assert_eq!(FileManager::detect_input_kind(&xml)?, InputKind::Feed);

    let plain = common::create_test_file(&dir, "notes", "plain text content")?;
    assert_eq!(FileManager::detect_input_kind(&plain)?, InputKind::Unknown);
    Ok(())
}

/// Test detection of a missing file
#[test]
fn test_detect_input_kind_withMissingFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(FileManager::detect_input_kind(temp_dir.path().join("missing")).is_err());
    Ok(())
}
