use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::acquisition::{DomSnapshotSurface, LogProgress, TranscriptAcquirer};
use crate::app_config::Config;
use crate::deck::{Deck, TRANSLATION_ERROR_PLACEHOLDER};
use crate::errors::AcquisitionError;
use crate::file_utils::{FileManager, InputKind};
use crate::language_utils;
use crate::stitcher;
use crate::transcript::{self, TimedSegment};
use crate::translation::{TranslationService, WordTranslator};
use crate::vocab;

// @module: Application controller for deck building

/// Main application controller for turning transcripts into vocabulary decks
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Run the main workflow: acquire segments, build cards, translate,
    /// and write the deck CSV next to the input (or into `output_dir`).
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let start_time = std::time::Instant::now();

        let Some(output_path) = self.prepare_output(&input_file, &output_dir, force_overwrite)? else {
            return Ok(());
        };

        let segments = self.load_segments(&input_file).await?;
        let mut deck = self.build_deck(&segments);

        if deck.is_empty() {
            warn!("No vocabulary cards extracted, writing an empty deck");
        } else {
            let service = TranslationService::new(self.config.translation.clone())?;
            self.translate_cards(&mut deck, &service).await?;
        }

        FileManager::write_to_file(&output_path, &deck.to_csv())?;

        info!(
            "Deck with {} cards written to {:?} in {:.1}s",
            deck.len(),
            output_path,
            start_time.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Extraction-only workflow: build the deck but skip translation, so
    /// every card back stays empty.
    pub async fn run_extract_only(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        let Some(output_path) = self.prepare_output(&input_file, &output_dir, force_overwrite)? else {
            return Ok(());
        };

        let segments = self.load_segments(&input_file).await?;
        let deck = self.build_deck(&segments);

        FileManager::write_to_file(&output_path, &deck.to_csv())?;

        info!("Deck with {} untranslated cards written to {:?}", deck.len(), output_path);
        Ok(())
    }

    /// Resolve the output path, honoring the overwrite flag.
    ///
    /// Returns `None` when an existing deck should be kept.
    fn prepare_output(
        &self,
        input_file: &Path,
        output_dir: &Path,
        force_overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input file does not exist: {:?}", input_file));
        }

        FileManager::ensure_dir(output_dir)?;

        let output_path = FileManager::generate_output_path(
            input_file,
            output_dir,
            &self.config.target_language,
        );
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, deck already exists (use -f to force overwrite)");
            return Ok(None);
        }

        Ok(Some(output_path))
    }

    /// Load timed segments from the input, choosing the path by input kind:
    /// feeds are parsed directly, panel snapshots go through the
    /// acquisition state machine.
    async fn load_segments(&self, input_file: &Path) -> Result<Vec<TimedSegment>> {
        let kind = FileManager::detect_input_kind(input_file)?;
        let content = FileManager::read_to_string(input_file)?;

        match kind {
            InputKind::Feed => {
                info!("Detected timed-text feed input");
                // An empty feed is a valid input that yields an empty deck
                transcript::parse_feed(&content)
            }
            InputKind::PanelSnapshot => {
                info!("Detected transcript panel snapshot input");
                let surface = DomSnapshotSurface::from_html(&content);
                let progress = LogProgress;
                let mut acquirer =
                    TranscriptAcquirer::new(&surface, self.config.acquisition.clone(), &progress);

                let rendered = acquirer.run(&self.config.source_language).await?;
                let segments = transcript::from_rendered(
                    &rendered,
                    self.config.deck.last_segment_fallback_secs,
                );

                // A live panel that rendered nothing usable is an error,
                // unlike an empty feed
                if segments.is_empty() {
                    return Err(AcquisitionError::NoTranscriptText.into());
                }

                Ok(segments)
            }
            InputKind::Unknown => Err(anyhow::anyhow!(
                "Unrecognized input format: {:?} (expected a json3/XML caption feed or an HTML panel snapshot)",
                input_file
            )),
        }
    }

    /// Stitch segments into sentences and extract the card deck
    fn build_deck(&self, segments: &[TimedSegment]) -> Deck {
        let sentences = stitcher::stitch_with(
            segments,
            self.config.deck.sentence_gap_secs,
            self.config.deck.max_sentence_chars,
        );
        let cards = vocab::extract_with(
            &sentences,
            &self.config.source_language,
            self.config.deck.min_word_len,
        );
        Deck::new(cards)
    }

    /// Translate each card back sequentially through the given translator.
    ///
    /// Cards are translated one at a time with a configurable delay between
    /// requests. A failed card gets the error placeholder as its back and
    /// the run continues; only the card count is affected, never the run.
    pub async fn translate_cards(&self, deck: &mut Deck, translator: &dyn WordTranslator) -> Result<()> {
        // Providers want the language name, not the bare code
        let target_name = language_utils::get_language_name(&self.config.target_language)
            .context("Invalid target language")?;

        let delay_ms = self.config.translation.common.rate_limit_delay_ms;
        let total = deck.len() as u64;

        let progress_bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cards ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));

        info!(
            "🧠 capdeck: {} - {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );
        progress_bar.set_message("Translating");

        let mut failed = 0usize;
        for (index, card) in deck.cards.iter_mut().enumerate() {
            if index > 0 && delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }

            match translator
                .translate_word(&card.word, Some(card.context_sentence.as_str()), &target_name)
                .await
            {
                Ok(translation) => card.back = translation,
                Err(e) => {
                    warn!("Failed to translate '{}': {}", card.word, e);
                    card.back = TRANSLATION_ERROR_PLACEHOLDER.to_string();
                    failed += 1;
                }
            }

            progress_bar.set_position(index as u64 + 1);
        }

        progress_bar.finish_and_clear();

        if failed > 0 {
            warn!("Translation completed with {} failed cards out of {}", failed, total);
        } else {
            info!("Translated {} cards", total);
        }

        Ok(())
    }
}
