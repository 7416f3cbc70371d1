/*!
 * # capdeck - caption transcripts to vocabulary decks
 *
 * A Rust library for turning video caption transcripts into
 * spaced-repetition vocabulary decks with AI-translated cards.
 *
 * ## Features
 *
 * - Parse timed-text caption feeds (json3 and XML timed text)
 * - Drive a rendered transcript panel through an acquisition state
 *   machine (panel opening, language switching, render polling)
 * - Stitch caption segments into sentence-level units
 * - Extract vocabulary cards with stop-word filtering and in-context
 *   word highlighting
 * - Translate card words using various AI providers:
 *   - Ollama (local LLM)
 *   - OpenAI API (also LM Studio)
 *   - Anthropic API
 * - Serialize decks as importable 2-column CSV
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `transcript`: Timed-text feed parsing and timestamp handling
 * - `acquisition`: Transcript panel acquisition state machine:
 *   - `acquisition::machine`: The state machine itself
 *   - `acquisition::surface`: The UI surface abstraction
 *   - `acquisition::dom_snapshot`: Surface over saved panel HTML
 * - `stitcher`: Segment-to-sentence stitching
 * - `vocab`: Vocabulary extraction and stop-word lists
 * - `deck`: Deck model and CSV serialization
 * - `translation`: AI-powered word translation:
 *   - `translation::core`: Core translation functionality
 *   - `translation::providers`: Client implementations per provider
 * - `file_utils`: File system operations and input detection
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod acquisition;
pub mod app_config;
pub mod app_controller;
pub mod deck;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod stitcher;
pub mod transcript;
pub mod translation;
pub mod vocab;

// Re-export main types for easier usage
pub use app_config::Config;
pub use deck::Deck;
pub use errors::{AcquisitionError, AppError, ProviderError, TranslationError};
pub use language_utils::{get_language_name, language_codes_match, normalize_to_part2t};
pub use stitcher::StitchedSentence;
pub use transcript::TimedSegment;
pub use translation::{TranslationService, WordTranslator};
pub use vocab::VocabCard;
