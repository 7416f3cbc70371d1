/*!
 * Translation service for card-word translation using AI providers.
 *
 * This module contains the functionality for translating vocabulary card
 * words in context using various AI providers. It is split into:
 *
 * - `core`: Core translation functionality and service definition
 * - `providers`: Client implementations for the supported providers
 */

// Re-export main types for easier usage
pub use self::core::{TranslationService, WordTranslator};

// Submodules
pub mod core;
pub mod providers;
