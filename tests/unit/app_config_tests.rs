/*!
 * Tests for application configuration
 */

use std::str::FromStr;

use anyhow::Result;

use capdeck::app_config::{
    AcquisitionConfig, Config, DeckConfig, LogLevel, ProviderConfig, TranslationProvider,
};

use crate::common;

/// Test the default configuration values
#[test]
fn test_default_config_shouldUseExpectedValues() {
    let config = Config::default();

    assert_eq!(config.source_language, "pt");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.log_level, LogLevel::Info);

    assert_eq!(config.acquisition.poll_interval_ms, 500);
    assert_eq!(config.acquisition.max_polls, 40);
    assert_eq!(config.acquisition.expand_settle_ms, 1000);
    assert_eq!(config.acquisition.panel_settle_ms, 2000);

    assert_eq!(config.deck.min_word_len, 3);
    assert_eq!(config.deck.max_sentence_chars, 150);
    assert_eq!(config.deck.sentence_gap_secs, 1.0);
    assert_eq!(config.deck.last_segment_fallback_secs, 2.0);

    assert_eq!(config.translation.common.rate_limit_delay_ms, 200);
    assert_eq!(config.translation.common.retry_count, 3);
    assert_eq!(config.translation.common.retry_backoff_ms, 1000);
    assert_eq!(config.translation.common.temperature, 0.3);
}

/// Test the default prompt templates carry the expected placeholders
#[test]
fn test_default_config_shouldCarryPromptPlaceholders() {
    let common = Config::default().translation.common;

    assert!(common.word_prompt.contains("{word}"));
    assert!(common.word_prompt.contains("{context}"));
    assert!(common.word_prompt.contains("{target_language}"));
    assert!(common.bare_word_prompt.contains("{word}"));
    assert!(!common.system_prompt.is_empty());
}

/// Test provider enum string conversions
#[test]
fn test_translation_provider_withStringConversions_shouldRoundTrip() -> Result<()> {
    assert_eq!(TranslationProvider::from_str("ollama")?, TranslationProvider::Ollama);
    assert_eq!(TranslationProvider::from_str("OpenAI")?, TranslationProvider::OpenAI);
    assert_eq!(TranslationProvider::from_str("ANTHROPIC")?, TranslationProvider::Anthropic);
    assert_eq!(TranslationProvider::from_str("lmstudio")?, TranslationProvider::LMStudio);
    assert!(TranslationProvider::from_str("nonsense").is_err());

    assert_eq!(TranslationProvider::Ollama.to_string(), "ollama");
    assert_eq!(TranslationProvider::OpenAI.display_name(), "OpenAI");
    assert_eq!(TranslationProvider::LMStudio.display_name(), "LM Studio");
    Ok(())
}

/// Test per-provider defaults in ProviderConfig
#[test]
fn test_provider_config_new_shouldUseProviderDefaults() {
    let ollama = ProviderConfig::new(TranslationProvider::Ollama);
    assert_eq!(ollama.provider_type, "ollama");
    assert_eq!(ollama.endpoint, "http://localhost:11434");
    assert_eq!(ollama.rate_limit, None);

    let openai = ProviderConfig::new(TranslationProvider::OpenAI);
    assert_eq!(openai.endpoint, "https://api.openai.com/v1");
    assert_eq!(openai.rate_limit, Some(60));

    let anthropic = ProviderConfig::new(TranslationProvider::Anthropic);
    assert_eq!(anthropic.endpoint, "https://api.anthropic.com");
    assert_eq!(anthropic.timeout_secs, 60);
    assert_eq!(anthropic.rate_limit, Some(45));

    let lmstudio = ProviderConfig::new(TranslationProvider::LMStudio);
    assert_eq!(lmstudio.endpoint, "http://localhost:1234/v1");
}

/// Test active-provider accessor fallbacks
#[test]
fn test_translation_config_accessors_shouldResolveActiveProvider() {
    let mut config = Config::default();

    assert_eq!(config.translation.get_model(), "llama2");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.get_api_key(), "");
    assert_eq!(config.translation.get_rate_limit(), None);

    config.translation.provider = TranslationProvider::OpenAI;
    assert_eq!(config.translation.get_model(), "gpt-3.5-turbo");
    assert_eq!(config.translation.get_rate_limit(), Some(60));
}

/// Test that accessors fall back to defaults when the provider list is empty
#[test]
fn test_translation_config_accessors_withNoProviderEntries_shouldFallBack() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::Anthropic;

    assert_eq!(config.translation.get_model(), "claude-3-haiku");
    assert_eq!(config.translation.get_endpoint(), "https://api.anthropic.com");
    assert_eq!(config.translation.get_rate_limit(), Some(45));
}

/// Test save and reload round trip through a JSON file
#[test]
fn test_config_save_and_from_file_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.source_language = "es".to_string();
    config.acquisition.max_polls = 7;
    config.save(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.source_language, "es");
    assert_eq!(loaded.acquisition.max_polls, 7);
    assert_eq!(loaded.translation.provider, TranslationProvider::Ollama);
    Ok(())
}

/// Test that a minimal config file fills the rest with defaults
#[test]
fn test_config_from_file_withMinimalJson_shouldApplyDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "conf.json",
        r#"{"source_language":"pt","target_language":"en","translation":{}}"#,
    )?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.acquisition.poll_interval_ms, 500);
    assert_eq!(config.deck.min_word_len, 3);
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.common.rate_limit_delay_ms, 200);
    Ok(())
}

/// Test loading a missing or malformed config file
#[test]
fn test_config_from_file_withBadInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());

    let bad = common::create_test_file(&temp_dir.path().to_path_buf(), "bad.json", "not json")?;
    assert!(Config::from_file(&bad).is_err());
    Ok(())
}

/// Test validation of languages and provider credentials
#[test]
fn test_config_validate_shouldEnforceLanguagesAndKeys() {
    // Defaults (Ollama, no key needed) validate cleanly
    assert!(Config::default().validate().is_ok());

    // Remote providers require an API key
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::OpenAI;
    assert!(config.validate().is_err());

    config.translation.provider = TranslationProvider::Anthropic;
    assert!(config.validate().is_err());

    // LM Studio is local and needs none
    config.translation.provider = TranslationProvider::LMStudio;
    assert!(config.validate().is_ok());

    // Invalid language codes fail regardless of provider
    let mut config = Config::default();
    config.source_language = "zz".to_string();
    assert!(config.validate().is_err());
}

/// Test the zero-delay acquisition tuning used by tests
#[test]
fn test_acquisition_config_fast_shouldHaveNoSettleDelays() {
    let fast = AcquisitionConfig::fast();
    assert_eq!(fast.poll_interval_ms, 1);
    assert_eq!(fast.expand_settle_ms, 0);
    assert_eq!(fast.panel_settle_ms, 0);
    assert_eq!(fast.menu_settle_ms, 0);
    assert_eq!(fast.language_settle_ms, 0);
}

/// Test that deck tuning defaults mirror the module constants
#[test]
fn test_deck_config_default_shouldMirrorModuleConstants() {
    let deck = DeckConfig::default();
    assert_eq!(deck.min_word_len, capdeck::vocab::MIN_WORD_LEN);
    assert_eq!(deck.max_sentence_chars, capdeck::stitcher::MAX_SENTENCE_CHARS);
    assert_eq!(deck.sentence_gap_secs, capdeck::stitcher::SENTENCE_GAP_SECS);
    assert_eq!(
        deck.last_segment_fallback_secs,
        capdeck::transcript::LAST_SEGMENT_FALLBACK_SECS
    );
}
