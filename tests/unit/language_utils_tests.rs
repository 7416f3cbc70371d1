/*!
 * Tests for language utility functions
 */

use anyhow::Result;

use capdeck::language_utils::{
    get_language_name, get_native_language_name, language_codes_match, normalize_to_part1_or_part2t,
    normalize_to_part2t, validate_language_code,
};

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldAccept() {
    // ISO 639-1
    assert!(validate_language_code("en").is_ok());
    assert!(validate_language_code("pt").is_ok());
    assert!(validate_language_code("de").is_ok());

    // ISO 639-2/T
    assert!(validate_language_code("eng").is_ok());
    assert!(validate_language_code("por").is_ok());

    // ISO 639-2/B
    assert!(validate_language_code("fre").is_ok());
    assert!(validate_language_code("ger").is_ok());

    // Whitespace and case tolerance
    assert!(validate_language_code(" EN ").is_ok());
    assert!(validate_language_code("POR").is_ok());

    // Invalid codes
    assert!(validate_language_code("xyz").is_err());
    assert!(validate_language_code("123").is_err());
    assert!(validate_language_code("e").is_err());
}

/// Test normalization of language codes to ISO 639-2/T format
#[test]
fn test_normalize_to_part2t_withValidCodes_shouldNormalizeCorrectly() -> Result<()> {
    assert_eq!(normalize_to_part2t("en")?, "eng");
    assert_eq!(normalize_to_part2t("pt")?, "por");
    assert_eq!(normalize_to_part2t("eng")?, "eng");
    assert_eq!(normalize_to_part2t("fra")?, "fra");

    // ISO 639-2/B forms resolve to their /T equivalents
    assert_eq!(normalize_to_part2t("fre")?, "fra");
    assert_eq!(normalize_to_part2t("ger")?, "deu");

    // Case insensitivity and whitespace
    assert_eq!(normalize_to_part2t("EN")?, "eng");
    assert_eq!(normalize_to_part2t(" pt ")?, "por");
    Ok(())
}

/// Test normalization preferring 2-letter codes
#[test]
fn test_normalize_to_part1_or_part2t_withValidCodes_shouldPrefer2Letter() -> Result<()> {
    assert_eq!(normalize_to_part1_or_part2t("en")?, "en");
    assert_eq!(normalize_to_part1_or_part2t("eng")?, "en");
    assert_eq!(normalize_to_part1_or_part2t("por")?, "pt");
    assert_eq!(normalize_to_part1_or_part2t("fre")?, "fr");
    Ok(())
}

/// Test matching of different language code formats
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldReturnTrue() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("eng", "en"));
    assert!(language_codes_match("pt", "por"));
    assert!(language_codes_match("fre", "fra"));
    assert!(language_codes_match("PT", " por "));
}

/// Test non-matching and invalid codes
#[test]
fn test_language_codes_match_withDifferentOrInvalidCodes_shouldReturnFalse() {
    assert!(!language_codes_match("en", "pt"));
    assert!(!language_codes_match("en", "xyz"));
    assert!(!language_codes_match("xyz", "xyz"));
}

/// Test resolving a code to its English display name
#[test]
fn test_get_language_name_withValidCodes_shouldReturnEnglishName() -> Result<()> {
    assert_eq!(get_language_name("en")?, "English");
    assert_eq!(get_language_name("pt")?, "Portuguese");
    assert_eq!(get_language_name("deu")?, "German");
    assert!(get_language_name("xyz").is_err());
    Ok(())
}

/// Test resolving a code to its native-script name
#[test]
fn test_get_native_language_name_withValidCodes_shouldReturnAutonym() -> Result<()> {
    assert_eq!(get_native_language_name("pt")?, "Português");
    assert_eq!(get_native_language_name("de")?, "Deutsch");
    assert_eq!(get_native_language_name("en")?, "English");
    assert!(get_native_language_name("xyz").is_err());
    Ok(())
}
