/*!
 * Tests for the deck model and CSV serialization
 */

use capdeck::deck::{Deck, TRANSLATION_ERROR_PLACEHOLDER, escape_csv_field};
use capdeck::vocab::VocabCard;

fn card(front: &str, back: &str) -> VocabCard {
    VocabCard {
        word: "word".to_string(),
        context_sentence: "context".to_string(),
        front: front.to_string(),
        back: back.to_string(),
        source_start: 0.0,
    }
}

/// Test that an empty deck serializes to just the header
#[test]
fn test_to_csv_withEmptyDeck_shouldEmitHeaderOnly() {
    let deck = Deck::new(Vec::new());
    assert!(deck.is_empty());
    assert_eq!(deck.len(), 0);
    assert_eq!(deck.to_csv(), "Front,Back\n");
}

/// Test serialization of plain fields that need no quoting
#[test]
fn test_to_csv_withPlainFields_shouldNotQuote() {
    let deck = Deck::new(vec![card("simple front", "simple back")]);
    assert_eq!(deck.to_csv(), "Front,Back\nsimple front,simple back\n");
}

/// Test that fields containing line breaks are quoted with the break preserved
#[test]
fn test_to_csv_withLineBreaks_shouldQuoteAndPreserve() {
    let deck = Deck::new(vec![card("Casa\n\nA <b>casa</b> azul", "house")]);
    assert_eq!(
        deck.to_csv(),
        "Front,Back\n\"Casa\n\nA <b>casa</b> azul\",house\n"
    );
}

/// Test that card order is preserved in the output
#[test]
fn test_to_csv_withMultipleCards_shouldPreserveOrder() {
    let deck = Deck::new(vec![card("first", "1"), card("second", "2")]);
    let csv = deck.to_csv();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines, vec!["Front,Back", "first,1", "second,2"]);
}

/// Test CSV escaping of fields containing commas
#[test]
fn test_escape_csv_field_withComma_shouldQuote() {
    assert_eq!(escape_csv_field("one, two"), "\"one, two\"");
}

/// Test CSV escaping of fields containing quotes
#[test]
fn test_escape_csv_field_withQuotes_shouldDoubleThem() {
    assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
}

/// Test that unremarkable fields pass through unescaped
#[test]
fn test_escape_csv_field_withPlainText_shouldPassThrough() {
    assert_eq!(escape_csv_field("plain text"), "plain text");
    assert_eq!(escape_csv_field(""), "");
}

/// Pin the placeholder written for failed translations
#[test]
fn test_translation_error_placeholder_shouldMatchExpectedText() {
    assert_eq!(TRANSLATION_ERROR_PLACEHOLDER, "[Translation Error]");
}
