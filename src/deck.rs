use std::fmt;

use crate::vocab::VocabCard;

// @module: Deck model and CSV serialization

/// Substituted for a card's back when its translation request fails
pub const TRANSLATION_ERROR_PLACEHOLDER: &str = "[Translation Error]";

/// Ordered collection of vocabulary cards for one extraction run.
///
/// Card order is insertion order, which is order of first appearance
/// across the stitched sentences.
#[derive(Debug, Default)]
pub struct Deck {
    /// The cards, in first-appearance order
    pub cards: Vec<VocabCard>,
}

impl Deck {
    pub fn new(cards: Vec<VocabCard>) -> Self {
        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Serialize the deck as 2-column CSV with a `Front,Back` header.
    ///
    /// Line breaks inside quoted fields are preserved verbatim; importers
    /// must treat them as part of the field, not as record separators.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("Front,Back\n");
        for card in &self.cards {
            csv.push_str(&escape_csv_field(&card.front));
            csv.push(',');
            csv.push_str(&escape_csv_field(&card.back));
            csv.push('\n');
        }
        csv
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Vocabulary Deck")?;
        writeln!(f, "Cards: {}", self.cards.len())?;
        Ok(())
    }
}

/// Escape one CSV field per RFC-4180-like rules.
///
/// The field is wrapped in double quotes, with internal quotes doubled, if
/// and only if it contains a quote, a comma, or a line break; otherwise it
/// is emitted unescaped.
pub fn escape_csv_field(field: &str) -> String {
    if field.is_empty() {
        return String::new();
    }

    let needs_quoting = field.contains('"') || field.contains(',') || field.contains('\n');
    if needs_quoting {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
