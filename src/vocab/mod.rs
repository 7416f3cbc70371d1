/*!
 * Vocabulary extraction from stitched sentences.
 *
 * Tokenizes sentence text, filters stop words per language, deduplicates
 * case-insensitively (first occurrence wins and fixes the context sentence),
 * and builds card records with the word highlighted in context.
 *
 * Extraction is pure: translation happens afterwards, one call per card,
 * in the translation service.
 */

use log::debug;
use regex::Regex;
use std::collections::HashSet;

use crate::stitcher::StitchedSentence;

pub mod stopwords;

/// Minimum surviving token length; anything shorter is treated as noise
pub const MIN_WORD_LEN: usize = 3;

/// One deduplicated study item derived from a stitched sentence
#[derive(Debug, Clone, PartialEq)]
pub struct VocabCard {
    /// Lowercase word, stripped of punctuation - what gets translated
    pub word: String,

    /// The full stitched sentence the word first appeared in
    pub context_sentence: String,

    /// Card front: title-cased word, blank line, context with the word
    /// wrapped in an emphasis marker
    pub front: String,

    /// Card back: the translation, or an error placeholder; empty until
    /// the translation pass runs
    pub back: String,

    /// Start time (seconds) of the sentence the word came from
    pub source_start: f64,
}

/// Strip a raw token down to the allowed alphabet, lowercased.
///
/// The alphabet covers ASCII letters and digits plus the accented letters
/// of the supported languages.
fn clean_token(token: &str) -> String {
    token
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || "áàâãéèêíïóòôõöúçñ".contains(*c))
        .collect()
}

/// Wrap the first case-insensitive whole-word match of `word` in `<b>` tags
fn highlight_in_context(sentence: &str, word: &str) -> String {
    let pattern = format!(r"(?i)\b{}\b", regex::escape(word));
    match Regex::new(&pattern) {
        Ok(re) => re.replacen(sentence, 1, "<b>${0}</b>").into_owned(),
        // An unbuildable pattern just means no highlight, not a failure
        Err(_) => sentence.to_string(),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Extract a deduplicated vocabulary deck from stitched sentences.
///
/// Order of cards is order of first appearance across sentences. Stop
/// words and tokens under [`MIN_WORD_LEN`] characters are dropped; a word
/// seen earlier in the run is skipped, so its first context sentence is
/// the one kept for display and translation.
pub fn extract(sentences: &[StitchedSentence], language: &str) -> Vec<VocabCard> {
    extract_with(sentences, language, MIN_WORD_LEN)
}

/// [`extract`] with an explicit minimum word length (in characters).
pub fn extract_with(
    sentences: &[StitchedSentence],
    language: &str,
    min_word_len: usize,
) -> Vec<VocabCard> {
    let stop_list = stopwords::stop_words(language);
    let mut seen: HashSet<String> = HashSet::new();
    let mut cards = Vec::new();

    for sentence in sentences {
        for raw_token in sentence.text.split_whitespace() {
            let word = clean_token(raw_token);

            if word.chars().count() < min_word_len {
                continue;
            }
            if stop_list.contains(word.as_str()) {
                continue;
            }
            if !seen.insert(word.clone()) {
                continue;
            }

            let context = highlight_in_context(&sentence.text, &word);
            let front = format!("{}\n\n{}", title_case(&word), context);

            cards.push(VocabCard {
                word,
                context_sentence: sentence.text.clone(),
                front,
                back: String::new(),
                source_start: sentence.start,
            });
        }
    }

    debug!(
        "Extracted {} unique vocabulary cards from {} sentences",
        cards.len(),
        sentences.len()
    );
    cards
}
