use log::debug;

use crate::transcript::TimedSegment;

// @module: Segment-to-sentence stitching

/// Gap between consecutive segments that implies a sentence boundary
pub const SENTENCE_GAP_SECS: f64 = 1.0;

/// Accumulated length past which a sentence is flushed regardless of
/// punctuation (runaway-length safeguard)
pub const MAX_SENTENCE_CHARS: usize = 150;

/// One or more caption segments merged into a sentence-level unit.
///
/// `start` is the first contributing segment's start, `end` the last
/// contributing segment's end.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchedSentence {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// True when the text ends a sentence: terminal punctuation, or a closing
/// quote immediately after terminal punctuation.
fn ends_sentence(text: &str) -> bool {
    let trimmed = text.trim_end();
    let mut chars = trimmed.chars().rev();

    match chars.next() {
        Some('.') | Some('?') | Some('!') => true,
        Some('"') | Some('\u{201d}') | Some('\'') | Some('\u{2019}') => {
            matches!(chars.next(), Some('.') | Some('?') | Some('!'))
        }
        _ => false,
    }
}

/// Merge ordered caption segments into sentence-like units.
///
/// A single forward pass with one open accumulator. After each append the
/// accumulator is flushed when any of these hold:
/// - the appended text ends in sentence-terminal punctuation,
/// - the gap to the next segment's start exceeds [`SENTENCE_GAP_SECS`]
///   (a pause implies a sentence boundary),
/// - the accumulated text exceeds [`MAX_SENTENCE_CHARS`].
///
/// Any non-empty remainder is flushed at end of input.
pub fn stitch(segments: &[TimedSegment]) -> Vec<StitchedSentence> {
    stitch_with(segments, SENTENCE_GAP_SECS, MAX_SENTENCE_CHARS)
}

/// [`stitch`] with explicit gap and length thresholds.
pub fn stitch_with(
    segments: &[TimedSegment],
    gap_secs: f64,
    max_chars: usize,
) -> Vec<StitchedSentence> {
    let mut sentences = Vec::new();

    let mut text = String::new();
    let mut start = 0.0;
    let mut end = 0.0;

    for (index, segment) in segments.iter().enumerate() {
        if text.is_empty() {
            start = segment.start;
        }

        // Exactly one joining space, unless either side already has one
        if !text.is_empty() && !text.ends_with(' ') && !segment.text.starts_with(' ') {
            text.push(' ');
        }
        text.push_str(&segment.text);
        end = segment.end;

        let big_pause = segments
            .get(index + 1)
            .map(|next| next.start - segment.end > gap_secs)
            .unwrap_or(false);

        // Count characters, not bytes, so accented text gets the same budget
        if ends_sentence(&segment.text) || big_pause || text.chars().count() > max_chars {
            sentences.push(StitchedSentence {
                start,
                end,
                text: text.trim().to_string(),
            });
            text.clear();
        }
    }

    // Trailing fragment without a terminal boundary still counts
    if !text.trim().is_empty() {
        sentences.push(StitchedSentence {
            start,
            end,
            text: text.trim().to_string(),
        });
    }

    debug!(
        "Stitched {} segments into {} sentences",
        segments.len(),
        sentences.len()
    );
    sentences
}
