/*!
 * Tests for segment-to-sentence stitching
 */

use capdeck::stitcher::{MAX_SENTENCE_CHARS, SENTENCE_GAP_SECS, stitch, stitch_with};
use capdeck::transcript::TimedSegment;

/// Test that terminal punctuation flushes a sentence
#[test]
fn test_stitch_withTerminalPunctuation_shouldFlushSentence() {
    let segments = vec![
        TimedSegment::new(0.0, 2.0, "Hello there."),
        TimedSegment::new(2.0, 2.0, "How are you?"),
        TimedSegment::new(4.0, 2.0, "Great!"),
    ];

    let sentences = stitch(&segments);

    assert_eq!(sentences.len(), 3);
    assert_eq!(sentences[0].text, "Hello there.");
    assert_eq!(sentences[1].text, "How are you?");
    assert_eq!(sentences[2].text, "Great!");
}

/// Test that segments without punctuation accumulate into one sentence
#[test]
fn test_stitch_withSplitSentence_shouldJoinSegments() {
    let segments = vec![
        TimedSegment::new(0.0, 2.0, "the recipe needs"),
        TimedSegment::new(2.0, 2.0, "two ripe bananas"),
        TimedSegment::new(4.0, 2.0, "and some flour."),
    ];

    let sentences = stitch(&segments);

    assert_eq!(sentences.len(), 1);
    assert_eq!(sentences[0].text, "the recipe needs two ripe bananas and some flour.");
    assert_eq!(sentences[0].start, 0.0);
    assert_eq!(sentences[0].end, 6.0);
}

/// Test that a pause longer than the gap threshold forces a boundary
#[test]
fn test_stitch_withLongPause_shouldForceBoundary() {
    let segments = vec![
        TimedSegment::new(0.0, 2.0, "an unfinished thought"),
        // 1.5s of silence after the first segment ends
        TimedSegment::new(3.5, 2.0, "a new topic entirely."),
    ];

    let sentences = stitch(&segments);

    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0].text, "an unfinished thought");
    assert_eq!(sentences[1].text, "a new topic entirely.");
}

/// Test that a pause exactly at the threshold does not force a boundary
#[test]
fn test_stitch_withGapAtThreshold_shouldNotSplit() {
    let segments = vec![
        TimedSegment::new(0.0, 2.0, "still the same"),
        TimedSegment::new(2.0 + SENTENCE_GAP_SECS, 2.0, "sentence here."),
    ];

    let sentences = stitch(&segments);
    assert_eq!(sentences.len(), 1);
}

/// Test the runaway-length safeguard
#[test]
fn test_stitch_withOverlongText_shouldFlushAtCap() {
    let segments = vec![
        TimedSegment::new(0.0, 1.0, "twelve chars"),
        TimedSegment::new(1.0, 1.0, "twelve chars"),
        TimedSegment::new(2.0, 1.0, "short tail."),
    ];

    // Cap below the combined length of the first two segments
    let sentences = stitch_with(&segments, SENTENCE_GAP_SECS, 20);

    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0].text, "twelve chars twelve chars");
    assert_eq!(sentences[1].text, "short tail.");
}

/// Test that the length cap counts characters, not bytes
#[test]
fn test_stitch_withAccentedText_shouldCountCharsAgainstCap() {
    // The accented segments are 9 characters but 18 bytes each in UTF-8
    let segments = vec![
        TimedSegment::new(0.0, 1.0, "ééééééééé"),
        TimedSegment::new(1.0, 1.0, "ééééééééé"),
        TimedSegment::new(2.0, 1.0, "fin"),
    ];

    // 23 characters total; a byte count would split after two segments
    let sentences = stitch_with(&segments, SENTENCE_GAP_SECS, 25);

    assert_eq!(sentences.len(), 1);
    assert_eq!(sentences[0].text, "ééééééééé ééééééééé fin");
}

/// Test that a trailing fragment without terminal punctuation is kept
#[test]
fn test_stitch_withTrailingFragment_shouldFlushRemainder() {
    let segments = vec![
        TimedSegment::new(0.0, 2.0, "First sentence."),
        TimedSegment::new(2.0, 2.0, "and then it just ends"),
    ];

    let sentences = stitch(&segments);

    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[1].text, "and then it just ends");
}

/// Test that a closing quote after terminal punctuation ends a sentence
#[test]
fn test_stitch_withQuoteAfterPunctuation_shouldFlushSentence() {
    let segments = vec![
        TimedSegment::new(0.0, 2.0, "She said \"stop!\""),
        TimedSegment::new(2.0, 2.0, "and everyone froze."),
    ];

    let sentences = stitch(&segments);

    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0].text, "She said \"stop!\"");
}

/// Test that empty input yields no sentences
#[test]
fn test_stitch_withNoSegments_shouldReturnEmptyVec() {
    assert!(stitch(&[]).is_empty());
}

/// Pin the default thresholds the public constants carry
#[test]
fn test_stitch_withDefaults_shouldUseModuleConstants() {
    assert_eq!(SENTENCE_GAP_SECS, 1.0);
    assert_eq!(MAX_SENTENCE_CHARS, 150);
}
