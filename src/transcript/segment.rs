use anyhow::Result;
use log::{debug, warn};
use scraper::{Html, Selector};
use serde::Deserialize;

use crate::transcript::timestamp::parse_clock_label;

// @module: Timed segment model and the two extraction modes

/// Fallback duration for the last live-rendered segment, which has no
/// following segment to measure against.
pub const LAST_SEGMENT_FALLBACK_SECS: f64 = 2.0;

/// One minimal timed caption fragment, as delivered by a feed or a
/// rendered panel node.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSegment {
    // @field: Start time in seconds
    pub start: f64,

    // @field: Duration in seconds
    pub duration: f64,

    // @field: End time in seconds (start + duration)
    pub end: f64,

    // @field: Caption text, entity-decoded, single-line
    pub text: String,
}

impl TimedSegment {
    /// Create a new segment; `end` is always derived from start + duration
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        TimedSegment {
            start,
            duration,
            end: start + duration,
            text: text.into(),
        }
    }
}

/// One node scraped from a live-rendered transcript panel.
///
/// Rendered panels expose a clock label ("0:05") and the caption text, but
/// no duration - that gets reconstructed once the full sequence is known.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSegment {
    /// Clock label text, if the node carried one
    pub timestamp_label: Option<String>,

    /// Caption text content
    pub text: String,
}

/// JSON3 caption feed: a flat list of timed events
#[derive(Debug, Default, Deserialize)]
struct Json3Feed {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    /// Event start in milliseconds
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,

    /// Event duration in milliseconds
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,

    /// Text fragments to concatenate
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Parse a structured caption feed into ordered timed segments.
///
/// The feed is either a JSON3 event list (millisecond timing, text split
/// into fragments) or a timed-text markup document (`<text start dur>`
/// nodes, or `<p t d>` nodes with millisecond attributes). Events and nodes
/// whose text is empty after decoding are skipped. An empty feed is a valid
/// empty result, not an error.
pub fn parse_feed(content: &str) -> Result<Vec<TimedSegment>> {
    // A feed that parses as JSON is JSON3; anything else goes to the
    // markup parser
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(content) {
        debug!("Parsing JSON3 caption feed");
        let feed: Json3Feed = serde_json::from_value(value).unwrap_or_default();
        return Ok(segments_from_json3(feed));
    }

    debug!("Parsing timed-text markup feed ({} bytes)", content.len());
    Ok(segments_from_markup(content))
}

fn segments_from_json3(feed: Json3Feed) -> Vec<TimedSegment> {
    let mut segments = Vec::new();

    for event in feed.events {
        if event.segs.is_empty() {
            continue;
        }

        let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
        let text = text.replace('\n', " ").trim().to_string();
        if text.is_empty() {
            continue;
        }

        let start = event.start_ms as f64 / 1000.0;
        let duration = event.duration_ms as f64 / 1000.0;
        segments.push(TimedSegment::new(start, duration, text));
    }

    segments
}

fn segments_from_markup(content: &str) -> Vec<TimedSegment> {
    let document = Html::parse_document(content);

    // Primary timed-text shape is <text start dur>; some feeds use <p t d>
    // with millisecond attributes instead
    let text_selector = Selector::parse("text").expect("static selector");
    let p_selector = Selector::parse("p").expect("static selector");

    let mut nodes: Vec<scraper::ElementRef> = document.select(&text_selector).collect();
    if nodes.is_empty() {
        nodes = document.select(&p_selector).collect();
    }
    debug!("Found {} timed text nodes", nodes.len());

    let mut segments = Vec::new();
    for node in nodes {
        let start = attr_seconds(node.value().attr("start"))
            .or_else(|| attr_millis(node.value().attr("t")))
            .unwrap_or(0.0);
        let duration = attr_seconds(node.value().attr("dur"))
            .or_else(|| attr_millis(node.value().attr("d")))
            .unwrap_or(0.0);

        // html5ever has already decoded entities in the text content
        let text = node.text().collect::<String>().replace('\n', " ");
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        segments.push(TimedSegment::new(start, duration, text));
    }

    segments
}

fn attr_seconds(attr: Option<&str>) -> Option<f64> {
    attr.and_then(|v| v.trim().parse::<f64>().ok())
}

fn attr_millis(attr: Option<&str>) -> Option<f64> {
    attr.and_then(|v| v.trim().parse::<f64>().ok())
        .map(|ms| ms / 1000.0)
}

/// Build timed segments from a live-rendered node collection.
///
/// Rendered panels give no explicit duration, so durations are
/// reconstructed retroactively once the whole ordered sequence is in hand:
/// each segment runs until the next one starts, and the last segment gets
/// `last_fallback_secs`. This cannot be computed per-segment in isolation.
pub fn from_rendered(nodes: &[RenderedSegment], last_fallback_secs: f64) -> Vec<TimedSegment> {
    let starts: Vec<f64> = nodes
        .iter()
        .map(|node| {
            node.timestamp_label
                .as_deref()
                .map(parse_clock_label)
                .unwrap_or(0.0)
        })
        .collect();

    let mut segments = Vec::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        let text = node.text.replace('\n', " ").trim().to_string();
        if text.is_empty() {
            warn!("Skipping rendered segment {} with empty text", i);
            continue;
        }

        // A malformed label parses as start 0, which can put the next start
        // before this one. Clamp so end never precedes start.
        let duration = if i < starts.len() - 1 {
            (starts[i + 1] - starts[i]).max(0.0)
        } else {
            last_fallback_secs
        };

        segments.push(TimedSegment::new(starts[i], duration, text));
    }

    segments
}
