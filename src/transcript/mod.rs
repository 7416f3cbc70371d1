/*!
 * Transcript acquisition data model and parsing.
 *
 * This module turns raw caption data into an ordered sequence of timed text
 * segments, regardless of where the data came from:
 *
 * - `timestamp`: clock-label parsing ("1:02:30" style) into seconds
 * - `segment`: the `TimedSegment` model plus the two extraction modes
 *   (structured feed parsing and live-render reconstruction)
 */

pub mod segment;
pub mod timestamp;

pub use segment::{LAST_SEGMENT_FALLBACK_SECS, RenderedSegment, TimedSegment, from_rendered, parse_feed};
pub use timestamp::parse_clock_label;
