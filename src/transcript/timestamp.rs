/*!
 * Clock-label timestamp parsing.
 *
 * Rendered transcript panels label segments with colon-delimited clock text
 * ("0:05", "12:34", "1:02:30"). Structured feeds carry numeric millisecond
 * or second values instead and are converted inline by the feed parsers.
 */

/// Parse a colon-delimited clock label into seconds.
///
/// Accepts "H:MM:SS", "MM:SS" or bare "SS"; missing higher units count as
/// zero. Non-numeric parts also count as zero rather than failing - one bad
/// label must never abort extraction of the rest of the transcript.
pub fn parse_clock_label(label: &str) -> f64 {
    let mut seconds = 0u64;

    // Reverse so index 0 is always the seconds field. Saturate instead of
    // overflowing so an absurd numeric field still cannot abort extraction.
    for (i, part) in label.trim().split(':').rev().enumerate() {
        let value: u64 = part.trim().parse().unwrap_or(0);
        seconds = seconds.saturating_add(match i {
            0 => value,
            1 => value.saturating_mul(60),
            2 => value.saturating_mul(3600),
            // Anything beyond hours is not a clock label; ignore it
            _ => 0,
        });
    }

    seconds as f64
}
