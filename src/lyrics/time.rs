//! Timestamp notations → canonical milliseconds.
//!
//! Hour and minute fields are unbounded in some notations, so every
//! conversion is checked and yields `None` on overflow; parsers skip such
//! units like any other malformed line.

/// Whole seconds plus a fractional seconds part, as rounded milliseconds.
fn to_ms(whole_seconds: u64, fraction_seconds: f64) -> Option<u64> {
    let fraction = (fraction_seconds * 1000.0).round();
    if !fraction.is_finite() || fraction < 0.0 || fraction >= u64::MAX as f64 {
        return None;
    }
    whole_seconds.checked_mul(1000)?.checked_add(fraction as u64)
}

/// `[MM:SS.ff]` / `[MM:SS.fff]` line tags.
pub fn line_timed_ms(minutes: u64, seconds: f64) -> Option<u64> {
    to_ms(minutes.checked_mul(60)?, seconds)
}

/// `H:MM:SS.cc` dialogue timestamps.
///
/// The fraction is already decimal; rounding only absorbs float noise.
pub fn dialogue_ms(hours: u64, minutes: u64, seconds: f64) -> Option<u64> {
    to_ms(hours.checked_mul(3600)?.checked_add(minutes.checked_mul(60)?)?, seconds)
}

/// `HH:MM:SS,mmm` block timestamps, all integer components.
pub fn block_ms(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<u64> {
    hours
        .checked_mul(3_600_000)?
        .checked_add(minutes.checked_mul(60_000)?)?
        .checked_add(seconds.checked_mul(1000)?)?
        .checked_add(millis)
}

/// Parse the `MM` and `SS.fraction` captures of a line tag.
pub fn parse_line_timed(minutes: &str, seconds: &str) -> Option<u64> {
    line_timed_ms(minutes.parse().ok()?, seconds.parse().ok()?)
}

/// Parse a whole `H:MM:SS.cc` capture.
pub fn parse_dialogue(stamp: &str) -> Option<u64> {
    let mut parts = stamp.splitn(3, ':');
    let hours = parts.next()?.parse().ok()?;
    let minutes = parts.next()?.parse().ok()?;
    let seconds = parts.next()?.parse().ok()?;
    dialogue_ms(hours, minutes, seconds)
}

/// Parse the four captures of an `HH:MM:SS,mmm` stamp.
pub fn parse_block(hours: &str, minutes: &str, seconds: &str, millis: &str) -> Option<u64> {
    block_ms(
        hours.parse().ok()?,
        minutes.parse().ok()?,
        seconds.parse().ok()?,
        millis.parse().ok()?,
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn line_timed_rounds_to_millis() {
        assert_eq!(parse_line_timed("01", "02.50"), Some(62_500));
        assert_eq!(parse_line_timed("00", "12.345"), Some(12_345));
        assert_eq!(parse_line_timed("03", "00.01"), Some(180_010));
    }

    #[test]
    fn dialogue_handles_hours() {
        assert_eq!(parse_dialogue("0:00:01.00"), Some(1000));
        assert_eq!(parse_dialogue("1:02:03.45"), Some(3_723_450));
    }

    #[test]
    fn block_is_exact_integer_sum() {
        assert_eq!(parse_block("00", "00", "01", "000"), Some(1000));
        assert_eq!(parse_block("01", "00", "02", "500"), Some(3_602_500));
    }

    #[test]
    fn non_numeric_captures_yield_none() {
        assert_eq!(parse_dialogue("a:00:01.00"), None);
        assert_eq!(parse_block("00", "xx", "01", "000"), None);
    }

    #[test]
    fn overflowing_fields_yield_none() {
        assert_eq!(parse_dialogue("99999999999999999:00:00.00"), None);
        assert_eq!(parse_block("99999999999999999", "00", "00", "000"), None);
        assert_eq!(dialogue_ms(0, u64::MAX, 0.0), None);
        assert_eq!(line_timed_ms(u64::MAX / 60, 59.0), None);
    }
}
