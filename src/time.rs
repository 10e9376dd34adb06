//! Conversion between the microseconds used on the bus and the seconds used by this crate.

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// 2^53. Above this, `f64` no longer holds every whole number.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Converts seconds to whole microseconds.
///
/// If `seconds` is exactly what `micros_to_seconds` returns for a microsecond count, that count
/// is returned, so `micros_to_seconds` output converts back to where it came from. From 2^33
/// seconds on, neighbouring counts can share one `f64`; the result is then off by at most one.
/// Everything else truncates toward zero.
pub fn seconds_to_micros(seconds: f64) -> i64 {
    let micros = seconds * MICROS_PER_SECOND;
    if micros.is_nan() || micros.abs() > EXACT_INTEGER_LIMIT {
        return micros as i64;
    }

    let nearest = micros.round() as i64;
    [0i64, -1, 1, -2, 2]
        .iter()
        .map(|offset| nearest + offset)
        .find(|&candidate| micros_to_seconds(candidate) == seconds)
        .unwrap_or_else(|| micros.trunc() as i64)
}

/// Converts signed microseconds to seconds.
pub fn micros_to_seconds(micros: i64) -> f64 {
    micros as f64 / MICROS_PER_SECOND
}

/// Converts unsigned microseconds to seconds.
pub fn unsigned_micros_to_seconds(micros: u64) -> f64 {
    micros as f64 / MICROS_PER_SECOND
}
