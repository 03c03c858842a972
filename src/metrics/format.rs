//! Pure formatting and rounding for the three run metrics.

/// Distance display before the first valid computation.
pub const DEFAULT_DISTANCE_TEXT: &str = "0.00";

/// Pace display before the first valid computation, and the fallback while
/// the covered distance is still zero.
pub const DEFAULT_PACE_TEXT: &str = "0:00";

/// Seconds as `"mm:ss"`, or `"h:mm:ss"` once a full hour has elapsed.
/// Minutes and seconds are zero-padded, hours are not.
pub fn format_clock(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// Round a distance to two decimals, half away from zero. The epsilon bias
/// counters binary representation error on values like 1.005 that would
/// otherwise land just below the half mark.
pub fn round_distance_km(km: f64) -> f64 {
    ((km + f64::EPSILON) * 100.0).round() / 100.0
}

pub fn format_distance_km(km: f64) -> String {
    format!("{km:.2}")
}

/// Average pace as `"mm:ss"` minutes per kilometer: the minutes needed to
/// cover 1 km at the average speed so far. A zero (or non-finite) distance
/// yields [`DEFAULT_PACE_TEXT`] rather than a division error.
pub fn format_pace(elapsed_seconds: u64, distance_km: f64) -> String {
    if distance_km <= 0.0 {
        return DEFAULT_PACE_TEXT.to_string();
    }

    let elapsed_minutes = elapsed_seconds as f64 / 60.0;
    let average_pace_minutes = elapsed_minutes / distance_km;
    if !average_pace_minutes.is_finite() {
        return DEFAULT_PACE_TEXT.to_string();
    }

    let mut minutes = average_pace_minutes.floor() as u64;
    let mut seconds = ((average_pace_minutes - average_pace_minutes.floor()) * 60.0).round() as u64;
    // A fractional minute can round up to a full 60 seconds.
    if seconds == 60 {
        minutes += 1;
        seconds = 0;
    }

    format!("{minutes:02}:{seconds:02}")
}
