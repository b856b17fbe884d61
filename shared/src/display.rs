//! Text shown next to the live readings.

/// Cumulative distance, rounded to whole meters.
pub fn format_distance(total_m: f64) -> String {
    format!("{:.0}", total_m.round())
}

/// Speed with two decimals, or `0` when the source gave none.
pub fn format_speed(speed_mps: Option<f64>) -> String {
    match speed_mps {
        Some(speed) if speed > 0.0 => format!("{speed:.2}"),
        _ => "0".to_string(),
    }
}
