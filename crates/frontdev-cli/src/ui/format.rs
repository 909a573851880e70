use std::time::Duration;

/// Build time for status lines: `840ms`, `2.3s`, `1m 05s`.
///
/// ```
/// use std::time::Duration;
/// use frontdev_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(840)), "840ms");
/// assert_eq!(format_duration(Duration::from_millis(2300)), "2.3s");
/// assert_eq!(format_duration(Duration::from_secs(65)), "1m 05s");
/// ```
pub fn format_duration(elapsed: Duration) -> String {
    match elapsed.as_millis() {
        ms @ 0..1_000 => format!("{ms}ms"),
        1_000..60_000 => format!("{:.1}s", elapsed.as_secs_f64()),
        _ => {
            let secs = elapsed.as_secs();
            format!("{}m {:02}s", secs / 60, secs % 60)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_changes_at_boundaries() {
        assert_eq!(format_duration(Duration::ZERO), "0ms");
        assert_eq!(format_duration(Duration::from_micros(999_999)), "999ms");
        assert_eq!(format_duration(Duration::from_secs(1)), "1.0s");
        assert_eq!(format_duration(Duration::from_millis(59_940)), "59.9s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m 00s");
        assert_eq!(format_duration(Duration::from_secs(3_725)), "62m 05s");
    }
}
