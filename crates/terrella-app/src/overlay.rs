//! Simulated time/date readout.
//!
//! The formatted strings are regenerated from the simulated instant each
//! frame and surfaced through the window title.

use chrono::{DateTime, Utc};

/// Formatted display strings for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayReadout {
    /// Time of day, e.g. `14:03:22 UTC`.
    pub time: String,
    /// Calendar date, e.g. `Saturday, 21 June 2025`.
    pub date: String,
}

/// Build the readout for an instant.
pub fn readout(instant: DateTime<Utc>) -> OverlayReadout {
    OverlayReadout {
        time: instant.format("%H:%M:%S UTC").to_string(),
        date: instant.format("%A, %-d %B %Y").to_string(),
    }
}

/// Compose the window title carrying the readout.
pub fn window_title(app_title: &str, readout: &OverlayReadout) -> String {
    format!("{app_title} | {} {}", readout.date, readout.time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_readout_formats_time_and_date() {
        let instant = Utc.with_ymd_and_hms(2025, 6, 21, 14, 3, 22).unwrap();
        let r = readout(instant);
        assert_eq!(r.time, "14:03:22 UTC");
        assert_eq!(r.date, "Saturday, 21 June 2025");
    }

    #[test]
    fn test_single_digit_day_has_no_padding() {
        let instant = Utc.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap();
        let r = readout(instant);
        assert_eq!(r.date, "Wednesday, 5 March 2025");
    }

    #[test]
    fn test_window_title_carries_both_strings() {
        let instant = Utc.with_ymd_and_hms(2025, 6, 21, 14, 3, 22).unwrap();
        let title = window_title("Terrella", &readout(instant));
        assert_eq!(title, "Terrella | Saturday, 21 June 2025 14:03:22 UTC");
    }
}
