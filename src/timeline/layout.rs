use super::window::TimeWindow;
use chrono::{DateTime, Utc};

pub const MIN_BAR_WIDTH: f64 = 8.0;
pub const MAX_BAR_WIDTH: f64 = 60.0;
/// Durations at or above this many milliseconds draw at [`MAX_BAR_WIDTH`].
pub const WIDTH_SATURATION_MS: u64 = 3_000;

/// Horizontal offset of `timestamp` inside `window`, as a percentage clamped to `[0, 100]`.
pub fn position_percent(window: &TimeWindow, timestamp: DateTime<Utc>) -> f64 {
    let offset = (timestamp - window.start).num_milliseconds() as f64;
    let percent = offset / window.span_ms() as f64 * 100.0;
    percent.clamp(0.0, 100.0)
}

/// Bar width in layout units, linear in duration up to the saturation point.
pub fn bar_width(duration_ms: u64) -> f64 {
    let capped = duration_ms.min(WIDTH_SATURATION_MS) as f64;
    MIN_BAR_WIDTH + capped / WIDTH_SATURATION_MS as f64 * (MAX_BAR_WIDTH - MIN_BAR_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::window::TimeRange;
    use chrono::{Duration, TimeZone};

    fn window() -> TimeWindow {
        TimeWindow::new(
            Utc.with_ymd_and_hms(2026, 5, 1, 10, 0, 0).unwrap(),
            TimeRange::OneHour,
        )
    }

    #[test]
    fn position_is_linear_across_the_window() {
        let window = window();
        assert_eq!(position_percent(&window, window.start), 0.0);
        assert_eq!(position_percent(&window, window.now), 100.0);
        assert_eq!(
            position_percent(&window, window.start + Duration::minutes(15)),
            25.0
        );
    }

    #[test]
    fn position_is_strictly_monotonic_inside_the_window() {
        let window = window();
        let mut previous = -1.0;
        for second in (0..=3600).step_by(7) {
            let position = position_percent(&window, window.start + Duration::seconds(second));
            assert!(position > previous);
            previous = position;
        }
    }

    #[test]
    fn position_clamps_outside_the_window() {
        let window = window();
        assert_eq!(position_percent(&window, window.start - Duration::hours(3)), 0.0);
        assert_eq!(position_percent(&window, window.now + Duration::seconds(1)), 100.0);
    }

    #[test]
    fn width_saturates_at_three_seconds() {
        assert_eq!(bar_width(0), MIN_BAR_WIDTH);
        assert_eq!(bar_width(3_000), MAX_BAR_WIDTH);
        assert_eq!(bar_width(5_000), MAX_BAR_WIDTH);
        assert_eq!(bar_width(1_500), 34.0);
    }

    #[test]
    fn width_never_decreases_with_duration() {
        let widths: Vec<f64> = (0..4_000).step_by(50).map(bar_width).collect();
        assert!(widths.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
