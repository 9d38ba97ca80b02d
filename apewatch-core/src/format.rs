//! Presentation helpers shared by every front end. No I/O.

use chrono::{DateTime, Utc};

/// Percent move at which the color saturates.
pub const FULL_INTENSITY_PCT: f64 = 20.0;

/// RGB color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to 0..=255.
    pub fn to_u8(self) -> (u8, u8, u8) {
        let scale = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (scale(self.r), scale(self.g), scale(self.b))
    }
}

/// Green for gains, red for losses, brightness proportional to |p| up to 20%.
///
/// Zero is a non-positive value: it takes the red branch at intensity 0,
/// which renders as black rather than a faint green.
pub fn color_for_percentage(p: f64) -> Rgb {
    let intensity = (p.abs() / FULL_INTENSITY_PCT).min(1.0);
    if p > 0.0 {
        Rgb::new(0.0, intensity, 0.0)
    } else if p.is_nan() {
        Rgb::new(0.0, 0.0, 0.0)
    } else {
        Rgb::new(intensity, 0.0, 0.0)
    }
}

/// `12.346` → `"12.35%"`.
pub fn format_percentage(p: f64) -> String {
    format!("{p:.2}%")
}

/// Status-line age of the last update: `"Never"` or `"3m 7s ago"`.
pub fn format_time_since(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(last) = last else {
        return "Never".into();
    };
    let elapsed = (now - last).num_seconds().max(0);
    format!("{}m {}s ago", elapsed / 60, elapsed % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn saturates_at_twenty_percent() {
        assert_eq!(color_for_percentage(20.0), Rgb::new(0.0, 1.0, 0.0));
        assert_eq!(color_for_percentage(-20.0), Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(color_for_percentage(40.0), color_for_percentage(20.0));
        assert_eq!(color_for_percentage(-75.0), Rgb::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn zero_is_black() {
        assert_eq!(color_for_percentage(0.0), Rgb::new(0.0, 0.0, 0.0));
        assert_eq!(color_for_percentage(-0.0), Rgb::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn scales_linearly_below_saturation() {
        assert_eq!(color_for_percentage(5.0), Rgb::new(0.0, 0.25, 0.0));
        assert_eq!(color_for_percentage(-10.0), Rgb::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn nan_is_black() {
        assert_eq!(color_for_percentage(f64::NAN), Rgb::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn to_u8_scales_channels() {
        assert_eq!(Rgb::new(1.0, 0.5, 0.0).to_u8(), (255, 128, 0));
    }

    #[test]
    fn percentage_has_two_decimals() {
        assert_eq!(format_percentage(12.346), "12.35%");
        assert_eq!(format_percentage(-3.0), "-3.00%");
        assert_eq!(format_percentage(0.0), "0.00%");
    }

    #[test]
    fn time_since_update() {
        let now = Utc.with_ymd_and_hms(2024, 6, 3, 15, 0, 0).unwrap();
        assert_eq!(format_time_since(None, now), "Never");
        assert_eq!(
            format_time_since(Some(now - Duration::seconds(187)), now),
            "3m 7s ago"
        );
        assert_eq!(format_time_since(Some(now + Duration::seconds(5)), now), "0m 0s ago");
    }
}
