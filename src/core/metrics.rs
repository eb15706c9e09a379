use chrono::{DateTime, Utc};
use chrono_tz::Tz;

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_MINUTE: i64 = 60;

/// Percent move from `entry` to `leg_price`, rounded to 2 dp, sign kept.
pub fn pct(leg_price: Option<f64>, entry: Option<f64>) -> Option<f64> {
    let (price, entry) = (leg_price?, entry?);
    if entry == 0.0 || !entry.is_finite() || !price.is_finite() {
        return None;
    }
    Some(round2((price - entry) / entry * 100.0))
}

/// Decimal places scale with magnitude so low-priced coins stay readable.
pub fn price_decimals(p: f64) -> usize {
    let m = p.abs();
    if m >= 100.0 {
        2
    } else if m >= 0.01 {
        4
    } else if m >= 0.0001 {
        6
    } else {
        8
    }
}

pub fn format_price(p: f64) -> String {
    if !p.is_finite() {
        return "-".to_string();
    }
    format!("{:.*}", price_decimals(p), p)
}

/// `"{d}d {h}h"`, `"{h}h {m}m"` or `"{m}m"`, dropping a zero trailing unit.
/// Negative durations have no rendering.
pub fn format_duration(seconds: i64) -> Option<String> {
    if seconds < 0 {
        return None;
    }

    let days = seconds / SECS_PER_DAY;
    if days > 0 {
        let hours = (seconds % SECS_PER_DAY) / SECS_PER_HOUR;
        return Some(if hours == 0 {
            format!("{}d", days)
        } else {
            format!("{}d {}h", days, hours)
        });
    }

    let hours = seconds / SECS_PER_HOUR;
    if hours > 0 {
        let minutes = (seconds % SECS_PER_HOUR) / SECS_PER_MINUTE;
        return Some(if minutes == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, minutes)
        });
    }

    Some(format!("{}m", seconds / SECS_PER_MINUTE))
}

/// Signed percent with two decimals, e.g. `+5.25%`.
pub fn format_pct(p: f64) -> String {
    format!("{:+.2}%", p)
}

pub fn format_timestamp(ts: DateTime<Utc>, tz: Tz) -> String {
    ts.with_timezone(&tz).format("%Y-%m-%d %H:%M").to_string()
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn pct_move() {
        assert_eq!(pct(Some(105.0), Some(100.0)), Some(5.0));
        assert_eq!(pct(Some(95.0), Some(100.0)), Some(-5.0));
        assert_eq!(pct(Some(1.23456), Some(1.0)), Some(23.46));
        assert_eq!(pct(None, Some(100.0)), None);
        assert_eq!(pct(Some(105.0), None), None);
        assert_eq!(pct(Some(105.0), Some(0.0)), None);
    }

    #[test]
    fn price_thresholds() {
        assert_eq!(format_price(150.0), "150.00");
        assert_eq!(format_price(100.0), "100.00");
        assert_eq!(format_price(50.0), "50.0000");
        assert_eq!(format_price(0.5), "0.5000");
        assert_eq!(format_price(0.01), "0.0100");
        assert_eq!(format_price(0.005), "0.005000");
        assert_eq!(format_price(0.0001), "0.000100");
        assert_eq!(format_price(0.00005), "0.00005000");
        assert_eq!(format_price(f64::NAN), "-");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(90_000).as_deref(), Some("1d 1h"));
        assert_eq!(format_duration(86_400).as_deref(), Some("1d"));
        assert_eq!(format_duration(3_600).as_deref(), Some("1h"));
        assert_eq!(format_duration(5_400).as_deref(), Some("1h 30m"));
        assert_eq!(format_duration(120).as_deref(), Some("2m"));
        assert_eq!(format_duration(59).as_deref(), Some("0m"));
        assert_eq!(format_duration(0).as_deref(), Some("0m"));
        assert_eq!(format_duration(-1), None);
    }

    #[test]
    fn pct_and_timestamp_labels() {
        assert_eq!(format_pct(5.25), "+5.25%");
        assert_eq!(format_pct(-3.0), "-3.00%");

        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 20, 15, 0).unwrap();
        assert_eq!(format_timestamp(ts, chrono_tz::UTC), "2025-03-01 20:15");
        assert_eq!(format_timestamp(ts, chrono_tz::Asia::Jakarta), "2025-03-02 03:15");
    }
}
