//! Serial date number conversion.
//!
//! Spreadsheets store dates as serial numbers counting days since a base
//! date, with the time of day in the fractional part:
//! - 1900 system: day 1 = January 1, 1900 (Windows default)
//! - 1904 system: day 1 = January 2, 1904 (Mac legacy)
//!
//! The 1900 system includes the classic leap year bug: serial 60 stands for
//! the nonexistent February 29, 1900. Calendar types cannot represent that
//! day, so serial 60 maps to February 28, 1900 here; serials 61 and up are
//! shifted to compensate, keeping every real date at its spreadsheet serial.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::context::DateSystem;

const SECONDS_PER_DAY: f64 = 86_400.0;

fn base_date(system: DateSystem) -> Option<NaiveDate> {
    match system {
        // Day 1 = 1900-01-01, so day 0 sits on 1899-12-31
        DateSystem::Date1900 => NaiveDate::from_ymd_opt(1899, 12, 31),
        // Day 0 = 1904-01-01
        DateSystem::Date1904 => NaiveDate::from_ymd_opt(1904, 1, 1),
    }
}

/// Convert a serial number to a calendar date-time.
///
/// Returns `None` for serials before the epoch or outside the calendar
/// range.
pub fn serial_to_datetime(serial: f64, system: DateSystem) -> Option<NaiveDateTime> {
    if serial < 0.0 {
        return None;
    }

    let mut days = serial.floor() as i64;
    if system == DateSystem::Date1900 && days >= 60 {
        // Skip the phantom Feb 29, 1900
        days -= 1;
    }

    let date = base_date(system)?.checked_add_signed(Duration::days(days))?;

    let fraction = serial.fract();
    let total_nanos = (fraction * SECONDS_PER_DAY * 1_000_000_000.0).round() as i64;
    let seconds = (total_nanos / 1_000_000_000) as u32;
    let nanos = (total_nanos % 1_000_000_000) as u32;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds.min(86_399), nanos)?;

    Some(NaiveDateTime::new(date, time))
}

/// Convert a calendar date-time to a serial number.
pub fn datetime_to_serial(dt: &NaiveDateTime, system: DateSystem) -> f64 {
    let base = match base_date(system) {
        Some(base) => base,
        None => return 0.0,
    };

    let mut days = (dt.date() - base).num_days();
    if system == DateSystem::Date1900 && days >= 60 {
        // Reinsert the phantom Feb 29, 1900
        days += 1;
    }

    days as f64 + time_fraction(&dt.time())
}

/// The fraction of a day represented by a time of day.
pub fn time_fraction(time: &NaiveTime) -> f64 {
    let seconds = time.signed_duration_since(NaiveTime::MIN).num_seconds() as f64;
    let nanos = chrono::Timelike::nanosecond(time) as f64 / 1_000_000_000.0;
    (seconds + nanos) / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_serial_one_is_jan_1_1900() {
        let dt = serial_to_datetime(1.0, DateSystem::Date1900).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (1900, 1, 1));
    }

    #[test]
    fn test_leap_year_bug_boundary() {
        let dt = serial_to_datetime(59.0, DateSystem::Date1900).unwrap();
        assert_eq!((dt.month(), dt.day()), (2, 28));
        // Serial 60 is the phantom Feb 29; it clamps to Feb 28
        let dt = serial_to_datetime(60.0, DateSystem::Date1900).unwrap();
        assert_eq!((dt.month(), dt.day()), (2, 28));
        let dt = serial_to_datetime(61.0, DateSystem::Date1900).unwrap();
        assert_eq!((dt.month(), dt.day()), (3, 1));
    }

    #[test]
    fn test_1904_system() {
        let dt = serial_to_datetime(1.0, DateSystem::Date1904).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (1904, 1, 2));
    }

    #[test]
    fn test_time_fraction_of_serial() {
        let dt = serial_to_datetime(0.75, DateSystem::Date1900).unwrap();
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (18, 0, 0));
        let dt = serial_to_datetime(0.5, DateSystem::Date1900).unwrap();
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_known_serial() {
        // Serial 46031 = 2026-01-09 in the 1900 system
        let dt = serial_to_datetime(46031.0, DateSystem::Date1900).unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2026, 1, 9));
    }

    #[test]
    fn test_roundtrip() {
        for &(y, m, d) in &[(1900, 3, 1), (2000, 2, 29), (2024, 12, 31), (2026, 1, 9)] {
            let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            let dt = date.and_hms_opt(6, 30, 15).unwrap();
            let serial = datetime_to_serial(&dt, DateSystem::Date1900);
            let back = serial_to_datetime(serial, DateSystem::Date1900).unwrap();
            assert_eq!(back.date(), date);
            assert_eq!(
                (back.hour(), back.minute(), back.second()),
                (6, 30, 15),
                "roundtrip failed for {y}-{m}-{d}"
            );
        }
    }

    #[test]
    fn test_negative_serial_rejected() {
        assert!(serial_to_datetime(-1.0, DateSystem::Date1900).is_none());
    }
}
