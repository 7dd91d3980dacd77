//! Date/time analysis and formatting.
//!
//! Mirrors the numeric path's two-pass design: [`analyze`] runs once at
//! compile time over a section's tokens to fix the clock shape (12- vs
//! 24-hour rendering, subsecond precision, elapsed fields), and
//! [`format_section`] walks the same tokens again with a value bound,
//! emitting literals interleaved with field text.

use crate::pattern::{Token, TokenKind};

#[cfg(feature = "chrono")]
use crate::context::FormatContext;
#[cfg(feature = "chrono")]
use crate::pattern::{AmPmStyle, DateField, ElapsedField};
#[cfg(feature = "chrono")]
use crate::value::Value;
#[cfg(feature = "chrono")]
use chrono::{Datelike, Timelike};

/// Clock shape of a date section, fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ClockInfo {
    /// An AM/PM marker is present, so hours render on a 12-hour clock
    pub twelve_hour: bool,
    /// Fractional-second digits to display (0 = round to whole seconds)
    pub subsecond_digits: u8,
    /// Elapsed-duration fields are present
    pub has_elapsed: bool,
}

/// Analysis pass: detect AM/PM usage, subsecond precision, and elapsed
/// fields in one walk.
pub(crate) fn analyze(tokens: &[Token]) -> ClockInfo {
    let mut clock = ClockInfo::default();
    for token in tokens {
        match token.kind() {
            TokenKind::AmPm(_) => clock.twelve_hour = true,
            TokenKind::DatePart(crate::pattern::DateField::Subsecond(digits)) => {
                clock.subsecond_digits = clock.subsecond_digits.max(*digits);
            }
            TokenKind::Elapsed(_) => clock.has_elapsed = true,
            _ => {}
        }
    }
    clock
}

/// Value-bound pass: render a date section. Returns `None` when the value
/// cannot be coerced to a date-time.
#[cfg(feature = "chrono")]
pub(crate) fn format_section(
    tokens: &[Token],
    clock: ClockInfo,
    value: &Value<'_>,
    ctx: &dyn FormatContext,
) -> Option<String> {
    let mut dt = ctx.to_datetime(value)?;

    let serial = if clock.has_elapsed {
        Some(ctx.to_number(value)?)
    } else {
        None
    };

    // Without subsecond display, seconds round to the nearest whole second
    if clock.subsecond_digits == 0 && dt.nanosecond() >= 500_000_000 {
        dt = (dt + chrono::Duration::seconds(1)).with_nanosecond(0)?;
    }

    let year = resolve_year(dt.year(), ctx.two_digit_year_threshold());
    let month = dt.month();
    let day = dt.day();
    let hour = dt.hour();
    let minute = dt.minute();
    let second = dt.second();
    let weekday = dt.weekday().num_days_from_sunday() + 1;

    let display_hour = if clock.twelve_hour {
        to_12_hour(hour)
    } else {
        hour
    };

    let mut out = String::new();
    for token in tokens {
        match token.kind() {
            TokenKind::DatePart(field) => match field {
                DateField::Year2 => out.push_str(&format!("{:02}", year.rem_euclid(100))),
                DateField::Year4 => out.push_str(&format!("{year:04}")),
                DateField::Month => out.push_str(&month.to_string()),
                DateField::Month2 => out.push_str(&format!("{month:02}")),
                DateField::MonthAbbr => out.push_str(ctx.month_name_abbreviation(month)),
                DateField::MonthFull => out.push_str(ctx.month_name(month)),
                DateField::MonthLetter => {
                    if let Some(letter) = ctx.month_name(month).chars().next() {
                        out.push(letter);
                    }
                }
                DateField::Day => out.push_str(&day.to_string()),
                DateField::Day2 => out.push_str(&format!("{day:02}")),
                DateField::WeekdayAbbr => {
                    out.push_str(ctx.week_day_name_abbreviation(weekday));
                }
                DateField::WeekdayFull => out.push_str(ctx.week_day_name(weekday)),
                DateField::Hour => out.push_str(&display_hour.to_string()),
                DateField::Hour2 => out.push_str(&format!("{display_hour:02}")),
                DateField::Minute => out.push_str(&minute.to_string()),
                DateField::Minute2 => out.push_str(&format!("{minute:02}")),
                DateField::Second => out.push_str(&second.to_string()),
                DateField::Second2 => out.push_str(&format!("{second:02}")),
                DateField::Subsecond(digits) => {
                    out.push(ctx.decimal_separator());
                    out.push_str(&subsecond_text(dt.nanosecond(), *digits));
                }
            },

            TokenKind::AmPm(style) => {
                out.push_str(&am_pm_text(ctx.am_pm(hour), *style));
            }

            TokenKind::Elapsed(field) => {
                // `clock.has_elapsed` guarantees the serial was resolved
                let serial = serial?;
                out.push_str(&elapsed_text(serial, *field));
            }

            TokenKind::Text | TokenKind::Escaped | TokenKind::Quoted => {
                out.push_str(token.text());
            }
            TokenKind::MinusSign => out.push('-'),
            TokenKind::Slash => out.push('/'),
            TokenKind::DecimalPoint => out.push(ctx.decimal_separator()),
            TokenKind::GroupSeparator => out.push(ctx.grouping_separator()),
            TokenKind::CurrencySymbol => out.push_str(ctx.currency_symbol()),
            TokenKind::PercentSymbol => out.push(ctx.percent_symbol()),
            TokenKind::UnderscoreSkip => out.push(' '),

            _ => {}
        }
    }

    Some(out)
}

/// Expand a proleptic two-digit year through the pivot.
#[cfg(feature = "chrono")]
fn resolve_year(year: i32, threshold: i32) -> i32 {
    if (0..100).contains(&year) {
        if year <= threshold {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

/// Convert 24-hour time to 12-hour display.
/// 0 -> 12, 1-12 -> 1-12, 13-23 -> 1-11
#[cfg(feature = "chrono")]
fn to_12_hour(hour: u32) -> u32 {
    match hour {
        0 => 12,
        1..=12 => hour,
        _ => hour - 12,
    }
}

#[cfg(feature = "chrono")]
fn am_pm_text(designator: &str, style: AmPmStyle) -> String {
    match style {
        AmPmStyle::Upper => designator.to_uppercase(),
        AmPmStyle::Lower => designator.to_lowercase(),
        AmPmStyle::ShortUpper => designator
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default(),
        AmPmStyle::ShortLower => designator
            .chars()
            .next()
            .map(|c| c.to_lowercase().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(feature = "chrono")]
fn subsecond_text(nanosecond: u32, digits: u8) -> String {
    if digits == 0 {
        return String::new();
    }
    let scale = 10u64.pow(digits as u32);
    let fraction = nanosecond as f64 / 1_000_000_000.0;
    let value = ((fraction * scale as f64).round() as u64) % scale;
    format!("{value:0>width$}", width = digits as usize)
}

/// Total elapsed hours/minutes/seconds from a serial day count.
#[cfg(feature = "chrono")]
fn elapsed_text(serial: f64, field: ElapsedField) -> String {
    let total_seconds = (serial * 86400.0).round() as i64;
    match field {
        ElapsedField::Hours => (total_seconds / 3600).to_string(),
        ElapsedField::Hours2 => format!("{:02}", total_seconds / 3600),
        ElapsedField::Minutes => (total_seconds / 60).to_string(),
        ElapsedField::Minutes2 => format!("{:02}", total_seconds / 60),
        ElapsedField::Seconds => total_seconds.to_string(),
        ElapsedField::Seconds2 => format!("{total_seconds:02}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Pattern;

    fn first_section_tokens(pattern: &str) -> Vec<Token> {
        Pattern::parse(pattern).unwrap().sections()[0].tokens.clone()
    }

    #[test]
    fn test_analyze_detects_am_pm() {
        let tokens = first_section_tokens("h:mm AM/PM");
        let clock = analyze(&tokens);
        assert!(clock.twelve_hour);
        assert_eq!(clock.subsecond_digits, 0);
    }

    #[test]
    fn test_analyze_counts_subsecond_digits() {
        let tokens = first_section_tokens("mm:ss.000");
        let clock = analyze(&tokens);
        assert!(!clock.twelve_hour);
        assert_eq!(clock.subsecond_digits, 3);
    }

    #[test]
    fn test_analyze_detects_elapsed() {
        let tokens = first_section_tokens("[h]:mm:ss");
        let clock = analyze(&tokens);
        assert!(clock.has_elapsed);
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_to_12_hour() {
        assert_eq!(to_12_hour(0), 12);
        assert_eq!(to_12_hour(1), 1);
        assert_eq!(to_12_hour(11), 11);
        assert_eq!(to_12_hour(12), 12);
        assert_eq!(to_12_hour(13), 1);
        assert_eq!(to_12_hour(23), 11);
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_resolve_year_pivot() {
        assert_eq!(resolve_year(26, 29), 2026);
        assert_eq!(resolve_year(29, 29), 2029);
        assert_eq!(resolve_year(30, 29), 1930);
        assert_eq!(resolve_year(1999, 29), 1999);
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_subsecond_text() {
        assert_eq!(subsecond_text(250_000_000, 2), "25");
        assert_eq!(subsecond_text(0, 3), "000");
        assert_eq!(subsecond_text(999_600_000, 1), "0");
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn test_elapsed_text() {
        assert_eq!(elapsed_text(1.5, ElapsedField::Hours), "36");
        assert_eq!(elapsed_text(0.5, ElapsedField::Minutes), "720");
        assert_eq!(elapsed_text(0.25, ElapsedField::Seconds2), "21600");
    }
}
