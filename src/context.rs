//! Run-time context consumed by compiled formatters.
//!
//! The formatting core never hard-codes locale symbols, color tables, or
//! value coercion rules; everything it needs at run time comes through the
//! [`FormatContext`] capability trait. [`StandardContext`] implements the
//! trait over a [`Locale`] plus a handful of host settings and is what the
//! convenience entry points use.

use std::borrow::Cow;

use crate::locale::Locale;
use crate::value::Value;

/// A resolved display color attached to formatted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const RED: Color = Color::new(0xff, 0x00, 0x00);
    pub const GREEN: Color = Color::new(0x00, 0x80, 0x00);
    pub const BLUE: Color = Color::new(0x00, 0x00, 0xff);
    pub const YELLOW: Color = Color::new(0xff, 0xff, 0x00);
    pub const MAGENTA: Color = Color::new(0xff, 0x00, 0xff);
    pub const CYAN: Color = Color::new(0x00, 0xff, 0xff);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Color { red, green, blue }
    }
}

/// The date system used for serial number conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateSystem {
    /// Windows default (1900-based, includes the phantom Feb 29, 1900)
    #[default]
    Date1900,
    /// Mac legacy (1904-based)
    Date1904,
}

/// Capabilities a compiled formatter pulls from its host at format time.
///
/// Locale symbols, naming lookups, color resolution, and value coercion all
/// go through this trait so the compiled component list stays free of any
/// host policy.
pub trait FormatContext {
    fn decimal_separator(&self) -> char;
    fn grouping_separator(&self) -> char;
    fn percent_symbol(&self) -> char;
    fn negative_sign(&self) -> char;
    fn positive_sign(&self) -> char;
    fn exponent_symbol(&self) -> char;
    fn currency_symbol(&self) -> &str;

    /// Full month name; `month` is 1-based (1 = January).
    fn month_name(&self, month: u32) -> &str;
    /// Abbreviated month name; `month` is 1-based.
    fn month_name_abbreviation(&self, month: u32) -> &str;
    /// Full weekday name; `weekday` is 1-based with 1 = Sunday.
    fn week_day_name(&self, weekday: u32) -> &str;
    /// Abbreviated weekday name; `weekday` is 1-based with 1 = Sunday.
    fn week_day_name_abbreviation(&self, weekday: u32) -> &str;
    /// AM/PM designator for the given hour of day (0-23).
    fn am_pm(&self, hour_of_day: u32) -> &str;

    /// Resolve a 1-based indexed color. Unknown indexes return `None`.
    fn color_by_number(&self, number: u8) -> Option<Color>;
    /// Resolve a named color. Unknown names return `None`.
    fn color_by_name(&self, name: &str) -> Option<Color>;

    /// Target cell width in characters; 0 disables star-fill padding.
    fn cell_width(&self) -> usize {
        0
    }

    /// Pivot for interpreting two-digit years: years at or below the
    /// threshold land in the 2000s, years above it in the 1900s.
    fn two_digit_year_threshold(&self) -> i32 {
        29
    }

    /// Coerce a value to a decimal number, if possible.
    fn to_number(&self, value: &Value<'_>) -> Option<f64>;

    /// Coerce a value to text, if possible.
    fn to_text<'v>(&self, value: &'v Value<'_>) -> Option<Cow<'v, str>>;

    /// Coerce a value to a calendar date-time, if possible.
    #[cfg(feature = "chrono")]
    fn to_datetime(&self, value: &Value<'_>) -> Option<chrono::NaiveDateTime>;

    /// The serial date system used when coercing numbers to date-times.
    fn date_system(&self) -> DateSystem {
        DateSystem::Date1900
    }
}

/// Context implementation over a [`Locale`] and host settings.
#[derive(Debug, Clone, Default)]
pub struct StandardContext {
    pub locale: Locale,
    pub date_system: DateSystem,
    pub cell_width: usize,
}

/// The eight classic indexed colors, 1-based per spreadsheet convention.
const INDEXED_COLORS: [(&str, Color); 8] = [
    ("Black", Color::BLACK),
    ("White", Color::WHITE),
    ("Red", Color::RED),
    ("Green", Color::GREEN),
    ("Blue", Color::BLUE),
    ("Yellow", Color::YELLOW),
    ("Magenta", Color::MAGENTA),
    ("Cyan", Color::CYAN),
];

impl FormatContext for StandardContext {
    fn decimal_separator(&self) -> char {
        self.locale.decimal_separator
    }

    fn grouping_separator(&self) -> char {
        self.locale.grouping_separator
    }

    fn percent_symbol(&self) -> char {
        self.locale.percent_symbol
    }

    fn negative_sign(&self) -> char {
        self.locale.negative_sign
    }

    fn positive_sign(&self) -> char {
        self.locale.positive_sign
    }

    fn exponent_symbol(&self) -> char {
        self.locale.exponent_symbol
    }

    fn currency_symbol(&self) -> &str {
        self.locale.currency_symbol
    }

    fn month_name(&self, month: u32) -> &str {
        self.locale.names.months_full[((month.clamp(1, 12)) - 1) as usize]
    }

    fn month_name_abbreviation(&self, month: u32) -> &str {
        self.locale.names.months_abbr[((month.clamp(1, 12)) - 1) as usize]
    }

    fn week_day_name(&self, weekday: u32) -> &str {
        self.locale.names.weekdays_full[((weekday.clamp(1, 7)) - 1) as usize]
    }

    fn week_day_name_abbreviation(&self, weekday: u32) -> &str {
        self.locale.names.weekdays_abbr[((weekday.clamp(1, 7)) - 1) as usize]
    }

    fn am_pm(&self, hour_of_day: u32) -> &str {
        if hour_of_day >= 12 {
            self.locale.names.pm
        } else {
            self.locale.names.am
        }
    }

    fn color_by_number(&self, number: u8) -> Option<Color> {
        if number == 0 {
            return None;
        }
        INDEXED_COLORS
            .get((number - 1) as usize)
            .map(|(_, color)| *color)
    }

    fn color_by_name(&self, name: &str) -> Option<Color> {
        INDEXED_COLORS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, color)| *color)
    }

    fn cell_width(&self) -> usize {
        self.cell_width
    }

    fn to_number(&self, value: &Value<'_>) -> Option<f64> {
        match value {
            Value::Number(n) => Some(*n),
            Value::Bool(true) => Some(1.0),
            Value::Bool(false) => Some(0.0),
            Value::Text(s) => s.trim().parse::<f64>().ok(),
            #[cfg(feature = "chrono")]
            Value::DateTime(dt) => Some(crate::serial::datetime_to_serial(dt, self.date_system)),
            #[cfg(feature = "chrono")]
            Value::Date(d) => d
                .and_hms_opt(0, 0, 0)
                .map(|dt| crate::serial::datetime_to_serial(&dt, self.date_system)),
            #[cfg(feature = "chrono")]
            Value::Time(t) => Some(crate::serial::time_fraction(t)),
            _ => None,
        }
    }

    fn to_text<'v>(&self, value: &'v Value<'_>) -> Option<Cow<'v, str>> {
        match value {
            Value::Text(s) => Some(Cow::Borrowed(*s)),
            Value::Error(s) => Some(Cow::Borrowed(*s)),
            Value::Bool(b) => Some(Cow::Owned(if *b { "TRUE" } else { "FALSE" }.to_string())),
            Value::Empty => Some(Cow::Borrowed("")),
            _ => None,
        }
    }

    #[cfg(feature = "chrono")]
    fn to_datetime(&self, value: &Value<'_>) -> Option<chrono::NaiveDateTime> {
        match value {
            Value::DateTime(dt) => Some(*dt),
            Value::Date(d) => d.and_hms_opt(0, 0, 0),
            Value::Time(t) => Some(chrono::NaiveDateTime::new(
                chrono::NaiveDate::from_ymd_opt(1900, 1, 1)?,
                *t,
            )),
            Value::Number(n) => crate::serial::serial_to_datetime(*n, self.date_system),
            _ => None,
        }
    }

    fn date_system(&self) -> DateSystem {
        self.date_system
    }
}
