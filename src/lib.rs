//! cellfmt - pattern-driven spreadsheet cell value formatting
//!
//! This crate parses cell format patterns (e.g. `#,##0.00`, `dd/mm/yyyy`,
//! `$0.00"cr"`) once into a compiled component program, then replays that
//! program against typed values to produce styled text. Compiled formatters
//! are immutable and reusable; all locale symbols, naming tables, and value
//! coercion come from a [`FormatContext`] supplied at format time.

pub mod builtin;
pub mod component;
pub mod context;
pub mod digits;
pub mod error;
pub mod pattern;
pub mod value;

#[cfg(feature = "chrono")]
pub mod serial;

mod cache;
mod compiler;
mod datetime;
mod formatter;
mod locale;
mod run;

pub use context::{Color, DateSystem, FormatContext, StandardContext};
pub use error::{CompileError, ParseError, PatternError};
pub use formatter::{CompiledPattern, Formatter};
pub use locale::{DateNames, Locale};
pub use pattern::{ColorSource, Condition, ConditionOp, Pattern};
pub use run::Formatted;
pub use value::Value;

/// Format a value with a pattern, compiling through the global cache.
///
/// A formatter that declines (for example a chain where no candidate
/// matches) yields an empty [`Formatted`]; only structurally invalid
/// patterns produce an error.
pub fn format_value(
    pattern: &str,
    value: &Value<'_>,
    ctx: &dyn FormatContext,
) -> Result<Formatted, PatternError> {
    let formatter = cache::get_or_compile(pattern)?;
    Ok(formatter.format(value, ctx).unwrap_or_default())
}

/// Format a value with the default en-US context.
pub fn format_default(pattern: &str, value: &Value<'_>) -> Result<Formatted, PatternError> {
    format_value(pattern, value, &StandardContext::default())
}
