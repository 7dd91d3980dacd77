//! Compiled formatters: multi-section dispatch and combinators.
//!
//! A [`Formatter`] is a closed tree: compiled patterns at the leaves, with
//! conditional guards, first-success chains, and color wrappers above them.
//! Formatting never throws for malformed data; a formatter that cannot
//! handle a value declines by returning `None`, letting chains try the next
//! candidate and callers substitute their own default rendering.

use std::borrow::Cow;

use crate::compiler::{compile_section, CompiledSection, SectionBody};
use crate::context::{Color, FormatContext};
use crate::digits::Digits;
use crate::error::{CompileError, PatternError};
use crate::pattern::{ColorSource, Condition, Pattern};
use crate::run::{Exec, Formatted, Run};
use crate::value::Value;

/// A pattern compiled to its executable sections (1 to 4).
///
/// Immutable after compilation and safe to share across threads; every
/// format call allocates its own run state.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPattern {
    sections: Vec<CompiledSection>,
}

/// An executable formatter.
#[derive(Debug, Clone, PartialEq)]
pub enum Formatter {
    /// Sign/type-dispatched pattern sections
    Pattern(CompiledPattern),
    /// Delegate only when the numeric predicate holds; inconvertible
    /// values fail closed
    Conditional {
        condition: Condition,
        inner: Box<Formatter>,
    },
    /// First candidate to produce a result wins
    Chain(Vec<Formatter>),
    /// Decorate the inner result with a resolved color
    Colored {
        color: ColorSource,
        inner: Box<Formatter>,
    },
}

impl Formatter {
    /// Parse and compile a pattern string.
    pub fn compile(pattern: &str) -> Result<Formatter, PatternError> {
        let parsed = Pattern::parse(pattern)?;
        Ok(Formatter::from_pattern(&parsed)?)
    }

    /// Compile an already-parsed pattern.
    ///
    /// Sections carrying `[condition]` directives become a first-success
    /// chain of guarded single-section formatters, with the unconditional
    /// sections as fallback.
    pub fn from_pattern(pattern: &Pattern) -> Result<Formatter, CompileError> {
        let sections = pattern
            .sections()
            .iter()
            .enumerate()
            .map(|(i, s)| compile_section(s, i))
            .collect::<Result<Vec<_>, _>>()?;

        if sections.is_empty() {
            return Err(CompileError::EmptySection { index: 0 });
        }

        if sections.iter().all(|s| s.condition.is_none()) {
            return Ok(Formatter::Pattern(CompiledPattern { sections }));
        }

        let mut candidates = Vec::new();
        let mut fallback = Vec::new();
        for section in sections {
            match section.condition {
                Some(condition) => candidates.push(Formatter::Conditional {
                    condition,
                    inner: Box::new(Formatter::Pattern(CompiledPattern {
                        sections: vec![section],
                    })),
                }),
                None => fallback.push(section),
            }
        }

        if !fallback.is_empty() {
            candidates.push(Formatter::Pattern(CompiledPattern { sections: fallback }));
        } else if let Some(Formatter::Conditional { inner, .. }) = candidates.last() {
            // Every section is conditional: the last one doubles as the
            // unguarded fallback
            let last = (**inner).clone();
            candidates.push(last);
        }

        Ok(Formatter::chain(candidates))
    }

    /// Guard a formatter with a numeric condition.
    pub fn guarded(condition: Condition, inner: Formatter) -> Formatter {
        Formatter::Conditional {
            condition,
            inner: Box::new(inner),
        }
    }

    /// Try candidates in order, first success wins. A single-element list
    /// collapses to that element directly.
    pub fn chain(mut candidates: Vec<Formatter>) -> Formatter {
        if candidates.len() == 1 {
            candidates.remove(0)
        } else {
            Formatter::Chain(candidates)
        }
    }

    /// Wrap with a color. Rewrapping replaces any existing color wrapper
    /// instead of nesting, so the last color wins.
    pub fn with_color(self, color: ColorSource) -> Formatter {
        Formatter::Colored {
            color,
            inner: Box::new(self.unwrap_color()),
        }
    }

    /// Strip color wrappers down to the innermost non-color formatter.
    pub fn unwrap_color(self) -> Formatter {
        match self {
            Formatter::Colored { inner, .. } => inner.unwrap_color(),
            other => other,
        }
    }

    /// Format a value. Returns `None` when this formatter declines.
    pub fn format(&self, value: &Value<'_>, ctx: &dyn FormatContext) -> Option<Formatted> {
        match self {
            Formatter::Pattern(pattern) => pattern.format(value, ctx),

            Formatter::Conditional { condition, inner } => {
                let number = ctx.to_number(value)?;
                if condition.evaluate(number) {
                    inner.format(value, ctx)
                } else {
                    None
                }
            }

            Formatter::Chain(candidates) => {
                candidates.iter().find_map(|c| c.format(value, ctx))
            }

            Formatter::Colored { color, inner } => {
                let mut formatted = inner.format(value, ctx)?;
                if let Some(resolved) = resolve_color(color, ctx) {
                    formatted.color = Some(resolved);
                }
                Some(formatted)
            }
        }
    }
}

fn resolve_color(color: &ColorSource, ctx: &dyn FormatContext) -> Option<Color> {
    match color {
        ColorSource::Indexed(number) => ctx.color_by_number(*number),
        ColorSource::Named(name) => ctx.color_by_name(name),
    }
}

impl CompiledPattern {
    /// The number of compiled sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    fn format(&self, value: &Value<'_>, ctx: &dyn FormatContext) -> Option<Formatted> {
        match value {
            // Error values render verbatim; sections never apply
            Value::Error(text) => return Some(Formatted::plain(*text)),
            Value::Empty => return Some(Formatted::default()),
            _ => {}
        }

        // Text stays text even when it parses as a number; any other value
        // the context cannot coerce to a number falls back to text coercion
        if value.as_text().is_some() {
            return self.format_text(value, ctx);
        }
        match ctx.to_number(value) {
            Some(number) => self.format_number(number, value, ctx),
            None => self.format_text(value, ctx),
        }
    }

    /// Text values use the 4th section when present; a lone section with a
    /// `@` placeholder also applies. Otherwise the text passes through
    /// unchanged. The text itself comes from the context's coercion, so
    /// hosts decide how non-string values spell themselves.
    fn format_text(&self, value: &Value<'_>, ctx: &dyn FormatContext) -> Option<Formatted> {
        let text = ctx.to_text(value)?;

        let section = if self.sections.len() >= 4 {
            Some(&self.sections[3])
        } else if self.sections[0].has_text_value {
            // Fewer than 4 sections: the first section handles text when it
            // carries a text placeholder
            Some(&self.sections[0])
        } else {
            None
        };

        match section {
            Some(section) => self.execute(section, None, Some(text), false, ctx),
            None => Some(Formatted::plain(text)),
        }
    }

    fn format_number(
        &self,
        number: f64,
        value: &Value<'_>,
        ctx: &dyn FormatContext,
    ) -> Option<Formatted> {
        if number.is_nan() {
            return Some(Formatted::plain("NaN"));
        }
        if number.is_infinite() {
            return Some(Formatted::plain(if number.is_sign_positive() {
                "Infinity"
            } else {
                "-Infinity"
            }));
        }

        let (section, arm_sign) = self.select_section(number);

        if let SectionBody::Date { tokens, clock } = &section.body {
            #[cfg(feature = "chrono")]
            {
                let text = crate::datetime::format_section(tokens, *clock, value, ctx)?;
                return Some(Formatted {
                    text,
                    color: section.color.as_ref().and_then(|c| resolve_color(c, ctx)),
                });
            }
            #[cfg(not(feature = "chrono"))]
            {
                let _ = (tokens, clock, value);
                return None;
            }
        }

        self.execute(section, Some(number), None, arm_sign, ctx)
    }

    /// Select the section for a number by strict sign comparison, and
    /// whether the sign latch should be armed. A single-section pattern
    /// signs negative values itself; a dedicated negative section formats
    /// the magnitude with its own sign text.
    fn select_section(&self, number: f64) -> (&CompiledSection, bool) {
        let sections = &self.sections;
        match sections.len() {
            0 | 1 => (&sections[0], number < 0.0),
            2 => {
                if number < 0.0 {
                    (&sections[1], false)
                } else {
                    (&sections[0], false)
                }
            }
            _ => {
                if number > 0.0 {
                    (&sections[0], false)
                } else if number < 0.0 {
                    (&sections[1], false)
                } else {
                    (&sections[2], false)
                }
            }
        }
    }

    fn execute(
        &self,
        section: &CompiledSection,
        number: Option<f64>,
        text: Option<Cow<'_, str>>,
        arm_sign: bool,
        ctx: &dyn FormatContext,
    ) -> Option<Formatted> {
        let SectionBody::Number { components, layout } = &section.body else {
            return None;
        };

        let magnitude = number.map(f64::abs).unwrap_or(0.0);
        let exec = Exec {
            digits: Digits::extract(magnitude, layout, arm_sign),
            layout,
            text,
            number,
        };

        let mut run = Run::new(ctx);
        for component in components {
            component.append(&mut run, &exec);
        }

        Some(Formatted {
            text: run.finish(),
            color: section.color.as_ref().and_then(|c| resolve_color(c, ctx)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StandardContext;
    use crate::pattern::{ConditionOp, Pattern};

    fn fmt(pattern: &str, value: f64) -> String {
        let formatter = Formatter::compile(pattern).unwrap();
        formatter
            .format(&Value::Number(value), &StandardContext::default())
            .map(|f| f.text)
            .unwrap_or_default()
    }

    #[test]
    fn test_single_section_signs_negatives() {
        assert_eq!(fmt("0", 42.0), "42");
        assert_eq!(fmt("0", -42.0), "-42");
        assert_eq!(fmt("0", 0.0), "0");
    }

    #[test]
    fn test_negative_section_formats_magnitude() {
        assert_eq!(fmt("0;(0)", -42.0), "(42)");
        assert_eq!(fmt("0;(0)", 42.0), "42");
    }

    #[test]
    fn test_zero_section() {
        assert_eq!(fmt("0;-0;\"zero\"", 0.0), "zero");
        assert_eq!(fmt("0;-0;\"zero\"", -5.0), "-5");
    }

    #[test]
    fn test_chain_collapses_single_candidate() {
        let inner = Formatter::compile("0").unwrap();
        let chained = Formatter::chain(vec![inner.clone()]);
        assert_eq!(chained, inner);
    }

    #[test]
    fn test_color_rewrap_replaces() {
        let formatter = Formatter::compile("0").unwrap();
        let red = formatter.with_color(ColorSource::Named("Red".to_string()));
        let blue = red.with_color(ColorSource::Named("Blue".to_string()));

        let Formatter::Colored { color, inner } = &blue else {
            panic!("expected colored formatter");
        };
        assert_eq!(color, &ColorSource::Named("Blue".to_string()));
        assert!(matches!(**inner, Formatter::Pattern(_)));
    }

    #[test]
    fn test_conditional_fails_closed() {
        let condition = Condition {
            op: ConditionOp::GreaterThan,
            operand: 0.0,
        };
        let guarded = Formatter::guarded(condition, Formatter::compile("0").unwrap());
        let ctx = StandardContext::default();
        assert!(guarded.format(&Value::Text("not a number"), &ctx).is_none());
        assert!(guarded.format(&Value::Number(-1.0), &ctx).is_none());
        assert!(guarded.format(&Value::Number(1.0), &ctx).is_some());
    }

    #[test]
    fn test_conditional_pattern_dispatch() {
        let parsed = Pattern::parse("[>0]0;[<0](0);0").unwrap();
        let formatter = Formatter::from_pattern(&parsed).unwrap();
        let ctx = StandardContext::default();

        let positive = formatter.format(&Value::Number(3.0), &ctx).unwrap();
        assert_eq!(positive.text, "3");
        let negative = formatter.format(&Value::Number(-3.0), &ctx).unwrap();
        assert_eq!(negative.text, "(-3)");
        let zero = formatter.format(&Value::Number(0.0), &ctx).unwrap();
        assert_eq!(zero.text, "0");
    }

    #[test]
    fn test_error_value_renders_verbatim() {
        let formatter = Formatter::compile("0.00").unwrap();
        let ctx = StandardContext::default();
        let result = formatter.format(&Value::Error("#DIV/0!"), &ctx).unwrap();
        assert_eq!(result.text, "#DIV/0!");
    }

    #[test]
    fn test_empty_value_renders_empty() {
        let formatter = Formatter::compile("0.00").unwrap();
        let ctx = StandardContext::default();
        let result = formatter.format(&Value::Empty, &ctx).unwrap();
        assert_eq!(result.text, "");
    }
}
