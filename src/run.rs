//! Per-call formatting run state.
//!
//! A [`Run`] is the mutable accumulator for exactly one format invocation.
//! Compiled components append into it in list order; the run itself never
//! reorders or skips anything. All locale symbols come from the context so
//! the same compiled formatter renders differently under different hosts.

use std::borrow::Cow;

use crate::context::{Color, FormatContext};
use crate::digits::{Digits, NumberLayout};

/// Final output of a format call: flat text plus an optional color.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Formatted {
    pub text: String,
    pub color: Option<Color>,
}

impl Formatted {
    pub fn plain(text: impl Into<String>) -> Formatted {
        Formatted {
            text: text.into(),
            color: None,
        }
    }
}

/// Inputs shared by all components during one run.
pub(crate) struct Exec<'a> {
    pub digits: Digits,
    pub layout: &'a NumberLayout,
    /// Text substituted for `@` placeholders
    pub text: Option<Cow<'a, str>>,
    /// Raw numeric value, for `General` components
    pub number: Option<f64>,
}

/// The sequential output sink components write into.
pub(crate) struct Run<'a> {
    ctx: &'a dyn FormatContext,
    out: String,
    fill: Option<(usize, char)>,
    integer_started: bool,
}

impl<'a> Run<'a> {
    pub fn new(ctx: &'a dyn FormatContext) -> Run<'a> {
        Run {
            ctx,
            out: String::new(),
            fill: None,
            integer_started: false,
        }
    }

    /// Append one digit character. Positions are 1-based from the right for
    /// the integer segment and negative for fraction positions; any
    /// positive-position digit marks the integer segment as started, which
    /// gates grouping separators.
    pub fn append_digit(&mut self, ch: char, signed_position: i32) {
        self.out.push(ch);
        if signed_position > 0 {
            self.integer_started = true;
        }
    }

    pub fn append_text(&mut self, text: &str) {
        self.out.push_str(text);
    }

    pub fn append_group_separator(&mut self) {
        self.out.push(self.ctx.grouping_separator());
    }

    pub fn append_decimal_point(&mut self) {
        self.out.push(self.ctx.decimal_separator());
    }

    pub fn append_currency_symbol(&mut self) {
        let symbol = self.ctx.currency_symbol().to_string();
        self.out.push_str(&symbol);
    }

    pub fn append_percent_symbol(&mut self) {
        self.out.push(self.ctx.percent_symbol());
    }

    pub fn append_minus_sign(&mut self) {
        self.out.push(self.ctx.negative_sign());
    }

    pub fn append_positive_sign(&mut self) {
        self.out.push(self.ctx.positive_sign());
    }

    pub fn append_exponent_symbol(&mut self, upper: bool) {
        let symbol = self.ctx.exponent_symbol();
        self.out.push(if upper {
            symbol.to_ascii_uppercase()
        } else {
            symbol.to_ascii_lowercase()
        });
    }

    /// Record the star-fill insertion point; padding happens in `finish`.
    pub fn set_fill(&mut self, ch: char) {
        self.fill = Some((self.out.len(), ch));
    }

    pub fn integer_started(&self) -> bool {
        self.integer_started
    }

    /// Produce the final text, expanding any star-fill to the cell width.
    pub fn finish(self) -> String {
        let mut out = self.out;
        if let Some((position, ch)) = self.fill {
            let width = self.ctx.cell_width();
            let visible = out.chars().count();
            if width > visible {
                let padding: String = std::iter::repeat(ch).take(width - visible).collect();
                out.insert_str(position, &padding);
            }
        }
        out
    }
}

/// Plain rendering of a number with up to 10 decimal places and trailing
/// zeros trimmed, used for `General` sections and fallbacks.
pub(crate) fn general_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "Infinity"
        } else {
            "-Infinity"
        }
        .to_string();
    }

    let formatted = format!("{value:.10}");
    if formatted.contains('.') {
        let trimmed = formatted.trim_end_matches('0');
        if trimmed.ends_with('.') {
            trimmed.trim_end_matches('.').to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        formatted
    }
}
