//! Parser for format pattern strings.
//!
//! Parsing turns a pattern string into a [`Pattern`]: up to 4
//! semicolon-separated sections, each an ordered list of typed tokens. The
//! parser resolves everything that needs lookahead or pattern-level context
//! (bracket directive classification, exponent signs, fill/skip operands,
//! month-vs-minute disambiguation, fractional seconds), so later passes can
//! treat the token tree as flat, immutable input.

pub mod lexer;
pub mod tokens;

pub use tokens::{
    AmPmStyle, ColorSource, Condition, ConditionOp, DateField, ElapsedField, Pattern,
    PatternSection, Token, TokenKind,
};

use crate::error::ParseError;
use lexer::{Lexeme, SpannedLexeme};

/// Maximum number of sections a pattern may declare.
pub const MAX_SECTIONS: usize = 4;

/// Parse a pattern string into a token tree.
pub fn parse(pattern: &str) -> Result<Pattern, ParseError> {
    if pattern.is_empty() {
        return Err(ParseError::EmptyPattern);
    }

    let lexemes = lexer::tokenize(pattern)?;

    let mut sections = Vec::new();
    let mut current = Vec::new();
    for spanned in lexemes {
        if matches!(spanned.lexeme, Lexeme::Semicolon) {
            sections.push(current);
            current = Vec::new();
        } else {
            current.push(spanned);
        }
    }
    sections.push(current);

    if sections.len() > MAX_SECTIONS {
        return Err(ParseError::TooManySections);
    }

    let sections = sections
        .into_iter()
        .map(parse_section)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Pattern::from_sections(sections))
}

fn parse_section(lexemes: Vec<SpannedLexeme>) -> Result<PatternSection, ParseError> {
    let mut builder = SectionParser {
        lexemes,
        index: 0,
        tokens: Vec::new(),
        seen_second: false,
    };
    builder.run()?;
    let mut tokens = builder.tokens;
    resolve_minutes(&mut tokens);
    Ok(PatternSection { tokens })
}

struct SectionParser {
    lexemes: Vec<SpannedLexeme>,
    index: usize,
    tokens: Vec<Token>,
    seen_second: bool,
}

impl SectionParser {
    fn run(&mut self) -> Result<(), ParseError> {
        while self.index < self.lexemes.len() {
            let lexeme = self.lexemes[self.index].lexeme.clone();
            self.index += 1;
            self.parse_lexeme(lexeme)?;
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.index).map(|s| &s.lexeme)
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>) {
        self.tokens.push(Token::new(kind, text));
    }

    fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        // Coalesce adjacent literal runs
        if let Some(last) = self.tokens.last_mut() {
            if matches!(last.kind(), TokenKind::Text) {
                let merged = format!("{}{}", last.text(), text);
                *last = Token::new(TokenKind::Text, merged);
                return;
            }
        }
        self.push(TokenKind::Text, text);
    }

    fn parse_lexeme(&mut self, lexeme: Lexeme) -> Result<(), ParseError> {
        match lexeme {
            Lexeme::Char(ch) => self.push_text(ch.to_string()),
            Lexeme::Escaped(ch) => self.push(TokenKind::Escaped, ch.to_string()),
            Lexeme::Quoted(text) => self.push(TokenKind::Quoted, text),

            Lexeme::Zero => self.push(TokenKind::DigitZero, "0"),
            Lexeme::Hash => self.push(TokenKind::DigitHash, "#"),
            Lexeme::Question => self.push(TokenKind::DigitQuestion, "?"),

            Lexeme::Point => {
                // A decimal point directly after seconds starts a fractional
                // second field; the zero run gives the precision.
                if self.seen_second && matches!(self.peek(), Some(Lexeme::Zero)) {
                    let mut digits = 0u8;
                    while matches!(self.peek(), Some(Lexeme::Zero)) {
                        self.index += 1;
                        digits = digits.saturating_add(1);
                    }
                    let text = format!(".{}", "0".repeat(digits as usize));
                    self.push(TokenKind::DatePart(DateField::Subsecond(digits)), text);
                } else {
                    self.push(TokenKind::DecimalPoint, ".");
                }
            }
            Lexeme::Comma => self.push(TokenKind::GroupSeparator, ","),
            Lexeme::Semicolon => {}

            Lexeme::Percent => self.push(TokenKind::PercentSymbol, "%"),
            Lexeme::At => self.push(TokenKind::TextValue, "@"),
            Lexeme::Dollar => self.push(TokenKind::CurrencySymbol, "$"),
            Lexeme::Plus => self.push_text("+"),
            Lexeme::Minus => self.push(TokenKind::MinusSign, "-"),
            Lexeme::Slash => self.push(TokenKind::Slash, "/"),

            Lexeme::Star => {
                if let Some(ch) = self.take_operand_char() {
                    self.push(TokenKind::StarFill, ch.to_string());
                }
            }
            Lexeme::Underscore => {
                if let Some(ch) = self.take_operand_char() {
                    self.push(TokenKind::UnderscoreSkip, ch.to_string());
                }
            }

            Lexeme::Exponent { upper } => {
                // An exponent marker needs a sign or digit placeholder right
                // after it; a bare E/e is literal text (e.g. in `zero`)
                let starts_exponent = matches!(
                    self.peek(),
                    Some(
                        Lexeme::Plus
                            | Lexeme::Minus
                            | Lexeme::Zero
                            | Lexeme::Hash
                            | Lexeme::Question
                    )
                );
                if !starts_exponent {
                    self.push_text(if upper { "E" } else { "e" });
                    return Ok(());
                }
                let always_sign = matches!(self.peek(), Some(Lexeme::Plus));
                if matches!(self.peek(), Some(Lexeme::Plus | Lexeme::Minus)) {
                    self.index += 1;
                }
                let text = match (upper, always_sign) {
                    (true, true) => "E+",
                    (true, false) => "E-",
                    (false, true) => "e+",
                    (false, false) => "e-",
                };
                self.push(TokenKind::Exponent { upper, always_sign }, text);
            }

            Lexeme::Year(count) => {
                let field = if count >= 4 {
                    DateField::Year4
                } else {
                    DateField::Year2
                };
                self.push(TokenKind::DatePart(field), "y".repeat(count));
            }
            Lexeme::Month(count) => {
                let field = match count {
                    1 => DateField::Month,
                    2 => DateField::Month2,
                    3 => DateField::MonthAbbr,
                    4 => DateField::MonthFull,
                    _ => DateField::MonthLetter,
                };
                self.push(TokenKind::DatePart(field), "m".repeat(count));
            }
            Lexeme::Day(count) => {
                let field = match count {
                    1 => DateField::Day,
                    2 => DateField::Day2,
                    3 => DateField::WeekdayAbbr,
                    _ => DateField::WeekdayFull,
                };
                self.push(TokenKind::DatePart(field), "d".repeat(count));
            }
            Lexeme::Hour(count) => {
                let field = if count >= 2 {
                    DateField::Hour2
                } else {
                    DateField::Hour
                };
                self.push(TokenKind::DatePart(field), "h".repeat(count));
            }
            Lexeme::Second(count) => {
                self.seen_second = true;
                let field = if count >= 2 {
                    DateField::Second2
                } else {
                    DateField::Second
                };
                self.push(TokenKind::DatePart(field), "s".repeat(count));
            }
            Lexeme::AmPm(text) => {
                let style = am_pm_style(&text);
                self.push(TokenKind::AmPm(style), text);
            }

            Lexeme::Bracket(content) => self.parse_bracket(content)?,
            Lexeme::General => self.push(TokenKind::General, "General"),
        }
        Ok(())
    }

    /// Next lexeme rendered as the single-character operand of `*`/`_`.
    fn take_operand_char(&mut self) -> Option<char> {
        let ch = match self.peek()? {
            Lexeme::Char(ch) | Lexeme::Escaped(ch) => Some(*ch),
            Lexeme::Zero => Some('0'),
            Lexeme::Hash => Some('#'),
            Lexeme::Question => Some('?'),
            Lexeme::Point => Some('.'),
            Lexeme::Comma => Some(','),
            Lexeme::Percent => Some('%'),
            Lexeme::At => Some('@'),
            Lexeme::Star => Some('*'),
            Lexeme::Underscore => Some('_'),
            Lexeme::Dollar => Some('$'),
            Lexeme::Plus => Some('+'),
            Lexeme::Minus => Some('-'),
            Lexeme::Slash => Some('/'),
            _ => None,
        }?;
        self.index += 1;
        Some(ch)
    }

    /// Classify bracket directive content: elapsed time, condition, or color.
    /// Unrecognized directives are dropped.
    fn parse_bracket(&mut self, content: String) -> Result<(), ParseError> {
        let trimmed = content.trim();

        if let Some(field) = parse_elapsed(trimmed) {
            self.push(TokenKind::Elapsed(field), format!("[{trimmed}]"));
            return Ok(());
        }

        if trimmed.starts_with(['<', '>', '=']) {
            let condition = parse_condition(trimmed).ok_or_else(|| ParseError::InvalidCondition {
                content: trimmed.to_string(),
            })?;
            self.push(
                TokenKind::ConditionDirective(condition),
                format!("[{trimmed}]"),
            );
            return Ok(());
        }

        if let Some(color) = parse_color(trimmed) {
            self.push(TokenKind::ColorDirective(color), format!("[{trimmed}]"));
            return Ok(());
        }

        Ok(())
    }
}

fn am_pm_style(text: &str) -> AmPmStyle {
    let upper = text
        .chars()
        .next()
        .map(|c| c.is_uppercase())
        .unwrap_or(true);
    match (text.len() <= 3, upper) {
        (true, true) => AmPmStyle::ShortUpper,
        (true, false) => AmPmStyle::ShortLower,
        (false, true) => AmPmStyle::Upper,
        (false, false) => AmPmStyle::Lower,
    }
}

fn parse_elapsed(content: &str) -> Option<ElapsedField> {
    match content.to_ascii_lowercase().as_str() {
        "h" => Some(ElapsedField::Hours),
        "hh" => Some(ElapsedField::Hours2),
        "m" => Some(ElapsedField::Minutes),
        "mm" => Some(ElapsedField::Minutes2),
        "s" => Some(ElapsedField::Seconds),
        "ss" => Some(ElapsedField::Seconds2),
        _ => None,
    }
}

fn parse_condition(content: &str) -> Option<Condition> {
    let (op, rest) = if let Some(rest) = content.strip_prefix(">=") {
        (ConditionOp::GreaterOrEqual, rest)
    } else if let Some(rest) = content.strip_prefix("<=") {
        (ConditionOp::LessOrEqual, rest)
    } else if let Some(rest) = content.strip_prefix("<>") {
        (ConditionOp::NotEqual, rest)
    } else if let Some(rest) = content.strip_prefix('>') {
        (ConditionOp::GreaterThan, rest)
    } else if let Some(rest) = content.strip_prefix('<') {
        (ConditionOp::LessThan, rest)
    } else if let Some(rest) = content.strip_prefix('=') {
        (ConditionOp::Equal, rest)
    } else {
        return None;
    };

    let operand = rest.trim().parse::<f64>().ok()?;
    Some(Condition { op, operand })
}

/// Maximum length accepted for a named color reference.
const MAX_COLOR_NAME_LEN: usize = 255;

fn parse_color(content: &str) -> Option<ColorSource> {
    // Indexed colors: Color1 through Color56
    if let Some(rest) = content
        .get(..5)
        .filter(|p| p.eq_ignore_ascii_case("color"))
        .map(|_| &content[5..])
    {
        if let Ok(index) = rest.parse::<u8>() {
            if (1..=56).contains(&index) {
                return Some(ColorSource::Indexed(index));
            }
        }
        return None;
    }

    if !content.is_empty()
        && content.len() <= MAX_COLOR_NAME_LEN
        && content.chars().all(|c| c.is_alphabetic())
    {
        return Some(ColorSource::Named(content.to_string()));
    }

    None
}

/// Rebind month tokens that actually denote minutes: an `m`/`mm` run right
/// after an hour field or right before a second field is a minute field.
fn resolve_minutes(tokens: &mut [Token]) {
    let field_positions: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            matches!(t.kind(), TokenKind::DatePart(f) if !matches!(f, DateField::Subsecond(_)))
                || matches!(t.kind(), TokenKind::Elapsed(_))
        })
        .map(|(i, _)| i)
        .collect();

    for (fi, &ti) in field_positions.iter().enumerate() {
        let replacement = match tokens[ti].kind() {
            TokenKind::DatePart(DateField::Month) => DateField::Minute,
            TokenKind::DatePart(DateField::Month2) => DateField::Minute2,
            _ => continue,
        };

        let after_hour = fi > 0
            && matches!(
                tokens[field_positions[fi - 1]].kind(),
                TokenKind::DatePart(DateField::Hour | DateField::Hour2)
                    | TokenKind::Elapsed(ElapsedField::Hours | ElapsedField::Hours2)
            );
        let before_second = fi + 1 < field_positions.len()
            && matches!(
                tokens[field_positions[fi + 1]].kind(),
                TokenKind::DatePart(DateField::Second | DateField::Second2)
            );

        if after_hour || before_second {
            let text = tokens[ti].text().to_string();
            tokens[ti] = Token::new(TokenKind::DatePart(replacement), text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert!(matches!(parse(""), Err(ParseError::EmptyPattern)));
    }

    #[test]
    fn test_parse_single_zero() {
        let pattern = parse("0").unwrap();
        assert_eq!(pattern.sections().len(), 1);
        assert_eq!(pattern.sections()[0].tokens.len(), 1);
        assert_eq!(
            pattern.sections()[0].tokens[0].kind(),
            &TokenKind::DigitZero
        );
    }

    #[test]
    fn test_too_many_sections() {
        assert!(matches!(
            parse("0;0;0;0;0"),
            Err(ParseError::TooManySections)
        ));
    }

    #[test]
    fn test_parse_color_named() {
        assert_eq!(
            parse_color("Red"),
            Some(ColorSource::Named("Red".to_string()))
        );
        assert_eq!(parse_color("Color12"), Some(ColorSource::Indexed(12)));
        assert_eq!(parse_color("Color0"), None);
        assert_eq!(parse_color("Color57"), None);
        assert_eq!(parse_color("not a color"), None);
    }

    #[test]
    fn test_parse_condition_operators() {
        let c = parse_condition(">=50").unwrap();
        assert_eq!(c.op, ConditionOp::GreaterOrEqual);
        assert_eq!(c.operand, 50.0);

        let c = parse_condition("<>0").unwrap();
        assert_eq!(c.op, ConditionOp::NotEqual);

        assert!(parse_condition(">abc").is_none());
    }

    #[test]
    fn test_invalid_condition_is_fatal() {
        assert!(matches!(
            parse("[>oops]0"),
            Err(ParseError::InvalidCondition { .. })
        ));
    }

    #[test]
    fn test_minute_after_hour() {
        let pattern = parse("h:mm").unwrap();
        let kinds: Vec<_> = pattern.sections()[0]
            .tokens
            .iter()
            .map(|t| t.kind().clone())
            .collect();
        assert!(kinds.contains(&TokenKind::DatePart(DateField::Minute2)));
        assert!(!kinds.contains(&TokenKind::DatePart(DateField::Month2)));
    }

    #[test]
    fn test_minute_before_second() {
        let pattern = parse("mm:ss").unwrap();
        assert_eq!(
            pattern.sections()[0].tokens[0].kind(),
            &TokenKind::DatePart(DateField::Minute2)
        );
    }

    #[test]
    fn test_month_between_days_stays_month() {
        let pattern = parse("d mmmm yyyy").unwrap();
        let kinds: Vec<_> = pattern.sections()[0]
            .tokens
            .iter()
            .map(|t| t.kind().clone())
            .collect();
        assert!(kinds.contains(&TokenKind::DatePart(DateField::MonthFull)));
    }

    #[test]
    fn test_subsecond_after_seconds() {
        let pattern = parse("ss.00").unwrap();
        let kinds: Vec<_> = pattern.sections()[0]
            .tokens
            .iter()
            .map(|t| t.kind().clone())
            .collect();
        assert!(kinds.contains(&TokenKind::DatePart(DateField::Subsecond(2))));
    }

    #[test]
    fn test_exponent_sign_forms() {
        let pattern = parse("0.00E+00").unwrap();
        let kinds: Vec<_> = pattern.sections()[0]
            .tokens
            .iter()
            .map(|t| t.kind().clone())
            .collect();
        assert!(kinds.contains(&TokenKind::Exponent {
            upper: true,
            always_sign: true
        }));
    }

    #[test]
    fn test_fill_and_skip_operands() {
        let pattern = parse("_(0*x").unwrap();
        let tokens = &pattern.sections()[0].tokens;
        assert_eq!(tokens[0].kind(), &TokenKind::UnderscoreSkip);
        assert_eq!(tokens[0].text(), "(");
        assert_eq!(tokens[2].kind(), &TokenKind::StarFill);
        assert_eq!(tokens[2].text(), "x");
    }
}
