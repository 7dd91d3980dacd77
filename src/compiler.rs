//! Component sequence compiler.
//!
//! A single pass over a section's token list produces the ordered component
//! list plus the layout summary (digit counts per segment, decimal shift,
//! grouping). All pattern-shape decisions are made here, once; the format
//! path just replays the component list.

use crate::component::{Component, ZeroPolicy};
use crate::datetime::{self, ClockInfo};
use crate::digits::{NumberLayout, RenderMode, SegmentKind};
use crate::error::CompileError;
use crate::pattern::{ColorSource, Condition, PatternSection, Token, TokenKind};

/// A compiled pattern section, ready to execute against values.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompiledSection {
    pub body: SectionBody,
    pub color: Option<ColorSource>,
    pub condition: Option<Condition>,
    pub has_text_value: bool,
}

/// The executable form of a section.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SectionBody {
    /// Numeric/text sections run the component list
    Number {
        components: Vec<Component>,
        layout: NumberLayout,
    },
    /// Date sections re-walk their tokens with a value bound
    Date {
        tokens: Vec<Token>,
        clock: ClockInfo,
    },
}

/// Compile one pattern section. `index` is the section's position within
/// the pattern, used in error reports.
pub(crate) fn compile_section(
    section: &PatternSection,
    index: usize,
) -> Result<CompiledSection, CompileError> {
    let color = section.color().cloned();
    let condition = section.condition();
    let has_text_value = section.has_text_value();

    if section.has_date_parts() {
        let tokens = section.tokens.clone();
        let clock = datetime::analyze(&tokens);
        if tokens.is_empty() {
            return Err(CompileError::EmptySection { index });
        }
        return Ok(CompiledSection {
            body: SectionBody::Date { tokens, clock },
            color,
            condition,
            has_text_value,
        });
    }

    let (components, layout) = compile_number(&section.tokens, index)?;
    if components.is_empty() {
        return Err(CompileError::EmptySection { index });
    }

    Ok(CompiledSection {
        body: SectionBody::Number { components, layout },
        color,
        condition,
        has_text_value,
    })
}

/// Shape information gathered before the component walk.
struct Shape {
    mode: RenderMode,
    decimal_index: Option<usize>,
    exponent_index: Option<usize>,
    slash_index: Option<usize>,
}

fn is_digit_token(token: &Token) -> bool {
    matches!(
        token.kind(),
        TokenKind::DigitZero | TokenKind::DigitHash | TokenKind::DigitQuestion
    )
}

fn scan_shape(tokens: &[Token]) -> Shape {
    let decimal_index = tokens
        .iter()
        .position(|t| matches!(t.kind(), TokenKind::DecimalPoint));
    let exponent_index = tokens
        .iter()
        .position(|t| matches!(t.kind(), TokenKind::Exponent { .. }));

    // A slash is a fraction separator only with digits on both sides
    let slash_index = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| matches!(t.kind(), TokenKind::Slash))
        .find(|(i, _)| {
            tokens[..*i].iter().any(is_digit_token) && tokens[*i + 1..].iter().any(is_digit_token)
        })
        .map(|(i, _)| i);

    let mode = if exponent_index.is_some() {
        RenderMode::Scientific
    } else if slash_index.is_some() {
        RenderMode::Fraction
    } else {
        RenderMode::Decimal
    };

    Shape {
        mode,
        decimal_index,
        exponent_index,
        slash_index,
    }
}

/// Segment a digit token at `index` binds to, given the section shape.
fn segment_for(shape: &Shape, index: usize) -> SegmentKind {
    match shape.mode {
        RenderMode::Fraction => {
            if index < shape.slash_index.unwrap_or(usize::MAX) {
                SegmentKind::Integer
            } else {
                SegmentKind::Denominator
            }
        }
        RenderMode::Scientific => {
            if index > shape.exponent_index.unwrap_or(usize::MAX) {
                SegmentKind::Exponent
            } else if shape.decimal_index.map(|d| index > d).unwrap_or(false) {
                SegmentKind::Fraction
            } else {
                SegmentKind::Integer
            }
        }
        RenderMode::Decimal => {
            if shape.decimal_index.map(|d| index > d).unwrap_or(false) {
                SegmentKind::Fraction
            } else {
                SegmentKind::Integer
            }
        }
    }
}

/// Role a grouping comma plays, decided by its surroundings.
enum CommaRole {
    /// Between integer digits: enables grouping, emits nothing itself
    Grouping,
    /// After the last digit symbol: divides the value by 1000
    Scaling,
    /// Anywhere else: a literal separator character
    Literal,
}

fn comma_role(tokens: &[Token], shape: &Shape, index: usize) -> CommaRole {
    let integer_digit = |i: &usize| {
        is_digit_token(&tokens[*i]) && segment_for(shape, *i) == SegmentKind::Integer
    };
    let has_integer_before = (0..index).any(|i| integer_digit(&i));
    let has_integer_after = (index + 1..tokens.len()).any(|i| integer_digit(&i));
    let has_any_digit_after = tokens[index + 1..].iter().any(is_digit_token);

    if has_integer_before && has_integer_after {
        CommaRole::Grouping
    } else if has_integer_before && !has_any_digit_after {
        CommaRole::Scaling
    } else {
        CommaRole::Literal
    }
}

fn compile_number(
    tokens: &[Token],
    index: usize,
) -> Result<(Vec<Component>, NumberLayout), CompileError> {
    let shape = scan_shape(tokens);

    let mut components = Vec::new();
    let mut layout = NumberLayout {
        mode: shape.mode,
        ..Default::default()
    };
    let mut literal = String::new();
    let mut seen_decimal_component = false;

    let mut flush =
        |literal: &mut String, components: &mut Vec<Component>| {
            if !literal.is_empty() {
                components.push(Component::Literal(std::mem::take(literal)));
            }
        };

    for (i, token) in tokens.iter().enumerate() {
        match token.kind() {
            TokenKind::Text | TokenKind::Escaped | TokenKind::Quoted => {
                literal.push_str(token.text());
            }

            TokenKind::DigitZero | TokenKind::DigitHash | TokenKind::DigitQuestion => {
                flush(&mut literal, &mut components);
                let policy = match token.kind() {
                    TokenKind::DigitZero => ZeroPolicy::Zero,
                    TokenKind::DigitHash => ZeroPolicy::Hash,
                    _ => ZeroPolicy::Question,
                };
                let segment = segment_for(&shape, i);
                let position = match segment {
                    SegmentKind::Integer => &mut layout.integer_digits,
                    SegmentKind::Fraction => &mut layout.fraction_digits,
                    SegmentKind::Exponent => &mut layout.exponent_digits,
                    SegmentKind::Denominator => &mut layout.denominator_digits,
                };
                components.push(Component::Digit {
                    segment,
                    position: *position,
                    policy,
                });
                *position += 1;
            }

            TokenKind::DecimalPoint => {
                flush(&mut literal, &mut components);
                if shape.mode != RenderMode::Fraction && !seen_decimal_component {
                    seen_decimal_component = true;
                    components.push(Component::DecimalPoint);
                } else {
                    literal.push('.');
                }
            }

            TokenKind::GroupSeparator => match comma_role(tokens, &shape, i) {
                CommaRole::Grouping => layout.grouping = true,
                CommaRole::Scaling => layout.shift -= 3,
                CommaRole::Literal => {
                    flush(&mut literal, &mut components);
                    components.push(Component::GroupSeparator);
                }
            },

            TokenKind::CurrencySymbol => {
                flush(&mut literal, &mut components);
                components.push(Component::CurrencySymbol);
            }

            TokenKind::PercentSymbol => {
                flush(&mut literal, &mut components);
                layout.shift += 2;
                components.push(Component::PercentSymbol);
            }

            TokenKind::Exponent { upper, always_sign } => {
                flush(&mut literal, &mut components);
                components.push(Component::ExponentSymbol {
                    upper: *upper,
                    always_sign: *always_sign,
                });
            }

            TokenKind::MinusSign => {
                flush(&mut literal, &mut components);
                components.push(Component::MinusSign);
            }

            TokenKind::Slash => {
                flush(&mut literal, &mut components);
                if shape.slash_index == Some(i) {
                    components.push(Component::SlashSymbol);
                } else {
                    literal.push('/');
                }
            }

            TokenKind::TextValue => {
                flush(&mut literal, &mut components);
                components.push(Component::TextValue);
            }

            TokenKind::StarFill => {
                flush(&mut literal, &mut components);
                if let Some(ch) = token.text().chars().next() {
                    components.push(Component::Fill(ch));
                }
            }

            TokenKind::UnderscoreSkip => {
                flush(&mut literal, &mut components);
                components.push(Component::Skip);
            }

            TokenKind::General => {
                flush(&mut literal, &mut components);
                components.push(Component::General);
            }

            // Recorded on the section, not executable
            TokenKind::ColorDirective(_) | TokenKind::ConditionDirective(_) => {}

            // Date tokens never reach the number compiler
            TokenKind::DatePart(_) | TokenKind::AmPm(_) | TokenKind::Elapsed(_) => {}
        }
    }
    flush(&mut literal, &mut components);

    if shape.exponent_index.is_some() && layout.exponent_digits == 0 {
        return Err(CompileError::MissingExponentDigits { index });
    }

    Ok((components, layout))
}
