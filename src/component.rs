//! Executable formatting components.
//!
//! The compiler turns every recognized pattern token into one component;
//! formatting a value is a single pass over the component list. Each
//! component owns all of its own conditional logic (sign timing, zero
//! substitution, grouping), so the executor stays a straight-line loop.

use crate::digits::SegmentKind;
use crate::run::{general_number, Exec, Run};

/// Substitution rule for a digit position with no source digit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroPolicy {
    /// `0` - emit a literal zero
    Zero,
    /// `#` - emit nothing
    Hash,
    /// `?` - emit a space
    Question,
}

impl ZeroPolicy {
    /// The character to emit when no source digit exists, if any.
    pub fn substitute(&self) -> Option<char> {
        match self {
            ZeroPolicy::Zero => Some('0'),
            ZeroPolicy::Hash => None,
            ZeroPolicy::Question => Some(' '),
        }
    }
}

/// One compiled, executable unit of a format section.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// Fixed text run
    Literal(String),
    /// One digit position of a segment. `position` counts the segment's
    /// digit symbols from the left; the leftmost symbol also renders any
    /// excess high-order source digits.
    Digit {
        segment: SegmentKind,
        position: usize,
        policy: ZeroPolicy,
    },
    DecimalPoint,
    /// A grouping comma outside any digit run, rendered as the locale
    /// separator. Commas between integer digits compile to the layout's
    /// grouping flag instead.
    GroupSeparator,
    CurrencySymbol,
    PercentSymbol,
    ExponentSymbol { upper: bool, always_sign: bool },
    /// Explicit `-` in the pattern
    MinusSign,
    /// `/` between numerator and denominator digits
    SlashSymbol,
    /// `@` - the text value passes through
    TextValue,
    /// `*x` - fill to cell width
    Fill(char),
    /// `_x` - reserve one character width
    Skip,
    /// `General` - plain number rendering
    General,
}

impl Component {
    /// Append this component's output to the run.
    pub(crate) fn append(&self, run: &mut Run<'_>, exec: &Exec<'_>) {
        match self {
            Component::Literal(text) => run.append_text(text),

            Component::Digit {
                segment,
                position,
                policy,
            } => append_digit(run, exec, *segment, *position, *policy),

            Component::DecimalPoint => {
                // Carries the sign when the integer segment never got to
                // emit one (patterns like `.00`)
                if exec.digits.take_sign(SegmentKind::Integer) {
                    run.append_minus_sign();
                }
                run.append_decimal_point();
            }

            Component::GroupSeparator => run.append_group_separator(),
            Component::CurrencySymbol => run.append_currency_symbol(),
            Component::PercentSymbol => run.append_percent_symbol(),

            Component::ExponentSymbol { upper, always_sign } => {
                run.append_exponent_symbol(*upper);
                // A negative exponent gets its minus from the segment latch
                // at the first exponent digit
                if *always_sign && !exec.digits.exponent_sign_pending() {
                    run.append_positive_sign();
                }
            }

            Component::MinusSign => run.append_minus_sign(),
            Component::SlashSymbol => run.append_text("/"),

            Component::TextValue => {
                if let Some(text) = &exec.text {
                    run.append_text(text);
                } else if let Some(number) = exec.number {
                    run.append_text(&general_number(number));
                }
            }

            Component::Fill(ch) => run.set_fill(*ch),
            Component::Skip => run.append_text(" "),

            Component::General => {
                if let Some(number) = exec.number {
                    run.append_text(&general_number(number));
                } else if let Some(text) = &exec.text {
                    run.append_text(text);
                }
            }
        }
    }
}

/// Render one digit position: map the pattern position onto the source
/// digit string, falling back to the zero policy when the source has no
/// digit there. Signed segments fire their one-shot minus latch before
/// their first emitted character; the integer segment inserts grouping
/// separators before positions that are positive multiples of 3.
fn append_digit(
    run: &mut Run<'_>,
    exec: &Exec<'_>,
    segment: SegmentKind,
    position: usize,
    policy: ZeroPolicy,
) {
    let source = exec.digits.segment(segment);
    let count = exec.layout.count(segment);
    let len = source.len();

    if segment == SegmentKind::Fraction {
        // Fraction digits are left-aligned: position 0 is the first digit
        // after the decimal point.
        match source.as_bytes().get(position) {
            Some(&digit) => run.append_digit(digit as char, -(position as i32) - 1),
            None => {
                if let Some(substitute) = policy.substitute() {
                    run.append_digit(substitute, -(position as i32) - 1);
                }
            }
        }
        return;
    }

    let grouping = exec.layout.grouping && segment == SegmentKind::Integer;
    let index = len as isize - count as isize + position as isize;

    if index < 0 {
        let position_from_right = (count - position) as i32;
        if let Some(substitute) = policy.substitute() {
            emit_segment_char(
                run,
                exec,
                segment,
                substitute,
                position_from_right,
                grouping,
            );
        }
    } else if position == 0 && len > count {
        // The leftmost digit symbol absorbs all excess high-order digits
        for (i, digit) in source[..=index as usize].char_indices() {
            let position_from_right = (len - i) as i32;
            emit_segment_char(run, exec, segment, digit, position_from_right, grouping);
        }
    } else if let Some(digit) = source[index as usize..].chars().next() {
        let position_from_right = (len - index as usize) as i32;
        emit_segment_char(run, exec, segment, digit, position_from_right, grouping);
    }
}

fn emit_segment_char(
    run: &mut Run<'_>,
    exec: &Exec<'_>,
    segment: SegmentKind,
    ch: char,
    position_from_right: i32,
    grouping: bool,
) {
    if exec.digits.take_sign(segment) {
        run.append_minus_sign();
    }
    if grouping && position_from_right % 3 == 0 && run.integer_started() {
        if ch == ' ' {
            // A space substitute keeps column alignment instead of a comma
            run.append_text(" ");
        } else {
            run.append_group_separator();
        }
    }
    run.append_digit(ch, position_from_right);
}
