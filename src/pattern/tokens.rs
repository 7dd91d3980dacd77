//! Token tree produced by parsing a format pattern.

/// Relational operator used in a `[condition]` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOp {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

/// A numeric guard baked into a pattern section, e.g. `[>100]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Condition {
    pub op: ConditionOp,
    pub operand: f64,
}

impl Condition {
    /// Evaluate this condition against a value. Comparison is exact.
    pub fn evaluate(&self, value: f64) -> bool {
        match self.op {
            ConditionOp::Equal => value == self.operand,
            ConditionOp::NotEqual => value != self.operand,
            ConditionOp::LessThan => value < self.operand,
            ConditionOp::LessOrEqual => value <= self.operand,
            ConditionOp::GreaterThan => value > self.operand,
            ConditionOp::GreaterOrEqual => value >= self.operand,
        }
    }
}

/// A color reference from a `[Color…]` directive or external wrapping:
/// either a 1-based palette index or a name resolved by the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSource {
    Indexed(u8),
    Named(String),
}

/// Date/time field selected by a run of pattern letters.
///
/// Repetition count picks the width: `m` is the bare month number, `mm` is
/// zero-padded, `mmm` the abbreviated name, `mmmm` the full name, `mmmmm`
/// the initial letter. Minute variants are produced by the parser's
/// month/minute disambiguation, never directly by the letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Year2,
    Year4,
    Month,
    Month2,
    MonthAbbr,
    MonthFull,
    MonthLetter,
    Day,
    Day2,
    WeekdayAbbr,
    WeekdayFull,
    Hour,
    Hour2,
    Minute,
    Minute2,
    Second,
    Second2,
    /// `.0`, `.00`, `.000` - fractional seconds with the given digit count
    Subsecond(u8),
}

/// Elapsed-duration field from a bracket directive (`[h]`, `[mm]`, `[ss]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElapsedField {
    Hours,
    Hours2,
    Minutes,
    Minutes2,
    Seconds,
    Seconds2,
}

/// AM/PM marker style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmPmStyle {
    /// `AM/PM`
    Upper,
    /// `am/pm`
    Lower,
    /// `A/P`
    ShortUpper,
    /// `a/p`
    ShortLower,
}

/// Classification of a single pattern token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Unquoted literal text run
    Text,
    /// Backslash-escaped character
    Escaped,
    /// Double-quoted text
    Quoted,
    /// `0` digit placeholder
    DigitZero,
    /// `#` digit placeholder
    DigitHash,
    /// `?` digit placeholder
    DigitQuestion,
    DecimalPoint,
    GroupSeparator,
    /// `$`
    CurrencySymbol,
    /// `%`
    PercentSymbol,
    /// `E+`, `E-`, `e+`, `e-`
    Exponent { upper: bool, always_sign: bool },
    MinusSign,
    /// `/` (fraction separator in number sections, literal in date sections)
    Slash,
    /// `[Red]`, `[Color12]`
    ColorDirective(ColorSource),
    /// `[>100]`
    ConditionDirective(Condition),
    /// `*x` - repeat the fill character to the cell width
    StarFill,
    /// `_x` - reserve the width of one character
    UnderscoreSkip,
    AmPm(AmPmStyle),
    DatePart(DateField),
    Elapsed(ElapsedField),
    /// `@` - text value placeholder
    TextValue,
    /// `General` keyword
    General,
}

/// One parsed token: a kind plus the source text it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    text: String,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// The literal content of the token. For quoted and escaped tokens this
    /// is the unquoted/unescaped text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One semicolon-separated section of a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternSection {
    pub tokens: Vec<Token>,
}

impl PatternSection {
    /// Returns true if this section contains any date/time tokens.
    pub fn has_date_parts(&self) -> bool {
        self.tokens.iter().any(|t| {
            matches!(
                t.kind(),
                TokenKind::DatePart(_) | TokenKind::AmPm(_) | TokenKind::Elapsed(_)
            )
        })
    }

    /// Returns true if this section contains a text value placeholder.
    pub fn has_text_value(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t.kind(), TokenKind::TextValue))
    }

    /// The section's color directive, if any (last one wins).
    pub fn color(&self) -> Option<&ColorSource> {
        self.tokens.iter().rev().find_map(|t| match t.kind() {
            TokenKind::ColorDirective(color) => Some(color),
            _ => None,
        })
    }

    /// The section's condition directive, if any (last one wins).
    pub fn condition(&self) -> Option<Condition> {
        self.tokens.iter().rev().find_map(|t| match t.kind() {
            TokenKind::ConditionDirective(condition) => Some(*condition),
            _ => None,
        })
    }
}

/// A parsed format pattern: 1 to 4 sections of tokens.
///
/// Patterns are immutable once parsed and are reused across format calls.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    sections: Vec<PatternSection>,
}

impl Pattern {
    pub(crate) fn from_sections(sections: Vec<PatternSection>) -> Self {
        Pattern { sections }
    }

    pub fn sections(&self) -> &[PatternSection] {
        &self.sections
    }

    /// Parse a pattern string into a token tree.
    pub fn parse(pattern: &str) -> Result<Pattern, crate::error::ParseError> {
        super::parse(pattern)
    }
}
