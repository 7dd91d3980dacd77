//! Error types for pattern parsing and compilation.

use thiserror::Error;

/// Errors that can occur when parsing a format pattern into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("empty format pattern")]
    EmptyPattern,

    #[error("too many pattern sections (maximum 4 allowed)")]
    TooManySections,

    #[error("unterminated quoted text at position {position}")]
    UnterminatedQuote { position: usize },

    #[error("unterminated bracket at position {position}")]
    UnterminatedBracket { position: usize },

    #[error("dangling escape at position {position}")]
    DanglingEscape { position: usize },

    #[error("invalid condition '[{content}]'")]
    InvalidCondition { content: String },
}

/// Errors that can occur when compiling a token tree into components.
///
/// These are structural pattern errors and fail fast; malformed *values*
/// never produce a `CompileError` (they make the formatter decline instead).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("pattern section {index} produces no components")]
    EmptySection { index: usize },

    #[error("exponent marker with no exponent digits in section {index}")]
    MissingExponentDigits { index: usize },
}

/// Umbrella error for the parse-then-compile entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PatternError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
