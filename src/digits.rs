//! Digit-string extraction.
//!
//! A numeric value is decomposed once per format call into separate digit
//! strings for the integer, fraction, and exponent segments (numerator and
//! denominator in fraction mode). Components then copy digits out of the
//! strings by position; they never touch the original float again.
//!
//! Rounding is half away from zero throughout, matching spreadsheet
//! behavior (`2.5` with pattern `0` renders `3`, `-2.5` renders `-3`).

use std::cell::Cell;

/// The three digit groups of a rendered number, plus the denominator used
/// in fraction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Integer,
    Fraction,
    Exponent,
    Denominator,
}

/// How a compiled section turns its digit strings into output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Integer and decimal-fraction segments
    #[default]
    Decimal,
    /// Mantissa plus exponent segments
    Scientific,
    /// Numerator and denominator segments
    Fraction,
}

/// Digit-symbol counts and number shaping summarized at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NumberLayout {
    /// Digit symbols in the integer segment (numerator in fraction mode)
    pub integer_digits: usize,
    /// Digit symbols in the fraction segment
    pub fraction_digits: usize,
    /// Digit symbols in the exponent segment
    pub exponent_digits: usize,
    /// Digit symbols in the denominator segment
    pub denominator_digits: usize,
    /// Decimal-place shift: +2 per percent sign, -3 per scaling comma
    pub shift: i32,
    /// Whether grouping separators apply to the integer segment
    pub grouping: bool,
    pub mode: RenderMode,
}

impl NumberLayout {
    /// Digit-symbol count for a segment.
    pub fn count(&self, segment: SegmentKind) -> usize {
        match segment {
            SegmentKind::Integer => self.integer_digits,
            SegmentKind::Fraction => self.fraction_digits,
            SegmentKind::Exponent => self.exponent_digits,
            SegmentKind::Denominator => self.denominator_digits,
        }
    }
}

/// Per-value digit strings with one-shot minus-sign latches.
///
/// The strings are immutable after extraction; only the latches mutate, and
/// each fires at most once per format call. Pattern position 0 of a segment
/// addresses its leftmost digit symbol; source digits are right-aligned
/// against the symbol count, so the leftmost symbol absorbs any excess
/// high-order digits.
#[derive(Debug)]
pub struct Digits {
    integer: String,
    fraction: String,
    exponent: String,
    denominator: String,
    minus: Cell<bool>,
    exponent_minus: Cell<bool>,
}

impl Digits {
    /// Extract digit strings from a non-negative value.
    ///
    /// `arm_sign` arms the integer-segment minus latch; the dispatcher
    /// leaves it unarmed when a dedicated negative section supplies its own
    /// sign text.
    pub fn extract(value: f64, layout: &NumberLayout, arm_sign: bool) -> Digits {
        let shifted = value * 10f64.powi(layout.shift);

        let mut digits = match layout.mode {
            RenderMode::Decimal => Self::extract_decimal(shifted, layout.fraction_digits),
            RenderMode::Scientific => Self::extract_scientific(
                shifted,
                layout.integer_digits,
                layout.fraction_digits,
            ),
            RenderMode::Fraction => {
                Self::extract_fraction(shifted, layout.denominator_digits)
            }
        };
        digits.minus.set(arm_sign);
        digits
    }

    fn empty() -> Digits {
        Digits {
            integer: String::new(),
            fraction: String::new(),
            exponent: String::new(),
            denominator: String::new(),
            minus: Cell::new(false),
            exponent_minus: Cell::new(false),
        }
    }

    fn extract_decimal(value: f64, fraction_digits: usize) -> Digits {
        let mut digits = Digits::empty();
        let (integer, fraction) = split_decimal(value, fraction_digits);
        digits.integer = integer;
        digits.fraction = fraction;
        digits
    }

    fn extract_scientific(value: f64, integer_digits: usize, fraction_digits: usize) -> Digits {
        let mut digits = Digits::empty();

        let width = integer_digits.max(1) as i32;
        let (mantissa, exponent) = if value == 0.0 {
            (0.0, 0)
        } else {
            // Exponent snaps to a multiple of the integer symbol count, so
            // `##0.0E+0` produces engineering notation.
            let magnitude = value.log10().floor() as i32;
            let exponent = div_floor(magnitude, width) * width;
            (value / 10f64.powi(exponent), exponent)
        };

        // Rounding the mantissa can carry it past the integer width
        let mult = 10f64.powi(fraction_digits as i32);
        let mut mantissa = (mantissa * mult).round() / mult;
        let mut exponent = exponent;
        if mantissa >= 10f64.powi(width) {
            mantissa /= 10f64.powi(width);
            exponent += width;
        }

        let (integer, fraction) = split_decimal(mantissa, fraction_digits);
        digits.integer = integer;
        digits.fraction = fraction;
        digits.exponent = if exponent == 0 {
            String::new()
        } else {
            exponent.unsigned_abs().to_string()
        };
        digits.exponent_minus.set(exponent < 0);
        digits
    }

    fn extract_fraction(value: f64, denominator_digits: usize) -> Digits {
        let mut digits = Digits::empty();

        let max_denominator = 10u32
            .saturating_pow(denominator_digits.min(9) as u32)
            .saturating_sub(1)
            .max(1);
        let (numerator, denominator) = nearest_fraction(value, max_denominator);

        digits.integer = if numerator == 0 {
            String::new()
        } else {
            numerator.to_string()
        };
        digits.denominator = denominator.to_string();
        digits
    }

    /// The digit string for a segment.
    pub fn segment(&self, segment: SegmentKind) -> &str {
        match segment {
            SegmentKind::Integer => &self.integer,
            SegmentKind::Fraction => &self.fraction,
            SegmentKind::Exponent => &self.exponent,
            SegmentKind::Denominator => &self.denominator,
        }
    }

    /// Consume the one-shot minus latch governing a segment. Returns true
    /// at most once per run, and never for fraction or denominator
    /// segments.
    pub fn take_sign(&self, segment: SegmentKind) -> bool {
        let latch = match segment {
            SegmentKind::Integer => &self.minus,
            SegmentKind::Exponent => &self.exponent_minus,
            SegmentKind::Fraction | SegmentKind::Denominator => return false,
        };
        latch.replace(false)
    }

    /// Whether the integer-segment latch is still armed.
    pub fn sign_pending(&self) -> bool {
        self.minus.get()
    }

    /// Whether the exponent-segment latch is still armed.
    pub fn exponent_sign_pending(&self) -> bool {
        self.exponent_minus.get()
    }
}

/// Round a non-negative value to `fraction_digits` places (half away from
/// zero) and split it into integer and fraction digit strings. A zero
/// integer part collapses to the empty string; the fraction string is
/// stripped of trailing zeros.
fn split_decimal(value: f64, fraction_digits: usize) -> (String, String) {
    let mult = 10f64.powi(fraction_digits as i32);
    let scaled = (value * mult).round();
    let int_part = (scaled / mult).trunc();
    let frac_part = (scaled - int_part * mult).max(0.0) as u64;

    let integer = if int_part == 0.0 {
        String::new()
    } else {
        format!("{int_part:.0}")
    };

    let mut fraction = if fraction_digits == 0 {
        String::new()
    } else {
        format!("{frac_part:0>width$}", width = fraction_digits)
    };
    while fraction.ends_with('0') {
        fraction.pop();
    }

    (integer, fraction)
}

/// Integer division rounding toward negative infinity.
fn div_floor(a: i32, b: i32) -> i32 {
    let q = a / b;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        q - 1
    } else {
        q
    }
}

/// Closest fraction to a non-negative value with the denominator bounded by
/// `limit`. Walks the Stern-Brocot tree toward the fractional part, taking
/// runs of same-direction descents in one move, then folds the integer part
/// back into the numerator.
fn nearest_fraction(value: f64, limit: u32) -> (u64, u32) {
    let whole = value.floor();
    let target = value - whole;
    let limit = limit.max(1) as u64;

    // Brackets around the fractional part, as (numerator, denominator):
    // `below` sits at or under the target, `above` over it. Each gap is the
    // bracket's distance from the target scaled by its own denominator.
    let mut below: (u64, u64) = (0, 1);
    let mut above: (u64, u64) = (1, 1);

    let (num, den) = loop {
        let below_gap = target * below.1 as f64 - below.0 as f64;
        let above_gap = above.0 as f64 - target * above.1 as f64;

        if below_gap <= below.1 as f64 * 1e-9 {
            break below;
        }
        if above_gap <= above.1 as f64 * 1e-9 {
            break above;
        }
        if below.1 + above.1 > limit {
            // No mediant fits; keep whichever bracket sits closer
            break if below_gap * above.1 as f64 <= above_gap * below.1 as f64 {
                below
            } else {
                above
            };
        }

        if target * (below.1 + above.1) as f64 >= (below.0 + above.0) as f64 {
            // Mediant at or under the target: march `below` toward it
            let steps = (below_gap / above_gap) as u64;
            let steps = steps.max(1).min((limit - below.1) / above.1);
            below = (below.0 + steps * above.0, below.1 + steps * above.1);
        } else {
            let steps = (above_gap / below_gap) as u64;
            let steps = steps.max(1).min((limit - above.1) / below.1);
            above = (above.0 + steps * below.0, above.1 + steps * below.1);
        }
    };

    (whole as u64 * den + num, den as u32)
}
