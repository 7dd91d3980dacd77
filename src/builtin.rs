//! Built-in format ids and their implied patterns.
//!
//! Spreadsheet files store numeric format ids whose pattern strings are
//! implied rather than written out (ids 0-49; custom patterns start at
//! 164). This module maps those ids back to pattern text so hosts can
//! format by id.

/// Get the pattern string for a built-in format id, or `None` when the id
/// has no implied pattern.
pub fn pattern_for_id(id: u32) -> Option<&'static str> {
    match id {
        0 => Some("General"),
        1 => Some("0"),
        2 => Some("0.00"),
        3 => Some("#,##0"),
        4 => Some("#,##0.00"),
        9 => Some("0%"),
        10 => Some("0.00%"),
        11 => Some("0.00E+00"),
        12 => Some("# ?/?"),
        13 => Some("# ??/??"),
        14 => Some("m/d/yy"),
        15 => Some("d-mmm-yy"),
        16 => Some("d-mmm"),
        17 => Some("mmm-yy"),
        18 => Some("h:mm AM/PM"),
        19 => Some("h:mm:ss AM/PM"),
        20 => Some("h:mm"),
        21 => Some("h:mm:ss"),
        22 => Some("m/d/yy h:mm"),
        37 => Some("#,##0 ;(#,##0)"),
        38 => Some("#,##0 ;[Red](#,##0)"),
        39 => Some("#,##0.00;(#,##0.00)"),
        40 => Some("#,##0.00;[Red](#,##0.00)"),
        45 => Some("mm:ss"),
        46 => Some("[h]:mm:ss"),
        47 => Some("mmss.0"),
        48 => Some("##0.0E+0"),
        49 => Some("@"),
        _ => None,
    }
}

/// Check whether an id names a built-in format.
pub fn is_builtin_id(id: u32) -> bool {
    pattern_for_id(id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_ids() {
        assert_eq!(pattern_for_id(0), Some("General"));
        assert_eq!(pattern_for_id(1), Some("0"));
        assert_eq!(pattern_for_id(4), Some("#,##0.00"));
        assert_eq!(pattern_for_id(10), Some("0.00%"));
        assert_eq!(pattern_for_id(11), Some("0.00E+00"));
    }

    #[test]
    fn test_date_ids() {
        assert_eq!(pattern_for_id(14), Some("m/d/yy"));
        assert_eq!(pattern_for_id(22), Some("m/d/yy h:mm"));
        assert_eq!(pattern_for_id(46), Some("[h]:mm:ss"));
    }

    #[test]
    fn test_undefined_ids() {
        assert_eq!(pattern_for_id(5), None);
        assert_eq!(pattern_for_id(23), None);
        assert_eq!(pattern_for_id(164), None);
    }

    #[test]
    fn test_is_builtin() {
        assert!(is_builtin_id(0));
        assert!(is_builtin_id(49));
        assert!(!is_builtin_id(164));
    }

    #[test]
    fn test_builtin_patterns_compile() {
        for id in 0..=49 {
            if let Some(pattern) = pattern_for_id(id) {
                assert!(
                    crate::Formatter::compile(pattern).is_ok(),
                    "builtin pattern {pattern} failed to compile"
                );
            }
        }
    }
}
