//! Volume-unit detection and normalization for size strings.
//!
//! The generating service owns the volume arithmetic; this module only
//! guarantees that size strings carry a recognizable unit where possible.

/// Unit tokens that mark a size string as already unit-bearing.
const UNIT_TOKENS: &[&str] = &["cubic", "cu ft", "ft³", "feet"];

/// True when the string contains a recognizable volume-unit token
/// (case-insensitive).
pub fn has_unit_token(size: &str) -> bool {
    let lower = size.to_lowercase();
    UNIT_TOKENS.iter().any(|token| lower.contains(token))
}

/// Normalize a size string.
///
/// - Unit-bearing strings pass through unchanged (normalization is
///   idempotent, no double-append).
/// - Purely numeric strings get the literal suffix ` cubic feet`.
/// - Anything else passes through unchanged as a best-effort fallback.
pub fn normalize_size(size: &str) -> String {
    if has_unit_token(size) {
        return size.to_string();
    }
    if is_purely_numeric(size) {
        return format!("{} cubic feet", size.trim());
    }
    size.to_string()
}

/// ASCII digits with at most one decimal point and at least one digit.
///
/// Deliberately narrower than `str::parse::<f64>`: exponents, signs and
/// words like `inf` are not sizes we should stamp a unit onto.
fn is_purely_numeric(size: &str) -> bool {
    let trimmed = size.trim();
    !trimmed.is_empty()
        && trimmed.chars().all(|c| c.is_ascii_digit() || c == '.')
        && trimmed.chars().filter(|c| *c == '.').count() <= 1
        && trimmed.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unit_bearing_strings_pass_through_unchanged() {
        for s in [
            "approx. 2 cubic feet",
            "12 cubic feet",
            "3 cu ft",
            "1.5 ft³",
            "about four feet of shelf space",
            "70 CUBIC FEET",
        ] {
            assert_eq!(normalize_size(s), s);
        }
    }

    #[test]
    fn bare_numbers_get_the_suffix() {
        assert_eq!(normalize_size("12"), "12 cubic feet");
        assert_eq!(normalize_size("2.5"), "2.5 cubic feet");
        assert_eq!(normalize_size("  8 "), "8 cubic feet");
    }

    #[test]
    fn no_double_append_on_already_normalized_output() {
        assert_eq!(normalize_size("12 cubic feet"), "12 cubic feet");
    }

    #[test]
    fn non_numeric_unitless_strings_pass_through_unchanged() {
        // Given behavior: best-effort fallback, even for malformed output.
        for s in ["a couple of boxes", "unknown", "1e3", "-4", "1/2", ""] {
            assert_eq!(normalize_size(s), s);
        }
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(s in ".*") {
            let once = normalize_size(&s);
            prop_assert_eq!(normalize_size(&once), once);
        }
    }
}
