//! Numeric text handling for form inputs.
//!
//! Form fields hold raw text. Two rules apply to that text:
//!
//! - price/tax style inputs are sanitized on every keystroke
//!   ([`sanitize_decimal`]);
//! - computations read fields fail-soft: whatever leading number the text
//!   carries is used, anything else falls back to a default ([`soft_number`]).

/// Maximum fractional digits kept by [`sanitize_decimal`].
pub const MAX_DECIMALS: usize = 2;

/// Keeps only ASCII digits and a single decimal point, truncating the
/// fractional part to [`MAX_DECIMALS`] digits.
///
/// Extra decimal points are dropped and the digits after them are folded into
/// the fractional part.
///
/// ```rust
/// use engine::numeric::sanitize_decimal;
///
/// assert_eq!(sanitize_decimal("12.345"), "12.34");
/// assert_eq!(sanitize_decimal("12..3"), "12.3");
/// assert_eq!(sanitize_decimal("₹ 1,200"), "1200");
/// ```
pub fn sanitize_decimal(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let Some((units, rest)) = cleaned.split_once('.') else {
        return cleaned;
    };
    let fraction: String = rest
        .chars()
        .filter(|c| *c != '.')
        .take(MAX_DECIMALS)
        .collect();
    format!("{units}.{fraction}")
}

/// Reads the longest numeric prefix of `input`, the way a lenient float parser
/// does: `"12 cm"` is `12`, `"1.5x"` is `1.5`, `"abc"` and `""` are `None`.
pub fn leading_number(input: &str) -> Option<f64> {
    let s = input.trim_start().as_bytes();
    let mut end = 0;

    if matches!(s.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while s.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if s.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while s.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(s.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(s.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while s.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    std::str::from_utf8(&s[..end]).ok()?.parse().ok()
}

/// Fail-soft read of a numeric field.
///
/// Returns `fallback` when the text carries no number, and also when the number
/// is zero: an empty quantity reads as `0`, an empty or zero size multiplier
/// reads as `1`.
pub fn soft_number(input: &str, fallback: f64) -> f64 {
    match leading_number(input) {
        Some(value) if value != 0.0 && value.is_finite() => value,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_truncates_fraction() {
        assert_eq!(sanitize_decimal("12.345"), "12.34");
        assert_eq!(sanitize_decimal("0.999"), "0.99");
        assert_eq!(sanitize_decimal("7."), "7.");
    }

    #[test]
    fn sanitize_collapses_extra_points() {
        assert_eq!(sanitize_decimal("12..3"), "12.3");
        assert_eq!(sanitize_decimal("1.2.3.4"), "1.23");
        assert_eq!(sanitize_decimal(".5"), ".5");
    }

    #[test]
    fn sanitize_drops_non_numeric() {
        assert_eq!(sanitize_decimal("-1"), "1");
        assert_eq!(sanitize_decimal("abc"), "");
        assert_eq!(sanitize_decimal("1e5"), "15");
    }

    #[test]
    fn leading_number_reads_prefix() {
        assert_eq!(leading_number("12 cm"), Some(12.0));
        assert_eq!(leading_number("  1.5x2"), Some(1.5));
        assert_eq!(leading_number("-3"), Some(-3.0));
        assert_eq!(leading_number(".25"), Some(0.25));
        assert_eq!(leading_number("4."), Some(4.0));
        assert_eq!(leading_number("2e3"), Some(2000.0));
        assert_eq!(leading_number("2e"), Some(2.0));
        assert_eq!(leading_number("abc"), None);
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn soft_number_falls_back() {
        assert_eq!(soft_number("", 0.0), 0.0);
        assert_eq!(soft_number("x", 1.0), 1.0);
        assert_eq!(soft_number("0", 1.0), 1.0);
        assert_eq!(soft_number("2.5", 1.0), 2.5);
    }
}
