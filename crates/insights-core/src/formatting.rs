/// Placeholder printed wherever a statistic is undefined.
pub const UNDEFINED: &str = "N/A";

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use insights_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }

    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a scaled epsilon so exact binary midpoints round away from zero.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let int_str = integer_part.to_string();
    let grouped = group_thousands(&int_str);

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` starts with "0.", e.g. "0.50".
        let decimal_digits = &frac_str[1..];
        format!("{}{}", grouped, decimal_digits)
    };

    if negative && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a monetary amount with a `$` prefix, thousands separators and
/// `decimals` decimal places.
///
/// # Examples
///
/// ```
/// use insights_core::formatting::format_currency;
///
/// assert_eq!(format_currency(1234.56, 2), "$1,234.56");
/// assert_eq!(format_currency(1150.0, 0),  "$1,150");
/// assert_eq!(format_currency(-9.99, 2),   "$-9.99");
/// ```
pub fn format_currency(amount: f64, decimals: u32) -> String {
    if !amount.is_finite() {
        return UNDEFINED.to_string();
    }
    if amount < 0.0 {
        format!("$-{}", format_number(amount.abs(), decimals))
    } else {
        format!("${}", format_number(amount, decimals))
    }
}

/// Format a return multiple such as ROAS as `"2.83x"`; `None` prints as
/// [`UNDEFINED`].
///
/// ```
/// use insights_core::formatting::format_ratio;
///
/// assert_eq!(format_ratio(Some(2.875)), "2.88x");
/// assert_eq!(format_ratio(None), "N/A");
/// ```
pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}x", format_number(v, 2)),
        _ => UNDEFINED.to_string(),
    }
}

/// Format a value that is already expressed in percent, e.g. `"12.50%"`.
pub fn format_percent(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return UNDEFINED.to_string();
    }
    format!("{}%", format_number(value, decimals))
}

/// Format an optional statistic without separators, `None` as [`UNDEFINED`].
///
/// Used for console tables where separators would misalign columns.
pub fn format_optional(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.prec$}", v, prec = decimals),
        _ => UNDEFINED.to_string(),
    }
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
///
/// # Examples
///
/// ```
/// use insights_core::formatting::percentage;
///
/// assert!((percentage(50.0, 200.0, 1) - 25.0).abs() < 1e-9);
/// assert_eq!(percentage(0.0, 0.0, 2), 0.0);
/// ```
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    round_to((part / whole) * 100.0, decimal_places)
}

/// Round `value` half away from zero to `decimal_places`.
pub fn round_to(value: f64, decimal_places: u32) -> f64 {
    let factor = 10_f64.powi(decimal_places as i32);
    (value * factor).round() / factor
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_number ────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_no_thousands() {
        assert_eq!(format_number(123.456, 2), "123.46");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 1), "1,234.5");
    }

    #[test]
    fn test_format_number_millions() {
        assert_eq!(format_number(1_234_567.0, 0), "1,234,567");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-9_876.5, 1), "-9,876.5");
    }

    #[test]
    fn test_format_number_negative_rounding_to_zero_drops_sign() {
        assert_eq!(format_number(-0.001, 2), "0.00");
    }

    #[test]
    fn test_format_number_rounds_up() {
        assert_eq!(format_number(1.005, 2), "1.01");
    }

    #[test]
    fn test_format_number_non_finite() {
        assert_eq!(format_number(f64::NAN, 2), "N/A");
        assert_eq!(format_number(f64::INFINITY, 0), "N/A");
    }

    // ── format_currency ──────────────────────────────────────────────────────

    #[test]
    fn test_format_currency_positive() {
        assert_eq!(format_currency(1_234.56, 2), "$1,234.56");
    }

    #[test]
    fn test_format_currency_whole_units() {
        assert_eq!(format_currency(1_150.4, 0), "$1,150");
        assert_eq!(format_currency(999.5, 0), "$1,000");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-9.99, 2), "$-9.99");
    }

    #[test]
    fn test_format_currency_large() {
        assert_eq!(format_currency(1_000_000.0, 2), "$1,000,000.00");
    }

    // ── format_ratio / format_percent / format_optional ─────────────────────

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(Some(5.0)), "5.00x");
        assert_eq!(format_ratio(Some(2.8333)), "2.83x");
        assert_eq!(format_ratio(Some(f64::NAN)), "N/A");
        assert_eq!(format_ratio(None), "N/A");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(12.5, 2), "12.50%");
        assert_eq!(format_percent(f64::NAN, 2), "N/A");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some(1.23456), 3), "1.235");
        assert_eq!(format_optional(Some(1234.5), 1), "1234.5");
        assert_eq!(format_optional(None, 3), "N/A");
    }

    // ── percentage / round_to ────────────────────────────────────────────────

    #[test]
    fn test_percentage_basic() {
        let p = percentage(50.0, 200.0, 1);
        assert!((p - 25.0).abs() < 1e-9, "percentage = {p}");
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(10.0, 0.0, 2), 0.0);
    }

    #[test]
    fn test_percentage_rounding() {
        let p = percentage(1.0, 3.0, 2);
        assert!((p - 33.33).abs() < 1e-9, "percentage = {p}");
    }

    #[test]
    fn test_round_to() {
        assert!((round_to(2.875, 2) - 2.88).abs() < 1e-9);
        assert!((round_to(2.8333, 2) - 2.83).abs() < 1e-9);
        assert!((round_to(-1.5, 0) - (-2.0)).abs() < 1e-9);
    }

    // ── group_thousands (via format_number) ──────────────────────────────────

    #[test]
    fn test_group_thousands_one_digit() {
        assert_eq!(format_number(5.0, 0), "5");
    }

    #[test]
    fn test_group_thousands_four_digits() {
        assert_eq!(format_number(1234.0, 0), "1,234");
    }

    #[test]
    fn test_group_thousands_seven_digits() {
        assert_eq!(format_number(1_234_567.0, 0), "1,234,567");
    }
}
