//! Number parsing and formatting with the semantics the generated code has.
//!
//! The frame string ends up inside JavaScript source, so numbers are read the
//! way `parseFloat`/`Number` read them and printed the way JavaScript prints
//! them (`24`, `0.5`, `NaN`, `Infinity`, `1e+21`).

use std::fmt;

/// A number printed the way JavaScript stringifies it.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct JsNumber(pub f64);

impl fmt::Display for JsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = self.0;
        if v.is_nan() {
            return f.write_str("NaN");
        }
        if v.is_infinite() {
            return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
        }
        if v == 0.0 {
            // covers -0 as well
            return f.write_str("0");
        }
        let abs = v.abs();
        if (1e-6..1e21).contains(&abs) {
            return write!(f, "{v}");
        }
        let exp = format!("{v:e}");
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                write!(f, "{mantissa}e+{power}")
            }
            _ => f.write_str(&exp),
        }
    }
}

/// Length of the longest prefix of `s` that is a decimal literal
/// (`[+-]digits[.digits][e[+-]digits]`, either side of the dot optional).
fn decimal_prefix_len(s: &str) -> usize {
    let b = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i = 1;
    }
    let int_end = digits_from(i);
    let int_digits = int_end - i;
    i = int_end;

    let mut frac_digits = 0;
    if b.get(i) == Some(&b'.') {
        let frac_end = digits_from(i + 1);
        frac_digits = frac_end - (i + 1);
        if int_digits > 0 || frac_digits > 0 {
            i = frac_end;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            i = exp_end;
        }
    }
    i
}

fn signed_infinity(s: &str) -> Option<(f64, usize)> {
    let (sign, rest, skip) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..], 1),
        Some(b'+') => (1.0, &s[1..], 1),
        _ => (1.0, s, 0),
    };
    rest.starts_with("Infinity")
        .then_some((sign * f64::INFINITY, skip + "Infinity".len()))
}

/// Leading-prefix float parse: `"32px"` is 32, `"px"` is NaN.
pub fn parse_float(s: &str) -> f64 {
    let s = s.trim_start();
    if let Some((inf, _)) = signed_infinity(s) {
        return inf;
    }
    match decimal_prefix_len(s) {
        0 => f64::NAN,
        len => s[..len].parse().unwrap_or(f64::NAN),
    }
}

/// Whole-string number parse: blank is 0, anything not entirely numeric is NaN.
pub fn to_number(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }
    if let Some((inf, len)) = signed_infinity(s) {
        return if len == s.len() { inf } else { f64::NAN };
    }
    match decimal_prefix_len(s) {
        len if len > 0 && len == s.len() => s.parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn js(v: f64) -> String {
        JsNumber(v).to_string()
    }

    #[test]
    fn formats_like_javascript() {
        assert_eq!(js(24.0), "24");
        assert_eq!(js(-3.0), "-3");
        assert_eq!(js(0.5), "0.5");
        assert_eq!(js(-0.0), "0");
        assert_eq!(js(f64::NAN), "NaN");
        assert_eq!(js(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(js(1e21), "1e+21");
        assert_eq!(js(1.5e-7), "1.5e-7");
        assert_eq!(js(123456.789), "123456.789");
        assert_eq!(js(0.000001), "0.000001");
    }

    #[test]
    fn parse_float_reads_leading_prefix() {
        assert_eq!(parse_float("32"), 32.0);
        assert_eq!(parse_float("  32px"), 32.0);
        assert_eq!(parse_float("1.5em"), 1.5);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("1e3x"), 1000.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
        assert_eq!(parse_float("100%"), 100.0);
        assert!(parse_float("auto").is_nan());
        assert!(parse_float(".").is_nan());
        assert!(parse_float("").is_nan());
    }

    #[test]
    fn to_number_is_strict() {
        assert_eq!(to_number(""), 0.0);
        assert_eq!(to_number("  "), 0.0);
        assert_eq!(to_number(" 48 "), 48.0);
        assert_eq!(to_number("-1.25"), -1.25);
        assert_eq!(to_number("0x10"), 16.0);
        assert_eq!(to_number("Infinity"), f64::INFINITY);
        assert!(to_number("24px").is_nan());
        assert!(to_number("inf").is_nan());
        assert!(to_number("nan").is_nan());
        assert!(to_number("0,0").is_nan());
    }
}
