//! Numeric parsing and display rules for calculator input and summaries.

use once_cell::sync::Lazy;
use regex::Regex;

/// Significant digits used when rendering floats as text.
const DISPLAY_PRECISION: usize = 14;

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t\n\r\v\f]*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?[ \t\n\r\v\f]*$")
        .expect("valid numeric regex")
});

/// Whether `input` is a decimal numeric string (integer, decimal, signed or
/// with an exponent). Hex, `inf` and `nan` spellings are rejected.
pub fn is_numeric(input: &str) -> bool {
    NUMERIC_RE.is_match(input)
}

/// Parses a numeric string accepted by [`is_numeric`].
pub fn parse_numeric(input: &str) -> Option<f64> {
    if !is_numeric(input) {
        return None;
    }
    input.trim().parse::<f64>().ok()
}

/// Renders a float the way a loosely typed host prints it: 14 significant
/// digits, no trailing zeros, integral values without a fractional part and
/// `1.0E+25` style outside the fixed-notation window.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() { "-INF" } else { "INF" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let scientific = format!("{:.*e}", DISPLAY_PRECISION - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();

    if (-4..DISPLAY_PRECISION as i32).contains(&exponent) {
        let decimals = (DISPLAY_PRECISION as i32 - 1 - exponent).max(0) as usize;
        return trim_fraction(&format!("{value:.decimals$}")).to_string();
    }

    let mut mantissa = trim_fraction(mantissa).to_string();
    if !mantissa.contains('.') {
        mantissa.push_str(".0");
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}E{sign}{}", exponent.abs())
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
