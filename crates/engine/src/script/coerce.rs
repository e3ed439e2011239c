//! String <-> number conversions used by script variables.
//!
//! Variables are always stored as text; these helpers decide how text turns
//! into numbers and back.

const FLOAT_DECIMALS: usize = 4;

/// True if every character is a digit, `-`, `,` or `.`.
/// The empty string counts as a number.
pub fn is_number(text: &str) -> bool {
    text.chars()
        .all(|ch| ch.is_ascii_digit() || ch == '-' || ch == ',' || ch == '.')
}

/// Parses the longest numeric prefix of `text` (after trimming, with `,`
/// accepted as the decimal point). Returns `default` if there is none.
pub fn parse_as_number_or(text: &str, default: f32) -> f32 {
    let normalized = text.trim().replace(',', ".");
    let prefix = numeric_prefix(&normalized);
    if prefix.is_empty() {
        return default;
    }
    prefix.parse::<f64>().map(|v| v as f32).unwrap_or(default)
}

pub fn s2f(text: &str) -> f32 {
    parse_as_number_or(text, 0.0)
}

pub fn s2i(text: &str) -> i32 {
    s2f(text) as i32
}

pub fn s2b(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    matches!(lowered.as_str(), "yes" | "true" | "y" | "t") || s2i(&lowered) != 0
}

/// Formats with up to four decimals, without trailing zeros.
pub fn f2s(value: f32) -> String {
    let fixed = format!("{:.*}", FLOAT_DECIMALS, value);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn i2s(value: i64) -> String {
    value.to_string()
}

pub fn b2s(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

fn numeric_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || has_digits {
            has_digits |= frac_end > frac_start;
            end = frac_end;
        }
    }
    if !has_digits {
        return "";
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'-' || bytes[exp_end] == b'+') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }
    text[..end].trim_end_matches('.')
}
