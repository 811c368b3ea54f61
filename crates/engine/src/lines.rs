use mannsum_core::{LineValue, ParsedLine};

use crate::codec::DELIMITER;

/// Split display text into lines. Never returns zero lines: `""` is one
/// empty line.
pub fn split(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Split persisted text (delimiter separated) into lines.
pub fn split_persisted(text: &str) -> Vec<&str> {
    text.split(DELIMITER).collect()
}

/// Parse the numeric prefix of a line.
///
/// Leading whitespace is skipped, then the longest prefix of the form
/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?` is taken.
/// Anything after the prefix is ignored, so `"12.5kg"` is 12.5. Lines with
/// no numeric prefix, and prefixes that overflow to infinity, are invalid.
pub fn parse_line(raw: &str) -> LineValue {
    let s = raw.trim_start();
    let len = numeric_prefix_len(s);
    if len == 0 {
        return LineValue::Invalid;
    }

    match s[..len].parse::<f64>() {
        Ok(n) if n.is_finite() => LineValue::Number(n),
        _ => LineValue::Invalid,
    }
}

/// Byte length of the numeric prefix of `s`, or 0 if there is none.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        let frac_digits = frac_end - (end + 1);
        // A lone "." (or "-.") is not a number
        if mantissa_digits + frac_digits > 0 {
            mantissa_digits += frac_digits;
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return 0;
    }

    // Exponent only counts when it has at least one digit: "2e" is 2
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    end
}

/// Parse every line, keeping invalid ones in place.
pub fn parse_all<S: AsRef<str>>(lines: &[S]) -> Vec<ParsedLine> {
    lines
        .iter()
        .enumerate()
        .map(|(index, raw)| ParsedLine {
            index,
            raw: raw.as_ref().to_string(),
            value: parse_line(raw.as_ref()),
        })
        .collect()
}

/// Gutter line numbers `1..=line_count`.
pub fn indices(line_count: usize) -> Vec<usize> {
    (1..=line_count).collect()
}
