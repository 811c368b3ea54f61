//! Conversion between the display form of the working text (newline
//! separated) and the persisted form stored in the query string.
//!
//! `~` is unreserved in URLs and never part of a numeral, so a persisted
//! line keeps its numeric meaning and the query string stays readable.

/// Line separator in the persisted form.
pub const DELIMITER: char = '~';

/// Replace every newline with the delimiter.
pub fn to_persisted(display: &str) -> String {
    display.replace('\n', "~")
}

/// Replace every delimiter with a newline. Exact inverse of `to_persisted`
/// for text that does not itself contain `~`.
pub fn to_display(persisted: &str) -> String {
    persisted.replace(DELIMITER, "\n")
}

/// Collapse `\r\n` and lone `\r` line endings into `\n`.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newlines_become_delimiters() {
        assert_eq!(to_persisted("1\n2\n3"), "1~2~3");
        assert_eq!(to_persisted(""), "");
        assert_eq!(to_persisted("\n"), "~");
    }

    #[test]
    fn delimiters_become_newlines() {
        assert_eq!(to_display("1~2~3"), "1\n2\n3");
        assert_eq!(to_display("~~"), "\n\n");
    }

    #[test]
    fn round_trip_keeps_blank_and_text_lines() {
        for text in ["", "12.5kg\n\nabc\n-4", "\n\n", "1 2 3", "é\n€"] {
            assert_eq!(to_display(&to_persisted(text)), text);
        }
    }

    #[test]
    fn numerals_never_contain_delimiter() {
        for numeral in ["-1.5e+3", "+.25", "40", "1E-2"] {
            assert_eq!(to_persisted(numeral), numeral);
        }
    }

    #[test]
    fn crlf_is_normalized() {
        assert_eq!(normalize_newlines("1\r\n2\r3"), "1\n2\n3");
        assert_eq!(normalize_newlines("1\n2"), "1\n2");
    }
}
