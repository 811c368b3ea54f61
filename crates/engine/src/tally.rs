use mannsum_core::{AggregateResult, ParsedLine};
use serde::Serialize;

use crate::aggregate;
use crate::codec;
use crate::lines;

/// Everything the presentation layer shows for one snapshot of the text.
///
/// Rebuilt from scratch on every change; never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tally {
    pub display_text: String,
    pub lines: Vec<ParsedLine>,
    pub line_numbers: Vec<usize>,
    pub result: AggregateResult,
}

impl Tally {
    pub fn from_display(display: &str) -> Self {
        let raw_lines = lines::split(display);
        let parsed = lines::parse_all(&raw_lines);
        let line_numbers = lines::indices(parsed.len());
        let result = aggregate::aggregate(&parsed);

        Self {
            display_text: display.to_string(),
            lines: parsed,
            line_numbers,
            result,
        }
    }

    pub fn from_persisted(persisted: &str) -> Self {
        Self::from_display(&codec::to_display(persisted))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn valid_count(&self) -> usize {
        self.lines.iter().filter(|l| l.value.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.line_count() - self.valid_count()
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::from_display("")
    }
}
