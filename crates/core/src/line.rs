use serde::{Deserialize, Serialize};

/// Numeric meaning of a single line of input.
///
/// `Invalid` is an expected state while the user is still typing; it is
/// never an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineValue {
    Number(f64),
    #[default]
    Invalid,
}

impl LineValue {
    /// The value this line contributes to a sum (0 for invalid lines)
    pub fn contribution(&self) -> f64 {
        match self {
            LineValue::Number(n) => *n,
            LineValue::Invalid => 0.0,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            LineValue::Number(n) => Some(*n),
            LineValue::Invalid => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, LineValue::Number(_))
    }
}

/// One line of the working text, paired with its 0-based position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedLine {
    pub index: usize,
    pub raw: String,
    pub value: LineValue,
}

impl ParsedLine {
    /// 1-based line number shown in the gutter
    pub fn number(&self) -> usize {
        self.index + 1
    }
}
