use serde::{Deserialize, Serialize};

/// Polarity of a decomposed total.
///
/// Units and remainder are always reported as magnitudes; the sign applies
/// to the whole decomposed value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sign {
    #[default]
    #[serde(rename = "")]
    Positive,
    #[serde(rename = "-")]
    Negative,
}

impl Sign {
    pub fn of(value: f64) -> Self {
        if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sign::Positive => "",
            Sign::Negative => "-",
        }
    }

    pub fn factor(&self) -> f64 {
        match self {
            Sign::Positive => 1.0,
            Sign::Negative => -1.0,
        }
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total of all lines plus its split into coarse units and a remainder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Raw, unrounded sum
    pub sum: f64,
    pub sign: Sign,
    /// Whole coarse units (magnitude)
    pub units: u64,
    /// Leftover base units, rounded to 2 decimals (magnitude)
    pub remainder: f64,
}

impl AggregateResult {
    /// Recombine sign, units and remainder against `divisor`.
    pub fn recombine(&self, divisor: f64) -> f64 {
        self.sign.factor() * (self.units as f64 * divisor + self.remainder)
    }
}

impl Default for AggregateResult {
    fn default() -> Self {
        Self {
            sum: 0.0,
            sign: Sign::Positive,
            units: 0,
            remainder: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_of_values() {
        assert_eq!(Sign::of(-0.01), Sign::Negative);
        assert_eq!(Sign::of(0.0), Sign::Positive);
        assert_eq!(Sign::of(-0.0), Sign::Positive);
        assert_eq!(Sign::of(12.0), Sign::Positive);
    }

    #[test]
    fn sign_renders_as_token() {
        assert_eq!(Sign::Negative.to_string(), "-");
        assert_eq!(Sign::Positive.to_string(), "");
    }

    #[test]
    fn recombine_negative() {
        let result = AggregateResult {
            sum: -85.0,
            sign: Sign::Negative,
            units: 2,
            remainder: 5.0,
        };
        assert_eq!(result.recombine(40.0), -85.0);
    }

    #[test]
    fn sign_serializes_as_token() {
        assert_eq!(serde_json::to_string(&Sign::Negative).unwrap(), "\"-\"");
        assert_eq!(serde_json::to_string(&Sign::Positive).unwrap(), "\"\"");
    }
}
