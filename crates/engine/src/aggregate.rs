use mannsum_core::{AggregateResult, ParsedLine, Sign};

/// Base units per mann. The only divisor the tally supports.
pub const MANN: f64 = 40.0;

/// Sum every valid line; invalid lines add 0.
pub fn sum(lines: &[ParsedLine]) -> f64 {
    lines.iter().map(|line| line.value.contribution()).sum()
}

/// Round to 2 decimal places, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Split `sum` into a sign, whole `divisor` units and a remainder.
///
/// The unit count is the quotient truncated toward zero; the remainder is
/// the floating remainder (same sign as `sum`) rounded to 2 places. Both are
/// reported as magnitudes so `-85` reads as `-` 2 units 5.
///
/// A sum that overflowed to infinity (finite lines, huge total) has no
/// meaningful split: it reports 0 units and 0 remainder.
pub fn decompose(sum: f64, divisor: f64) -> AggregateResult {
    if !sum.is_finite() {
        return AggregateResult {
            sum,
            sign: Sign::of(sum),
            units: 0,
            remainder: 0.0,
        };
    }

    let quotient = sum / divisor;
    let whole = if quotient >= 0.0 {
        quotient.floor()
    } else {
        quotient.ceil()
    };

    AggregateResult {
        sum,
        sign: Sign::of(sum),
        units: whole.abs() as u64,
        remainder: round2(sum % divisor).abs(),
    }
}

/// `sum` followed by `decompose` against the mann divisor.
pub fn aggregate(lines: &[ParsedLine]) -> AggregateResult {
    decompose(sum(lines), MANN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::parse_all;

    #[test]
    fn invalid_lines_add_nothing() {
        let parsed = parse_all(&["3", "x", "4.5"]);
        assert_eq!(sum(&parsed), 7.5);
    }

    #[test]
    fn empty_input_sums_to_zero() {
        let parsed = parse_all(&[""]);
        assert_eq!(sum(&parsed), 0.0);
        let result = aggregate(&parsed);
        assert_eq!(result.sign, Sign::Positive);
        assert_eq!(result.units, 0);
        assert_eq!(result.remainder, 0.0);
    }

    #[test]
    fn overflowing_total_has_no_units() {
        let parsed = parse_all(&["1e308", "1e308"]);
        let result = aggregate(&parsed);
        assert_eq!(result.sum, f64::INFINITY);
        assert_eq!(result.sign, Sign::Positive);
        assert_eq!(result.units, 0);
        assert_eq!(result.remainder, 0.0);

        let result = decompose(f64::NEG_INFINITY, MANN);
        assert_eq!(result.sign, Sign::Negative);
        assert_eq!(result.units, 0);
        assert_eq!(result.remainder, 0.0);
    }

    #[test]
    fn positive_decomposition() {
        let result = decompose(125.5, MANN);
        assert_eq!(result.sign, Sign::Positive);
        assert_eq!(result.units, 3);
        assert_eq!(result.remainder, 5.5);
    }

    #[test]
    fn negative_decomposition_truncates_toward_zero() {
        let result = decompose(-85.0, MANN);
        assert_eq!(result.sign, Sign::Negative);
        assert_eq!(result.units, 2);
        assert_eq!(result.remainder, 5.0);
    }

    #[test]
    fn negative_below_one_unit() {
        let result = decompose(-15.0, MANN);
        assert_eq!(result.sign, Sign::Negative);
        assert_eq!(result.units, 0);
        assert_eq!(result.remainder, 15.0);
    }

    #[test]
    fn exact_multiples_leave_no_remainder() {
        let result = decompose(80.0, MANN);
        assert_eq!(result.units, 2);
        assert_eq!(result.remainder, 0.0);

        let result = decompose(-120.0, MANN);
        assert_eq!(result.units, 3);
        assert_eq!(result.remainder, 0.0);
    }

    #[test]
    fn remainder_is_rounded() {
        // 0.1 + 0.2 style drift never leaks into the remainder
        let parsed = parse_all(&["0.1", "0.2", "40"]);
        let result = aggregate(&parsed);
        assert_eq!(result.units, 1);
        assert_eq!(result.remainder, 0.3);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(1.234), 1.23);
    }

    #[test]
    fn recombination_matches_sum() {
        for sum in [0.0, 39.99, 40.0, 41.5, -0.5, -85.0, -160.25, 1234.567] {
            let result = decompose(sum, MANN);
            assert!(
                (result.recombine(MANN) - sum).abs() <= 0.01,
                "{sum} -> {result:?}"
            );
        }
    }
}
