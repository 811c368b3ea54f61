// Property-based tests for the tally pipeline.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;

use mannsum_core::LineValue;
use mannsum_engine::aggregate::{decompose, MANN};
use mannsum_engine::codec::{to_display, to_persisted};
use mannsum_engine::lines::{indices, parse_all, parse_line, split};
use mannsum_engine::Tally;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Arbitrary line: mostly numeric, sometimes with a unit suffix, sometimes junk.
fn arb_line() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => r"-?[0-9]{1,5}(\.[0-9]{1,2})?",
        1 => r"[0-9]{1,3}(kg| kg| sacks)",
        1 => r"[a-zA-Z ]{0,10}",
        1 => Just(String::new()),
    ]
}

/// Display text free of the persisted delimiter.
fn arb_display_text() -> impl Strategy<Value = String> {
    prop::collection::vec(r"[^~\n]{0,12}", 1..8).prop_map(|lines| lines.join("\n"))
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn codec_round_trips(text in arb_display_text()) {
        prop_assert_eq!(to_display(&to_persisted(&text)), text);
    }

    #[test]
    fn persisted_form_has_no_newlines(text in arb_display_text()) {
        prop_assert!(!to_persisted(&text).contains('\n'));
    }

    #[test]
    fn line_count_matches_indices(text in arb_display_text()) {
        let count = split(&text).len();
        prop_assert!(count >= 1);
        prop_assert_eq!(indices(count).len(), count);
        prop_assert_eq!(Tally::from_display(&text).line_numbers.len(), count);
    }

    #[test]
    fn decomposition_recombines(sum in -1.0e9..1.0e9f64) {
        let result = decompose(sum, MANN);
        prop_assert!((result.recombine(MANN) - sum).abs() <= 0.01 + sum.abs() * 1e-12,
            "sum={} result={:?}", sum, result);
        prop_assert!(result.remainder >= 0.0);
        prop_assert!(result.remainder <= MANN);
    }

    #[test]
    fn sum_ignores_invalid_lines(lines in prop::collection::vec(arb_line(), 1..20)) {
        let parsed = parse_all(&lines);
        let expected: f64 = lines
            .iter()
            .filter_map(|l| parse_line(l).as_number())
            .sum();
        let tally = Tally::from_display(&lines.join("\n"));
        prop_assert_eq!(parsed.len(), lines.len());
        prop_assert!((tally.result.sum - expected).abs() < 1e-9);
    }

    #[test]
    fn plain_numerals_parse_exactly(n in -1.0e6..1.0e6f64) {
        let text = format!("{}", n);
        prop_assert_eq!(parse_line(&text), LineValue::Number(n));
    }
}

// ---------------------------------------------------------------------------
// Fixed examples
// ---------------------------------------------------------------------------

#[test]
fn spec_example_negative_85() {
    let result = decompose(-85.0, MANN);
    assert_eq!(result.sign.as_str(), "-");
    assert_eq!(result.units, 2);
    assert_eq!(result.remainder, 5.0);
}

#[test]
fn tolerant_sum_example() {
    let tally = Tally::from_display("3\nx\n4.5");
    assert_eq!(tally.result.sum, 7.5);
}
