use mannsum_core::AggregateResult;

use crate::aggregate::round2;

/// Format an amount rounded to 2 places with no trailing zeros
/// (`25`, `7.5`, `0.33`). Negative zero prints as `0`.
pub fn format_amount(value: f64) -> String {
    let rounded = round2(value);
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// `"25 kg"`
pub fn total_line(result: &AggregateResult, base_unit: &str) -> String {
    format!("{} {}", format_amount(result.sum), base_unit)
}

/// `"-2 mann 5 kg"`
pub fn mann_line(result: &AggregateResult, coarse_unit: &str, base_unit: &str) -> String {
    format!(
        "{}{} {} {} {}",
        result.sign,
        result.units,
        coarse_unit,
        format_amount(result.remainder),
        base_unit
    )
}
