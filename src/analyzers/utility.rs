/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Rounds to `decimals` places, resolving ties to the even neighbour.
///
/// Never returns `-0.0`, so rounded values compare equal to zero when sorted.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale + 0.0
}

/// Expresses a 0/1 mean as a percentage with one decimal.
pub fn as_rate(mean: f64) -> f64 {
    round_to(mean * 100.0, 1)
}
