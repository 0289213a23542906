/// Median of a set of values; averages the two middle values for even sizes
///
/// Sorts `values` in place. Returns `None` for an empty slice.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;

    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Round to the nearest integer, halves going to the even neighbour
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}
