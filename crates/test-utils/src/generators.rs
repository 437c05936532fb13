//! Generators for predictable, verifiable test inputs.

/// Inclusive series of forecast offsets in hours.
///
/// # Example
///
/// ```
/// use test_utils::offset_series;
///
/// assert_eq!(offset_series(0, 12, 3), vec![0, 3, 6, 9, 12]);
/// assert_eq!(offset_series(6, 6, 6), vec![6]);
/// assert!(offset_series(12, 0, 3).is_empty());
/// ```
pub fn offset_series(start: i64, end: i64, step: i64) -> Vec<i64> {
    assert!(step > 0, "step must be positive");
    (start..=end).step_by(step as usize).collect()
}

/// Every combination picking one element from each axis, first axis
/// varying slowest.
///
/// # Example
///
/// ```
/// use test_utils::cross_product;
///
/// let combos = cross_product(&[vec!["a", "b"], vec!["1", "2", "3"]]);
/// assert_eq!(combos.len(), 6);
/// assert_eq!(combos[0], vec!["a", "1"]);
/// assert_eq!(combos[5], vec!["b", "3"]);
/// ```
pub fn cross_product<T: Clone>(axes: &[Vec<T>]) -> Vec<Vec<T>> {
    axes.iter().fold(vec![Vec::new()], |acc, axis| {
        acc.into_iter()
            .flat_map(|prefix| {
                axis.iter().map(move |item| {
                    let mut combo = prefix.clone();
                    combo.push(item.clone());
                    combo
                })
            })
            .collect()
    })
}
