//! Single-pass aggregate helpers shared by the report passes.

use std::collections::HashMap;
use std::hash::Hash;

/// Counts each distinct value, most frequent first.
///
/// Values with equal counts keep the order in which they first appeared.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    // value -> (count, index of first appearance)
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    let mut seen = 0;

    for value in values {
        let entry = counts.entry(value).or_insert((0, seen));
        entry.0 += 1;
        seen += 1;
    }

    let mut counts: Vec<_> = counts.into_iter().collect();
    counts.sort_by(|(_, (ca, fa)), (_, (cb, fb))| cb.cmp(ca).then(fa.cmp(fb)));
    counts.into_iter().map(|(v, (c, _))| (v, c)).collect()
}

/// Most frequent value; ties go to the value seen first. `None` when empty.
pub fn mode<T, I>(values: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    value_counts(values).into_iter().next().map(|(v, _)| v)
}

/// Total of `values`; `0.0` (never `-0.0`) for empty input.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc + v)
}

/// Arithmetic mean. `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(sum(values) / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_picks_most_frequent() {
        assert_eq!(mode(vec![3, 1, 3, 2, 3, 1]), Some(3));
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen() {
        assert_eq!(mode(vec!["b", "a", "a", "b"]), Some("b"));
        assert_eq!(mode(vec![7, 2, 2, 7, 9]), Some(7));
    }

    #[test]
    fn test_mode_empty_is_none() {
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn test_value_counts_ordering() {
        let counts = value_counts(vec!["Customer", "Subscriber", "Subscriber", "Dependent"]);
        assert_eq!(
            counts,
            vec![("Subscriber", 2), ("Customer", 1), ("Dependent", 1)]
        );
    }

    #[test]
    fn test_sum_and_mean_of_durations() {
        let durations = [60.0, 120.0, 180.0];
        assert_eq!(sum(&durations), 360.0);
        assert_eq!(mean(&durations), Some(120.0));
    }

    #[test]
    fn test_sum_and_mean_empty() {
        assert_eq!(sum(&[]), 0.0);
        assert!(sum(&[]).is_sign_positive());
        assert_eq!(sum(&[]).to_string(), "0");
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean_is_not_rounded() {
        assert_eq!(mean(&[1.0, 2.0]), Some(1.5));
    }
}
