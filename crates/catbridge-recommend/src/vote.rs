//! Majority-vote reduction over attribute values.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Returns the most frequent value, or `None` for an empty input.
///
/// Ties go to the value that was seen first, so callers control the
/// outcome through input order.
pub fn majority_vote<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (index, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, index)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

/// Counts occurrences of each value.
pub fn tally<'a, I>(values: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value.clone()).or_insert(0) += 1;
    }
    counts
}
