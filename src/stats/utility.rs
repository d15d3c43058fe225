use std::collections::HashMap;
use std::hash::Hash;

use crate::stats::types::Mode;

/// Counts occurrences of each distinct value.
///
/// Ordered by descending count; values with equal counts keep the order in
/// which they were first seen.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // stable sort keeps first-seen order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Most frequent value; ties go to the value seen first.
pub fn mode_first_seen<T, I>(values: I) -> Option<Mode<T>>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    value_counts(values)
        .into_iter()
        .next()
        .map(|(value, count)| Mode { value, count })
}

/// Most frequent value; ties go to the smallest `key(value)`.
pub fn mode_lowest_by_key<T, K, I, F>(values: I, key: F) -> Option<Mode<T>>
where
    T: Eq + Hash + Clone,
    K: Ord,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> K,
{
    let counts = value_counts(values);
    let top = counts.first()?.1;

    counts
        .into_iter()
        .take_while(|(_, count)| *count == top)
        .min_by_key(|(value, _)| key(value))
        .map(|(value, count)| Mode { value, count })
}

/// Most frequent value; ties go to the smallest value.
pub fn mode_lowest<T, I>(values: I) -> Option<Mode<T>>
where
    T: Eq + Hash + Ord + Clone,
    I: IntoIterator<Item = T>,
{
    mode_lowest_by_key(values, T::clone)
}
