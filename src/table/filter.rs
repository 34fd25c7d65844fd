//! Name filtering over a sorted collection.

use super::{Comparator, Record};

/// Sort a collection and narrow it by a free-text name filter.
///
/// Each record is decorated with its original position so that records
/// comparing equal keep their relative order, whatever the guarantees of
/// the sort primitive. When `filter_name` is non-empty after trimming, only
/// records whose `name` field contains it (case-insensitively) are kept;
/// records without a text `name` field never match an active filter.
///
/// The input is left untouched; the result borrows from it.
pub fn apply_filter<'a, R: Record>(
    input: &'a [R],
    comparator: &Comparator<'_>,
    filter_name: &str,
) -> Vec<&'a R> {
    let mut stabilized: Vec<(usize, &R)> = input.iter().enumerate().collect();

    stabilized.sort_unstable_by(|(ia, a), (ib, b)| {
        comparator.compare(*a, *b).then_with(|| ia.cmp(ib))
    });

    let sorted = stabilized.into_iter().map(|(_, record)| record);

    let needle = filter_name.trim().to_lowercase();
    if needle.is_empty() {
        return sorted.collect();
    }

    sorted
        .filter(|record| {
            record
                .field("name")
                .and_then(|value| value.as_text().map(|name| name.to_lowercase()))
                .is_some_and(|name| name.contains(&needle))
        })
        .collect()
}
