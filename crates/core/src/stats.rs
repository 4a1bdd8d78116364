//! Full-scan statistics helpers.
//!
//! Aggregates are computed by reducing over the complete record set in
//! memory; no backend pushdown and no indexing. Shared by both services
//! so neither grows its own copy of these reductions.

use std::collections::BTreeMap;

/// Mean of the values selected by `field`, skipping records where the field
/// is absent. Returns 0.0 when no record carries a value.
pub fn average<T, F>(items: &[T], field: F) -> f64
where
    F: Fn(&T) -> Option<f64>,
{
    let values: Vec<f64> = items.iter().filter_map(&field).collect();
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Smallest selected value, or `None` when every field is absent.
pub fn min_of<T, F>(items: &[T], field: F) -> Option<f64>
where
    F: Fn(&T) -> Option<f64>,
{
    items
        .iter()
        .filter_map(&field)
        .min_by(|a, b| a.total_cmp(b))
}

/// Largest selected value, or `None` when every field is absent.
pub fn max_of<T, F>(items: &[T], field: F) -> Option<f64>
where
    F: Fn(&T) -> Option<f64>,
{
    items
        .iter()
        .filter_map(&field)
        .max_by(|a, b| a.total_cmp(b))
}

/// Record count per category key. `BTreeMap` keeps the JSON output stable.
pub fn count_by<T, F>(items: &[T], key: F) -> BTreeMap<String, u64>
where
    F: Fn(&T) -> Option<String>,
{
    let mut counts = BTreeMap::new();
    for item in items {
        if let Some(key) = key(item) {
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    counts
}

/// Up to `n` records with the largest sort keys, descending. Records
/// without a key are dropped; ties keep their scan order (stable sort).
pub fn top_n_by<T, F>(items: &[T], n: usize, key: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<f64>,
{
    let mut keyed: Vec<(f64, T)> = items
        .iter()
        .filter_map(|item| key(item).map(|k| (k, item.clone())))
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed.truncate(n);
    keyed.into_iter().map(|(_, item)| item).collect()
}
