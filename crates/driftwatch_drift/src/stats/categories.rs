use itertools::Itertools;
use std::collections::HashMap;

/// One counted bucket. `Other` collects the categories beyond
/// `max_categories` and never collides with a value named "other".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bucket {
    Category(String),
    Other,
}

/// Per-category counts of a reference and an actual sample over the union
/// of their categories.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCounts {
    pub buckets: Vec<Bucket>,
    pub reference: Vec<usize>,
    pub actual: Vec<usize>,
}

impl CategoryCounts {
    /// Counts both samples. When the union holds more than `max_categories`
    /// categories, the `max_categories - 1` most frequent reference categories
    /// are kept and the rest are folded into [`Bucket::Other`].
    pub fn new(reference: &[String], actual: &[String], max_categories: usize) -> Self {
        let reference_counts: HashMap<&str, usize> =
            reference.iter().map(String::as_str).counts();
        let actual_counts: HashMap<&str, usize> = actual.iter().map(String::as_str).counts();

        // most frequent in the reference first, ties by name
        let ranked: Vec<&str> = reference_counts
            .keys()
            .chain(actual_counts.keys())
            .copied()
            .unique()
            .sorted_by(|a, b| {
                let count_a = reference_counts.get(a).copied().unwrap_or(0);
                let count_b = reference_counts.get(b).copied().unwrap_or(0);
                count_b.cmp(&count_a).then_with(|| a.cmp(b))
            })
            .collect();

        let keep = if ranked.len() > max_categories {
            max_categories.saturating_sub(1)
        } else {
            ranked.len()
        };

        let mut buckets = Vec::with_capacity(keep + 1);
        let mut reference_bucket = Vec::with_capacity(keep + 1);
        let mut actual_bucket = Vec::with_capacity(keep + 1);

        for category in &ranked[..keep] {
            buckets.push(Bucket::Category(category.to_string()));
            reference_bucket.push(reference_counts.get(category).copied().unwrap_or(0));
            actual_bucket.push(actual_counts.get(category).copied().unwrap_or(0));
        }

        if keep < ranked.len() {
            let folded = &ranked[keep..];
            buckets.push(Bucket::Other);
            reference_bucket.push(
                folded
                    .iter()
                    .map(|c| reference_counts.get(c).copied().unwrap_or(0))
                    .sum(),
            );
            actual_bucket.push(
                folded
                    .iter()
                    .map(|c| actual_counts.get(c).copied().unwrap_or(0))
                    .sum(),
            );
        }

        Self {
            buckets,
            reference: reference_bucket,
            actual: actual_bucket,
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
