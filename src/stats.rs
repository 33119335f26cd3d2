//! Aggregate-statistics helpers shared by the store instances.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A label with its occurrence count, for top-N frequency rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedLabel {
    pub name: String,
    pub count: usize,
}

/// Arithmetic mean rounded to two decimal places.
///
/// Defined as 0 for an empty input — never NaN, so an empty collection
/// renders as "0" instead of breaking the stats panel.
pub fn rounded_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (mean * 100.0).round() / 100.0
}

/// Frequency-ranked top-N over categorical labels.
///
/// Ranked count-descending; ties keep first-encountered order (stable sort
/// over the encounter sequence).
pub fn top_n<'a, I>(labels: I, n: usize) -> Vec<RankedLabel>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for label in labels {
        if label.is_empty() {
            continue;
        }
        let entry = counts.entry(label).or_insert(0);
        if *entry == 0 {
            order.push(label);
        }
        *entry += 1;
    }

    let mut ranked: Vec<RankedLabel> = order
        .into_iter()
        .map(|name| RankedLabel {
            name: name.to_string(),
            count: counts[name],
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}
