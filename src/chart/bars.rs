use std::collections::BTreeMap;

use crate::chart::model::{Bar, BarChunk};

/// A bar survives reconciliation when it is finite and inside `[from_ms, to_ms]`.
pub fn is_valid_bar(bar: &Bar, from_ms: i64, to_ms: i64) -> bool {
    bar.timestamp_ms >= from_ms && bar.timestamp_ms <= to_ms && bar.is_finite()
}

/// Merge overlapping chunks into one ascending series with unique timestamps.
///
/// Invalid bars are dropped. On a repeated timestamp the bar seen last (chunk order, then bar
/// order) wins.
pub fn flatten_bars(chunks: &[BarChunk], from_ms: i64, to_ms: i64) -> Vec<Bar> {
    let mut by_ts = BTreeMap::new();
    for bar in chunks.iter().flat_map(|chunk| chunk.bars.iter()) {
        if is_valid_bar(bar, from_ms, to_ms) {
            by_ts.insert(bar.timestamp_ms, *bar);
        }
    }
    by_ts.into_values().collect()
}

#[cfg(test)]
#[path = "../../tests/unit/chart/bars.rs"]
mod tests;
