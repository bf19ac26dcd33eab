use std::collections::HashMap;

use serde::Serialize;

pub const TOP_TITLES_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub title: String,
    pub count: i64,
}

/// Occurrence counts that remember the order in which keys were first seen.
#[derive(Debug, Clone, Default)]
pub struct TitleCounter {
    entries: Vec<(String, i64)>,
    index_by_title: HashMap<String, usize>,
}

impl TitleCounter {
    pub fn record(&mut self, title: &str) {
        if let Some(index) = self.index_by_title.get(title) {
            if let Some(entry) = self.entries.get_mut(*index) {
                entry.1 += 1;
            }
            return;
        }

        self.index_by_title
            .insert(title.to_string(), self.entries.len());
        self.entries.push((title.to_string(), 1));
    }

    /// Highest counts first. `sort_by` is stable, so equal counts keep
    /// first-seen order.
    pub fn top(&self, limit: usize) -> Vec<RankedEntry> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|left, right| right.1.cmp(&left.1));
        ranked
            .into_iter()
            .take(limit)
            .map(|(title, count)| RankedEntry { title, count })
            .collect()
    }
}
