// SPDX-License-Identifier: MPL-2.0
//! Token frequency map.

use std::collections::HashMap;

/// Token → count mapping that remembers first-seen order.
///
/// Equality ignores insertion order: two maps are equal when they hold the
/// same tokens with the same counts. Display order comes from [`sorted`],
/// which breaks count ties by first-seen order.
///
/// [`sorted`]: FrequencyMap::sorted
#[derive(Debug, Clone, Default)]
pub struct FrequencyMap {
    entries: Vec<(String, u32)>,
    index: HashMap<String, usize>,
}

impl FrequencyMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `token`. Empty tokens are ignored.
    pub fn increment(&mut self, token: &str) {
        self.add(token, 1);
    }

    /// Adds `count` occurrences of `token`. Empty tokens and zero counts are ignored.
    pub fn add(&mut self, token: &str, count: u32) {
        if token.is_empty() || count == 0 {
            return;
        }
        match self.index.get(token) {
            Some(&pos) => {
                let entry = &mut self.entries[pos].1;
                *entry = entry.saturating_add(count);
            }
            None => {
                self.index.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), count));
            }
        }
    }

    /// Returns the count for `token`, if present.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<u32> {
        self.index.get(token).map(|&pos| self.entries[pos].1)
    }

    /// Returns the number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no token has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| u64::from(*c)).sum()
    }

    /// Iterates over entries in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.entries.iter().map(|(t, c)| (t.as_str(), *c))
    }

    /// Returns entries by descending count, ties in first-seen order.
    #[must_use]
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut sorted: Vec<(&str, u32)> = self.iter().collect();
        // sort_by is stable, so ties keep insertion order
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted
    }

    /// Returns the `n` most frequent entries.
    #[must_use]
    pub fn top(&self, n: usize) -> Vec<(&str, u32)> {
        let mut sorted = self.sorted();
        sorted.truncate(n);
        sorted
    }
}

impl PartialEq for FrequencyMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(token, count)| other.get(token) == Some(count))
    }
}

impl Eq for FrequencyMap {}

impl<'a> FromIterator<&'a str> for FrequencyMap {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut map = Self::new();
        for token in iter {
            map.increment(token);
        }
        map
    }
}
