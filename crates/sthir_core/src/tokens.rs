use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Word → frequency table for one document.
///
/// Kept ordered: the builder walks distinct words in ascending order, which
/// makes the counter array independent of the order tokens arrived in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenCounts(BTreeMap<String, u32>);

impl TokenCounts {
    pub fn new() -> Self { Self::default() }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::new();
        for t in tokens {
            out.add(t.as_ref(), 1);
        }
        out
    }

    pub fn add(&mut self, word: &str, count: u32) {
        if count == 0 { return; }
        let slot = self.0.entry(word.to_owned()).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    pub fn get(&self, word: &str) -> u32 { self.0.get(word).copied().unwrap_or(0) }

    /// Distinct words; this is `n` for sizing.
    pub fn distinct(&self) -> usize { self.0.len() }

    /// Tokens with multiplicity.
    pub fn total(&self) -> u64 { self.0.values().map(|&c| c as u64).sum() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(w, &c)| (w.as_str(), c))
    }
}

impl<S: AsRef<str>> FromIterator<S> for TokenCounts {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self { Self::from_tokens(iter) }
}

impl From<BTreeMap<String, u32>> for TokenCounts {
    fn from(mut map: BTreeMap<String, u32>) -> Self {
        map.retain(|_, c| *c > 0);
        Self(map)
    }
}
