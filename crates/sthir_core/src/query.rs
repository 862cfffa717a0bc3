//! Read side: estimates straight from the encoded form, via range decoding.
//!
//! Nothing here decodes a whole filter; each counter is pulled out with
//! `codec::get_range`, the same way the query page in the artifact does it.

use serde::{Deserialize, Serialize};

use crate::bits::bits_to_uint;
use crate::bundle::FilterBundle;
use crate::codec;
use crate::errors::{Result, SthirError};
use crate::hash::hash_indices;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    /// Position of the bundle in the ranked input.
    pub position: usize,
    pub score: u64,
    pub document_id: String,
    pub title: String,
}

/// Lowercase, whitespace-split query words.
pub fn parse_query(q: &str) -> Vec<String> {
    q.split_whitespace().map(str::to_lowercase).collect()
}

pub fn counter_at(encoded: &str, index: usize, chunk_size: u8) -> Result<u32> {
    let w = chunk_size as usize;
    let Some((start, end)) = index.checked_mul(w).and_then(|s| Some((s, s.checked_add(w)?))) else {
        return Err(SthirError::OutOfRange {
            start: usize::MAX,
            end: usize::MAX,
            len: codec::bit_length(encoded)?,
        });
    };
    let bits = codec::get_range(encoded, start, end)?;
    Ok(bits_to_uint(&bits))
}

// Callers have already run `bundle.validate()`.
fn counters_of(bundle: &FilterBundle, word: &str) -> Result<Vec<u32>> {
    hash_indices(word, bundle.k, bundle.m)?
        .into_iter()
        .map(|i| counter_at(&bundle.encoded, i, bundle.chunk_size))
        .collect()
}

fn min_counter(bundle: &FilterBundle, word: &str) -> Result<u32> {
    Ok(counters_of(bundle, word)?.into_iter().min().unwrap_or(0))
}

/// All k counters for `word`, in seed order.
pub fn word_counters(bundle: &FilterBundle, word: &str) -> Result<Vec<u32>> {
    bundle.validate()?;
    counters_of(bundle, word)
}

pub fn estimate_frequency(bundle: &FilterBundle, word: &str) -> Result<u32> {
    bundle.validate()?;
    min_counter(bundle, word)
}

pub fn document_score<S: AsRef<str>>(bundle: &FilterBundle, words: &[S]) -> Result<u64> {
    bundle.validate()?;
    let mut score = 0u64;
    for w in words {
        score += min_counter(bundle, w.as_ref())? as u64;
    }
    Ok(score)
}

/// Partial sums after each query word; the last entry is `document_score`.
pub fn running_scores<S: AsRef<str>>(bundle: &FilterBundle, words: &[S]) -> Result<Vec<u64>> {
    bundle.validate()?;
    let mut score = 0u64;
    let mut out = Vec::with_capacity(words.len());
    for w in words {
        score += min_counter(bundle, w.as_ref())? as u64;
        out.push(score);
    }
    Ok(out)
}

/// Scores every bundle, drops zeros, sorts by score descending.
/// Ties keep input order.
pub fn rank<S: AsRef<str>>(bundles: &[FilterBundle], words: &[S]) -> Result<Vec<Hit>> {
    let mut hits = Vec::new();
    for (position, b) in bundles.iter().enumerate() {
        let score = document_score(b, words)?;
        if score > 0 {
            hits.push(Hit {
                position,
                score,
                document_id: b.document_id.clone(),
                title: b.title.clone(),
            });
        }
    }
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    Ok(hits)
}
