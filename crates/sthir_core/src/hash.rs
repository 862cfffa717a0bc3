//! The k-function hash family: `h_i(word) = murmur3_x86_32(utf8(word), seed = i) % m`.
//!
//! Query pages recompute these indices in another runtime, so the function is
//! frozen; the vectors in the tests below are shared with those readers.

use std::collections::HashSet;

use crate::errors::{Result, SthirError};

#[inline]
pub fn hash_index(word: &str, seed: u32, m: usize) -> Result<usize> {
    if m == 0 {
        return Err(SthirError::ZeroSize { m, k: 1 });
    }
    let mut src = word.as_bytes();
    let h = murmur3::murmur3_32(&mut src, seed)?;
    Ok(h as usize % m)
}

pub fn hash_indices(word: &str, k: usize, m: usize) -> Result<Vec<usize>> {
    (0..k as u32).map(|seed| hash_index(word, seed, m)).collect()
}

/// First index that appears more than once, if any.
pub fn duplicate_index(indices: &[usize]) -> Option<usize> {
    let mut seen = HashSet::with_capacity(indices.len());
    indices.iter().copied().find(|i| !seen.insert(*i))
}

/// Words whose own k indices collide; such words occupy fewer than k slots.
pub fn words_with_duplicate_indices<'a, I>(words: I, k: usize, m: usize) -> Result<Vec<(&'a str, usize)>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = Vec::new();
    for w in words {
        if let Some(dup) = duplicate_index(&hash_indices(w, k, m)?) {
            tracing::warn!(word = w, index = dup, k, m, "hash indices collide");
            out.push((w, dup));
        }
    }
    Ok(out)
}
