//! Spectral (counting) Bloom filter with minimal-increment updates.
//!
//! Each of the `m` slots is a `chunk_size`-bit saturating counter. Inserting a
//! word with frequency `f` reads the minimum `v` among its k slots and lifts
//! every slot below `min(v + f, 2^chunk_size - 1)` up to that value; slots
//! already above it are left alone. Reading takes the minimum again, so an
//! inserted word is never under-counted (up to saturation).
//!
//! Paper: Cohen & Matias, "Spectral Bloom Filters", SIGMOD '03.

use crate::bits::{push_uint, Bits};
use crate::codec;
use crate::errors::{Result, SthirError};
use crate::hash::hash_indices;
use crate::sizing::validate_chunk_size;
use crate::tokens::TokenCounts;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpectralBloom {
    pub m: usize,
    pub k: usize,
    pub chunk_size: u8,
    counters: Vec<u16>,
}

impl SpectralBloom {
    pub fn new(m: usize, k: usize, chunk_size: u8) -> Result<Self> {
        validate_chunk_size(chunk_size)?;
        if m == 0 || k == 0 {
            return Err(SthirError::ZeroSize { m, k });
        }
        Ok(Self { m, k, chunk_size, counters: vec![0; m] })
    }

    /// One pass over the distinct words, in table order.
    pub fn build(counts: &TokenCounts, m: usize, k: usize, chunk_size: u8) -> Result<Self> {
        let mut f = Self::new(m, k, chunk_size)?;
        for (word, count) in counts.iter() {
            f.insert(word, count)?;
        }
        tracing::debug!(
            m, k, chunk_size,
            words = counts.distinct(),
            bits = m * chunk_size as usize,
            "spectral filter built"
        );
        Ok(f)
    }

    #[inline]
    pub fn saturation(&self) -> u16 { (1u16 << self.chunk_size) - 1 }

    #[inline]
    fn slots(&self, word: &str) -> Result<Vec<usize>> {
        let mut idx = hash_indices(word, self.k, self.m)?;
        idx.sort_unstable();
        idx.dedup();
        Ok(idx)
    }

    pub fn insert(&mut self, word: &str, count: u32) -> Result<()> {
        if count == 0 { return Ok(()); }
        let slots = self.slots(word)?;
        let Some(v) = slots.iter().map(|&i| self.counters[i]).min() else { return Ok(()) };
        let next = (v as u32).saturating_add(count).min(self.saturation() as u32) as u16;
        for i in slots {
            self.counters[i] = self.counters[i].max(next);
        }
        Ok(())
    }

    /// Minimum over the word's counters; 0 means "definitely absent".
    pub fn estimate(&self, word: &str) -> Result<u32> {
        let slots = self.slots(word)?;
        Ok(slots.iter().map(|&i| self.counters[i] as u32).min().unwrap_or(0))
    }

    pub fn counter(&self, index: usize) -> Option<u16> { self.counters.get(index).copied() }

    pub fn counters(&self) -> &[u16] { &self.counters }

    pub fn nonzero(&self) -> usize { self.counters.iter().filter(|&&c| c != 0).count() }

    /// Counters laid end to end, `chunk_size` bits each, highest bit first.
    pub fn to_bits(&self) -> Bits {
        let w = self.chunk_size as usize;
        let mut out = Bits::with_capacity(self.m * w);
        for &c in &self.counters {
            push_uint(&mut out, c as u32, w);
        }
        out
    }

    pub fn encode(&self) -> String { codec::encode(&self.to_bits()) }
}
