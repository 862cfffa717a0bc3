//! The per-document unit that gets embedded in a search artifact.
//!
//! On the wire a bundle is a 7-element array:
//!   [encoded, chunk_size, m, k, document_id, title, token_count]

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::config::BuildConfig;
use crate::errors::{Result, SthirError};
use crate::filter::SpectralBloom;
use crate::sizing::{optimal_m_k, validate_chunk_size};
use crate::tokens::TokenCounts;

type Row = (String, u8, usize, usize, String, String, u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Row", into = "Row")]
pub struct FilterBundle {
    pub encoded: String,
    pub chunk_size: u8,
    pub m: usize,
    pub k: usize,
    pub document_id: String,
    pub title: String,
    pub token_count: u64,
}

impl From<Row> for FilterBundle {
    fn from((encoded, chunk_size, m, k, document_id, title, token_count): Row) -> Self {
        Self { encoded, chunk_size, m, k, document_id, title, token_count }
    }
}

impl From<FilterBundle> for Row {
    fn from(b: FilterBundle) -> Self {
        (b.encoded, b.chunk_size, b.m, b.k, b.document_id, b.title, b.token_count)
    }
}

impl FilterBundle {
    /// Sizes, builds and encodes the filter for one document.
    pub fn build(
        document_id: impl Into<String>,
        title: impl Into<String>,
        counts: &TokenCounts,
        cfg: &BuildConfig,
    ) -> Result<Self> {
        cfg.validate()?;
        let (m, k) = optimal_m_k(counts.distinct(), cfg.false_positive)?;
        let filter = SpectralBloom::build(counts, m, k, cfg.chunk_size)?;
        Ok(Self::from_filter(&filter, document_id, title, counts.total()))
    }

    pub fn from_filter(
        filter: &SpectralBloom,
        document_id: impl Into<String>,
        title: impl Into<String>,
        token_count: u64,
    ) -> Self {
        Self {
            encoded: filter.encode(),
            chunk_size: filter.chunk_size,
            m: filter.m,
            k: filter.k,
            document_id: document_id.into(),
            title: title.into(),
            token_count,
        }
    }

    /// Structural check: shape parameters are sane and the payload has exactly m·chunk_size bits.
    pub fn validate(&self) -> Result<()> {
        validate_chunk_size(self.chunk_size)?;
        if self.m == 0 || self.k == 0 {
            return Err(SthirError::ZeroSize { m: self.m, k: self.k });
        }
        let actual = codec::bit_length(&self.encoded)?;
        let expected = self.m.checked_mul(self.chunk_size as usize).unwrap_or(usize::MAX);
        if actual != expected {
            return Err(SthirError::BundleMismatch {
                document_id: self.document_id.clone(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Full decode back into counters; used by verification and diagnostics.
    pub fn decode_counters(&self) -> Result<Vec<u32>> {
        self.validate()?;
        let bits = codec::decode(&self.encoded)?;
        Ok(bits
            .chunks(self.chunk_size as usize)
            .map(crate::bits::bits_to_uint)
            .collect())
    }
}
