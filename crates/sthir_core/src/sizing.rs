use std::f64::consts::LN_2;

use crate::consts::{MAX_CHUNK_SIZE, MIN_CHUNK_SIZE};
use crate::errors::{Result, SthirError};

pub fn validate_false_positive(p: f64) -> Result<()> {
    // NaN fails both comparisons
    if p > 0.0 && p <= 1.0 { Ok(()) } else { Err(SthirError::FalsePositive(p)) }
}

pub fn validate_chunk_size(chunk_size: u8) -> Result<()> {
    if (MIN_CHUNK_SIZE..=MAX_CHUNK_SIZE).contains(&chunk_size) {
        Ok(())
    } else {
        Err(SthirError::ChunkSize(chunk_size))
    }
}

/// Counter count `m` and hash count `k` for `n` distinct words at false positive rate `p`.
///
/// `m = ceil(-n ln p / ln²2)`, `k = round(m/n · ln 2)` with the unrounded `m`
/// and ties to even. Both are clamped to at least 1.
pub fn optimal_m_k(n: usize, p: f64) -> Result<(usize, usize)> {
    validate_false_positive(p)?;
    if n == 0 {
        return Err(SthirError::EmptyDocument);
    }
    let n = n as f64;
    let m = -n * p.ln() / (LN_2 * LN_2);
    let k = (m / n * LN_2).round_ties_even();
    Ok(((m.ceil() as usize).max(1), (k as usize).max(1)))
}

/// Textbook Bloom false positive estimate `(1 - e^{-kn/m})^k`.
pub fn expected_false_positive(m: usize, k: usize, n: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exp = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exp.exp()).powi(k as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_point() {
        assert_eq!(optimal_m_k(100, 0.1).unwrap(), (480, 3));
    }

    #[test]
    fn empty_document_is_rejected() {
        assert!(matches!(optimal_m_k(0, 0.1), Err(SthirError::EmptyDocument)));
    }

    #[test]
    fn bad_probability_is_rejected() {
        for p in [0.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(optimal_m_k(10, p), Err(SthirError::FalsePositive(_))));
        }
    }

    #[test]
    fn k_uses_unrounded_m() {
        // m = ceil(2.09) = 3; k from 2.09 is 1, from 3 it would be 2
        assert_eq!(optimal_m_k(1, 0.366).unwrap(), (3, 1));
    }

    #[test]
    fn clamps_to_one() {
        assert_eq!(optimal_m_k(5, 1.0).unwrap(), (1, 1));
    }

    #[test]
    fn smaller_p_never_shrinks_m() {
        for n in [1usize, 17, 100, 2500] {
            let mut last = 0;
            for p in [1.0, 0.5, 0.2, 0.1, 0.05, 0.01, 0.001, 1e-6] {
                let (m, _) = optimal_m_k(n, p).unwrap();
                assert!(m >= last, "n={n} p={p}");
                last = m;
            }
        }
    }

    #[test]
    fn chunk_size_bounds() {
        assert!(validate_chunk_size(1).is_ok());
        assert!(validate_chunk_size(10).is_ok());
        assert!(matches!(validate_chunk_size(0), Err(SthirError::ChunkSize(0))));
        assert!(matches!(validate_chunk_size(11), Err(SthirError::ChunkSize(11))));
    }

    #[test]
    fn expected_rate_tracks_target() {
        let (m, k) = optimal_m_k(1000, 0.1).unwrap();
        let fp = expected_false_positive(m, k, 1000);
        assert!((fp - 0.1).abs() < 0.03, "fp={fp}");
    }
}
