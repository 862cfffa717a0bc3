//! Measures how a built filter behaves against a dictionary of probe words.

use serde::Serialize;

use crate::errors::Result;
use crate::filter::SpectralBloom;
use crate::sizing::expected_false_positive;
use crate::tokens::TokenCounts;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccuracyReport {
    /// Probe words that were inserted.
    pub seen: usize,
    /// Inserted words whose estimate is not the true count.
    pub count_mismatches: usize,
    /// Probe words that were never inserted.
    pub unseen: usize,
    /// Unseen words with a nonzero estimate.
    pub false_positives: usize,
    /// `(1 - e^{-kn/m})^k` for the filter's shape.
    pub expected_false_positive: f64,
}

impl AccuracyReport {
    pub fn evaluate<'a, I>(filter: &SpectralBloom, truth: &TokenCounts, dictionary: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let max = filter.saturation() as u32;
        let mut r = AccuracyReport {
            expected_false_positive: expected_false_positive(filter.m, filter.k, truth.distinct()),
            ..Default::default()
        };
        for word in dictionary {
            let est = filter.estimate(word)?;
            let actual = truth.get(word);
            if actual == 0 {
                r.unseen += 1;
                if est != 0 {
                    r.false_positives += 1;
                }
            } else {
                r.seen += 1;
                // a saturated counter is right for any count at or past saturation
                let saturated_ok = est == max && actual >= max;
                if est != actual && !saturated_ok {
                    r.count_mismatches += 1;
                }
            }
        }
        tracing::info!(
            seen = r.seen,
            mismatches = r.count_mismatches,
            unseen = r.unseen,
            false_positives = r.false_positives,
            "accuracy evaluated"
        );
        Ok(r)
    }

    pub fn fp_rate(&self) -> f64 { ratio(self.false_positives, self.unseen) }

    pub fn count_error_rate(&self) -> f64 { ratio(self.count_mismatches, self.seen) }

    pub fn total_error(&self) -> f64 {
        ratio(self.false_positives + self.count_mismatches, self.seen + self.unseen)
    }
}

fn ratio(a: usize, b: usize) -> f64 {
    if b == 0 { 0.0 } else { a as f64 / b as f64 }
}
