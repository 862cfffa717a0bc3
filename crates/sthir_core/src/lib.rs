pub mod consts;
pub mod errors;
pub mod bits;
pub mod codec;
pub mod hash;
pub mod sizing;
pub mod tokens;
pub mod filter;
pub mod bundle;
pub mod query;
pub mod config;
pub mod accuracy;
pub mod index;

pub use accuracy::AccuracyReport;
pub use bits::{bits_to_string, parse_bits, Bits};
pub use bundle::FilterBundle;
pub use config::BuildConfig;
pub use errors::{Result, SthirError};
pub use filter::SpectralBloom;
pub use hash::{hash_index, hash_indices};
pub use index::{SearchIndex, SourceDocument};
pub use query::{document_score, estimate_frequency, parse_query, rank, running_scores, Hit};
pub use sizing::optimal_m_k;
pub use tokens::TokenCounts;
