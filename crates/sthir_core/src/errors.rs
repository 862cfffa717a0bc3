use thiserror::Error;

#[derive(Debug, Error)]
pub enum SthirError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Persist: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("Time format: {0}")]
    TimeFormat(#[from] time::error::Format),

    // invalid parameters
    #[error("false positive rate must be in (0, 1], got {0}")]
    FalsePositive(f64),

    #[error("chunk size must be in [1, 10], got {0}")]
    ChunkSize(u8),

    #[error("document has no tokens")]
    EmptyDocument,

    #[error("filter needs m >= 1 and k >= 1, got m={m} k={k}")]
    ZeroSize { m: usize, k: usize },

    // malformed input
    #[error("encoded filter is empty")]
    EmptyEncoding,

    #[error("bad pad symbol {0:?}")]
    BadPad(char),

    #[error("symbol {symbol:?} at position {position} is outside the packed range")]
    BadSymbol { position: usize, symbol: char },

    #[error("pad of {pad} bits but no packed groups")]
    MissingGroups { pad: u32 },

    #[error("padding bits are not zero")]
    DirtyPadding,

    #[error("bit strings may only contain '0' and '1', got {0:?}")]
    BadBitChar(char),

    #[error("bundle {document_id}: expected {expected} bits, encoded has {actual}")]
    BundleMismatch { document_id: String, expected: usize, actual: usize },

    #[error("unsupported index version {0}")]
    UnsupportedVersion(u32),

    // out of range
    #[error("bit range {start}..{end} out of range for {len} bits")]
    OutOfRange { start: usize, end: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, SthirError>;
