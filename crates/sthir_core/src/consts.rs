// crates/sthir_core/src/consts.rs

/// Bits carried by one printable symbol of the packed form.
pub const GROUP_BITS: usize = 15;

/// Added to every 15-bit group so the symbol lands past Latin-1 controls and whitespace.
pub const SYMBOL_OFFSET: u32 = 0xA1;

/// Largest value a single group can hold.
pub const GROUP_MAX: u32 = (1 << GROUP_BITS) - 1;

pub const MIN_CHUNK_SIZE: u8 = 1;
pub const MAX_CHUNK_SIZE: u8 = 10;

pub const DEFAULT_CHUNK_SIZE: u8 = 4;
pub const DEFAULT_FALSE_POSITIVE: f64 = 0.01;

/// Index file format version (see `index::SearchIndex`).
pub const INDEX_VERSION: u32 = 1;

// highest symbol must stay below the UTF-16 surrogate block
const _: () = { assert!(SYMBOL_OFFSET + GROUP_MAX < 0xD800); };
