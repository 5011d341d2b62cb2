//! Fixed widths and limits for packed attribute words.
//!
//! Every schema is checked against these at build time, so the codec never
//! has to re-check them per write.

/// Width of a packed word in bits.
pub const WORD_BITS: u16 = 256;

/// Width of an account address in bits (20 bytes).
pub const ADDRESS_BITS: u16 = 160;

/// Width of a boolean field in bits.
pub const BOOL_BITS: u16 = 1;

/// Width of the schema version tag in bits.
pub const VERSION_BITS: u16 = 8;

/// Name of the version tag field. It always sits at offset 0.
pub const VERSION_FIELD: &str = "version";

/// Maximum length of a field name.
pub const MAX_FIELD_NAME_LEN: usize = 64;

/// Slot used by writers that do not configure one.
pub const DEFAULT_SLOT: u64 = 0;
