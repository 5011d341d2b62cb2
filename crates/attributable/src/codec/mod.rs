//! Packing and unpacking of attribute records.
//!
//! Records are packed into a single 256-bit word, least significant field
//! first. Values wider than their field are truncated, not rejected.

pub mod primitives;
pub mod word;

pub use primitives::{WordReader, WordWriter};
pub use word::{decode, decode_to_string, encode};
