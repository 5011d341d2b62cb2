//! Data model types for packed attributes.
//!
//! - Identifiers (tokens, accounts, slots, words)
//! - Field kinds and typed values
//! - Attribute records (the decoded, logical form of a word)

pub mod id;
pub mod value;

pub use id::{
    address_from_word, address_to_word, format_address, parse_address, Address, Slot, TokenId,
    Word, ZERO_WORD,
};
pub use value::{AttributeRecord, FieldKind, FieldValue};
