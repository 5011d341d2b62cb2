//! Identifier types shared across the crate.
//!
//! Tokens and packed words are 256-bit unsigned integers; accounts and writer
//! contracts are 20-byte addresses.

use alloy_primitives::hex;
pub use alloy_primitives::{Address, U256};

/// Identifier of the token attributes attach to.
pub type TokenId = U256;

/// A packed attribute word.
pub type Word = U256;

/// Index separating independent words for the same (token, writer) pair.
pub type Slot = u64;

/// The word of a slot that was never written.
pub const ZERO_WORD: Word = U256::ZERO;

/// Reinterprets the low 160 bits of a word as an address.
pub fn address_from_word(word: Word) -> Address {
    let bytes = word.to_be_bytes::<32>();
    Address::from_slice(&bytes[12..])
}

/// Widens an address into the low 160 bits of a word.
pub fn address_to_word(address: &Address) -> Word {
    U256::from_be_slice(address.as_slice())
}

/// Formats an address as lowercase `0x`-prefixed hex.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Parses an address from hex, with or without the `0x` prefix.
///
/// Checksums are not enforced.
pub fn parse_address(s: &str) -> Option<Address> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.len() != 40 {
        return None;
    }
    let bytes = hex::decode(digits).ok()?;
    Some(Address::from_slice(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINNER: &str = "0x426eb88af949cd5bd8a272031badc2f80330e766";

    #[test]
    fn test_format_parse_roundtrip() {
        let addr = parse_address(WINNER).unwrap();
        assert_eq!(format_address(&addr), WINNER);
    }

    #[test]
    fn test_parse_without_prefix() {
        let a = parse_address(WINNER).unwrap();
        let b = parse_address(&WINNER[2..]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_rejects_bad_length() {
        assert!(parse_address("0x1234").is_none());
        assert!(parse_address("").is_none());
    }

    #[test]
    fn test_address_word_roundtrip() {
        let addr = parse_address(WINNER).unwrap();
        let word = address_to_word(&addr);
        assert!(word < (U256::from(1u8) << 160usize));
        assert_eq!(address_from_word(word), addr);
    }

    #[test]
    fn test_address_from_word_ignores_high_bits() {
        let addr = parse_address(WINNER).unwrap();
        let word = address_to_word(&addr) | (U256::from(0xffu8) << 200usize);
        assert_eq!(address_from_word(word), addr);
    }
}
