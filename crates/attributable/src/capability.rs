//! Capability detection.
//!
//! Each public surface is identified by a 4-byte interface id: the XOR of the
//! keccak-256 selectors of its method signatures (the ERC-165 convention).
//! Rust callers depend on the surface traits directly; the ids are kept for
//! callers that can only probe at runtime.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{hex, keccak256};

use crate::error::LedgerError;
use crate::model::{Address, AttributeRecord, Slot, TokenId, Word};

/// A 4-byte interface identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterfaceId(pub [u8; 4]);

impl fmt::Display for InterfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for InterfaceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| e.to_string())?;
        let id: [u8; 4] = bytes
            .try_into()
            .map_err(|_| format!("interface id must be 4 bytes: {s}"))?;
        Ok(InterfaceId(id))
    }
}

/// Returns the first 4 bytes of `keccak256(signature)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&hash[..4]);
    out
}

/// XORs the selectors of all signatures together.
pub fn interface_id(signatures: &[&str]) -> InterfaceId {
    let id = signatures.iter().fold([0u8; 4], |mut acc, sig| {
        for (a, b) in acc.iter_mut().zip(selector(sig)) {
            *a ^= b;
        }
        acc
    });
    InterfaceId(id)
}

/// Signatures of the runtime probe itself.
pub const ERC165_SIGNATURES: &[&str] = &["supportsInterface(bytes4)"];

/// Signatures of the holder-facing store surface.
pub const STORE_SIGNATURES: &[&str] = &[
    "authorizeWriter(uint256,address)",
    "revokeWriter(uint256,address)",
    "isWriterAuthorized(uint256,address)",
    "attributesOf(uint256,address,uint256)",
];

/// Signatures of the operator-facing writer surface.
pub const WRITER_SIGNATURES: &[&str] = &[
    "setOperator(address)",
    "updateAttributesOf(address,uint256,bytes)",
    "attributesOf(address,uint256)",
];

lazy_static::lazy_static! {
    /// `0x01ffc9a7`
    pub static ref ERC165: InterfaceId = interface_id(ERC165_SIGNATURES);

    pub static ref ATTRIBUTE_STORE: InterfaceId = interface_id(STORE_SIGNATURES);

    pub static ref ATTRIBUTE_WRITER: InterfaceId = interface_id(WRITER_SIGNATURES);
}

/// Runtime interface probing.
pub trait SupportsInterface {
    fn supports_interface(&self, id: InterfaceId) -> bool;
}

/// Holder-facing surface: consent management and raw reads.
pub trait AttributeStoreSurface {
    /// Lets `writer` store attributes for `token`; caller must hold the token.
    fn authorize_writer(&mut self, caller: Address, token: TokenId, writer: Address) -> Result<bool, LedgerError>;

    fn revoke_writer(&mut self, caller: Address, token: TokenId, writer: Address) -> Result<bool, LedgerError>;

    fn is_writer_authorized(&self, token: TokenId, writer: Address) -> bool;

    /// Raw packed word; zero if never written.
    fn attributes_of(&self, token: TokenId, writer: Address, slot: Slot) -> Word;
}

/// Operator-facing surface: operator configuration, writes and decoded reads.
pub trait AttributeWriterSurface {
    /// Replaces the writer's operator; caller must own the writer.
    fn set_operator(&mut self, caller: Address, writer: Address, operator: Address) -> Result<(), LedgerError>;

    fn update_attributes_of(
        &mut self,
        caller: Address,
        writer: Address,
        token: TokenId,
        record: &AttributeRecord,
    ) -> Result<Word, LedgerError>;

    fn attributes_record(&self, writer: Address, token: TokenId) -> Result<AttributeRecord, LedgerError>;

    fn attributes_string(&self, writer: Address, token: TokenId) -> Result<String, LedgerError>;
}
