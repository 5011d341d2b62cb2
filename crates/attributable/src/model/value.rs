//! Field kinds and typed values.
//!
//! A field kind fixes both the width a value occupies in the packed word and
//! how raw bits are turned back into a typed value.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use alloy_primitives::{hex, U256};

use crate::limits::{ADDRESS_BITS, BOOL_BITS, WORD_BITS};
use crate::model::id::{address_from_word, address_to_word, format_address, Address};

/// The declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Single bit.
    Bool,
    /// Unsigned integer of the given bit width (1..=256).
    UInt(u16),
    /// 20-byte account address (160 bits).
    Address,
    /// Fixed-length byte string; the width is in bits and a multiple of 8.
    Bytes(u16),
}

impl FieldKind {
    /// Returns the number of bits the field occupies.
    pub fn width(self) -> u16 {
        match self {
            FieldKind::Bool => BOOL_BITS,
            FieldKind::UInt(w) | FieldKind::Bytes(w) => w,
            FieldKind::Address => ADDRESS_BITS,
        }
    }

    /// Returns true if the declared width is representable.
    pub fn is_valid_width(self) -> bool {
        match self {
            FieldKind::Bool | FieldKind::Address => true,
            FieldKind::UInt(w) => (1..=WORD_BITS).contains(&w),
            FieldKind::Bytes(w) => (8..=WORD_BITS).contains(&w) && w % 8 == 0,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Bool => f.write_str("bool"),
            FieldKind::UInt(w) => write!(f, "uint{w}"),
            FieldKind::Address => f.write_str("address"),
            FieldKind::Bytes(w) => write!(f, "bytes{}", w / 8),
        }
    }
}

impl FromStr for FieldKind {
    type Err = String;

    /// Parses a type name: `bool`, `address`, `uint`, `uint<bits>`, `bytes<len>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" => return Ok(FieldKind::Bool),
            "address" => return Ok(FieldKind::Address),
            "uint" => return Ok(FieldKind::UInt(WORD_BITS)),
            _ => {}
        }
        if let Some(bits) = s.strip_prefix("uint") {
            let bits: u16 = bits.parse().map_err(|_| s.to_string())?;
            return Ok(FieldKind::UInt(bits));
        }
        if let Some(len) = s.strip_prefix("bytes") {
            let len: u16 = len.parse().map_err(|_| s.to_string())?;
            let bits = len.checked_mul(8).ok_or_else(|| s.to_string())?;
            return Ok(FieldKind::Bytes(bits));
        }
        Err(s.to_string())
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    Bool(bool),
    UInt(U256),
    Address(Address),
    /// Big-endian bytes. Shorter inputs are left-padded with zeros on decode.
    Bytes(Vec<u8>),
}

impl FieldValue {
    /// Convenience constructor for small integers.
    pub fn uint(v: u64) -> Self {
        FieldValue::UInt(U256::from(v))
    }

    /// Returns the zero value for a field kind.
    pub fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Bool => FieldValue::Bool(false),
            FieldKind::UInt(_) => FieldValue::UInt(U256::ZERO),
            FieldKind::Address => FieldValue::Address(Address::ZERO),
            FieldKind::Bytes(w) => FieldValue::Bytes(vec![0u8; (w / 8) as usize]),
        }
    }

    /// Returns true if this value can be stored in a field of `kind`.
    pub fn matches(&self, kind: FieldKind) -> bool {
        matches!(
            (self, kind),
            (FieldValue::Bool(_), FieldKind::Bool)
                | (FieldValue::UInt(_), FieldKind::UInt(_))
                | (FieldValue::Address(_), FieldKind::Address)
                | (FieldValue::Bytes(_), FieldKind::Bytes(_))
        )
    }

    /// Returns the value as an unmasked integer.
    ///
    /// Byte strings longer than a word keep their trailing 32 bytes, which is
    /// what masking would keep anyway.
    pub fn to_raw(&self) -> U256 {
        match self {
            FieldValue::Bool(b) => U256::from(*b as u8),
            FieldValue::UInt(v) => *v,
            FieldValue::Address(a) => address_to_word(a),
            FieldValue::Bytes(bytes) => {
                let tail = &bytes[bytes.len().saturating_sub(32)..];
                U256::from_be_slice(tail)
            }
        }
    }

    /// Rebuilds a typed value from raw bits already masked to the field width.
    pub fn from_raw(kind: FieldKind, raw: U256) -> Self {
        match kind {
            FieldKind::Bool => FieldValue::Bool(!raw.is_zero()),
            FieldKind::UInt(_) => FieldValue::UInt(raw),
            FieldKind::Address => FieldValue::Address(address_from_word(raw)),
            FieldKind::Bytes(w) => {
                let len = (w / 8) as usize;
                let bytes = raw.to_be_bytes::<32>();
                FieldValue::Bytes(bytes[32 - len..].to_vec())
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::UInt(v) => write!(f, "{v}"),
            FieldValue::Address(a) => f.write_str(&format_address(a)),
            FieldValue::Bytes(bytes) => write!(f, "0x{}", hex::encode(bytes)),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::uint(v)
    }
}

impl From<U256> for FieldValue {
    fn from(v: U256) -> Self {
        FieldValue::UInt(v)
    }
}

impl From<Address> for FieldValue {
    fn from(v: Address) -> Self {
        FieldValue::Address(v)
    }
}

/// The decoded form of a packed word: field name to typed value.
///
/// Only used at the API boundary; words are what get stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRecord {
    values: BTreeMap<String, FieldValue>,
}

impl AttributeRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets a field, returning the previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for AttributeRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = AttributeRecord::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}
