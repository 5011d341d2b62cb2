//! Error types for schema construction, encoding, decoding and authorization.

use thiserror::Error;

use crate::model::{Address, FieldKind, TokenId};

/// Errors raised while building a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema overflow: field '{field}' ends at bit {end}, word has {max} bits")]
    SchemaOverflow { field: String, end: u32, max: u16 },

    #[error("schema version must be non-zero")]
    ZeroVersion,

    #[error("duplicate field '{name}'")]
    DuplicateField { name: String },

    #[error("invalid field name '{name}'")]
    InvalidFieldName { name: String },

    #[error("invalid width {width} for field '{name}'")]
    InvalidWidth { name: String, width: u16 },

    #[error("field '{name}' at offset {offset} overlaps previous field ending at bit {previous_end}")]
    OverlappingField { name: String, offset: u16, previous_end: u16 },

    #[error("unknown field type '{ty}'")]
    UnknownType { ty: String },

    #[error("invalid schema definition: {0}")]
    Json(String),
}

/// Errors raised while packing a record into a word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("record has field '{name}' which is not in the schema")]
    UnknownField { name: String },

    #[error("field '{field}' expects {expected}")]
    TypeMismatch { field: String, expected: FieldKind },

    #[error("record carries version {found}, schema version is {expected}")]
    VersionMismatch { expected: u8, found: String },
}

/// Errors raised while unpacking a word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("word has schema version {found}, expected {expected}")]
    VersionMismatch { expected: u8, found: u8 },

    #[error("word has bits set outside the declared fields")]
    UnusedBitsSet,
}

/// Errors raised by strict record validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("value of field '{field}' does not fit in {width} bits")]
    ValueOutOfRange { field: String, width: u16 },

    #[error("field '{field}' expects {expected} bytes, got {actual}")]
    BytesLength { field: String, expected: usize, actual: usize },

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Errors raised by the authorization registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("caller {caller} is not the operator of writer {writer}")]
    OperatorNotAuthorized { writer: Address, caller: Address },

    #[error("writer {writer} is not authorized for token {token}")]
    WriterNotAuthorized { token: TokenId, writer: Address },

    #[error("caller {caller} does not hold token {token}")]
    NotHolder { token: TokenId, caller: Address },

    #[error("caller {caller} does not own writer {writer}")]
    NotWriterOwner { writer: Address, caller: Address },

    #[error("writer {writer} is not registered")]
    UnknownWriter { writer: Address },

    #[error("token {token} has no holder")]
    UnknownToken { token: TokenId },

    #[error("writer {writer} is already registered")]
    WriterAlreadyRegistered { writer: Address },
}

/// Errors raised by the store's write path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Errors surfaced by the ledger host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("schema version {proposed} does not supersede active version {active}")]
    SchemaVersionNotIncreasing { active: u8, proposed: u8 },
}

impl From<WriteError> for LedgerError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Auth(e) => LedgerError::Auth(e),
            WriteError::Encode(e) => LedgerError::Encode(e),
        }
    }
}
