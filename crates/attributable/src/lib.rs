//! Typed attributes packed into 256-bit words, with two-gate write authorization.
//!
//! Arbitrary structured metadata (versions, counters, addresses, flags) is
//! attached to tokens without per-attribute storage: every field of a record
//! is packed into one word per (token, writer, slot).
//!
//! # Quick Start
//!
//! ```rust
//! use attributable::{
//!     AttributeRecord, AttributeStoreSurface, AttributeWriterSurface, Address, FieldKind, Ledger,
//!     Schema,
//! };
//!
//! let schema = Schema::builder(1)
//!     .field("level", FieldKind::UInt(8))
//!     .field("stamina", FieldKind::UInt(32))
//!     .field("winner", FieldKind::Address)
//!     .build()
//!     .unwrap();
//!
//! let (owner, holder, writer) = (Address::repeat_byte(1), Address::repeat_byte(2), Address::repeat_byte(3));
//!
//! let mut ledger = Ledger::default();
//! let token = ledger.mint(holder);
//! ledger.deploy_writer(owner, writer, schema).unwrap();
//! ledger.set_operator(owner, writer, owner).unwrap();
//! ledger.authorize_writer(holder, token, writer).unwrap();
//!
//! let record = AttributeRecord::new().with("level", 2u64).with("stamina", 123432u64);
//! ledger.update_attributes_of(owner, writer, token, &record).unwrap();
//!
//! let text = ledger.attributes_string(writer, token).unwrap();
//! assert!(text.starts_with("uint8 version:1;uint8 level:2;uint32 stamina:123432"));
//! ```
//!
//! # Modules
//!
//! - [`schema`]: field layouts and their offsets
//! - [`codec`]: record <-> word packing
//! - [`validate`]: optional strict range checks before packing
//! - [`auth`]: holder -> writer and owner -> operator authorization
//! - [`store`]: (token, writer, slot) -> word storage
//! - [`writer`]: writer contracts binding a schema to a slot
//! - [`capability`]: interface ids and surface traits
//! - [`ledger`]: single-threaded host tying it all together
//!
//! # Truncation
//!
//! Values wider than their field are masked to the field width when packed.
//! Run [`validate_record`] first to reject them instead.

pub mod auth;
pub mod capability;
pub mod codec;
pub mod config;
pub mod error;
pub mod ledger;
pub mod limits;
pub mod model;
pub mod schema;
pub mod store;
pub mod validate;
pub mod writer;

pub use alloy_primitives::U256;

pub use auth::{AuthorizationRegistry, HolderOf};
pub use capability::{
    interface_id, selector, AttributeStoreSurface, AttributeWriterSurface, InterfaceId, SupportsInterface,
};
pub use codec::{decode, decode_to_string, encode};
pub use config::{Config, TransferPolicy};
pub use error::{AuthError, DecodeError, EncodeError, LedgerError, SchemaError, ValidationError, WriteError};
pub use ledger::{Ledger, TokenLedger};
pub use model::{
    format_address, parse_address, Address, AttributeRecord, FieldKind, FieldValue, Slot, TokenId, Word,
    ZERO_WORD,
};
pub use schema::{FieldDescriptor, Schema, SchemaBuilder, SchemaDef};
pub use store::{AttributeStore, SlotKey};
pub use validate::validate_record;
pub use writer::WriterContract;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
