//! Storage of packed attribute words.
//!
//! Words are keyed by (token, writer, slot). Reads are open to anyone; writes
//! go through the authorization registry and the codec, and either replace
//! the whole word or change nothing.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::auth::AuthorizationRegistry;
use crate::codec;
use crate::error::WriteError;
use crate::model::{Address, AttributeRecord, Slot, TokenId, Word, ZERO_WORD};
use crate::schema::Schema;

/// Storage key of one packed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub token: TokenId,
    pub writer: Address,
    pub slot: Slot,
}

impl SlotKey {
    pub fn new(token: TokenId, writer: Address, slot: Slot) -> Self {
        Self { token, writer, slot }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AttributeStore {
    words: HashMap<SlotKey, Word>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored word, or zero if the slot was never written.
    pub fn read(&self, token: TokenId, writer: Address, slot: Slot) -> Word {
        self.words
            .get(&SlotKey::new(token, writer, slot))
            .copied()
            .unwrap_or(ZERO_WORD)
    }

    /// Authorizes, encodes and stores a record, replacing any previous word.
    ///
    /// Nothing is stored if either the authorization check or the encoding
    /// fails. Returns the stored word.
    #[allow(clippy::too_many_arguments)]
    pub fn write(
        &mut self,
        registry: &AuthorizationRegistry,
        caller: Address,
        token: TokenId,
        writer: Address,
        slot: Slot,
        schema: &Schema,
        record: &AttributeRecord,
    ) -> Result<Word, WriteError> {
        if let Err(err) = registry.check_authorized(token, writer, caller) {
            warn!(%token, %writer, %caller, error = %err, "attribute write rejected");
            return Err(err.into());
        }

        let word = codec::encode(schema, record)?;
        self.words.insert(SlotKey::new(token, writer, slot), word);
        debug!(%token, %writer, slot, %word, "attributes stored");
        Ok(word)
    }

    /// Slots written by `writer` for `token`, sorted.
    pub fn slots_of(&self, token: TokenId, writer: Address) -> Vec<Slot> {
        let mut slots: Vec<Slot> = self
            .words
            .keys()
            .filter(|k| k.token == token && k.writer == writer)
            .map(|k| k.slot)
            .collect();
        slots.sort_unstable();
        slots
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
