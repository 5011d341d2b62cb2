//! Writer contracts.
//!
//! A writer owns one active schema and one slot. Operators write through it;
//! anyone can read its words back as typed records or as text.

use tracing::info;

use crate::auth::AuthorizationRegistry;
use crate::codec;
use crate::error::{DecodeError, WriteError};
use crate::model::{Address, AttributeRecord, Slot, TokenId, Word};
use crate::schema::Schema;
use crate::store::AttributeStore;

#[derive(Debug, Clone)]
pub struct WriterContract {
    address: Address,
    schema: Schema,
    slot: Slot,
}

impl WriterContract {
    pub fn new(address: Address, schema: Schema, slot: Slot) -> Self {
        Self { address, schema, slot }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Swaps the active schema. Version ordering is checked by the caller.
    pub fn replace_schema(&mut self, schema: Schema) {
        info!(
            writer = %self.address,
            from = self.schema.version(),
            to = schema.version(),
            "writer schema replaced"
        );
        self.schema = schema;
    }

    /// Packs `record` with this writer's schema and stores it in its slot.
    pub fn update_attributes_of(
        &self,
        store: &mut AttributeStore,
        registry: &AuthorizationRegistry,
        caller: Address,
        token: TokenId,
        record: &AttributeRecord,
    ) -> Result<Word, WriteError> {
        store.write(registry, caller, token, self.address, self.slot, &self.schema, record)
    }

    /// Reads this writer's word for `token`.
    pub fn word_of(&self, store: &AttributeStore, token: TokenId) -> Word {
        store.read(token, self.address, self.slot)
    }

    pub fn attributes_record(&self, store: &AttributeStore, token: TokenId) -> Result<AttributeRecord, DecodeError> {
        codec::decode(&self.schema, self.word_of(store, token))
    }

    /// Reads this writer's word for `token` in `"<type> <name>:<value>;..."` form.
    pub fn attributes_of(&self, store: &AttributeStore, token: TokenId) -> Result<String, DecodeError> {
        codec::decode_to_string(&self.schema, self.word_of(store, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::HolderOf;
    use crate::config::TransferPolicy;
    use crate::error::AuthError;
    use crate::model::{FieldKind, FieldValue};
    use alloy_primitives::U256;

    const OWNER: u8 = 1;
    const HOLDER: u8 = 2;
    const OPERATOR: u8 = 3;
    const WRITER: u8 = 4;

    struct SingleHolder;

    impl HolderOf for SingleHolder {
        fn holder_of(&self, _token: TokenId) -> Option<Address> {
            Some(addr(HOLDER))
        }
    }

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    fn schema(version: u8) -> Schema {
        Schema::builder(version)
            .field("level", FieldKind::UInt(8))
            .field("alive", FieldKind::Bool)
            .build()
            .unwrap()
    }

    fn open_registry(token: TokenId) -> AuthorizationRegistry {
        let mut registry = AuthorizationRegistry::new(TransferPolicy::Revoke);
        registry.register_writer(addr(WRITER), addr(OWNER)).unwrap();
        registry.set_operator(addr(OWNER), addr(WRITER), addr(OPERATOR)).unwrap();
        registry
            .authorize_writer(&SingleHolder, addr(HOLDER), token, addr(WRITER))
            .unwrap();
        registry
    }

    #[test]
    fn test_update_and_read_back() {
        let token = U256::from(1u8);
        let registry = open_registry(token);
        let mut store = AttributeStore::new();
        let writer = WriterContract::new(addr(WRITER), schema(1), 3);

        let record = AttributeRecord::new().with("level", 9u64).with("alive", true);
        let word = writer
            .update_attributes_of(&mut store, &registry, addr(OPERATOR), token, &record)
            .unwrap();

        assert_eq!(store.read(token, addr(WRITER), 3), word);
        assert_eq!(writer.word_of(&store, token), word);
        assert_eq!(store.slots_of(token, addr(WRITER)), vec![3]);
        assert_eq!(
            writer.attributes_of(&store, token).unwrap(),
            "uint8 version:1;uint8 level:9;bool alive:true"
        );
        assert_eq!(
            writer.attributes_record(&store, token).unwrap().get("level"),
            Some(&FieldValue::uint(9))
        );
    }

    #[test]
    fn test_update_rejected_without_operator() {
        let token = U256::from(1u8);
        let registry = open_registry(token);
        let mut store = AttributeStore::new();
        let writer = WriterContract::new(addr(WRITER), schema(1), 0);

        let record = AttributeRecord::new().with("level", 9u64);
        let result = writer.update_attributes_of(&mut store, &registry, addr(HOLDER), token, &record);
        assert!(matches!(result, Err(WriteError::Auth(AuthError::OperatorNotAuthorized { .. }))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_replace_schema() {
        let token = U256::from(1u8);
        let registry = open_registry(token);
        let mut store = AttributeStore::new();
        let mut writer = WriterContract::new(addr(WRITER), schema(1), 0);

        writer
            .update_attributes_of(&mut store, &registry, addr(OPERATOR), token, &AttributeRecord::new())
            .unwrap();
        writer.replace_schema(schema(2));
        assert_eq!(writer.schema().version(), 2);

        // Words written under the old version no longer decode
        assert!(matches!(
            writer.attributes_record(&store, token),
            Err(DecodeError::VersionMismatch { expected: 2, found: 1 })
        ));

        writer
            .update_attributes_of(&mut store, &registry, addr(OPERATOR), token, &AttributeRecord::new())
            .unwrap();
        assert_eq!(
            writer.attributes_of(&store, token).unwrap(),
            "uint8 version:2;uint8 level:0;bool alive:false"
        );
    }
}
