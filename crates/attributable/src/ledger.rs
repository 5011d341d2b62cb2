//! Single-threaded host that sequences every operation.
//!
//! Calls run one at a time against `&mut Ledger`. Each operation performs all
//! of its checks before touching state, so a failed call leaves the ledger
//! exactly as it was.

use std::collections::{BTreeMap, HashMap};

use alloy_primitives::U256;
use tracing::info;

use crate::auth::{AuthorizationRegistry, HolderOf};
use crate::capability::{
    AttributeStoreSurface, AttributeWriterSurface, InterfaceId, SupportsInterface, ATTRIBUTE_STORE,
    ATTRIBUTE_WRITER, ERC165,
};
use crate::config::Config;
use crate::error::{AuthError, LedgerError};
use crate::model::{Address, AttributeRecord, Slot, TokenId, Word};
use crate::schema::Schema;
use crate::store::AttributeStore;
use crate::writer::WriterContract;

/// Minimal token holder ledger: sequential minting and holder-only transfer.
#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    holders: BTreeMap<TokenId, Address>,
    last_id: TokenId,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints the next token to `to`. Ids start at 1.
    pub fn mint(&mut self, to: Address) -> TokenId {
        self.last_id += U256::from(1u8);
        self.holders.insert(self.last_id, to);
        self.last_id
    }

    pub fn transfer(&mut self, caller: Address, token: TokenId, to: Address) -> Result<(), AuthError> {
        match self.holders.get_mut(&token) {
            None => Err(AuthError::UnknownToken { token }),
            Some(holder) if *holder != caller => Err(AuthError::NotHolder { token, caller }),
            Some(holder) => {
                *holder = to;
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.holders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holders.is_empty()
    }
}

impl HolderOf for TokenLedger {
    fn holder_of(&self, token: TokenId) -> Option<Address> {
        self.holders.get(&token).copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    config: Config,
    tokens: TokenLedger,
    registry: AuthorizationRegistry,
    store: AttributeStore,
    writers: HashMap<Address, WriterContract>,
}

impl Ledger {
    pub fn new(config: Config) -> Self {
        Self {
            registry: AuthorizationRegistry::new(config.transfer_policy),
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &AuthorizationRegistry {
        &self.registry
    }

    pub fn store(&self) -> &AttributeStore {
        &self.store
    }

    pub fn writer(&self, address: Address) -> Option<&WriterContract> {
        self.writers.get(&address)
    }

    // -------------------------------------------------------------------------
    // Tokens
    // -------------------------------------------------------------------------

    pub fn mint(&mut self, to: Address) -> TokenId {
        let token = self.tokens.mint(to);
        info!(%token, %to, "token minted");
        token
    }

    pub fn holder_of(&self, token: TokenId) -> Option<Address> {
        self.tokens.holder_of(token)
    }

    /// Moves a token and applies the configured transfer policy to its
    /// writer authorizations. Stored words are left in place.
    pub fn transfer(&mut self, caller: Address, token: TokenId, to: Address) -> Result<(), LedgerError> {
        self.tokens.transfer(caller, token, to)?;
        self.registry.on_transfer(token);
        info!(%token, from = %caller, %to, "token transferred");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Writers
    // -------------------------------------------------------------------------

    /// Deploys a writer contract at `address`, owned by `owner`, writing to
    /// the configured default slot.
    pub fn deploy_writer(&mut self, owner: Address, address: Address, schema: Schema) -> Result<(), LedgerError> {
        self.deploy_writer_at_slot(owner, address, schema, self.config.default_slot)
    }

    pub fn deploy_writer_at_slot(
        &mut self,
        owner: Address,
        address: Address,
        schema: Schema,
        slot: Slot,
    ) -> Result<(), LedgerError> {
        self.registry.register_writer(address, owner)?;
        info!(writer = %address, version = schema.version(), slot, "writer deployed");
        self.writers.insert(address, WriterContract::new(address, schema, slot));
        Ok(())
    }

    /// Replaces a writer's schema with a newer version. Owner only.
    ///
    /// Words written under the old version no longer decode through this
    /// writer until they are rewritten.
    pub fn upgrade_writer_schema(
        &mut self,
        caller: Address,
        writer: Address,
        schema: Schema,
    ) -> Result<(), LedgerError> {
        let owner = self
            .registry
            .writer_owner(&writer)
            .ok_or(AuthError::UnknownWriter { writer })?;
        if owner != caller {
            return Err(AuthError::NotWriterOwner { writer, caller }.into());
        }
        let contract = self
            .writers
            .get_mut(&writer)
            .ok_or(AuthError::UnknownWriter { writer })?;
        let active = contract.schema().version();
        if schema.version() <= active {
            return Err(LedgerError::SchemaVersionNotIncreasing { active, proposed: schema.version() });
        }
        contract.replace_schema(schema);
        Ok(())
    }

    pub fn transfer_writer_ownership(
        &mut self,
        caller: Address,
        writer: Address,
        new_owner: Address,
    ) -> Result<(), LedgerError> {
        Ok(self.registry.transfer_writer_ownership(caller, writer, new_owner)?)
    }

    fn writer_contract(&self, writer: Address) -> Result<&WriterContract, LedgerError> {
        self.writers
            .get(&writer)
            .ok_or_else(|| AuthError::UnknownWriter { writer }.into())
    }
}

impl AttributeStoreSurface for Ledger {
    fn authorize_writer(&mut self, caller: Address, token: TokenId, writer: Address) -> Result<bool, LedgerError> {
        Ok(self.registry.authorize_writer(&self.tokens, caller, token, writer)?)
    }

    fn revoke_writer(&mut self, caller: Address, token: TokenId, writer: Address) -> Result<bool, LedgerError> {
        Ok(self.registry.revoke_writer(&self.tokens, caller, token, writer)?)
    }

    fn is_writer_authorized(&self, token: TokenId, writer: Address) -> bool {
        self.registry.is_writer_authorized(token, &writer)
    }

    fn attributes_of(&self, token: TokenId, writer: Address, slot: Slot) -> Word {
        self.store.read(token, writer, slot)
    }
}

impl AttributeWriterSurface for Ledger {
    fn set_operator(&mut self, caller: Address, writer: Address, operator: Address) -> Result<(), LedgerError> {
        Ok(self.registry.set_operator(caller, writer, operator)?)
    }

    fn update_attributes_of(
        &mut self,
        caller: Address,
        writer: Address,
        token: TokenId,
        record: &AttributeRecord,
    ) -> Result<Word, LedgerError> {
        let contract = self
            .writers
            .get(&writer)
            .ok_or(AuthError::UnknownWriter { writer })?;
        Ok(contract.update_attributes_of(&mut self.store, &self.registry, caller, token, record)?)
    }

    fn attributes_record(&self, writer: Address, token: TokenId) -> Result<AttributeRecord, LedgerError> {
        Ok(self.writer_contract(writer)?.attributes_record(&self.store, token)?)
    }

    fn attributes_string(&self, writer: Address, token: TokenId) -> Result<String, LedgerError> {
        Ok(self.writer_contract(writer)?.attributes_of(&self.store, token)?)
    }
}

impl SupportsInterface for Ledger {
    fn supports_interface(&self, id: InterfaceId) -> bool {
        id == *ERC165 || id == *ATTRIBUTE_STORE || id == *ATTRIBUTE_WRITER
    }
}
