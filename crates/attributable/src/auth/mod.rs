//! Two-gate write authorization.
//!
//! A write to a token's attributes needs both:
//! - the caller to be the operator configured by the writer contract's owner, and
//! - the token's current holder to have authorized that writer contract.
//!
//! The registry owns both relations and enforces who may change them.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::config::TransferPolicy;
use crate::error::AuthError;
use crate::model::{Address, TokenId};

/// Source of truth for who currently holds a token.
pub trait HolderOf {
    fn holder_of(&self, token: TokenId) -> Option<Address>;
}

/// Administrative state of one writer contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WriterAdmin {
    owner: Address,
    operator: Option<Address>,
}

#[derive(Debug, Clone, Default)]
pub struct AuthorizationRegistry {
    /// token -> writers its holder has authorized
    consents: HashMap<TokenId, HashSet<Address>>,
    /// writer contract -> owner and operator
    writers: HashMap<Address, WriterAdmin>,
    transfer_policy: TransferPolicy,
}

impl AuthorizationRegistry {
    pub fn new(transfer_policy: TransferPolicy) -> Self {
        Self { transfer_policy, ..Self::default() }
    }

    pub fn transfer_policy(&self) -> TransferPolicy {
        self.transfer_policy
    }

    // -------------------------------------------------------------------------
    // Writer owner -> operator
    // -------------------------------------------------------------------------

    /// Records a writer contract and its administrative owner.
    pub fn register_writer(&mut self, writer: Address, owner: Address) -> Result<(), AuthError> {
        if self.writers.contains_key(&writer) {
            return Err(AuthError::WriterAlreadyRegistered { writer });
        }
        self.writers.insert(writer, WriterAdmin { owner, operator: None });
        info!(%writer, %owner, "writer registered");
        Ok(())
    }

    pub fn writer_owner(&self, writer: &Address) -> Option<Address> {
        self.writers.get(writer).map(|w| w.owner)
    }

    pub fn operator_of(&self, writer: &Address) -> Option<Address> {
        self.writers.get(writer).and_then(|w| w.operator)
    }

    /// Replaces the writer's operator. Only the writer's owner may call this.
    pub fn set_operator(
        &mut self,
        caller: Address,
        writer: Address,
        operator: Address,
    ) -> Result<(), AuthError> {
        let admin = self.owned_writer_mut(caller, writer)?;
        admin.operator = Some(operator);
        debug!(%writer, %operator, "operator set");
        Ok(())
    }

    /// Hands administrative ownership of a writer to another account.
    pub fn transfer_writer_ownership(
        &mut self,
        caller: Address,
        writer: Address,
        new_owner: Address,
    ) -> Result<(), AuthError> {
        let admin = self.owned_writer_mut(caller, writer)?;
        admin.owner = new_owner;
        info!(%writer, %new_owner, "writer ownership transferred");
        Ok(())
    }

    fn owned_writer_mut(&mut self, caller: Address, writer: Address) -> Result<&mut WriterAdmin, AuthError> {
        let admin = self
            .writers
            .get_mut(&writer)
            .ok_or(AuthError::UnknownWriter { writer })?;
        if admin.owner != caller {
            return Err(AuthError::NotWriterOwner { writer, caller });
        }
        Ok(admin)
    }

    // -------------------------------------------------------------------------
    // Token holder -> writer
    // -------------------------------------------------------------------------

    /// Lets `writer` store attributes for `token`. Only the current holder may
    /// call this. Returns false if the writer was already authorized.
    pub fn authorize_writer(
        &mut self,
        holders: &impl HolderOf,
        caller: Address,
        token: TokenId,
        writer: Address,
    ) -> Result<bool, AuthError> {
        ensure_holder(holders, caller, token)?;
        let added = self.consents.entry(token).or_default().insert(writer);
        debug!(%token, %writer, added, "writer authorized");
        Ok(added)
    }

    /// Withdraws a writer's authorization. Returns false if it had none.
    pub fn revoke_writer(
        &mut self,
        holders: &impl HolderOf,
        caller: Address,
        token: TokenId,
        writer: Address,
    ) -> Result<bool, AuthError> {
        ensure_holder(holders, caller, token)?;
        let removed = match self.consents.get_mut(&token) {
            Some(writers) => {
                let removed = writers.remove(&writer);
                if writers.is_empty() {
                    self.consents.remove(&token);
                }
                removed
            }
            None => false,
        };
        debug!(%token, %writer, removed, "writer revoked");
        Ok(removed)
    }

    pub fn is_writer_authorized(&self, token: TokenId, writer: &Address) -> bool {
        self.consents
            .get(&token)
            .is_some_and(|writers| writers.contains(writer))
    }

    /// Authorized writers of a token, sorted.
    pub fn authorized_writers(&self, token: TokenId) -> Vec<Address> {
        let mut writers: Vec<Address> = self
            .consents
            .get(&token)
            .map(|w| w.iter().copied().collect())
            .unwrap_or_default();
        writers.sort();
        writers
    }

    /// Applies the transfer policy after `token` changed hands.
    pub fn on_transfer(&mut self, token: TokenId) {
        match self.transfer_policy {
            TransferPolicy::Revoke => {
                if let Some(writers) = self.consents.remove(&token) {
                    info!(%token, revoked = writers.len(), "writer authorizations revoked on transfer");
                }
            }
            TransferPolicy::Persist => {}
        }
    }

    // -------------------------------------------------------------------------
    // Write gate
    // -------------------------------------------------------------------------

    /// Checks both gates for a write by `caller` through `writer`.
    ///
    /// The operator gate is checked first.
    pub fn check_authorized(&self, token: TokenId, writer: Address, caller: Address) -> Result<(), AuthError> {
        if self.operator_of(&writer) != Some(caller) {
            return Err(AuthError::OperatorNotAuthorized { writer, caller });
        }
        if !self.is_writer_authorized(token, &writer) {
            return Err(AuthError::WriterNotAuthorized { token, writer });
        }
        Ok(())
    }
}

fn ensure_holder(holders: &impl HolderOf, caller: Address, token: TokenId) -> Result<(), AuthError> {
    match holders.holder_of(token) {
        None => Err(AuthError::UnknownToken { token }),
        Some(holder) if holder != caller => Err(AuthError::NotHolder { token, caller }),
        Some(_) => Ok(()),
    }
}
