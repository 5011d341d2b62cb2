//! Runtime configuration for the ledger host.

use serde::{Deserialize, Serialize};

use crate::limits::DEFAULT_SLOT;
use crate::model::Slot;

/// What happens to a token's writer authorizations when the token changes hands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferPolicy {
    /// The new holder starts with no authorized writers.
    #[default]
    Revoke,
    /// Authorizations granted by the previous holder stay in place.
    Persist,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transfer_policy: TransferPolicy,
    /// Slot assigned to newly deployed writers.
    pub default_slot: Slot,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transfer_policy: TransferPolicy::default(),
            default_slot: DEFAULT_SLOT,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
