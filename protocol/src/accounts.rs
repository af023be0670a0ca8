//! # Wallet Account Registry
//!
//! Every familiar owns exactly one wallet account, and nobody stores the
//! mapping — it is *derived*. The registry computes a familiar's account
//! address from public inputs:
//!
//! ```text
//! BLAKE3( domain_tag ‖ len(collection) ‖ collection ‖ creature_id ‖ chain_id ‖ salt )
//! ```
//!
//! Anyone can recompute it, nothing references it by foreign key, and
//! re-deriving always yields the same answer. `create_if_absent` is the
//! only stateful part: it records that the account has been materialized,
//! and calling it twice is a no-op by contract.
//!
//! The registry is an external collaborator of the orchestrator, so it is
//! expressed as a trait with [`DeterministicRegistry`] as the reference
//! implementation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::identity::WardId;

/// The external account registry interface consumed by the orchestrator.
///
/// Implementations must guarantee two properties:
///
/// 1. **Determinism** — `account_for` is a pure function of its inputs.
/// 2. **Idempotency** — `create_if_absent` may be called any number of
///    times for the same inputs and always returns the same account.
pub trait AccountRegistry {
    /// Derive the wallet account for a creature. Pure; callable by anyone.
    fn account_for(
        &self,
        collection: &str,
        creature_id: u64,
        chain_id: u32,
        salt: &[u8; 32],
    ) -> WardId;

    /// Derive the wallet account and record it as created. Idempotent —
    /// a second call for the same inputs returns the same account and
    /// changes nothing.
    fn create_if_absent(
        &mut self,
        collection: &str,
        creature_id: u64,
        chain_id: u32,
        salt: &[u8; 32],
    ) -> WardId;

    /// Whether `create_if_absent` has ever materialized this account.
    fn is_created(&self, account: &WardId) -> bool;
}

/// Reference registry: pure BLAKE3 derivation plus a created-set.
///
/// The created-set exists only so idempotency is observable; the derived
/// address never depends on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeterministicRegistry {
    created: HashSet<WardId>,
}

impl DeterministicRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts materialized so far.
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    fn derive(collection: &str, creature_id: u64, chain_id: u32, salt: &[u8; 32]) -> WardId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(crate::config::ACCOUNT_DOMAIN_TAG);
        // Length-prefix the collection so field boundaries stay unambiguous
        // no matter what the collection string contains.
        hasher.update(&(collection.len() as u32).to_be_bytes());
        hasher.update(collection.as_bytes());
        hasher.update(&creature_id.to_be_bytes());
        hasher.update(&chain_id.to_be_bytes());
        hasher.update(salt);
        WardId::from_bytes(*hasher.finalize().as_bytes())
    }
}

impl AccountRegistry for DeterministicRegistry {
    fn account_for(
        &self,
        collection: &str,
        creature_id: u64,
        chain_id: u32,
        salt: &[u8; 32],
    ) -> WardId {
        Self::derive(collection, creature_id, chain_id, salt)
    }

    fn create_if_absent(
        &mut self,
        collection: &str,
        creature_id: u64,
        chain_id: u32,
        salt: &[u8; 32],
    ) -> WardId {
        let account = Self::derive(collection, creature_id, chain_id, salt);
        self.created.insert(account);
        account
    }

    fn is_created(&self, account: &WardId) -> bool {
        self.created.contains(account)
    }
}
