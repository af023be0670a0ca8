//! # Creature Registry
//!
//! The authoritative record of every familiar: identity, owner, health,
//! location, equipment, and metadata reference. In the source system this
//! registry *is* the identity collection — minting a familiar and
//! registering its game state are one act — so metadata storage lives
//! here rather than behind a second component.
//!
//! Mutations are gated on the orchestrator; everything else gets
//! read-only access. Familiars are never destroyed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use ward_protocol::config::{EMPTY_SLOT, HEALTH_DEFAULT, HEALTH_MAX, HEALTH_MIN};
use ward_protocol::identity::WardId;

use crate::items::ItemCatalog;
use crate::ledger::Caller;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during creature registry operations.
#[derive(Debug, Error)]
pub enum CreatureError {
    /// The calling component may not mutate the registry.
    #[error("unauthorized: {caller} may not mutate the creature registry")]
    Unauthorized { caller: Caller },

    /// The referenced creature does not exist.
    #[error("creature not found: {0}")]
    NotFound(u64),

    /// A health value outside the legal 1..=100 range.
    #[error("health out of range: {value} (legal range {min}..={max})")]
    OutOfRange { value: u64, min: u8, max: u8 },

    /// Both equip slots were given the same non-empty item.
    #[error("duplicate slot: item {item_id} cannot occupy both head and mouth")]
    DuplicateSlot { item_id: u64 },
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The fixed set of world locations a familiar can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// Where essence is exchanged for currency and sustenance.
    Wellspring,
    /// The tower.
    Tower,
    /// Default location of every newly created familiar.
    Home,
    /// The gathering area.
    GatheringArea,
    /// Where the spot market operates.
    Marketplace,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Wellspring => write!(f, "Wellspring"),
            Location::Tower => write!(f, "Tower"),
            Location::Home => write!(f, "Home"),
            Location::GatheringArea => write!(f, "GatheringArea"),
            Location::Marketplace => write!(f, "Marketplace"),
        }
    }
}

/// A familiar's full registry record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    /// Unique sequential identity, allocated at creation. Never reused.
    pub id: u64,
    /// The player identity that owns this familiar.
    pub owner: WardId,
    /// Current health, always within 1..=100 once initialized.
    pub health: u8,
    /// Current world location.
    pub location: Location,
    /// Item id in the mouth slot; 0 = empty.
    pub equipped_mouth: u64,
    /// Item id in the head slot; 0 = empty.
    pub equipped_head: u64,
    /// Metadata reference (the `tokenURI` of the identity collection).
    pub metadata_ref: String,
    /// Timestamp of creation.
    pub created_at: DateTime<Utc>,
}

/// The registry — allocates ids and owns every creature record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureRegistry {
    creatures: HashMap<u64, Creature>,
    next_id: u64,
}

impl CreatureRegistry {
    /// Creates an empty registry. Ids start at 1; 0 is never allocated so
    /// it can't be confused with the empty-slot sentinel in logs.
    pub fn new() -> Self {
        Self {
            creatures: HashMap::new(),
            next_id: 1,
        }
    }

    fn ensure_orchestrator(caller: Caller) -> Result<(), CreatureError> {
        if caller == Caller::Orchestrator {
            Ok(())
        } else {
            Err(CreatureError::Unauthorized { caller })
        }
    }

    /// Allocate the next id and register a new familiar with default
    /// state: full health, at Home, nothing equipped.
    pub fn create(
        &mut self,
        caller: Caller,
        owner: WardId,
        metadata_ref: impl Into<String>,
    ) -> Result<u64, CreatureError> {
        Self::ensure_orchestrator(caller)?;

        let id = self.next_id;
        self.next_id += 1;

        self.creatures.insert(
            id,
            Creature {
                id,
                owner,
                health: HEALTH_DEFAULT,
                location: Location::Home,
                equipped_mouth: EMPTY_SLOT,
                equipped_head: EMPTY_SLOT,
                metadata_ref: metadata_ref.into(),
                created_at: Utc::now(),
            },
        );
        info!(creature = id, owner = %owner, "familiar created");
        Ok(id)
    }

    /// Write a health value. The 1..=100 range check here is the only
    /// health ceiling anywhere in the system.
    pub fn set_health(&mut self, caller: Caller, id: u64, value: u64) -> Result<(), CreatureError> {
        Self::ensure_orchestrator(caller)?;
        if value < HEALTH_MIN as u64 || value > HEALTH_MAX as u64 {
            return Err(CreatureError::OutOfRange {
                value,
                min: HEALTH_MIN,
                max: HEALTH_MAX,
            });
        }
        let creature = self
            .creatures
            .get_mut(&id)
            .ok_or(CreatureError::NotFound(id))?;
        creature.health = value as u8;
        Ok(())
    }

    /// Move a familiar. Unconditional once the caller is authorized and
    /// the id exists — requirements are the orchestrator's problem.
    pub fn set_location(
        &mut self,
        caller: Caller,
        id: u64,
        location: Location,
    ) -> Result<(), CreatureError> {
        Self::ensure_orchestrator(caller)?;
        let creature = self
            .creatures
            .get_mut(&id)
            .ok_or(CreatureError::NotFound(id))?;
        creature.location = location;
        Ok(())
    }

    /// Equip items into the mouth and head slots.
    ///
    /// A slot is filled only when the wallet actually holds the item;
    /// otherwise it silently ends up empty. That silence is load-bearing:
    /// it is the mechanism by which items lost through other means get
    /// auto-unequipped on the next move.
    ///
    /// # Errors
    ///
    /// Returns [`CreatureError::DuplicateSlot`] if both slots name the
    /// same non-empty item.
    pub fn equip(
        &mut self,
        caller: Caller,
        id: u64,
        mouth_item: u64,
        head_item: u64,
        account: &WardId,
        catalog: &ItemCatalog,
    ) -> Result<(), CreatureError> {
        Self::ensure_orchestrator(caller)?;
        if mouth_item == head_item && mouth_item != EMPTY_SLOT {
            return Err(CreatureError::DuplicateSlot { item_id: mouth_item });
        }

        let held = |item: u64| item != EMPTY_SLOT && catalog.balance_of(account, item) > 0;
        let mouth = if held(mouth_item) { mouth_item } else { EMPTY_SLOT };
        let head = if held(head_item) { head_item } else { EMPTY_SLOT };

        let creature = self
            .creatures
            .get_mut(&id)
            .ok_or(CreatureError::NotFound(id))?;
        creature.equipped_mouth = mouth;
        creature.equipped_head = head;
        Ok(())
    }

    /// Full record for a familiar.
    pub fn get(&self, id: u64) -> Result<&Creature, CreatureError> {
        self.creatures.get(&id).ok_or(CreatureError::NotFound(id))
    }

    /// Current (mouth, head) equipment.
    pub fn get_equipped(&self, id: u64) -> Result<(u64, u64), CreatureError> {
        let c = self.get(id)?;
        Ok((c.equipped_mouth, c.equipped_head))
    }

    /// Current health.
    pub fn get_health(&self, id: u64) -> Result<u8, CreatureError> {
        Ok(self.get(id)?.health)
    }

    /// Current location.
    pub fn get_location(&self, id: u64) -> Result<Location, CreatureError> {
        Ok(self.get(id)?.location)
    }

    /// Owning player identity.
    pub fn owner_of(&self, id: u64) -> Result<WardId, CreatureError> {
        Ok(self.get(id)?.owner)
    }

    /// Metadata reference — the `tokenURI` read of the folded-in identity
    /// collection.
    pub fn token_uri(&self, id: u64) -> Result<&str, CreatureError> {
        Ok(self.get(id)?.metadata_ref.as_str())
    }

    /// Number of familiars ever created.
    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }
}

impl Default for CreatureRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemAttributes;

    fn owner() -> WardId {
        WardId::from_bytes([1u8; 32])
    }

    fn wallet() -> WardId {
        WardId::from_bytes([2u8; 32])
    }

    #[test]
    fn create_assigns_sequential_ids_and_defaults() {
        let mut reg = CreatureRegistry::new();
        let a = reg.create(Caller::Orchestrator, owner(), "ipfs://a").unwrap();
        let b = reg.create(Caller::Orchestrator, owner(), "ipfs://b").unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);

        let c = reg.get(a).unwrap();
        assert_eq!(c.health, HEALTH_DEFAULT);
        assert_eq!(c.location, Location::Home);
        assert_eq!(c.equipped_mouth, EMPTY_SLOT);
        assert_eq!(c.equipped_head, EMPTY_SLOT);
        assert_eq!(reg.token_uri(b).unwrap(), "ipfs://b");
    }

    #[test]
    fn non_orchestrator_caller_rejected() {
        let mut reg = CreatureRegistry::new();
        match reg.create(Caller::SpotMarket, owner(), "x") {
            Err(CreatureError::Unauthorized { .. }) => {}
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn set_health_enforces_range() {
        let mut reg = CreatureRegistry::new();
        let id = reg.create(Caller::Orchestrator, owner(), "x").unwrap();

        reg.set_health(Caller::Orchestrator, id, 1).unwrap();
        reg.set_health(Caller::Orchestrator, id, 100).unwrap();

        for bad in [0u64, 101, 255, 1_000] {
            match reg.set_health(Caller::Orchestrator, id, bad) {
                Err(CreatureError::OutOfRange { value, .. }) => assert_eq!(value, bad),
                other => panic!("expected OutOfRange for {}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut reg = CreatureRegistry::new();
        assert!(matches!(reg.get(42), Err(CreatureError::NotFound(42))));
        assert!(matches!(
            reg.set_health(Caller::Orchestrator, 42, 50),
            Err(CreatureError::NotFound(42))
        ));
        assert!(matches!(
            reg.set_location(Caller::Orchestrator, 42, Location::Tower),
            Err(CreatureError::NotFound(42))
        ));
    }

    #[test]
    fn set_location_is_unconditional() {
        let mut reg = CreatureRegistry::new();
        let id = reg.create(Caller::Orchestrator, owner(), "x").unwrap();
        reg.set_location(Caller::Orchestrator, id, Location::Marketplace)
            .unwrap();
        assert_eq!(reg.get_location(id).unwrap(), Location::Marketplace);
    }

    #[test]
    fn equip_requires_holding() {
        let mut reg = CreatureRegistry::new();
        let mut catalog = ItemCatalog::new();
        let id = reg.create(Caller::Orchestrator, owner(), "x").unwrap();

        catalog
            .mint(&wallet(), 5, 1, ItemAttributes::none())
            .unwrap();

        // Item 5 is held, item 7 is not: 7 silently lands empty.
        reg.equip(Caller::Orchestrator, id, 5, 7, &wallet(), &catalog)
            .unwrap();
        assert_eq!(reg.get_equipped(id).unwrap(), (5, EMPTY_SLOT));
    }

    #[test]
    fn duplicate_slot_rejected() {
        let mut reg = CreatureRegistry::new();
        let catalog = ItemCatalog::new();
        let id = reg.create(Caller::Orchestrator, owner(), "x").unwrap();

        match reg.equip(Caller::Orchestrator, id, 9, 9, &wallet(), &catalog) {
            Err(CreatureError::DuplicateSlot { item_id: 9 }) => {}
            other => panic!("expected DuplicateSlot, got {:?}", other),
        }
    }

    #[test]
    fn double_empty_is_fine() {
        let mut reg = CreatureRegistry::new();
        let catalog = ItemCatalog::new();
        let id = reg.create(Caller::Orchestrator, owner(), "x").unwrap();
        // Both slots 0 is "unequip everything", not a duplicate.
        reg.equip(Caller::Orchestrator, id, 0, 0, &wallet(), &catalog)
            .unwrap();
        assert_eq!(reg.get_equipped(id).unwrap(), (0, 0));
    }

    #[test]
    fn location_names_render() {
        assert_eq!(Location::Wellspring.to_string(), "Wellspring");
        assert_eq!(Location::GatheringArea.to_string(), "GatheringArea");
    }
}
