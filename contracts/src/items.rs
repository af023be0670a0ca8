//! # Item Catalog
//!
//! Semi-fungible equipment inventory. An item id names a *kind* of item;
//! accounts hold quantities of each kind, and each kind carries an
//! attribute record describing how it modulates a familiar's resource
//! deltas while equipped.
//!
//! Two conventions worth internalizing:
//!
//! - Item id 0 is the reserved "empty slot" sentinel and can never be
//!   minted.
//! - An item that was never defined reads as the zero attribute record.
//!   "Absent item has no effect" is a deliberate total-read default, not
//!   an error.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ward_protocol::config::EMPTY_SLOT;
use ward_protocol::identity::WardId;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during item catalog operations.
#[derive(Debug, Error)]
pub enum ItemError {
    /// Item id 0 is the empty-slot sentinel and cannot be minted or defined.
    #[error("item id 0 is reserved as the empty-slot sentinel")]
    ReservedId,

    /// A debit exceeds the account's holding of this item.
    #[error("insufficient item balance: item {item_id}, held {held}, requested {requested}")]
    InsufficientBalance {
        item_id: u64,
        held: u64,
        requested: u64,
    },

    /// Arithmetic overflow on a quantity.
    #[error("item quantity overflow: item {item_id}")]
    Overflow { item_id: u64 },
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Per-item attribute record: how the item shifts each resource while
/// equipped.
///
/// Increase fields add to the gains of a move; decrease fields add to the
/// losses. Luck is cosmetic — the orchestrator's numeric logic ignores it,
/// but it's carried so future mechanics don't need a migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttributes {
    pub health_increase: u8,
    pub health_decrease: u8,
    pub essence_increase: u8,
    pub essence_decrease: u8,
    pub sustenance_increase: u8,
    pub sustenance_decrease: u8,
    pub currency_increase: u8,
    pub currency_decrease: u8,
    pub luck_increase: u8,
    pub luck_decrease: u8,
}

impl ItemAttributes {
    /// The zero record: an item with no effect at all.
    pub fn none() -> Self {
        Self::default()
    }
}

/// A defined item kind: its attribute record plus bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ItemDefinition {
    attributes: ItemAttributes,
    defined_at: DateTime<Utc>,
}

/// The catalog: item definitions plus per-account holdings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCatalog {
    definitions: HashMap<u64, ItemDefinition>,
    holdings: HashMap<(WardId, u64), u64>,
}

impl ItemCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `quantity` of an item into `account`, setting (or overwriting)
    /// the item's attribute record.
    ///
    /// Attributes are normally set once at first mint; a later mint with
    /// different attributes is the administrative update path.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::ReservedId`] for item id 0.
    pub fn mint(
        &mut self,
        account: &WardId,
        item_id: u64,
        quantity: u64,
        attributes: ItemAttributes,
    ) -> Result<(), ItemError> {
        self.set_attributes(item_id, attributes)?;

        let held = self.balance_of(account, item_id);
        let new_held = held
            .checked_add(quantity)
            .ok_or(ItemError::Overflow { item_id })?;
        self.holdings.insert((*account, item_id), new_held);
        Ok(())
    }

    /// Define or overwrite an item's attribute record without minting.
    /// This is the admin surface's attribute-update entry point.
    pub fn set_attributes(
        &mut self,
        item_id: u64,
        attributes: ItemAttributes,
    ) -> Result<(), ItemError> {
        if item_id == EMPTY_SLOT {
            return Err(ItemError::ReservedId);
        }
        self.definitions.insert(
            item_id,
            ItemDefinition {
                attributes,
                defined_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Remove `quantity` of an item from `account` — the path by which
    /// equipped items get "lost" (spent, traded away) and later
    /// auto-dropped on the next move.
    pub fn burn(&mut self, account: &WardId, item_id: u64, quantity: u64) -> Result<(), ItemError> {
        let held = self.balance_of(account, item_id);
        if held < quantity {
            return Err(ItemError::InsufficientBalance {
                item_id,
                held,
                requested: quantity,
            });
        }
        self.holdings.insert((*account, item_id), held - quantity);
        Ok(())
    }

    /// The attribute record for an item, or the zero record if the item
    /// was never defined. Total by design — see the module docs.
    pub fn attributes_of(&self, item_id: u64) -> ItemAttributes {
        self.definitions
            .get(&item_id)
            .map(|def| def.attributes)
            .unwrap_or_default()
    }

    /// How many of `item_id` the account holds. Unknown pairs read 0.
    pub fn balance_of(&self, account: &WardId, item_id: u64) -> u64 {
        self.holdings
            .get(&(*account, item_id))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct item kinds defined.
    pub fn item_count(&self) -> usize {
        self.definitions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(tag: u8) -> WardId {
        WardId::from_bytes([tag; 32])
    }

    fn helm() -> ItemAttributes {
        ItemAttributes {
            health_increase: 5,
            essence_decrease: 1,
            ..Default::default()
        }
    }

    #[test]
    fn mint_sets_holding_and_attributes() {
        let mut catalog = ItemCatalog::new();
        catalog.mint(&account(1), 7, 3, helm()).unwrap();
        assert_eq!(catalog.balance_of(&account(1), 7), 3);
        assert_eq!(catalog.attributes_of(7), helm());
        assert_eq!(catalog.item_count(), 1);
    }

    #[test]
    fn reserved_id_rejected() {
        let mut catalog = ItemCatalog::new();
        match catalog.mint(&account(1), 0, 1, helm()) {
            Err(ItemError::ReservedId) => {}
            other => panic!("expected ReservedId, got {:?}", other),
        }
    }

    #[test]
    fn undefined_item_reads_zero_record() {
        let catalog = ItemCatalog::new();
        assert_eq!(catalog.attributes_of(999), ItemAttributes::none());
    }

    #[test]
    fn remint_overwrites_attributes() {
        let mut catalog = ItemCatalog::new();
        catalog.mint(&account(1), 7, 1, helm()).unwrap();

        let nerfed = ItemAttributes {
            health_increase: 1,
            ..Default::default()
        };
        catalog.mint(&account(1), 7, 1, nerfed).unwrap();
        assert_eq!(catalog.attributes_of(7), nerfed);
        assert_eq!(catalog.balance_of(&account(1), 7), 2);
    }

    #[test]
    fn set_attributes_without_minting() {
        let mut catalog = ItemCatalog::new();
        catalog.set_attributes(7, helm()).unwrap();
        assert_eq!(catalog.attributes_of(7), helm());
        assert_eq!(catalog.balance_of(&account(1), 7), 0);
    }

    #[test]
    fn burn_reduces_holding() {
        let mut catalog = ItemCatalog::new();
        catalog.mint(&account(1), 7, 5, helm()).unwrap();
        catalog.burn(&account(1), 7, 5).unwrap();
        assert_eq!(catalog.balance_of(&account(1), 7), 0);
        // Definition survives the holding going to zero.
        assert_eq!(catalog.attributes_of(7), helm());
    }

    #[test]
    fn burn_more_than_held_rejected() {
        let mut catalog = ItemCatalog::new();
        catalog.mint(&account(1), 7, 2, helm()).unwrap();
        match catalog.burn(&account(1), 7, 3) {
            Err(ItemError::InsufficientBalance {
                held: 2,
                requested: 3,
                ..
            }) => {}
            other => panic!("expected InsufficientBalance, got {:?}", other),
        }
    }

    #[test]
    fn holdings_are_per_account() {
        let mut catalog = ItemCatalog::new();
        catalog.mint(&account(1), 7, 1, helm()).unwrap();
        assert_eq!(catalog.balance_of(&account(2), 7), 0);
    }
}
