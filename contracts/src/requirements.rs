//! # Requirement Table
//!
//! Per-location movement configuration: what a familiar must hold to
//! enter, what entering costs, and what entering rewards. One flat record
//! of twelve small unsigned fields per location, all bounded to 8 bits.
//!
//! The read side is total: a location that was never configured reads as
//! the zero record, meaning "no requirement, no reward". Movement into an
//! unconfigured location is always free.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::creatures::Location;

/// Thresholds, costs, and rewards applied when a familiar moves into a
/// location.
///
/// `min_*` are entry thresholds checked against pre-move state; `*_cost`
/// are deducted on entry; `reward_*` are granted on entry. All fields are
/// in nominal units (the orchestrator scales currency when it touches the
/// ledger).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementRecord {
    pub min_health: u8,
    pub health_cost: u8,
    pub min_essence: u8,
    pub essence_cost: u8,
    pub min_sustenance: u8,
    pub sustenance_cost: u8,
    pub min_currency: u8,
    pub currency_cost: u8,
    pub reward_currency: u8,
    pub reward_health: u8,
    pub reward_essence: u8,
    pub reward_sustenance: u8,
}

impl RequirementRecord {
    /// The zero record: free entry, no reward.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Per-location requirement configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementTable {
    records: HashMap<Location, RequirementRecord>,
}

impl RequirementTable {
    /// Creates an empty table — every location starts free.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) a location's requirement record.
    pub fn set(&mut self, location: Location, record: RequirementRecord) {
        self.records.insert(location, record);
    }

    /// The record for a location. Total: unconfigured locations read as
    /// the zero record.
    pub fn get(&self, location: Location) -> RequirementRecord {
        self.records.get(&location).copied().unwrap_or_default()
    }
}
