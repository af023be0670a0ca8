//! # Asset Ledgers
//!
//! The three authoritative balance stores of the world economy:
//!
//! - **Currency** — the fungible coin. Mint/burn amounts are *nominal*
//!   and scaled by the decimal multiplier before touching the ledger,
//!   and it is the only asset that supports peer-to-peer transfer.
//! - **Essence** and **Sustenance** — semi-fungible resource counters.
//!   No scaling, no transfers; they enter and leave the world only
//!   through mint and burn.
//!
//! ## Security Model
//!
//! Balance mutation is restricted to an explicit allow-list of protocol
//! components (the [`Caller`] enum), checked on every mutating call.
//! Reads are open to everyone. All arithmetic is checked — wrapping math
//! and balances do not mix. A balance change is visible to the very next
//! read; there is no deferred settlement.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ward_protocol::config::CURRENCY_SCALE;
use ward_protocol::identity::WardId;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The calling component is not on this ledger's allow-list.
    #[error("unauthorized: {caller} may not mutate the {asset} ledger")]
    Unauthorized {
        /// The component that attempted the mutation.
        caller: Caller,
        /// The ledger it was rejected from.
        asset: AssetKind,
    },

    /// A debit exceeds the account's balance. Amounts are in raw base
    /// units (Currency scaled by the decimal multiplier).
    #[error("insufficient {asset} balance: available {available}, requested {requested}")]
    InsufficientBalance {
        asset: AssetKind,
        available: u64,
        requested: u64,
    },

    /// Arithmetic overflow. If you're hitting this, someone is moving
    /// more than 18.4 quintillion base units. That's either a bug or an
    /// attack; both get an error.
    #[error("{asset} amount overflow: operation on {amount} would exceed u64::MAX")]
    Overflow { asset: AssetKind, amount: u64 },

    /// Transfer attempted on a ledger that doesn't support it.
    #[error("{asset} is not peer-to-peer transferable")]
    NotTransferable { asset: AssetKind },
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The protocol components allowed to mutate ledgers.
///
/// This is the allow-list vocabulary for every privileged mutation in the
/// contracts crate — ledgers and the creature registry both check it.
/// There is no "anyone" variant on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Caller {
    /// The top-level state-transition engine.
    Orchestrator,
    /// The tiered essence exchange.
    EssenceExchange,
    /// The currency/sustenance spot market.
    SpotMarket,
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Caller::Orchestrator => write!(f, "Orchestrator"),
            Caller::EssenceExchange => write!(f, "EssenceExchange"),
            Caller::SpotMarket => write!(f, "SpotMarket"),
        }
    }
}

/// The three tracked asset types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    /// Decimal-scaled fungible coin.
    Currency,
    /// Unscaled semi-fungible resource.
    Essence,
    /// Unscaled semi-fungible resource.
    Sustenance,
}

impl AssetKind {
    /// Base-unit multiplier applied to nominal mint/burn amounts.
    pub fn scale(&self) -> u64 {
        match self {
            AssetKind::Currency => CURRENCY_SCALE,
            AssetKind::Essence | AssetKind::Sustenance => 1,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Currency => write!(f, "Currency"),
            AssetKind::Essence => write!(f, "Essence"),
            AssetKind::Sustenance => write!(f, "Sustenance"),
        }
    }
}

/// A single asset's authoritative balance store.
///
/// Balances are keyed by wallet account and held in raw base units.
/// Total supply is maintained atomically with every mint and burn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetLedger {
    asset: AssetKind,
    balances: HashMap<WardId, u64>,
    total_supply: u64,
    authorized: Vec<Caller>,
    transferable: bool,
}

impl AssetLedger {
    /// Build a ledger with an explicit allow-list. The preset
    /// constructors below are what production code uses.
    pub fn new(asset: AssetKind, authorized: &[Caller], transferable: bool) -> Self {
        Self {
            asset,
            balances: HashMap::new(),
            total_supply: 0,
            authorized: authorized.to_vec(),
            transferable,
        }
    }

    /// The Currency ledger: scaled, transferable, mutable by the
    /// orchestrator and both exchange components.
    pub fn currency() -> Self {
        Self::new(
            AssetKind::Currency,
            &[Caller::Orchestrator, Caller::EssenceExchange, Caller::SpotMarket],
            true,
        )
    }

    /// The Essence ledger: unscaled, non-transferable, mutable by the
    /// orchestrator and the essence exchange (which burns the input side).
    pub fn essence() -> Self {
        Self::new(
            AssetKind::Essence,
            &[Caller::Orchestrator, Caller::EssenceExchange],
            false,
        )
    }

    /// The Sustenance ledger: unscaled, non-transferable, mutable by the
    /// orchestrator and both exchange components (both pay out in it).
    pub fn sustenance() -> Self {
        Self::new(
            AssetKind::Sustenance,
            &[Caller::Orchestrator, Caller::EssenceExchange, Caller::SpotMarket],
            false,
        )
    }

    /// Which asset this ledger tracks.
    pub fn asset(&self) -> AssetKind {
        self.asset
    }

    /// Base-unit multiplier for nominal amounts.
    pub fn scale(&self) -> u64 {
        self.asset.scale()
    }

    /// Balance of an account in raw base units. Unknown accounts read 0.
    pub fn balance_of(&self, account: &WardId) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Total supply in raw base units.
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    fn ensure_authorized(&self, caller: Caller) -> Result<(), LedgerError> {
        if self.authorized.contains(&caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                caller,
                asset: self.asset,
            })
        }
    }

    fn scaled(&self, amount: u64) -> Result<u64, LedgerError> {
        amount
            .checked_mul(self.scale())
            .ok_or(LedgerError::Overflow {
                asset: self.asset,
                amount,
            })
    }

    /// Read-only feasibility check for a mint of `amount` nominal units.
    ///
    /// Used by check phases that must know every later write will succeed
    /// before the first write happens.
    pub fn can_mint(&self, account: &WardId, amount: u64) -> Result<(), LedgerError> {
        let scaled = self.scaled(amount)?;
        self.total_supply
            .checked_add(scaled)
            .ok_or(LedgerError::Overflow {
                asset: self.asset,
                amount,
            })?;
        self.balance_of(account)
            .checked_add(scaled)
            .ok_or(LedgerError::Overflow {
                asset: self.asset,
                amount,
            })?;
        Ok(())
    }

    /// Mint `amount` nominal units into `account`.
    ///
    /// The amount is scaled to base units first (a no-op for the unscaled
    /// assets). Supply and balance move together or not at all.
    pub fn mint(&mut self, caller: Caller, account: &WardId, amount: u64) -> Result<(), LedgerError> {
        self.ensure_authorized(caller)?;
        let scaled = self.scaled(amount)?;

        let new_supply = self
            .total_supply
            .checked_add(scaled)
            .ok_or(LedgerError::Overflow {
                asset: self.asset,
                amount,
            })?;
        let new_balance = self
            .balance_of(account)
            .checked_add(scaled)
            .ok_or(LedgerError::Overflow {
                asset: self.asset,
                amount,
            })?;

        self.total_supply = new_supply;
        self.balances.insert(*account, new_balance);
        Ok(())
    }

    /// Burn `amount` nominal units from `account`.
    pub fn burn(&mut self, caller: Caller, account: &WardId, amount: u64) -> Result<(), LedgerError> {
        self.ensure_authorized(caller)?;
        let scaled = self.scaled(amount)?;

        let balance = self.balance_of(account);
        if balance < scaled {
            return Err(LedgerError::InsufficientBalance {
                asset: self.asset,
                available: balance,
                requested: scaled,
            });
        }

        self.balances.insert(*account, balance - scaled);
        self.total_supply = self.total_supply.saturating_sub(scaled);
        Ok(())
    }

    /// Move `amount` raw base units from one account to another.
    ///
    /// Only the Currency ledger supports this; the semi-fungible
    /// resources are deliberately not peer-to-peer transferable. Note the
    /// units: transfer moves base units as-is, with no nominal scaling —
    /// it is the "sweep what's there" primitive.
    pub fn transfer(
        &mut self,
        caller: Caller,
        from: &WardId,
        to: &WardId,
        amount: u64,
    ) -> Result<(), LedgerError> {
        self.ensure_authorized(caller)?;
        if !self.transferable {
            return Err(LedgerError::NotTransferable { asset: self.asset });
        }

        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                asset: self.asset,
                available: from_balance,
                requested: amount,
            });
        }
        // Self-transfer is a checked no-op, not a double-apply.
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow {
                asset: self.asset,
                amount,
            })?;

        self.balances.insert(*from, from_balance - amount);
        self.balances.insert(*to, to_balance);
        Ok(())
    }
}
