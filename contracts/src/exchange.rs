//! # Essence Exchange — tiered conversion
//!
//! A table of fixed tiers mapping an exact essence input amount to a
//! (currency, sustenance) reward pair. Exchange is all-or-nothing at a
//! configured tier: burn the input, mint both rewards, atomically.
//!
//! One documented quirk, inherited deliberately: [`rewards_for`] returns
//! `(0, 0)` both for a tier that was never configured and for one that
//! was configured and later removed. Tier presence in the table *is* the
//! validity flag — a zero-reward tier can't exist (rejected at
//! configuration time), so the two zero states are observationally
//! identical and we don't invent a flag to tell them apart.
//!
//! [`rewards_for`]: EssenceExchange::rewards_for

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use ward_protocol::identity::WardId;

use crate::ledger::{AssetLedger, Caller, LedgerError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during essence exchange operations.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Tier input amount must be non-zero.
    #[error("invalid input: tier input amount must be > 0")]
    InvalidInput,

    /// A tier must reward at least one of the two assets.
    #[error("invalid reward: both rewards are zero")]
    InvalidReward,

    /// Removal of a tier that isn't configured.
    #[error("tier not found: no tier configured for input {0}")]
    TierNotFound(u64),

    /// Exchange against an unconfigured input amount.
    #[error("invalid tier: no tier configured for input {0}")]
    InvalidTier(u64),

    /// The account's essence balance is below the tier input.
    #[error("insufficient essence: available {available}, requested {requested}")]
    InsufficientBalance { available: u64, requested: u64 },

    /// A ledger mutation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A configured exchange tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeTier {
    /// Nominal currency minted on exchange.
    pub currency_reward: u64,
    /// Sustenance minted on exchange.
    pub sustenance_reward: u64,
    /// When this tier was (last) configured.
    pub configured_at: DateTime<Utc>,
}

/// The tiered essence exchange table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EssenceExchange {
    tiers: HashMap<u64, ExchangeTier>,
}

impl EssenceExchange {
    /// Creates an empty exchange — no tiers configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure (or reconfigure) the tier for an exact input amount.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InvalidInput`] for a zero input amount and
    /// [`ExchangeError::InvalidReward`] if both rewards are zero.
    pub fn configure_tier(
        &mut self,
        input_amount: u64,
        currency_reward: u64,
        sustenance_reward: u64,
    ) -> Result<(), ExchangeError> {
        if input_amount == 0 {
            return Err(ExchangeError::InvalidInput);
        }
        if currency_reward == 0 && sustenance_reward == 0 {
            return Err(ExchangeError::InvalidReward);
        }
        self.tiers.insert(
            input_amount,
            ExchangeTier {
                currency_reward,
                sustenance_reward,
                configured_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Remove a configured tier. After removal the tier reads exactly
    /// like one that never existed.
    pub fn remove_tier(&mut self, input_amount: u64) -> Result<(), ExchangeError> {
        self.tiers
            .remove(&input_amount)
            .map(|_| ())
            .ok_or(ExchangeError::TierNotFound(input_amount))
    }

    /// The reward pair for an input amount, or `(0, 0)` when no tier is
    /// configured — see the module docs for why absence and removal
    /// collapse into the same read.
    pub fn rewards_for(&self, input_amount: u64) -> (u64, u64) {
        self.tiers
            .get(&input_amount)
            .map(|t| (t.currency_reward, t.sustenance_reward))
            .unwrap_or((0, 0))
    }

    /// Number of configured tiers.
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Execute an exchange: burn `input_amount` essence from `account`,
    /// mint the configured rewards into it.
    ///
    /// Validation fully precedes mutation — the essence balance and both
    /// mint headrooms are checked before the burn, so the three ledger
    /// writes commit together or not at all.
    pub fn exchange(
        &self,
        input_amount: u64,
        account: &WardId,
        essence: &mut AssetLedger,
        currency: &mut AssetLedger,
        sustenance: &mut AssetLedger,
    ) -> Result<(), ExchangeError> {
        let tier = self
            .tiers
            .get(&input_amount)
            .ok_or(ExchangeError::InvalidTier(input_amount))?;

        let available = essence.balance_of(account);
        if available < input_amount {
            return Err(ExchangeError::InsufficientBalance {
                available,
                requested: input_amount,
            });
        }
        currency.can_mint(account, tier.currency_reward)?;
        sustenance.can_mint(account, tier.sustenance_reward)?;

        essence.burn(Caller::EssenceExchange, account, input_amount)?;
        currency.mint(Caller::EssenceExchange, account, tier.currency_reward)?;
        sustenance.mint(Caller::EssenceExchange, account, tier.sustenance_reward)?;

        info!(
            account = %account,
            input = input_amount,
            currency = tier.currency_reward,
            sustenance = tier.sustenance_reward,
            "essence exchanged"
        );
        Ok(())
    }
}
