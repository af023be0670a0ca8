//! # Spot Market
//!
//! Two marketplace operations:
//!
//! - a fixed 1:1 nominal swap of currency into sustenance, and
//! - a treasure draw that burns a fixed currency price and pays out a
//!   uniformly distributed random currency reward.
//!
//! ## On the randomness — read this before trusting it
//!
//! The source system derived the draw from block metadata, which the
//! caller can observe (and a block producer can grind). That is weak,
//! non-adversarial-safe randomness. We substitute an injected [`Rng`]
//! backed by the process CSPRNG, which removes caller predictability but
//! is still controlled by whoever hosts the process. This is an explicit
//! design statement: the draw is NOT a verifiable random function and
//! must not be treated as adversarially fair. It is a game mechanic, not
//! a lottery license.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use ward_protocol::config::{TREASURE_PRICE, TREASURE_REWARD_MAX, TREASURE_REWARD_MIN};
use ward_protocol::identity::WardId;

use crate::ledger::{AssetLedger, Caller, LedgerError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during spot market operations.
#[derive(Debug, Error)]
pub enum MarketError {
    /// A zero-amount swap.
    #[error("invalid amount: swap amount must be > 0")]
    InvalidAmount,

    /// The account's scaled currency balance can't cover the operation.
    /// Amounts are in raw base units.
    #[error("insufficient currency: available {available}, required {required}")]
    InsufficientBalance { available: u64, required: u64 },

    /// A ledger mutation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

// ---------------------------------------------------------------------------
// SpotMarket
// ---------------------------------------------------------------------------

/// The marketplace's fixed-rate desk and treasure chest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotMarket {
    /// Price of one treasure draw, in nominal currency.
    treasure_price: u64,
}

impl SpotMarket {
    /// Creates the market at the protocol's fixed treasure price.
    pub fn new() -> Self {
        Self {
            treasure_price: TREASURE_PRICE,
        }
    }

    /// The treasure draw price in nominal currency.
    pub fn treasure_price(&self) -> u64 {
        self.treasure_price
    }

    /// Swap `amount` nominal currency into the same nominal amount of
    /// sustenance, at the fixed 1:1 rate.
    ///
    /// The balance check runs against the *scaled* currency balance —
    /// `amount` nominal costs `amount × scale` base units.
    pub fn currency_to_sustenance(
        &self,
        amount: u64,
        account: &WardId,
        currency: &mut AssetLedger,
        sustenance: &mut AssetLedger,
    ) -> Result<(), MarketError> {
        if amount == 0 {
            return Err(MarketError::InvalidAmount);
        }
        self.ensure_currency_covers(amount, account, currency)?;
        sustenance.can_mint(account, amount)?;

        currency.burn(Caller::SpotMarket, account, amount)?;
        sustenance.mint(Caller::SpotMarket, account, amount)?;

        info!(account = %account, amount, "currency swapped for sustenance");
        Ok(())
    }

    /// Burn the fixed draw price and mint a uniform random currency
    /// reward in `[TREASURE_REWARD_MIN, TREASURE_REWARD_MAX]`.
    ///
    /// Returns the nominal reward that was minted. See the module docs
    /// for what this randomness is and is not.
    pub fn draw_treasure<R: Rng>(
        &self,
        rng: &mut R,
        account: &WardId,
        currency: &mut AssetLedger,
    ) -> Result<u64, MarketError> {
        self.ensure_currency_covers(self.treasure_price, account, currency)?;

        let reward = rng.gen_range(TREASURE_REWARD_MIN..=TREASURE_REWARD_MAX);
        currency.can_mint(account, reward)?;

        currency.burn(Caller::SpotMarket, account, self.treasure_price)?;
        currency.mint(Caller::SpotMarket, account, reward)?;

        info!(account = %account, price = self.treasure_price, reward, "treasure drawn");
        Ok(reward)
    }

    fn ensure_currency_covers(
        &self,
        nominal: u64,
        account: &WardId,
        currency: &AssetLedger,
    ) -> Result<(), MarketError> {
        let required = nominal
            .checked_mul(currency.scale())
            .ok_or(MarketError::InvalidAmount)?;
        let available = currency.balance_of(account);
        if available < required {
            return Err(MarketError::InsufficientBalance {
                available,
                required,
            });
        }
        Ok(())
    }
}

impl Default for SpotMarket {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use ward_protocol::config::CURRENCY_SCALE;

    fn account() -> WardId {
        WardId::from_bytes([6u8; 32])
    }

    #[test]
    fn swap_burns_currency_and_mints_sustenance() {
        let market = SpotMarket::new();
        let mut currency = AssetLedger::currency();
        let mut sustenance = AssetLedger::sustenance();
        currency.mint(Caller::Orchestrator, &account(), 10).unwrap();

        market
            .currency_to_sustenance(4, &account(), &mut currency, &mut sustenance)
            .unwrap();

        assert_eq!(currency.balance_of(&account()), 6 * CURRENCY_SCALE);
        assert_eq!(sustenance.balance_of(&account()), 4);
    }

    #[test]
    fn zero_swap_rejected() {
        let market = SpotMarket::new();
        let mut currency = AssetLedger::currency();
        let mut sustenance = AssetLedger::sustenance();
        match market.currency_to_sustenance(0, &account(), &mut currency, &mut sustenance) {
            Err(MarketError::InvalidAmount) => {}
            other => panic!("expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn swap_exceeding_balance_rejected() {
        let market = SpotMarket::new();
        let mut currency = AssetLedger::currency();
        let mut sustenance = AssetLedger::sustenance();
        currency.mint(Caller::Orchestrator, &account(), 3).unwrap();

        match market.currency_to_sustenance(4, &account(), &mut currency, &mut sustenance) {
            Err(MarketError::InsufficientBalance { available, required }) => {
                assert_eq!(available, 3 * CURRENCY_SCALE);
                assert_eq!(required, 4 * CURRENCY_SCALE);
            }
            other => panic!("expected InsufficientBalance, got {:?}", other),
        }
        // Nothing moved.
        assert_eq!(currency.balance_of(&account()), 3 * CURRENCY_SCALE);
        assert_eq!(sustenance.balance_of(&account()), 0);
    }

    #[test]
    fn draw_pays_within_bounds() {
        let market = SpotMarket::new();
        let mut currency = AssetLedger::currency();
        currency.mint(Caller::Orchestrator, &account(), 1_000).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let reward = market
                .draw_treasure(&mut rng, &account(), &mut currency)
                .unwrap();
            assert!((TREASURE_REWARD_MIN..=TREASURE_REWARD_MAX).contains(&reward));
        }
    }

    #[test]
    fn draw_burns_price_and_mints_reward() {
        let market = SpotMarket::new();
        let mut currency = AssetLedger::currency();
        currency.mint(Caller::Orchestrator, &account(), 100).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let before = currency.balance_of(&account());
        let reward = market
            .draw_treasure(&mut rng, &account(), &mut currency)
            .unwrap();
        let after = currency.balance_of(&account());

        assert_eq!(
            after,
            before - TREASURE_PRICE * CURRENCY_SCALE + reward * CURRENCY_SCALE
        );
    }

    #[test]
    fn draw_below_price_rejected() {
        let market = SpotMarket::new();
        let mut currency = AssetLedger::currency();
        currency
            .mint(Caller::Orchestrator, &account(), TREASURE_PRICE - 1)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        match market.draw_treasure(&mut rng, &account(), &mut currency) {
            Err(MarketError::InsufficientBalance { .. }) => {}
            other => panic!("expected InsufficientBalance, got {:?}", other),
        }
        assert_eq!(
            currency.balance_of(&account()),
            (TREASURE_PRICE - 1) * CURRENCY_SCALE
        );
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        // Same seed, same sequence — what makes the substitute RNG
        // testable at all.
        let market = SpotMarket::new();
        let draw = |seed: u64| {
            let mut currency = AssetLedger::currency();
            currency.mint(Caller::Orchestrator, &account(), 100).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            market
                .draw_treasure(&mut rng, &account(), &mut currency)
                .unwrap()
        };
        assert_eq!(draw(99), draw(99));
    }
}
