//! # Orchestrator — the state-transition engine
//!
//! Every privileged operation in the world enters here and follows the
//! same spine:
//!
//! ```text
//! pause gate -> authorize(nonce, chain, caller) -> checks -> effects -> advance nonce
//! ```
//!
//! The ordering rules are the whole design:
//!
//! - The pause gate runs first. While paused, everything fails `Paused`
//!   regardless of signature validity — and the nonce stays put, so
//!   outstanding signatures survive an unpause.
//! - `authorize` is a read. The nonce is consumed by `advance()` only
//!   after every effect has been applied; a failed operation never burns
//!   a nonce.
//! - Validation fully precedes mutation. The source environment reverted
//!   partial effects for free; here the check phase proves every later
//!   write will succeed (thresholds, burn coverage, mint headroom, health
//!   range via the first write) before anything moves.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;
use tracing::info;

use ward_protocol::accounts::AccountRegistry;
use ward_protocol::authorization::{AuthorizationError, AuthorizationState};
use ward_protocol::config::{ACCOUNT_SALT, EMPTY_SLOT, FAMILIAR_COLLECTION};
use ward_protocol::crypto::keys::{WardPublicKey, WardSignature};
use ward_protocol::identity::WardId;

use crate::creatures::{CreatureError, CreatureRegistry, Location};
use crate::exchange::{EssenceExchange, ExchangeError};
use crate::items::{ItemAttributes, ItemCatalog, ItemError};
use crate::ledger::{AssetKind, AssetLedger, Caller, LedgerError};
use crate::market::{MarketError, SpotMarket};
use crate::requirements::{RequirementRecord, RequirementTable};

/// Collection tag for the orchestrator's own treasury account — the
/// recipient of anything "accidentally sent" to the protocol itself.
const TREASURY_COLLECTION: &str = "ward.treasury";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by orchestrator operations.
///
/// Insufficiency variants carry the required and current values (raw base
/// units) so clients can render a precise message instead of a shrug.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// All privileged operations are paused.
    #[error("operations are paused")]
    Paused,

    /// The caller is not the operator (admin surface only).
    #[error("unauthorized: caller is not the operator")]
    Unauthorized,

    /// Signature validation failed.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    /// The operation requires the familiar to be somewhere it isn't.
    #[error("wrong location: operation requires {expected}, familiar is at {current}")]
    WrongLocation {
        expected: Location,
        current: Location,
    },

    /// Health below a required threshold.
    #[error("insufficient health: required {required}, current {current}")]
    InsufficientHealth { required: u64, current: u64 },

    /// Essence balance below a required threshold.
    #[error("insufficient essence: required {required}, current {current}")]
    InsufficientEssence { required: u64, current: u64 },

    /// Sustenance balance below a required threshold.
    #[error("insufficient sustenance: required {required}, current {current}")]
    InsufficientSustenance { required: u64, current: u64 },

    /// Currency balance below a required threshold.
    #[error("insufficient currency: required {required}, current {current}")]
    InsufficientCurrency { required: u64, current: u64 },

    /// A creature registry operation failed.
    #[error(transparent)]
    Creature(#[from] CreatureError),

    /// A ledger operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// An item catalog operation failed.
    #[error(transparent)]
    Item(#[from] ItemError),

    /// An essence exchange operation failed.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// A spot market operation failed.
    #[error(transparent)]
    Market(#[from] MarketError),
}

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Snapshot of a familiar's full public state, served without
/// authorization. Balances are in raw base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureStats {
    pub health: u8,
    pub location: Location,
    pub currency: u64,
    pub essence: u64,
    pub sustenance: u64,
    pub equipped_mouth: u64,
    pub equipped_head: u64,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// The top-level engine owning every component of the world economy.
pub struct Orchestrator {
    chain_id: u32,
    auth: AuthorizationState,
    operator: WardId,
    paused: bool,
    treasury: WardId,
    creatures: CreatureRegistry,
    items: ItemCatalog,
    requirements: RequirementTable,
    exchange: EssenceExchange,
    market: SpotMarket,
    currency: AssetLedger,
    essence: AssetLedger,
    sustenance: AssetLedger,
    accounts: Box<dyn AccountRegistry>,
    rng: StdRng,
}

impl Orchestrator {
    /// Assemble a world: fresh ledgers and registries, nonce 0, unpaused.
    ///
    /// The account registry is injected once at construction (it is an
    /// external collaborator); the verifier key can be rotated later via
    /// [`set_verifier`](Self::set_verifier).
    pub fn new(
        chain_id: u32,
        verifier: WardPublicKey,
        operator: WardId,
        accounts: Box<dyn AccountRegistry>,
    ) -> Self {
        let treasury = accounts.account_for(TREASURY_COLLECTION, 0, chain_id, &ACCOUNT_SALT);
        Self {
            chain_id,
            auth: AuthorizationState::new(chain_id, verifier),
            operator,
            paused: false,
            treasury,
            creatures: CreatureRegistry::new(),
            items: ItemCatalog::new(),
            requirements: RequirementTable::new(),
            exchange: EssenceExchange::new(),
            market: SpotMarket::new(),
            currency: AssetLedger::currency(),
            essence: AssetLedger::essence(),
            sustenance: AssetLedger::sustenance(),
            accounts,
            rng: StdRng::from_entropy(),
        }
    }

    // -- shared gates -------------------------------------------------------

    /// The common entry gate: pause check, then signature validation.
    /// Read-only — consuming the nonce is the caller's job, after success.
    fn begin(&self, caller: &WardId, signature: &WardSignature) -> Result<(), OrchestratorError> {
        if self.paused {
            return Err(OrchestratorError::Paused);
        }
        self.auth.authorize(caller, signature)?;
        Ok(())
    }

    fn ensure_operator(&self, caller: &WardId) -> Result<(), OrchestratorError> {
        if *caller == self.operator {
            Ok(())
        } else {
            Err(OrchestratorError::Unauthorized)
        }
    }

    fn require_location(
        &self,
        creature_id: u64,
        expected: Location,
    ) -> Result<(), OrchestratorError> {
        let current = self.creatures.get_location(creature_id)?;
        if current != expected {
            return Err(OrchestratorError::WrongLocation { expected, current });
        }
        Ok(())
    }

    /// Derive a familiar's wallet account. Pure — recomputed on demand,
    /// never stored on the creature record.
    fn wallet_account(&self, creature_id: u64) -> WardId {
        self.accounts
            .account_for(FAMILIAR_COLLECTION, creature_id, self.chain_id, &ACCOUNT_SALT)
    }

    // -- privileged operations ---------------------------------------------

    /// Create a familiar: registry entry plus idempotent wallet-account
    /// materialization. Returns the new creature id.
    pub fn create_creature(
        &mut self,
        caller: &WardId,
        signature: &WardSignature,
        owner: WardId,
        metadata_ref: &str,
    ) -> Result<u64, OrchestratorError> {
        self.begin(caller, signature)?;

        let id = self
            .creatures
            .create(Caller::Orchestrator, owner, metadata_ref)?;
        let account =
            self.accounts
                .create_if_absent(FAMILIAR_COLLECTION, id, self.chain_id, &ACCOUNT_SALT);

        let nonce = self.auth.advance();
        info!(nonce, creature = id, account = %account, "create_creature committed");
        Ok(id)
    }

    /// Move a familiar to a target location, settling the location's
    /// requirement record modulated by equipped item attributes.
    ///
    /// Gains and losses per resource:
    ///
    /// ```text
    /// gain_x = reward_x + head.increase_x + mouth.increase_x
    /// loss_x = cost_x   + head.decrease_x + mouth.decrease_x
    /// ```
    ///
    /// Health applies as `max(0, current + gain − loss)` written through
    /// `set_health` — whose 1..=100 range check is the only ceiling, so an
    /// overshooting gain (or a floor to 0) fails the move with
    /// `OutOfRange` rather than clamping. The other three settle as a net
    /// mint or burn.
    ///
    /// Equipment that left the wallet since it was equipped is dropped
    /// (slot reads empty, contributes nothing) as part of a successful
    /// move; a failed move leaves the slots untouched along with
    /// everything else.
    pub fn move_to(
        &mut self,
        caller: &WardId,
        signature: &WardSignature,
        creature_id: u64,
        target: Location,
    ) -> Result<(), OrchestratorError> {
        self.begin(caller, signature)?;

        let creature = self.creatures.get(creature_id)?;
        let current_health = creature.health as u64;
        let (stored_mouth, stored_head) = (creature.equipped_mouth, creature.equipped_head);
        let account = self.wallet_account(creature_id);

        // Re-validate equipment against current holdings. Computed here,
        // written only in the apply phase.
        let mouth = self.still_held(&account, stored_mouth);
        let head = self.still_held(&account, stored_head);

        let req = self.requirements.get(target);
        let head_attrs = self.items.attributes_of(head);
        let mouth_attrs = self.items.attributes_of(mouth);

        let gain = |reward: u8, h: u8, m: u8| reward as u64 + h as u64 + m as u64;
        let gain_health = gain(req.reward_health, head_attrs.health_increase, mouth_attrs.health_increase);
        let loss_health = gain(req.health_cost, head_attrs.health_decrease, mouth_attrs.health_decrease);
        let gain_essence = gain(req.reward_essence, head_attrs.essence_increase, mouth_attrs.essence_increase);
        let loss_essence = gain(req.essence_cost, head_attrs.essence_decrease, mouth_attrs.essence_decrease);
        let gain_sustenance = gain(req.reward_sustenance, head_attrs.sustenance_increase, mouth_attrs.sustenance_increase);
        let loss_sustenance = gain(req.sustenance_cost, head_attrs.sustenance_decrease, mouth_attrs.sustenance_decrease);
        let gain_currency = gain(req.reward_currency, head_attrs.currency_increase, mouth_attrs.currency_increase);
        let loss_currency = gain(req.currency_cost, head_attrs.currency_decrease, mouth_attrs.currency_decrease);

        // ---- check phase: everything validated against pre-move state ----

        if current_health < req.min_health as u64 {
            return Err(OrchestratorError::InsufficientHealth {
                required: req.min_health as u64,
                current: current_health,
            });
        }
        if current_health < req.health_cost as u64 {
            return Err(OrchestratorError::InsufficientHealth {
                required: req.health_cost as u64,
                current: current_health,
            });
        }

        Self::check_resource(&self.essence, &account, req.min_essence, req.essence_cost, gain_essence, loss_essence)
            .map_err(|(required, current)| OrchestratorError::InsufficientEssence { required, current })?;
        Self::check_resource(&self.sustenance, &account, req.min_sustenance, req.sustenance_cost, gain_sustenance, loss_sustenance)
            .map_err(|(required, current)| OrchestratorError::InsufficientSustenance { required, current })?;
        Self::check_resource(&self.currency, &account, req.min_currency, req.currency_cost, gain_currency, loss_currency)
            .map_err(|(required, current)| OrchestratorError::InsufficientCurrency { required, current })?;

        // Net-mint headroom, so the apply phase cannot fail after its
        // first write.
        if gain_essence > loss_essence {
            self.essence.can_mint(&account, gain_essence - loss_essence)?;
        }
        if gain_sustenance > loss_sustenance {
            self.sustenance.can_mint(&account, gain_sustenance - loss_sustenance)?;
        }
        if gain_currency > loss_currency {
            self.currency.can_mint(&account, gain_currency - loss_currency)?;
        }

        // Floored at 0 below; NOT clamped at 100. set_health's range check
        // decides, as the first mutation — an out-of-range result fails
        // the move before anything has moved.
        let new_health = (current_health as i64 + gain_health as i64 - loss_health as i64).max(0) as u64;

        // ---- apply phase ----

        self.creatures
            .set_health(Caller::Orchestrator, creature_id, new_health)?;

        Self::apply_net(&mut self.essence, &account, gain_essence, loss_essence)?;
        Self::apply_net(&mut self.sustenance, &account, gain_sustenance, loss_sustenance)?;
        Self::apply_net(&mut self.currency, &account, gain_currency, loss_currency)?;

        self.creatures
            .equip(Caller::Orchestrator, creature_id, mouth, head, &account, &self.items)?;
        self.creatures
            .set_location(Caller::Orchestrator, creature_id, target)?;

        let nonce = self.auth.advance();
        info!(nonce, creature = creature_id, target = %target, health = new_health, "move committed");
        Ok(())
    }

    /// Equip items into a familiar's mouth and head slots. Slots the
    /// wallet doesn't back end up empty, silently.
    pub fn equip_item(
        &mut self,
        caller: &WardId,
        signature: &WardSignature,
        creature_id: u64,
        mouth_item: u64,
        head_item: u64,
    ) -> Result<(), OrchestratorError> {
        self.begin(caller, signature)?;

        self.creatures.get(creature_id)?;
        let account = self.wallet_account(creature_id);
        self.creatures.equip(
            Caller::Orchestrator,
            creature_id,
            mouth_item,
            head_item,
            &account,
            &self.items,
        )?;

        let nonce = self.auth.advance();
        info!(nonce, creature = creature_id, mouth = mouth_item, head = head_item, "equip committed");
        Ok(())
    }

    /// Exchange essence at a configured tier. The familiar must be at the
    /// Wellspring.
    pub fn exchange_essence(
        &mut self,
        caller: &WardId,
        signature: &WardSignature,
        creature_id: u64,
        amount: u64,
    ) -> Result<(), OrchestratorError> {
        self.begin(caller, signature)?;
        self.require_location(creature_id, Location::Wellspring)?;

        let account = self.wallet_account(creature_id);
        self.exchange.exchange(
            amount,
            &account,
            &mut self.essence,
            &mut self.currency,
            &mut self.sustenance,
        )?;

        let nonce = self.auth.advance();
        info!(nonce, creature = creature_id, amount, "exchange committed");
        Ok(())
    }

    /// Swap currency for sustenance at the spot market's 1:1 nominal
    /// rate. The familiar must be at the Marketplace.
    pub fn buy_sustenance(
        &mut self,
        caller: &WardId,
        signature: &WardSignature,
        creature_id: u64,
        amount: u64,
    ) -> Result<(), OrchestratorError> {
        self.begin(caller, signature)?;
        self.require_location(creature_id, Location::Marketplace)?;

        let account = self.wallet_account(creature_id);
        self.market
            .currency_to_sustenance(amount, &account, &mut self.currency, &mut self.sustenance)?;

        let nonce = self.auth.advance();
        info!(nonce, creature = creature_id, amount, "sustenance purchase committed");
        Ok(())
    }

    /// Draw a treasure at the spot market. The familiar must be at the
    /// Marketplace. Returns the nominal currency reward.
    pub fn buy_treasure(
        &mut self,
        caller: &WardId,
        signature: &WardSignature,
        creature_id: u64,
    ) -> Result<u64, OrchestratorError> {
        self.begin(caller, signature)?;
        self.require_location(creature_id, Location::Marketplace)?;

        let account = self.wallet_account(creature_id);
        let reward = self
            .market
            .draw_treasure(&mut self.rng, &account, &mut self.currency)?;

        let nonce = self.auth.advance();
        info!(nonce, creature = creature_id, reward, "treasure draw committed");
        Ok(reward)
    }

    // -- admin surface (operator-gated) ------------------------------------

    /// Configure a location's requirement record.
    pub fn set_requirements(
        &mut self,
        operator: &WardId,
        location: Location,
        record: RequirementRecord,
    ) -> Result<(), OrchestratorError> {
        self.ensure_operator(operator)?;
        self.requirements.set(location, record);
        Ok(())
    }

    /// Configure an essence exchange tier.
    pub fn configure_tier(
        &mut self,
        operator: &WardId,
        input_amount: u64,
        currency_reward: u64,
        sustenance_reward: u64,
    ) -> Result<(), OrchestratorError> {
        self.ensure_operator(operator)?;
        self.exchange
            .configure_tier(input_amount, currency_reward, sustenance_reward)?;
        Ok(())
    }

    /// Remove an essence exchange tier.
    pub fn remove_tier(&mut self, operator: &WardId, input_amount: u64) -> Result<(), OrchestratorError> {
        self.ensure_operator(operator)?;
        self.exchange.remove_tier(input_amount)?;
        Ok(())
    }

    /// Replace the verifier key. Outstanding signatures from the old key
    /// stop verifying immediately; the nonce is untouched.
    pub fn set_verifier(
        &mut self,
        operator: &WardId,
        verifier: WardPublicKey,
    ) -> Result<(), OrchestratorError> {
        self.ensure_operator(operator)?;
        self.auth.set_verifier(verifier);
        info!("verifier rotated");
        Ok(())
    }

    /// Halt every privileged operation.
    pub fn pause(&mut self, operator: &WardId) -> Result<(), OrchestratorError> {
        self.ensure_operator(operator)?;
        self.paused = true;
        info!("operations paused");
        Ok(())
    }

    /// Resume privileged operations. Signatures issued before the pause
    /// (and not yet consumed) are valid again — the nonce never moved.
    pub fn unpause(&mut self, operator: &WardId) -> Result<(), OrchestratorError> {
        self.ensure_operator(operator)?;
        self.paused = false;
        info!("operations resumed");
        Ok(())
    }

    /// Define or overwrite an item's attribute record.
    pub fn set_item_attributes(
        &mut self,
        operator: &WardId,
        item_id: u64,
        attributes: ItemAttributes,
    ) -> Result<(), OrchestratorError> {
        self.ensure_operator(operator)?;
        self.items.set_attributes(item_id, attributes)?;
        Ok(())
    }

    /// Mint items into an account (operator issuance).
    pub fn mint_item(
        &mut self,
        operator: &WardId,
        account: &WardId,
        item_id: u64,
        quantity: u64,
        attributes: ItemAttributes,
    ) -> Result<(), OrchestratorError> {
        self.ensure_operator(operator)?;
        self.items.mint(account, item_id, quantity, attributes)?;
        Ok(())
    }

    /// Remove items from an account (operator sink — the path by which an
    /// equipped item can be "lost" and later auto-dropped).
    pub fn burn_item(
        &mut self,
        operator: &WardId,
        account: &WardId,
        item_id: u64,
        quantity: u64,
    ) -> Result<(), OrchestratorError> {
        self.ensure_operator(operator)?;
        self.items.burn(account, item_id, quantity)?;
        Ok(())
    }

    /// Mint a resource into an arbitrary account (operator faucet).
    pub fn grant_asset(
        &mut self,
        operator: &WardId,
        account: &WardId,
        asset: AssetKind,
        amount: u64,
    ) -> Result<(), OrchestratorError> {
        self.ensure_operator(operator)?;
        let ledger = match asset {
            AssetKind::Currency => &mut self.currency,
            AssetKind::Essence => &mut self.essence,
            AssetKind::Sustenance => &mut self.sustenance,
        };
        ledger.mint(Caller::Orchestrator, account, amount)?;
        Ok(())
    }

    /// Sweep currency accidentally sent to the protocol's own treasury
    /// account. Returns the raw base units recovered.
    pub fn recover_funds(
        &mut self,
        operator: &WardId,
        to: &WardId,
    ) -> Result<u64, OrchestratorError> {
        self.ensure_operator(operator)?;
        let stranded = self.currency.balance_of(&self.treasury);
        if stranded > 0 {
            self.currency
                .transfer(Caller::Orchestrator, &self.treasury, to, stranded)?;
            info!(amount = stranded, to = %to, "stranded funds recovered");
        }
        Ok(stranded)
    }

    // -- query surface (read-only, unauthorized) ----------------------------

    /// A familiar's full public state.
    pub fn get_stats(&self, creature_id: u64) -> Result<CreatureStats, OrchestratorError> {
        let creature = self.creatures.get(creature_id)?;
        let account = self.wallet_account(creature_id);
        Ok(CreatureStats {
            health: creature.health,
            location: creature.location,
            currency: self.currency.balance_of(&account),
            essence: self.essence.balance_of(&account),
            sustenance: self.sustenance.balance_of(&account),
            equipped_mouth: creature.equipped_mouth,
            equipped_head: creature.equipped_head,
        })
    }

    /// A location's requirement record (zero record if unconfigured).
    pub fn get_requirements(&self, location: Location) -> RequirementRecord {
        self.requirements.get(location)
    }

    /// A familiar's derived wallet account.
    pub fn get_account(&self, creature_id: u64) -> Result<WardId, OrchestratorError> {
        self.creatures.get(creature_id)?;
        Ok(self.wallet_account(creature_id))
    }

    /// The tier rewards for an essence input amount ((0,0) if absent).
    pub fn tier_rewards(&self, input_amount: u64) -> (u64, u64) {
        self.exchange.rewards_for(input_amount)
    }

    /// How many of an item a familiar's wallet holds.
    pub fn get_item_balance(&self, creature_id: u64, item_id: u64) -> Result<u64, OrchestratorError> {
        self.creatures.get(creature_id)?;
        let account = self.wallet_account(creature_id);
        Ok(self.items.balance_of(&account, item_id))
    }

    /// A familiar's metadata reference.
    pub fn token_uri(&self, creature_id: u64) -> Result<&str, OrchestratorError> {
        Ok(self.creatures.token_uri(creature_id)?)
    }

    /// The nonce the next authorization must be signed over.
    pub fn nonce(&self) -> u64 {
        self.auth.nonce()
    }

    /// The chain this orchestrator serves.
    pub fn chain_id(&self) -> u32 {
        self.chain_id
    }

    /// Whether privileged operations are currently halted.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The protocol's own treasury account.
    pub fn treasury_account(&self) -> WardId {
        self.treasury
    }

    /// Number of familiars ever created.
    pub fn creature_count(&self) -> usize {
        self.creatures.creature_count()
    }

    // -- internals ----------------------------------------------------------

    fn still_held(&self, account: &WardId, item: u64) -> u64 {
        if item != EMPTY_SLOT && self.items.balance_of(account, item) > 0 {
            item
        } else {
            EMPTY_SLOT
        }
    }

    /// Threshold and coverage checks for one resource ledger. Returns the
    /// (required, current) pair of the first failing check, in raw base
    /// units.
    fn check_resource(
        ledger: &AssetLedger,
        account: &WardId,
        min: u8,
        cost: u8,
        gain: u64,
        loss: u64,
    ) -> Result<(), (u64, u64)> {
        let scale = ledger.scale();
        let balance = ledger.balance_of(account);

        let min_required = min as u64 * scale;
        if balance < min_required {
            return Err((min_required, balance));
        }
        let cost_required = cost as u64 * scale;
        if balance < cost_required {
            return Err((cost_required, balance));
        }
        // The net burn must also be covered — cost and item decreases
        // together can exceed the bare cost threshold.
        if loss > gain {
            let net_required = (loss - gain) * scale;
            if balance < net_required {
                return Err((net_required, balance));
            }
        }
        Ok(())
    }

    fn apply_net(
        ledger: &mut AssetLedger,
        account: &WardId,
        gain: u64,
        loss: u64,
    ) -> Result<(), LedgerError> {
        match gain.cmp(&loss) {
            Ordering::Greater => ledger.mint(Caller::Orchestrator, account, gain - loss),
            Ordering::Less => ledger.burn(Caller::Orchestrator, account, loss - gain),
            Ordering::Equal => Ok(()),
        }
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("chain_id", &self.chain_id)
            .field("nonce", &self.auth.nonce())
            .field("paused", &self.paused)
            .field("creatures", &self.creatures.creature_count())
            .finish_non_exhaustive()
    }
}
