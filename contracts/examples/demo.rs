//! Interactive CLI demo of a full WARD world session.
//!
//! Walks through world setup, familiar creation, equipment, movement with
//! requirement settlement, the essence exchange, and the spot market —
//! every privileged step countersigned by the verifier key exactly as the
//! game server would do it.
//!
//! Run with:
//!   cargo run --example demo --release
//!
//! Set RUST_LOG=info to see the orchestrator's own tracing output
//! interleaved with the storytelling.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use ward_contracts::creatures::Location;
use ward_contracts::items::ItemAttributes;
use ward_contracts::ledger::AssetKind;
use ward_contracts::orchestrator::Orchestrator;
use ward_contracts::requirements::RequirementRecord;

use ward_protocol::accounts::DeterministicRegistry;
use ward_protocol::authorization::sign_authorization;
use ward_protocol::config::{CHAIN_ID_DEVNET, CURRENCY_SCALE};
use ward_protocol::crypto::keys::{WardKeypair, WardSignature};
use ward_protocol::identity::WardId;

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

const BG_BLUE: &str = "\x1b[44m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn banner() {
    println!();
    println!("{BG_BLUE}{BOLD}{WHITE}                                                        {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    WARD PROTOCOL  --  Familiar World Demo              {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}    Version 0.1.0  |  Ed25519 + BLAKE3 + Bech32         {RESET}");
    println!("{BG_BLUE}{BOLD}{WHITE}                                                        {RESET}");
    println!();
}

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}===[{YELLOW} Step {num} {CYAN}]======================================================{RESET}");
    println!("{BOLD}{WHITE}  {title}{RESET}");
    println!("{CYAN}----------------------------------------------------------------{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn stats_row(orchestrator: &Orchestrator, id: u64) {
    let stats = orchestrator.get_stats(id).expect("familiar exists");
    println!(
        "  {DIM}health {:>3}  |  location {:<13}  |  currency {:>10}  |  essence {:>4}  |  sustenance {:>4}  |  equipped ({}, {}){RESET}",
        stats.health,
        stats.location.to_string(),
        stats.currency,
        stats.essence,
        stats.sustenance,
        stats.equipped_mouth,
        stats.equipped_head,
    );
}

// ---------------------------------------------------------------------------
// The session
// ---------------------------------------------------------------------------

/// Signs for the orchestrator's current nonce, as the game server would.
fn countersign(verifier: &WardKeypair, orchestrator: &Orchestrator, caller: &WardId) -> WardSignature {
    sign_authorization(verifier, orchestrator.nonce(), orchestrator.chain_id(), caller)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    banner();

    // -- Step 1: world assembly --------------------------------------------
    section(1, "Assemble the world");
    let verifier = WardKeypair::generate();
    let operator_kp = WardKeypair::generate();
    let operator = WardId::from_public_key(&operator_kp.public_key());
    let player_kp = WardKeypair::generate();
    let player = WardId::from_public_key(&player_kp.public_key());

    let mut world = Orchestrator::new(
        CHAIN_ID_DEVNET,
        verifier.public_key(),
        operator,
        Box::new(DeterministicRegistry::new()),
    );
    info("chain", "devnet");
    info("verifier", &verifier.public_key_hex());
    info("player", &player.to_address());
    success("orchestrator online, nonce 0, unpaused");

    // -- Step 2: operator configuration ------------------------------------
    section(2, "Operator configures the world");
    world.set_requirements(
        &operator,
        Location::GatheringArea,
        RequirementRecord {
            essence_cost: 2,
            reward_essence: 0,
            reward_sustenance: 1,
            ..Default::default()
        },
    )?;
    world.set_requirements(
        &operator,
        Location::Tower,
        RequirementRecord {
            min_health: 20,
            health_cost: 10,
            reward_essence: 8,
            ..Default::default()
        },
    )?;
    world.configure_tier(&operator, 10, 6, 3)?;
    success("requirements set for GatheringArea and Tower");
    success("essence tier configured: 10 essence -> 6 currency + 3 sustenance");

    // -- Step 3: a familiar is born -----------------------------------------
    section(3, "Create a familiar");
    let sig = countersign(&verifier, &world, &player);
    let familiar = world.create_creature(&player, &sig, player, "ipfs://ward/familiars/1")?;
    let wallet = world.get_account(familiar)?;
    info("familiar id", &familiar.to_string());
    info("wallet", &wallet.to_address());
    success("born at Home with full health");
    stats_row(&world, familiar);

    // -- Step 4: provisioning -----------------------------------------------
    section(4, "Operator provisions the familiar");
    world.grant_asset(&operator, &wallet, AssetKind::Essence, 30)?;
    world.grant_asset(&operator, &wallet, AssetKind::Currency, 12)?;
    world.mint_item(
        &operator,
        &wallet,
        5,
        1,
        ItemAttributes {
            essence_increase: 2,
            ..Default::default()
        },
    )?;
    success("granted 30 essence, 12 currency, and a charm (item 5)");

    let sig = countersign(&verifier, &world, &player);
    world.equip_item(&player, &sig, familiar, 5, 0)?;
    success("charm equipped in the mouth slot");
    stats_row(&world, familiar);

    // -- Step 5: out into the world -----------------------------------------
    section(5, "Travel: Tower, then the Wellspring");
    let sig = countersign(&verifier, &world, &player);
    world.move_to(&player, &sig, familiar, Location::Tower)?;
    success("climbed the Tower: 10 health spent, essence reward boosted by the charm");
    stats_row(&world, familiar);

    let sig = countersign(&verifier, &world, &player);
    world.move_to(&player, &sig, familiar, Location::Wellspring)?;
    success("arrived at the Wellspring");
    stats_row(&world, familiar);

    // -- Step 6: the essence exchange ---------------------------------------
    section(6, "Exchange essence at the configured tier");
    let sig = countersign(&verifier, &world, &player);
    world.exchange_essence(&player, &sig, familiar, 10)?;
    success("10 essence burned -> 6 currency + 3 sustenance minted");
    stats_row(&world, familiar);

    // -- Step 7: the marketplace --------------------------------------------
    section(7, "Spot market: sustenance and a treasure draw");
    let sig = countersign(&verifier, &world, &player);
    world.move_to(&player, &sig, familiar, Location::Marketplace)?;

    let sig = countersign(&verifier, &world, &player);
    world.buy_sustenance(&player, &sig, familiar, 3)?;
    success("swapped 3 currency for 3 sustenance at the fixed 1:1 rate");

    let sig = countersign(&verifier, &world, &player);
    let reward = world.buy_treasure(&player, &sig, familiar)?;
    success(&format!(
        "treasure draw: paid 5 currency, won {reward} (that's {} base units)",
        reward * CURRENCY_SCALE
    ));
    stats_row(&world, familiar);

    // -- Step 8: replay protection, demonstrated ----------------------------
    section(8, "Replay a consumed signature (and fail)");
    let stale = countersign(&verifier, &world, &player);
    world.move_to(&player, &stale, familiar, Location::Home)?;
    match world.move_to(&player, &stale, familiar, Location::Tower) {
        Err(e) => success(&format!("replay rejected as expected: {e}")),
        Ok(_) => anyhow::bail!("replayed signature was accepted — that's a bug"),
    }
    stats_row(&world, familiar);

    println!();
    info("final nonce", &world.nonce().to_string());
    success("session complete");
    println!();
    Ok(())
}
