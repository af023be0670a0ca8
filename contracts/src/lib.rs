//! # WARD Protocol Game Contracts
//!
//! The world-economy contracts for WARD: everything a familiar can own,
//! everywhere it can go, and every way value moves between the two.
//!
//! - **Asset Ledgers** — authoritative balance stores for Currency
//!   (decimal-scaled, transferable) and the two semi-fungible resources,
//!   Essence and Sustenance, guarded by an explicit caller allow-list.
//! - **Creature Registry** — identity, health, location, and equipment
//!   per familiar, with silent auto-drop of equipment the wallet no
//!   longer backs.
//! - **Item Catalog** — semi-fungible equipment with per-item attribute
//!   records that modulate movement costs and rewards.
//! - **Requirement Table** — per-location thresholds, costs, and rewards.
//! - **Essence Exchange / Spot Market** — fixed-rate tiered conversion
//!   and the marketplace's 1:1 swap plus randomized treasure draw.
//! - **Orchestrator** — the signature-gated state-transition engine that
//!   ties all of the above together and owns the replay-protection nonce.
//!
//! ## Design Principles
//!
//! 1. All balance arithmetic is checked — wrapping math and resources do
//!    not mix.
//! 2. Validation fully precedes mutation: every operation commits whole
//!    or not at all.
//! 3. Authorization gates every privileged operation, and a failed
//!    operation never consumes its nonce.
//! 4. Every public state type is serializable (serde) for wire transport
//!    and persistent storage.

pub mod creatures;
pub mod exchange;
pub mod items;
pub mod ledger;
pub mod market;
pub mod orchestrator;
pub mod requirements;
