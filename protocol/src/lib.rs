// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # WARD Protocol — Core Library
//!
//! The primitives behind WARD, the economic core of a persistent familiar
//! world: autonomous creature identities that hold resource balances,
//! travel between locations, wear equipment, and trade at fixed-rate
//! markets — every mutation gated by a replay-protected signature from
//! the game server's verifier key.
//!
//! WARD takes a pragmatic stance: Ed25519 for signatures (because we're
//! not barbarians), BLAKE3 for address and account derivation (because
//! it's fast everywhere and actually a cryptographic hash), and Bech32
//! for the addresses humans end up copy-pasting.
//!
//! ## Architecture
//!
//! This crate holds the layers everything else stands on:
//!
//! - **crypto** — Ed25519 keys and signatures. Don't roll your own.
//! - **identity** — the `ward1…` address space for players and wallets.
//! - **accounts** — deterministic wallet-account derivation. Nobody
//!   stores the creature→wallet mapping; everybody can recompute it.
//! - **authorization** — the global nonce + verifier gate that every
//!   privileged operation passes through exactly once.
//! - **config** — protocol constants and economy parameters.
//!
//! The game contracts themselves (ledgers, creatures, items, markets,
//! and the orchestrator) live in the `ward-contracts` crate.
//!
//! ## Design Philosophy
//!
//! 1. Correctness over performance (but we're still fast).
//! 2. No unsafe code in crypto paths — we sleep at night.
//! 3. Every public API is documented. Internal shame is documented too.
//! 4. If it touches balances, it has tests. Plural.

pub mod accounts;
pub mod authorization;
pub mod config;
pub mod crypto;
pub mod identity;
