//! # Authorization — the replay-protected gate
//!
//! Every privileged operation in WARD is countersigned by the game
//! server's verifier key over the exact tuple `(nonce, chain_id, caller)`.
//! The tuple triples as domain separation: a signature is valid for one
//! nonce value, one chain, and one calling identity — never replayable
//! across any of the three.
//!
//! The source scheme recovered a signer from the signature and compared it
//! to the verifier. Ed25519 has no public-key recovery, so the equivalent
//! check verifies the signature against the fixed verifier key over the
//! same message. Same trust decision, different mechanics.
//!
//! ## The one rule that matters
//!
//! The nonce advances by exactly 1 **after** an operation fully succeeds,
//! and never otherwise. A failed operation does not consume its nonce —
//! the issuer can resubmit the same signature. All nonce mutation funnels
//! through [`AuthorizationState::advance`]; nobody else touches it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::AUTH_DOMAIN_TAG;
use crate::crypto::keys::{WardKeypair, WardPublicKey, WardSignature};
use crate::identity::WardId;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the authorization gate.
///
/// One variant, on purpose. "Wrong nonce", "wrong chain", "wrong caller",
/// and "forged signature" are all the same answer to the outside world:
/// this signature does not authorize this call.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    #[error("invalid signature: not a verifier signature over the current (nonce, chain, caller)")]
    InvalidSignature,
}

// ---------------------------------------------------------------------------
// Message construction
// ---------------------------------------------------------------------------

/// Build the canonical authorization message for a given tuple.
///
/// Layout: `AUTH_DOMAIN_TAG ‖ nonce (u64 BE) ‖ chain_id (u32 BE) ‖ caller
/// digest (32 bytes)`. Fixed-width fields, so no length prefixes needed.
pub fn authorization_message(nonce: u64, chain_id: u32, caller: &WardId) -> Vec<u8> {
    let mut message = Vec::with_capacity(AUTH_DOMAIN_TAG.len() + 8 + 4 + 32);
    message.extend_from_slice(AUTH_DOMAIN_TAG);
    message.extend_from_slice(&nonce.to_be_bytes());
    message.extend_from_slice(&chain_id.to_be_bytes());
    message.extend_from_slice(caller.as_bytes());
    message
}

/// Sign an authorization tuple with the verifier keypair.
///
/// This is what the off-chain game server does for each operation it
/// approves. The caller identity baked into the message is the player
/// submitting the operation — handing the signature to anyone else makes
/// it worthless.
pub fn sign_authorization(
    keypair: &WardKeypair,
    nonce: u64,
    chain_id: u32,
    caller: &WardId,
) -> WardSignature {
    keypair.sign(&authorization_message(nonce, chain_id, caller))
}

// ---------------------------------------------------------------------------
// AuthorizationState
// ---------------------------------------------------------------------------

/// The global authorization state: one monotonically increasing nonce and
/// the fixed verifier public key.
///
/// There is exactly one of these per orchestrator. It is the sole
/// concurrency-control primitive in the design: it prevents a signed
/// authorization from being consumed twice and forces all privileged
/// calls to proceed in the exact order the issuer produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationState {
    nonce: u64,
    chain_id: u32,
    verifier: WardPublicKey,
}

impl AuthorizationState {
    /// Create a fresh authorization state with nonce 0.
    pub fn new(chain_id: u32, verifier: WardPublicKey) -> Self {
        Self {
            nonce: 0,
            chain_id,
            verifier,
        }
    }

    /// The nonce the next authorization must be signed over.
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// The chain this state authorizes operations for.
    pub fn chain_id(&self) -> u32 {
        self.chain_id
    }

    /// The current verifier public key.
    pub fn verifier(&self) -> &WardPublicKey {
        &self.verifier
    }

    /// Replace the verifier key (admin surface).
    ///
    /// Outstanding signatures from the old verifier die instantly — they
    /// no longer verify. The nonce is untouched.
    pub fn set_verifier(&mut self, verifier: WardPublicKey) {
        self.verifier = verifier;
    }

    /// Check that `signature` is the verifier's signature over the current
    /// `(nonce, chain_id, caller)` tuple.
    ///
    /// Read-only: a passing check does NOT consume the nonce. The caller
    /// runs the operation and then calls [`advance`](Self::advance) once
    /// the whole thing has succeeded.
    pub fn authorize(
        &self,
        caller: &WardId,
        signature: &WardSignature,
    ) -> Result<(), AuthorizationError> {
        let message = authorization_message(self.nonce, self.chain_id, caller);
        if self.verifier.verify(&message, signature) {
            Ok(())
        } else {
            warn!(nonce = self.nonce, caller = %caller, "rejected authorization");
            Err(AuthorizationError::InvalidSignature)
        }
    }

    /// Consume the current nonce. Call exactly once per fully successful
    /// privileged operation, after every effect has been applied.
    ///
    /// Returns the nonce that was consumed.
    pub fn advance(&mut self) -> u64 {
        let consumed = self.nonce;
        self.nonce += 1;
        consumed
    }
}
