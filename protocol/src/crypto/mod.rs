//! Cryptographic primitives for the WARD protocol.
//!
//! Two submodules, deliberately small:
//!
//! - [`keys`] — Ed25519 keypairs, public keys, and signatures.
//! - [`signatures`] — free-function sign/verify helpers over those types.
//!
//! Everything else in the protocol builds on these. Don't roll your own.

pub mod keys;
pub mod signatures;

pub use keys::{KeyError, WardKeypair, WardPublicKey, WardSignature};
pub use signatures::{sign, verify, verify_raw, SignatureError};
