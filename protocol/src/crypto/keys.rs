//! # Key Management
//!
//! Ed25519 keypairs for WARD identities: players, the operator, and the
//! game-server verifier that countersigns every privileged operation.
//!
//! ## Why Ed25519?
//!
//! - Deterministic signatures — no k-value footguns like ECDSA.
//! - 128-bit security in 32+32 bytes. Compact and sufficient.
//! - Fast verification, which matters when every single state transition
//!   in the world is gated on a signature check.
//!
//! ## Security considerations
//!
//! - Key generation pulls from the OS RNG. If your OS RNG is broken,
//!   your familiars are the least of your worries.
//! - Secret key bytes are never logged and never appear in `Debug` output.
//!   If you add logging to this module, you will be asked to leave.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Errors that can occur during key operations.
///
/// Deliberately vague about *why* something failed — leaking details about
/// key material through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

/// A WARD identity keypair wrapping an Ed25519 signing key.
///
/// The atomic unit of identity in the protocol. The game-server verifier
/// is one of these; so is every player wallet that submits operations.
///
/// ## Serialization
///
/// `WardKeypair` intentionally does NOT implement `Serialize`. Serializing
/// private keys should be a deliberate, conscious act — use
/// [`secret_key_bytes`](Self::secret_key_bytes) explicitly if you must.
pub struct WardKeypair {
    signing_key: SigningKey,
}

/// The public half of a WARD identity, safe to share with the world.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardPublicKey {
    bytes: [u8; 32],
}

/// An Ed25519 signature over a message. 64 bytes, deterministic for a
/// given (key, message) pair.
///
/// Stored as `Vec<u8>` for serde compatibility, but always exactly 64
/// bytes when produced by this crate. A malformed signature simply fails
/// verification — no panics, just `false`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WardSignature {
    bytes: Vec<u8>,
}

impl WardKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Construct a keypair deterministically from a 32-byte seed.
    ///
    /// In Ed25519 the 32-byte secret key *is* the seed. Useful for test
    /// vectors and KDF-derived identities.
    ///
    /// **Warning**: a weak seed makes a weak key. Use a proper CSPRNG or
    /// KDF to produce the seed bytes.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a keypair from a hex-encoded secret key.
    ///
    /// Convenience for devnet tooling. Please don't put raw hex keys in
    /// config files in production — but we're not going to pretend you
    /// won't do it anyway.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidSecretKey)?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&arr))
    }

    /// Returns the public key associated with this keypair.
    pub fn public_key(&self) -> WardPublicKey {
        WardPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Raw public key bytes (32 bytes). Safe to share, log, tattoo on
    /// your arm, etc.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign a message and return a `WardSignature`.
    ///
    /// Ed25519 signing is deterministic — same key, same message, same
    /// signature. No randomness needed at signing time, no RNG disasters
    /// possible (see: PlayStation 3 master key incident, 2010).
    pub fn sign(&self, message: &[u8]) -> WardSignature {
        let sig = self.signing_key.sign(message);
        WardSignature {
            bytes: sig.to_bytes().to_vec(),
        }
    }

    /// Verify a signature against this keypair's public key.
    pub fn verify(&self, message: &[u8], signature: &WardSignature) -> bool {
        self.public_key().verify(message, signature)
    }

    /// Export the raw 32-byte secret key material.
    ///
    /// **Handle with extreme care.** This is the only secret between an
    /// attacker and full control of the identity.
    pub fn secret_key_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    /// The public key as a hex string. Useful for display and logging.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }
}

impl Clone for WardKeypair {
    /// Cloning a keypair is allowed but should make you uncomfortable.
    /// Every copy of a private key is another thing to protect.
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for WardKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material. Not even "partially" — a partial
        // leak is still a leak, and grepping logs for hex is trivial.
        write!(f, "WardKeypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for WardKeypair {
    /// Two keypairs are equal if their public keys match. Comparing secret
    /// material in a non-constant-time way is a bad habit, and for identity
    /// purposes the public key is what matters.
    fn eq(&self, other: &Self) -> bool {
        self.public_key_bytes() == other.public_key_bytes()
    }
}

impl Eq for WardKeypair {}

// ---------------------------------------------------------------------------
// WardPublicKey
// ---------------------------------------------------------------------------

impl WardPublicKey {
    /// Create a `WardPublicKey` from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Try to create a `WardPublicKey` from a byte slice, validating the
    /// length and that the bytes represent a valid Ed25519 point. Some
    /// 32-byte values aren't points on the curve, and low-order points
    /// deserve rejection, not weird behavior later.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; 32] = slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Verify a signature against this public key.
    ///
    /// Returns a boolean rather than a `Result` because the vast majority
    /// of callers want a yes/no answer and don't care about the specific
    /// failure mode — and giving attackers a detailed error oracle is a
    /// bad idea anyway.
    pub fn verify(&self, message: &[u8], signature: &WardSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig_bytes: [u8; 64] = match signature.bytes.as_slice().try_into() {
            Ok(b) => b,
            Err(_) => return false,
        };
        let dalek_sig = DalekSignature::from_bytes(&sig_bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }

    /// Hex-encoded representation. 64 characters for 32 bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded public key string.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&bytes)
    }
}

impl Hash for WardPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for WardPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for WardPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WardPublicKey({})", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// WardSignature
// ---------------------------------------------------------------------------

impl WardSignature {
    /// Create a signature from its raw 64-byte representation.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// The raw signature bytes (64 for any signature this crate produced).
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex-encoded signature. 128 characters for a valid sig.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Parse a hex-encoded signature.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 64 {
            return Err(hex::FromHexError::OddLength);
        }
        Ok(Self { bytes })
    }
}

impl fmt::Display for WardSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for WardSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "WardSignature({}...{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "WardSignature({})", hex_str)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_valid_keypair() {
        let kp = WardKeypair::generate();
        assert_eq!(kp.public_key_bytes().len(), 32);
        assert_eq!(kp.secret_key_bytes().len(), 32);
    }

    #[test]
    fn sign_verify_roundtrip() {
        let kp = WardKeypair::generate();
        let msg = b"authorize nonce 7 for ward1abc";
        let sig = kp.sign(msg);
        assert!(kp.verify(msg, &sig));
    }

    #[test]
    fn wrong_message_fails_verification() {
        let kp = WardKeypair::generate();
        let sig = kp.sign(b"correct message");
        assert!(!kp.verify(b"wrong message", &sig));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let kp1 = WardKeypair::generate();
        let kp2 = WardKeypair::generate();
        let sig = kp1.sign(b"message");
        assert!(!kp2.verify(b"message", &sig));
    }

    #[test]
    fn deterministic_from_seed() {
        let seed = [42u8; 32];
        let kp1 = WardKeypair::from_seed(&seed);
        let kp2 = WardKeypair::from_seed(&seed);
        assert_eq!(kp1.public_key(), kp2.public_key());
    }

    #[test]
    fn deterministic_signatures() {
        // Ed25519 is deterministic — same key + same message = same signature.
        let kp = WardKeypair::generate();
        let msg = b"determinism is underrated";
        assert_eq!(kp.sign(msg).as_bytes(), kp.sign(msg).as_bytes());
    }

    #[test]
    fn two_generated_keypairs_are_different() {
        // If this fails, your RNG is broken and you should panic (the
        // emotion, not the macro). Well, actually, both.
        let kp1 = WardKeypair::generate();
        let kp2 = WardKeypair::generate();
        assert_ne!(kp1.public_key_bytes(), kp2.public_key_bytes());
    }

    #[test]
    fn keypair_hex_roundtrip() {
        let kp = WardKeypair::generate();
        let hex_str = hex::encode(kp.secret_key_bytes());
        let restored = WardKeypair::from_hex(&hex_str).unwrap();
        assert_eq!(kp.public_key(), restored.public_key());
    }

    #[test]
    fn invalid_hex_rejected() {
        assert!(WardKeypair::from_hex("deadbeef").is_err());
        assert!(WardKeypair::from_hex("not-hex-at-all").is_err());
    }

    #[test]
    fn public_key_hex_roundtrip() {
        let kp = WardKeypair::generate();
        let pk = kp.public_key();
        let recovered = WardPublicKey::from_hex(&pk.to_hex()).unwrap();
        assert_eq!(pk, recovered);
    }

    #[test]
    fn public_key_rejects_wrong_length() {
        assert!(WardPublicKey::try_from_slice(&[0u8; 16]).is_err());
    }

    #[test]
    fn signature_hex_roundtrip() {
        let kp = WardKeypair::generate();
        let sig = kp.sign(b"test");
        let recovered = WardSignature::from_hex(&sig.to_hex()).unwrap();
        assert_eq!(sig, recovered);
    }

    #[test]
    fn truncated_signature_fails_verification() {
        let kp = WardKeypair::generate();
        let sig = kp.sign(b"full message");
        let mut short = sig.as_bytes().to_vec();
        short.truncate(32);
        let mangled = WardSignature { bytes: short };
        assert!(!kp.verify(b"full message", &mangled));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = WardKeypair::generate();
        let debug_str = format!("{:?}", kp);
        assert!(debug_str.starts_with("WardKeypair(pub="));
        assert!(!debug_str.contains(&hex::encode(kp.secret_key_bytes())));
    }

    #[test]
    fn clone_preserves_identity() {
        let kp = WardKeypair::generate();
        let cloned = kp.clone();
        assert_eq!(kp.public_key_bytes(), cloned.public_key_bytes());
    }
}
