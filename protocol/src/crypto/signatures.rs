//! # Digital Signatures
//!
//! Ed25519 signing and verification — the backbone of authorization in
//! WARD. Every privileged state transition in the world economy is gated
//! on one of these checks.
//!
//! ## Why not just use ed25519-dalek directly?
//!
//! We could, and internal code occasionally does. But wrapping the
//! operations gives us a single place to audit all signing, consistent
//! error types across the codebase, and type safety — you can't
//! accidentally pass a hash where a message goes.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use thiserror::Error;

use super::keys::{WardKeypair, WardPublicKey, WardSignature};

/// Errors during signature operations.
///
/// Intentionally vague — we don't tell attackers why verification failed.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("invalid signature bytes: expected 64 bytes")]
    InvalidSignatureBytes,

    #[error("invalid public key")]
    InvalidPublicKey,
}

/// Sign a message using a WARD keypair.
///
/// Produces a 64-byte Ed25519 signature over the given message bytes.
/// Deterministic — signing the same message with the same key always
/// produces the same signature (RFC 8032). No nonce reuse bugs possible.
/// Thank you, Bernstein.
pub fn sign(keypair: &WardKeypair, message: &[u8]) -> WardSignature {
    keypair.sign(message)
}

/// Verify an Ed25519 signature against a public key and message.
///
/// Returns `true` if the signature is valid, `false` otherwise. We
/// intentionally don't distinguish between "invalid signature" and
/// "wrong public key" — both are just "nope."
pub fn verify(public_key: &WardPublicKey, message: &[u8], signature: &WardSignature) -> bool {
    public_key.verify(message, signature)
}

/// Verify a signature using raw byte components.
///
/// The "I got these bytes off the wire and need to check them" variant:
/// parses the public key and signature bytes, then verifies. Useful when
/// deserializing requests where everything arrives as byte slices rather
/// than typed structs.
pub fn verify_raw(
    public_key_bytes: &[u8; 32],
    message: &[u8],
    signature_bytes: &[u8; 64],
) -> Result<(), SignatureError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key_bytes).map_err(|_| SignatureError::InvalidPublicKey)?;

    let signature = DalekSignature::from_bytes(signature_bytes);

    verifying_key
        .verify(message, &signature)
        .map_err(|_| SignatureError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify() {
        let kp = WardKeypair::generate();
        let msg = b"hello, world";
        let sig = sign(&kp, msg);
        assert!(verify(&kp.public_key(), msg, &sig));
    }

    #[test]
    fn wrong_message_fails() {
        let kp = WardKeypair::generate();
        let sig = sign(&kp, b"correct message");
        assert!(!verify(&kp.public_key(), b"wrong message", &sig));
    }

    #[test]
    fn wrong_key_fails() {
        let kp1 = WardKeypair::generate();
        let kp2 = WardKeypair::generate();
        let sig = sign(&kp1, b"test message");
        assert!(!verify(&kp2.public_key(), b"test message", &sig));
    }

    #[test]
    fn verify_raw_roundtrip() {
        let kp = WardKeypair::generate();
        let msg = b"bytes go in, bytes come out";
        let sig = sign(&kp, msg);
        let sig_arr: [u8; 64] = sig.as_bytes().try_into().unwrap();
        assert!(verify_raw(&kp.public_key_bytes(), msg, &sig_arr).is_ok());
    }

    #[test]
    fn verify_raw_with_invalid_pubkey() {
        // All zeros is the identity point — a small-order point that a
        // strict implementation must reject.
        let bad_pk = [0u8; 32];
        assert!(verify_raw(&bad_pk, b"doesn't matter", &[0u8; 64]).is_err());
    }

    #[test]
    fn empty_message() {
        // Signing an empty message works fine. Ed25519 doesn't care.
        let kp = WardKeypair::generate();
        let sig = sign(&kp, b"");
        assert!(verify(&kp.public_key(), b"", &sig));
    }
}
