//! # WARD ID — Identity and Account Addresses
//!
//! A WARD ID is the address form shared by player identities and familiar
//! wallet accounts. It is a 32-byte BLAKE3 digest rendered as Bech32:
//!
//! ```text
//! public_key (32 bytes)           derivation digest (32 bytes)
//!     -> BLAKE3(public_key)           -> (account registry output)
//!     -> Bech32("ward", digest) -> ward1qw508d6qe...
//! ```
//!
//! Player identities hash their Ed25519 public key; familiar wallet
//! accounts are built directly from the registry's derivation digest.
//! Either way the address space is the same, so ledgers key on one type.
//!
//! The `ward` human-readable prefix makes addresses immediately
//! recognizable, and Bech32's checksum catches up to 4 character errors —
//! which matters when addresses get copy-pasted between tools.

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::MAINNET_HRP;
use crate::crypto::keys::WardPublicKey;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during WARD ID operations.
#[derive(Debug, Error)]
pub enum WardIdError {
    /// The Bech32 string could not be decoded.
    #[error("bech32 decode error: {0}")]
    Bech32Decode(String),

    /// The decoded address has an unexpected human-readable prefix.
    #[error("invalid HRP: expected '{expected}', got '{got}'")]
    InvalidHrp { expected: String, got: String },

    /// The decoded data has an unexpected length.
    #[error("invalid address data length: expected {expected} bytes, got {got}")]
    InvalidDataLength { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// WardId
// ---------------------------------------------------------------------------

/// A WARD identity or account address.
///
/// Internally a 32-byte digest, `Copy`-cheap so it can be used directly
/// as a ledger key without allocation. The Bech32 address string is
/// computed on the fly.
///
/// # Examples
///
/// ```
/// use ward_protocol::crypto::keys::WardKeypair;
/// use ward_protocol::identity::WardId;
///
/// let kp = WardKeypair::generate();
/// let id = WardId::from_public_key(&kp.public_key());
/// let address = id.to_address();
/// assert!(address.starts_with("ward1"));
///
/// let recovered = WardId::from_address(&address).unwrap();
/// assert_eq!(id, recovered);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WardId {
    digest: [u8; 32],
}

impl WardId {
    /// Create a WARD ID from a public key by hashing it with BLAKE3.
    ///
    /// The hash indirection means addresses stay stable even if the key
    /// scheme ever changes, and gives a mild quantum-resistance hedge.
    pub fn from_public_key(pk: &WardPublicKey) -> Self {
        let digest = blake3::hash(pk.as_bytes());
        Self {
            digest: *digest.as_bytes(),
        }
    }

    /// Create a WARD ID directly from a 32-byte digest.
    ///
    /// This is how derived wallet accounts enter the address space: the
    /// account registry hands us its derivation digest and we wear it as
    /// an address. No public key ever exists for such accounts.
    pub fn from_bytes(digest: [u8; 32]) -> Self {
        Self { digest }
    }

    /// The raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.digest
    }

    /// Encode this identity as a Bech32 address string (`ward1…`).
    pub fn to_address(&self) -> String {
        let hrp = Hrp::parse(MAINNET_HRP).expect("static HRP is valid");
        bech32::encode::<Bech32>(hrp, &self.digest)
            .expect("encoding a 32-byte payload should never fail")
    }

    /// Parse a Bech32-encoded WARD address back into a [`WardId`].
    ///
    /// Validates the HRP, checksum, and data length.
    pub fn from_address(addr: &str) -> Result<Self, WardIdError> {
        let (hrp, data) =
            bech32::decode(addr).map_err(|e| WardIdError::Bech32Decode(e.to_string()))?;

        let expected_hrp = Hrp::parse(MAINNET_HRP).expect("static HRP is valid");
        if hrp != expected_hrp {
            return Err(WardIdError::InvalidHrp {
                expected: MAINNET_HRP.to_string(),
                got: hrp.to_string(),
            });
        }

        let digest: [u8; 32] = data
            .as_slice()
            .try_into()
            .map_err(|_| WardIdError::InvalidDataLength {
                expected: 32,
                got: data.len(),
            })?;

        Ok(Self { digest })
    }
}

impl fmt::Display for WardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_address())
    }
}

impl fmt::Debug for WardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let addr = self.to_address();
        // ward1 + first few data chars is plenty for log correlation.
        write!(f, "WardId({}…)", &addr[..12.min(addr.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::WardKeypair;

    #[test]
    fn address_starts_with_hrp() {
        let kp = WardKeypair::generate();
        let id = WardId::from_public_key(&kp.public_key());
        assert!(id.to_address().starts_with("ward1"));
    }

    #[test]
    fn address_roundtrip() {
        let kp = WardKeypair::generate();
        let id = WardId::from_public_key(&kp.public_key());
        let recovered = WardId::from_address(&id.to_address()).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn same_key_same_address() {
        let kp = WardKeypair::generate();
        let a = WardId::from_public_key(&kp.public_key());
        let b = WardId::from_public_key(&kp.public_key());
        assert_eq!(a.to_address(), b.to_address());
    }

    #[test]
    fn different_keys_different_addresses() {
        let a = WardId::from_public_key(&WardKeypair::generate().public_key());
        let b = WardId::from_public_key(&WardKeypair::generate().public_key());
        assert_ne!(a, b);
    }

    #[test]
    fn from_bytes_roundtrip() {
        let digest = [7u8; 32];
        let id = WardId::from_bytes(digest);
        assert_eq!(id.as_bytes(), &digest);
        let recovered = WardId::from_address(&id.to_address()).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn rejects_foreign_hrp() {
        // A syntactically valid Bech32 string with the wrong prefix.
        let hrp = Hrp::parse("nova").unwrap();
        let foreign = bech32::encode::<Bech32>(hrp, &[1u8; 32]).unwrap();
        match WardId::from_address(&foreign) {
            Err(WardIdError::InvalidHrp { .. }) => {}
            other => panic!("expected InvalidHrp, got {:?}", other),
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(WardId::from_address("not an address").is_err());
        assert!(WardId::from_address("ward1").is_err());
    }

    #[test]
    fn rejects_truncated_payload() {
        let hrp = Hrp::parse("ward").unwrap();
        let short = bech32::encode::<Bech32>(hrp, &[1u8; 16]).unwrap();
        match WardId::from_address(&short) {
            Err(WardIdError::InvalidDataLength { expected: 32, got: 16 }) => {}
            other => panic!("expected InvalidDataLength, got {:?}", other),
        }
    }

    #[test]
    fn serde_roundtrip() {
        let id = WardId::from_bytes([9u8; 32]);
        let json = serde_json::to_string(&id).unwrap();
        let back: WardId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
