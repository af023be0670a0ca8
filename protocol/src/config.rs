//! # Protocol Configuration & Constants
//!
//! Every magic number in WARD lives here. If you're hardcoding a constant
//! somewhere else, you're doing it wrong and you owe the team coffee.
//!
//! These values define the DNA of the world economy. The game server, the
//! wallet derivation, and every signed authorization all assume them, so
//! changing one after launch is a migration, not an edit.

// ---------------------------------------------------------------------------
// Chain Identifiers
// ---------------------------------------------------------------------------

/// Mainnet — the persistent world. Familiars here are forever.
pub const CHAIN_ID_MAINNET: u32 = 0x57415244; // "WARD" in ASCII hex. Yes, we're that cute.

/// Testnet — where familiars are born, die, and get wiped on Tuesdays.
pub const CHAIN_ID_TESTNET: u32 = 0x57415254; // "WART" (we know, we know)

/// Devnet — the wild west. Reset at will, no promises, no survivors.
pub const CHAIN_ID_DEVNET: u32 = 0x57415258; // "WARX"

/// Human-readable prefixes for Bech32 addresses.
/// Short enough to type, long enough to be unambiguous.
pub const MAINNET_HRP: &str = "ward";
pub const TESTNET_HRP: &str = "tward";
pub const DEVNET_HRP: &str = "dward";

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Protocol fingerprint, embedded in handshakes and tooling output to
/// identify the WARD protocol family and build generation.
pub const PROTOCOL_FINGERPRINT: &str = "ALAS-WARD-2026";

/// The full version string, assembled at compile time so we don't allocate
/// for something this trivial at runtime.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 — the only sane choice for signatures in 2024+.
pub const SIGNING_ALGORITHM: &str = "Ed25519";

/// Signing key length in bytes. Ed25519 secret keys are 32 bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Public (verifying) key length in bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes. If yours isn't, something
/// has gone terribly wrong.
pub const SIGNATURE_LENGTH: usize = 64;

/// The hash function used for identity addresses and wallet-account
/// derivation. BLAKE3 is faster than SHA-256 on every platform that
/// matters, and it's a proper cryptographic hash — not a toy.
pub const PRIMARY_HASH_FUNCTION: &str = "BLAKE3";

/// Hash output length in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

/// Domain tag prefixed to every authorization message before signing.
///
/// Keeps a WARD authorization from ever being a valid signature over
/// anything else (and vice versa). Versioned so the message format can
/// evolve without ambiguity about which layout a signature covers.
pub const AUTH_DOMAIN_TAG: &[u8] = b"ward.authorize.v1";

// ---------------------------------------------------------------------------
// Wallet Account Derivation
// ---------------------------------------------------------------------------

/// Domain tag for wallet-account derivation. Separate from the
/// authorization tag — an account digest must never collide with an
/// authorization digest, even for adversarially chosen inputs.
pub const ACCOUNT_DOMAIN_TAG: &[u8] = b"ward.account.v1";

/// The fixed salt mixed into every wallet-account derivation.
///
/// One global salt, by design: the registry must be deterministic so that
/// anyone can recompute a familiar's wallet account from public data.
pub const ACCOUNT_SALT: [u8; 32] = [
    0x77, 0x61, 0x72, 0x64, 0x2e, 0x73, 0x61, 0x6c, // "ward.sal"
    0x74, 0x2e, 0x76, 0x31, 0x00, 0x00, 0x00, 0x00, // "t.v1"
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
];

/// Collection reference for the familiar identity collection. Mixed into
/// wallet-account derivation so a future second collection gets disjoint
/// accounts for free.
pub const FAMILIAR_COLLECTION: &str = "ward.familiars";

// ---------------------------------------------------------------------------
// Game Economy
// ---------------------------------------------------------------------------

/// Decimal precision of the Currency ledger. 6 decimals: enough resolution
/// for market math, small enough that u64 headroom is never a worry at
/// game-economy scale.
pub const CURRENCY_DECIMALS: u8 = 6;

/// The Currency scale multiplier, 10^CURRENCY_DECIMALS. Mint and burn take
/// nominal amounts and multiply by this before touching the ledger.
/// Essence and Sustenance are raw counters and do not scale.
pub const CURRENCY_SCALE: u64 = 1_000_000;

/// Lowest health a living familiar can hold. Zero is not a valid stored
/// health — a move that would floor health out of this range fails whole.
pub const HEALTH_MIN: u8 = 1;

/// Health ceiling. The range check in `set_health` is the only ceiling
/// in the system; the move formula itself does not clamp upward.
pub const HEALTH_MAX: u8 = 100;

/// Health assigned to every newly created familiar.
pub const HEALTH_DEFAULT: u8 = 100;

/// Item id 0 is reserved as the "empty slot" sentinel. It can never be
/// minted, and an equip slot holding it holds nothing.
pub const EMPTY_SLOT: u64 = 0;

/// Fixed price of a treasure draw, in nominal Currency.
pub const TREASURE_PRICE: u64 = 5;

/// Inclusive bounds of the treasure draw reward, in nominal Currency.
pub const TREASURE_REWARD_MIN: u64 = 1;
pub const TREASURE_REWARD_MAX: u64 = 20;

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------

/// Returns the human-readable prefix for a given chain ID.
/// Returns `None` for unrecognized chains — we don't guess.
pub fn hrp_for_chain(chain_id: u32) -> Option<&'static str> {
    match chain_id {
        CHAIN_ID_MAINNET => Some(MAINNET_HRP),
        CHAIN_ID_TESTNET => Some(TESTNET_HRP),
        CHAIN_ID_DEVNET => Some(DEVNET_HRP),
        _ => None,
    }
}

/// Returns a friendly name for a chain ID, mainly for logging.
/// Unknown chains get a hex dump because we're helpful like that.
pub fn chain_name(chain_id: u32) -> String {
    match chain_id {
        CHAIN_ID_MAINNET => "mainnet".to_string(),
        CHAIN_ID_TESTNET => "testnet".to_string(),
        CHAIN_ID_DEVNET => "devnet".to_string(),
        other => format!("unknown(0x{:08X})", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids_are_distinct() {
        // If these collide, someone has been editing hex while sleep-deprived.
        assert_ne!(CHAIN_ID_MAINNET, CHAIN_ID_TESTNET);
        assert_ne!(CHAIN_ID_MAINNET, CHAIN_ID_DEVNET);
        assert_ne!(CHAIN_ID_TESTNET, CHAIN_ID_DEVNET);
    }

    #[test]
    fn chain_magic_is_valid_ascii() {
        for id in [CHAIN_ID_MAINNET, CHAIN_ID_TESTNET, CHAIN_ID_DEVNET] {
            let bytes = id.to_be_bytes();
            assert!(bytes.iter().all(|b| b.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn hrp_for_known_chains() {
        assert_eq!(hrp_for_chain(CHAIN_ID_MAINNET), Some("ward"));
        assert_eq!(hrp_for_chain(CHAIN_ID_TESTNET), Some("tward"));
        assert_eq!(hrp_for_chain(CHAIN_ID_DEVNET), Some("dward"));
    }

    #[test]
    fn hrp_for_unknown_chain() {
        assert_eq!(hrp_for_chain(0xDEADBEEF), None);
    }

    #[test]
    fn chain_name_formatting() {
        assert_eq!(chain_name(CHAIN_ID_MAINNET), "mainnet");
        assert_eq!(chain_name(0xCAFEBABE), "unknown(0xCAFEBABE)");
    }

    #[test]
    fn domain_tags_are_disjoint() {
        // Authorization digests and account digests must live in different
        // domains no matter what follows the tag.
        assert_ne!(AUTH_DOMAIN_TAG, ACCOUNT_DOMAIN_TAG);
    }

    #[test]
    fn currency_scale_matches_decimals() {
        assert_eq!(CURRENCY_SCALE, 10u64.pow(CURRENCY_DECIMALS as u32));
    }

    #[test]
    fn health_bounds_sanity() {
        assert!(HEALTH_MIN <= HEALTH_MAX);
        assert!(HEALTH_DEFAULT >= HEALTH_MIN && HEALTH_DEFAULT <= HEALTH_MAX);
    }

    #[test]
    fn treasure_bounds_sanity() {
        // A draw must always be able to pay out something.
        assert!(TREASURE_REWARD_MIN >= 1);
        assert!(TREASURE_REWARD_MIN <= TREASURE_REWARD_MAX);
        assert!(TREASURE_PRICE > 0);
    }

    #[test]
    fn crypto_parameter_sizes() {
        assert_eq!(SIGNING_KEY_LENGTH, 32);
        assert_eq!(VERIFYING_KEY_LENGTH, 32);
        assert_eq!(SIGNATURE_LENGTH, 64);
        assert_eq!(HASH_OUTPUT_LENGTH, 32);
    }
}
