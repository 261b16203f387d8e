//! Password hashing and session token generation
//!
//! Hashes are PBKDF2-HMAC-SHA256 with a per-password random salt, stored as
//! `hex(salt):hex(digest)` so verification needs nothing but the stored
//! string.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use pbkdf2::pbkdf2_hmac;
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// PBKDF2 rounds; must not drop below 120,000
pub const PBKDF2_ITERATIONS: u32 = 120_000;
/// Salt length in bytes
pub const SALT_LEN: usize = 16;
/// Session token entropy in bytes
pub const TOKEN_BYTES: usize = 32;

const DIGEST_LEN: usize = 32;
const SEPARATOR: char = ':';

/// Hash a password with a freshly generated salt
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let digest = derive(password, &salt);
    format!("{}{}{}", hex::encode(salt), SEPARATOR, hex::encode(digest))
}

/// Check a password against a stored hash in constant time
///
/// Malformed stored values verify as `false`.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once(SEPARATOR) else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
        return false;
    };
    if salt.is_empty() || expected.len() != DIGEST_LEN {
        return false;
    }

    let provided = derive(password, &salt);
    bool::from(provided[..].ct_eq(&expected[..]))
}

/// Opaque URL-safe session token
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

fn derive(password: &str, salt: &[u8]) -> [u8; DIGEST_LEN] {
    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut digest);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_layout() {
        let stored = hash_password("pw123");
        let (salt, digest) = stored.split_once(':').unwrap();

        assert_eq!(salt.len(), SALT_LEN * 2);
        assert_eq!(digest.len(), DIGEST_LEN * 2);
        assert!(stored.chars().all(|c| c == ':' || c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_verify_round_trip() {
        let stored = hash_password("correct horse");

        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("correct horse ", &stored));
        assert!(!verify_password("", &stored));
    }

    #[test]
    fn test_salts_are_unique() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn test_verifies_known_digest() {
        let stored = "00112233445566778899aabbccddeeff:\
                      6414f3413c4a4cc6ec5607acbebbf4977dd619bce3e20c5bef99254db965245d";

        assert!(verify_password("pw123", stored));
        assert!(!verify_password("pw124", stored));
    }

    #[test]
    fn test_malformed_hashes_do_not_verify() {
        for stored in [
            "",
            "no-separator",
            ":",
            "zz:zz",
            "0011:",
            ":6414f3413c4a4cc6ec5607acbebbf4977dd619bce3e20c5bef99254db965245d",
            "00112233445566778899aabbccddeeff:6414",
            "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA",
        ] {
            assert!(!verify_password("pw123", stored), "accepted {:?}", stored);
        }
    }

    #[test]
    fn test_session_tokens() {
        let token = generate_session_token();

        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_ne!(token, generate_session_token());
    }
}
