//! SHA-256 and HMAC-SHA256 helpers shared by token storage and payment
//! notification verification.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex SHA-256 digest of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// 32 random bytes as 64 hex characters, for opaque bearer secrets.
pub fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// Lowercase hex HMAC-SHA256 of `payload` keyed by `secret`.
pub fn hmac_sha256_hex(secret: &str, payload: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a hex HMAC-SHA256 signature in constant time.
///
/// Accepts an optional `sha256=` prefix on the signature.
pub fn verify_hmac_sha256(secret: &str, payload: &[u8], signature: &str) -> bool {
    let signature = signature.trim();
    let signature = signature.strip_prefix("sha256=").unwrap_or(signature);
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn random_tokens_are_distinct_hex() {
        let a = random_token();
        let b = random_token();
        assert_eq!(a.len(), 64);
        assert!(a.bytes().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn hmac_round_trip_verifies() {
        let sig = hmac_sha256_hex("secret", b"{\"id\":1}");
        assert_eq!(sig.len(), 64);
        assert!(verify_hmac_sha256("secret", b"{\"id\":1}", &sig));
        assert!(verify_hmac_sha256("secret", b"{\"id\":1}", &format!("sha256={sig}")));
    }

    #[test]
    fn hmac_rejects_tampering() {
        let sig = hmac_sha256_hex("secret", b"payload");
        assert!(!verify_hmac_sha256("other", b"payload", &sig));
        assert!(!verify_hmac_sha256("secret", b"payload2", &sig));
        assert!(!verify_hmac_sha256("secret", b"payload", "zz"));
        assert!(!verify_hmac_sha256("secret", b"payload", "abc"));
        assert!(!verify_hmac_sha256("secret", b"payload", "é1"));
    }
}
