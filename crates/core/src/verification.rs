//! E-mail verification codes.
//!
//! Codes are six random digits. Only their SHA-256 hash is stored; the
//! plaintext is handed to the delivery channel once.

use chrono::Duration;
use rand::Rng;

use crate::error::CoreError;
use crate::hashing::sha256_hex;
use crate::types::Timestamp;

pub const CODE_LENGTH: usize = 6;

/// How long a code stays valid.
pub const CODE_TTL_MINS: i64 = 15;

/// Minimum time between two codes for the same user.
pub const RESEND_COOLDOWN_SECS: i64 = 60;

pub struct GeneratedCode {
    pub plaintext: String,
    pub hash: String,
}

pub fn generate_code() -> GeneratedCode {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    let plaintext = format!("{n:06}");
    let hash = hash_code(&plaintext);
    GeneratedCode { plaintext, hash }
}

pub fn hash_code(code: &str) -> String {
    sha256_hex(code.trim().as_bytes())
}

pub fn code_expiry(now: Timestamp) -> Timestamp {
    now + Duration::minutes(CODE_TTL_MINS)
}

/// Reject submissions that cannot possibly be a code before touching the
/// database.
pub fn validate_code_format(code: &str) -> Result<(), CoreError> {
    let code = code.trim();
    if code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Verification code must be {CODE_LENGTH} digits"
        )))
    }
}

/// Enforce the resend cooldown given when the last code was issued.
pub fn check_resend_cooldown(last_issued: Option<Timestamp>, now: Timestamp) -> Result<(), CoreError> {
    if let Some(last) = last_issued {
        let elapsed = now - last;
        let cooldown = Duration::seconds(RESEND_COOLDOWN_SECS);
        if elapsed < cooldown {
            let wait = (cooldown - elapsed).num_seconds().max(1);
            return Err(CoreError::Conflict(format!(
                "Please wait {wait} seconds before requesting a new code"
            )));
        }
    }
    Ok(())
}
