//! Challenge wire format and the two-round PBKDF2 response derivation.
//!
//! A version-2 login challenge is a `$`-delimited 5-field string:
//!
//! ```text
//! <version>$<iter1>$<salt1_hex>$<iter2>$<salt2_hex>
//! ```
//!
//! The response binds the secret to both salts: round one runs the
//! slow, static-salt derivation, round two re-derives over the fresh
//! per-challenge salt so precomputed dictionaries are useless while
//! the per-login cost stays cheap.

use crate::error::{AuthError, AuthResult};
use pbkdf2::pbkdf2_hmac_array;
use sha2::Sha256;

/// Derived hash length in bytes (SHA-256 output).
const HASH_LEN: usize = 32;

/// A parsed version-2 login challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    /// Iteration count for the static-salt round.
    pub iter1: u32,
    /// Static salt, raw bytes.
    pub salt1: Vec<u8>,
    /// Iteration count for the per-challenge round.
    pub iter2: u32,
    /// Per-challenge salt, raw bytes.
    pub salt2: Vec<u8>,
    /// Per-challenge salt exactly as it appeared on the wire. The
    /// response must carry this substring byte-identically, so it is
    /// kept alongside the decoded form rather than re-encoded.
    pub salt2_hex: String,
}

impl Challenge {
    /// Parse a challenge string, validating field count, iteration
    /// counts, and hex salts.
    pub fn parse(raw: &str) -> AuthResult<Self> {
        let parts: Vec<&str> = raw.split('$').collect();
        if parts.len() != 5 {
            return Err(AuthError::MalformedChallenge(format!(
                "expected 5 fields, got {}",
                parts.len()
            )));
        }

        let iter1 = parse_iterations(parts[1], "iter1")?;
        let salt1 = parse_salt(parts[2], "salt1")?;
        let iter2 = parse_iterations(parts[3], "iter2")?;
        let salt2 = parse_salt(parts[4], "salt2")?;

        Ok(Self {
            iter1,
            salt1,
            iter2,
            salt2,
            salt2_hex: parts[4].to_string(),
        })
    }
}

fn parse_iterations(field: &str, name: &str) -> AuthResult<u32> {
    let iterations: u32 = field.parse().map_err(|_| {
        AuthError::MalformedChallenge(format!("{name} is not a valid integer: {field:?}"))
    })?;
    if iterations == 0 {
        return Err(AuthError::MalformedChallenge(format!(
            "{name} must be positive"
        )));
    }
    Ok(iterations)
}

fn parse_salt(field: &str, name: &str) -> AuthResult<Vec<u8>> {
    hex::decode(field)
        .map_err(|e| AuthError::MalformedChallenge(format!("{name} is not valid hex: {e}")))
}

/// Compute the challenge response for a secret.
///
/// Round 1 hashes the UTF-8 secret with the static salt; round 2
/// hashes the raw round-1 output with the per-challenge salt. The
/// result is `"<salt2_hex>$<hash2_hex>"`, lowercase hex, ready to be
/// sent as the `response` query parameter.
///
/// Pure and deterministic; no I/O.
pub fn derive_response(challenge: &str, secret: &str) -> AuthResult<String> {
    let challenge = Challenge::parse(challenge)?;

    let hash1 = pbkdf2_hmac_array::<Sha256, HASH_LEN>(
        secret.as_bytes(),
        &challenge.salt1,
        challenge.iter1,
    );
    let hash2 = pbkdf2_hmac_array::<Sha256, HASH_LEN>(&hash1, &challenge.salt2, challenge.iter2);

    Ok(format!("{}${}", challenge.salt2_hex, hex::encode(hash2)))
}
