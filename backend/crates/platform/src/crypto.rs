//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Signed token verification failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    BadSignature,
}

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Generate a random 32-byte secret
pub fn random_secret() -> [u8; 32] {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}

/// Compute SHA-256 hash
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Encode bytes as standard base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode standard base64
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Encode bytes as URL-safe base64 without padding (cookie-safe)
pub fn to_base64_url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode URL-safe base64 without padding
pub fn from_base64_url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// HMAC-SHA256 keyed with a 32-byte secret
fn keyed_mac(key: &[u8; 32]) -> HmacSha256 {
    // HMAC zero-pads short keys to the 64-byte block itself.
    let mut block = [0u8; 64];
    block[..32].copy_from_slice(key);
    <HmacSha256 as KeyInit>::new(&block.into())
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8; 32], data: &[u8]) -> [u8; 32] {
    let mut mac = keyed_mac(key);
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Sign a payload as `<payload>.<base64url(hmac)>`
///
/// The payload must not contain `.`.
pub fn sign_token(key: &[u8; 32], payload: &str) -> String {
    let signature = hmac_sha256(key, payload.as_bytes());
    format!("{}.{}", payload, to_base64_url(&signature))
}

/// Verify a token produced by [`sign_token`] and return its payload
///
/// Signature comparison is constant-time.
pub fn verify_token<'a>(key: &[u8; 32], token: &'a str) -> Result<&'a str, TokenError> {
    let (payload, signature_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;
    if payload.is_empty() || signature_b64.contains('.') {
        return Err(TokenError::Malformed);
    }

    let signature = from_base64_url(signature_b64).map_err(|_| TokenError::Malformed)?;

    let mut mac = keyed_mac(key);
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| TokenError::BadSignature)?;

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_values() {
        let hash = sha256(b"");
        let expected =
            hex::decode("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
                .unwrap();
        assert_eq!(hash.to_vec(), expected);
    }

    #[test]
    fn test_hmac_known_value() {
        // RFC 4231 test case 2; "Jefe" zero-padded is the same HMAC key
        let mut key = [0u8; 32];
        key[..4].copy_from_slice(b"Jefe");
        let mac = hmac_sha256(&key, b"what do ya want for nothing?");
        let expected =
            hex::decode("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
                .unwrap();
        assert_eq!(mac.to_vec(), expected);
    }

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        assert!(bytes.iter().any(|&b| b != 0));
        assert_ne!(random_secret(), random_secret());
    }

    #[test]
    fn test_sign_and_verify_token() {
        let key = [7u8; 32];
        let token = sign_token(&key, "session-123");
        assert!(token.starts_with("session-123."));
        assert_eq!(verify_token(&key, &token), Ok("session-123"));
    }

    #[test]
    fn test_verify_token_rejects_tampering() {
        let key = [7u8; 32];
        let token = sign_token(&key, "session-123");
        let forged = token.replacen("session-123", "session-124", 1);
        assert_eq!(verify_token(&key, &forged), Err(TokenError::BadSignature));

        let other_key = [8u8; 32];
        assert_eq!(
            verify_token(&other_key, &token),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_verify_token_rejects_malformed() {
        let key = [7u8; 32];
        assert_eq!(verify_token(&key, "no-dot"), Err(TokenError::Malformed));
        assert_eq!(verify_token(&key, ".sig"), Err(TokenError::Malformed));
        assert_eq!(verify_token(&key, "a.b.c"), Err(TokenError::Malformed));
        assert_eq!(verify_token(&key, "a.!!!"), Err(TokenError::Malformed));
    }
}
