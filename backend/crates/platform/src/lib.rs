//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Content negotiation (does this request expect JSON?)
//! - Cookie management (session, flash and intended-URL cookies)
//! - Cryptographic utilities (SHA-256, HMAC-signed tokens, Base64)
//! - Password hashing (Argon2id, NIST SP 800-63B compliant)

pub mod cookie;
pub mod crypto;
pub mod negotiate;
pub mod password;
