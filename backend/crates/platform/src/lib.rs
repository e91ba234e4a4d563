//! Platform Crate - Technical Infrastructure
//!
//! Security primitives shared by the backend crates:
//! - Password hashing (Argon2id, NIST SP 800-63B policy)
//! - Signed bearer tokens (HS256 compact JWS)

pub mod crypto;
pub mod password;
pub mod token;
