//! Password Hashing and Verification
//!
//! NIST SP 800-63B compliant password handling with:
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Tunable work factor ([`PasswordCost`])
//! - Zeroization of sensitive data
//! - Constant-time comparison (inside `argon2`)
//!
//! Hashing is CPU-bound and deliberately slow. Async callers should run
//! [`PasswordHasher::hash`] and [`PasswordHasher::verify`] on a blocking pool.

use std::fmt;
use std::sync::OnceLock;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier as _, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

// ============================================================================
// Constants (NIST SP 800-63B compliant)
// ============================================================================

/// Minimum password length (NIST: SHALL be at least 8)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (NIST: SHOULD permit at least 64)
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Decoy input for [`PasswordHasher::verify_dummy`]
const DUMMY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,

    #[error("Password is too common or follows a predictable pattern")]
    CommonPattern,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Hashing operation failed (entropy or internal failure)
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Stored credential is not a usable PHC string
    #[error("Invalid password hash format")]
    InvalidHashFormat,

    /// Work factor rejected by argon2
    #[error("Invalid password cost: {0}")]
    InvalidCost(String),
}

// ============================================================================
// Work factor
// ============================================================================

/// Argon2id work factor
///
/// Raising any field strengthens new hashes without touching the
/// interface; existing hashes keep verifying with the parameters embedded
/// in their PHC string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCost {
    /// Memory in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for PasswordCost {
    /// OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordCost {
    /// Minimal cost. Development and tests only.
    pub const fn insecure_fast() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn params(&self) -> Result<Params, PasswordHashError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordHashError::InvalidCost(e.to_string()))
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Create a new clear text password with policy validation
    ///
    /// Unicode is normalized using NFKC before validation. Rules:
    /// - Not empty/whitespace only
    /// - 8 to 128 code points
    /// - No control characters (space, tab and newline are allowed)
    /// - Not a trivially guessable pattern
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::unchecked(raw);
        let normalized = password.0.as_str();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        // NIST: count Unicode code points, not bytes
        let char_count = normalized.chars().count();
        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        if is_common_pattern(normalized) {
            return Err(PasswordPolicyError::CommonPattern);
        }

        Ok(password)
    }

    /// NFKC-normalize without applying the policy
    ///
    /// Used on the sign-in path, where a policy failure must not be
    /// distinguishable from a wrong password.
    pub fn unchecked(raw: String) -> Self {
        let mut raw = raw;
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// The PHC string embeds the algorithm, version, parameters, salt and hash,
/// so it is self-describing.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap a stored value without validating it
    ///
    /// A malformed value surfaces later as
    /// [`PasswordHashError::InvalidHashFormat`] from [`PasswordHasher::verify`].
    pub fn from_db(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// True when the hash is not Argon2id or was made with a weaker cost
    pub fn needs_rehash(&self, cost: &PasswordCost) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.hash) else {
            return true;
        };

        if parsed.algorithm != Algorithm::Argon2id.ident() {
            return true;
        }

        match Params::try_from(&parsed) {
            Ok(params) => {
                params.m_cost() < cost.memory_kib
                    || params.t_cost() < cost.iterations
                    || params.p_cost() < cost.parallelism
            }
            Err(_) => true,
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Argon2id password hasher
///
/// Holds the work factor and an optional application-wide pepper. Cheap to
/// share behind an `Arc`; it has no mutable state apart from the lazily
/// computed decoy hash.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    cost: PasswordCost,
    pepper: Option<Zeroizing<Vec<u8>>>,
    dummy: OnceLock<HashedPassword>,
}

impl PasswordHasher {
    pub fn new(cost: PasswordCost, pepper: Option<Vec<u8>>) -> Result<Self, PasswordHashError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, cost.params()?);
        Ok(Self {
            argon2,
            cost,
            pepper: pepper.map(Zeroizing::new),
            dummy: OnceLock::new(),
        })
    }

    pub fn cost(&self) -> &PasswordCost {
        &self.cost
    }

    /// Hash a password with a fresh random salt (128 bits)
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let input = self.peppered(password);
        let salt = SaltString::generate(OsRng);

        let hash = self
            .argon2
            .hash_password(&input, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }

    /// Verify a password against a stored hash
    ///
    /// Returns `Ok(false)` on mismatch and `Err(InvalidHashFormat)` when the
    /// stored value is not a usable PHC string.
    pub fn verify(
        &self,
        password: &ClearTextPassword,
        hashed: &HashedPassword,
    ) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(&hashed.hash)
            .map_err(|_| PasswordHashError::InvalidHashFormat)?;

        let input = self.peppered(password);
        match self.argon2.verify_password(&input, &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(_) => Err(PasswordHashError::InvalidHashFormat),
        }
    }

    /// Spend one verification against a decoy hash
    ///
    /// Keeps the sign-in latency for unknown accounts in line with the
    /// latency for known accounts. The result is always discarded.
    pub fn verify_dummy(&self, password: &ClearTextPassword) {
        let dummy = match self.dummy.get() {
            Some(hash) => hash,
            None => {
                let decoy = ClearTextPassword::unchecked(DUMMY_PASSWORD.to_string());
                match self.hash(&decoy) {
                    Ok(hash) => self.dummy.get_or_init(|| hash),
                    Err(_) => return,
                }
            }
        };
        let _ = self.verify(password, dummy);
    }

    fn peppered(&self, password: &ClearTextPassword) -> Zeroizing<Vec<u8>> {
        let mut combined = password.as_bytes().to_vec();
        if let Some(pepper) = &self.pepper {
            combined.extend_from_slice(pepper);
        }
        Zeroizing::new(combined)
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.cost)
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn is_common_pattern(password: &str) -> bool {
    let lower = password.to_lowercase();

    let mut chars = lower.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    if is_sequential_numbers(&lower) {
        return true;
    }

    const KEYBOARD_PATTERNS: &[&str] = &["qwerty", "asdfgh", "zxcvbn", "1qaz2wsx"];
    if KEYBOARD_PATTERNS.iter().any(|p| lower.contains(p)) {
        return true;
    }

    const COMMON_PASSWORDS: &[&str] = &[
        "password",
        "password1",
        "password123",
        "abcdefgh",
        "letmein1",
        "welcome1",
        "admin123",
        "iloveyou",
        "trustno1",
    ];
    COMMON_PASSWORDS.contains(&lower.as_str())
}

/// Whole string is a run of ascending or descending digits (wrapping 9/0)
fn is_sequential_numbers(s: &str) -> bool {
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let digits: Vec<u32> = s.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 4 {
        return false;
    }

    let ascending = digits.windows(2).all(|w| w[1] == (w[0] + 1) % 10);
    let descending = digits.windows(2).all(|w| w[0] == (w[1] + 1) % 10);
    ascending || descending
}
