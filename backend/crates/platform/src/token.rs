//! Signed Bearer Tokens
//!
//! Compact JWS (`header.payload.signature`, base64url segments) signed with
//! HMAC-SHA256. Claims are caller-defined; the codec only insists on a
//! numeric `exp` and rejects any other algorithm, including `none`.

use std::fmt;

use chrono::Utc;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::crypto::from_base64url;

/// The only algorithm this codec signs with or accepts
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Signing secret must not be empty")]
    EmptySecret,

    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token algorithm is not accepted")]
    AlgorithmMismatch,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Serialize claims into a signed token and back
pub trait TokenCodec: Send + Sync {
    fn sign<C: Serialize>(&self, claims: &C) -> Result<String, TokenError>;

    /// Verify signature, algorithm and expiry, then decode the claims
    fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError>;
}

/// HS256 codec over a shared secret
#[derive(Clone)]
pub struct HmacTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl HmacTokenCodec {
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        // Audience is carried for consumers; this service does not gate on it.
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        })
    }
}

#[derive(Deserialize)]
struct JoseHeader {
    alg: String,
}

/// Read the `alg` of the first segment before handing the token to the
/// verifier, so `none` and foreign algorithms get their own error.
fn check_algorithm(token: &str) -> Result<(), TokenError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::Malformed);
    };

    let bytes = from_base64url(header).map_err(|_| TokenError::Malformed)?;
    let header: JoseHeader = serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)?;

    if header.alg != "HS256" {
        return Err(TokenError::AlgorithmMismatch);
    }
    Ok(())
}

impl TokenCodec for HmacTokenCodec {
    fn sign<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        check_algorithm(token)?;

        let data = decode::<serde_json::Value>(token, &self.decoding, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidAlgorithm => TokenError::AlgorithmMismatch,
                _ => TokenError::Malformed,
            },
        )?;

        // Valid only while now < exp.
        let exp = data
            .claims
            .get("exp")
            .and_then(serde_json::Value::as_i64)
            .ok_or(TokenError::Malformed)?;
        if exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        serde_json::from_value(data.claims).map_err(|_| TokenError::Malformed)
    }
}

impl fmt::Debug for HmacTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacTokenCodec")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct TestClaims {
        sub: String,
        role: String,
        exp: i64,
    }

    fn claims(ttl: i64) -> TestClaims {
        TestClaims {
            sub: "42".to_string(),
            role: "admin".to_string(),
            exp: Utc::now().timestamp() + ttl,
        }
    }

    fn codec() -> HmacTokenCodec {
        HmacTokenCodec::new(b"test-secret").unwrap()
    }

    #[test]
    fn test_sign_and_verify() {
        let codec = codec();
        let original = claims(600);
        let token = codec.sign(&original).unwrap();

        assert_eq!(token.split('.').count(), 3);
        let decoded: TestClaims = codec.verify(&token).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = codec().sign(&claims(600)).unwrap();
        let other = HmacTokenCodec::new(b"other-secret").unwrap();

        assert_eq!(
            other.verify::<TestClaims>(&token),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_expired_rejected() {
        let codec = codec();
        let token = codec.sign(&claims(-10)).unwrap();
        assert_eq!(codec.verify::<TestClaims>(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_expiry_boundary_is_exclusive() {
        let codec = codec();
        let token = codec.sign(&claims(0)).unwrap();
        assert_eq!(codec.verify::<TestClaims>(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_missing_exp_rejected() {
        #[derive(Serialize)]
        struct NoExp {
            sub: String,
        }
        let codec = codec();
        let token = codec
            .sign(&NoExp {
                sub: "42".to_string(),
            })
            .unwrap();
        assert_eq!(
            codec.verify::<TestClaims>(&token),
            Err(TokenError::Malformed)
        );
    }

    #[test]
    fn test_other_hmac_algorithm_rejected() {
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims(600),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(
            codec().verify::<TestClaims>(&token),
            Err(TokenError::AlgorithmMismatch)
        );
    }

    #[test]
    fn test_alg_none_rejected() {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims(600)).unwrap());
        let token = format!("{header}.{payload}.");

        assert_eq!(
            codec().verify::<TestClaims>(&token),
            Err(TokenError::AlgorithmMismatch)
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = codec();
        let token = codec.sign(&claims(600)).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let mut forged = claims(600);
        forged.sub = "1".to_string();
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert_eq!(
            codec.verify::<TestClaims>(&tampered),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = codec();
        for token in ["", "abc", "a.b", "a.b.c.d", "!!!.???.***"] {
            assert_eq!(
                codec.verify::<TestClaims>(token),
                Err(TokenError::Malformed),
                "{token:?}"
            );
        }
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            HmacTokenCodec::new(b""),
            Err(TokenError::EmptySecret)
        ));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let output = format!("{:?}", codec());
        assert!(output.contains("REDACTED"));
        assert!(!output.contains("test-secret"));
    }
}
