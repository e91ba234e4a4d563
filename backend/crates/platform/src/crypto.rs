//! Encoding Utilities

use base64::{Engine, engine::general_purpose};

/// Decode standard base64 to bytes
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Decode unpadded base64url (JWS segment encoding)
pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_decodes_secret() {
        assert_eq!(from_base64("c2VjcmV0").unwrap(), b"secret");
        assert_eq!(from_base64("c2VjcmV0cw==").unwrap(), b"secrets");
        assert!(from_base64("not base64!").is_err());
    }

    #[test]
    fn test_base64url_jws_header() {
        let header = from_base64url("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9").unwrap();
        assert_eq!(header, br#"{"alg":"HS256","typ":"JWT"}"#);
    }
}
