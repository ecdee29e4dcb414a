use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role claim carried by every access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Manager,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }
}

/// Claims read from the payload segment of a bearer token. The backend signs
/// and verifies tokens; the client only decodes the payload to learn the
/// expiry and role, so no signature check happens here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub exp: i64,
    pub user_id: i64,
    pub role: Role,
}

#[derive(Error, Debug)]
pub enum TokenDecodeError {
    #[error("token is not a three-segment bearer token")]
    Malformed,
    #[error("payload segment is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not a valid claims object: {0}")]
    Payload(#[from] serde_json::Error),
}

impl AccessClaims {
    /// Decode the claims from the middle segment of a `header.payload.sig`
    /// token.
    pub fn decode(token: &str) -> Result<Self, TokenDecodeError> {
        let mut segments = token.split('.');
        let payload = match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(TokenDecodeError::Malformed),
        };

        let raw = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
        let claims = serde_json::from_slice(&raw)?;
        Ok(claims)
    }

    /// `exp` is seconds since the unix epoch. A token expiring exactly now
    /// counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_token(exp: i64, role: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"exp":{},"user_id":42,"role":"{}"}}"#,
            exp, role
        ));
        format!("{}.{}.signature", header, payload)
    }

    #[test]
    fn decodes_role_and_expiry() {
        let claims = AccessClaims::decode(&make_token(1_900_000_000, "manager")).unwrap();
        assert_eq!(claims.role, Role::Manager);
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.exp, 1_900_000_000);
    }

    #[test]
    fn rejects_token_without_exactly_three_segments() {
        assert!(matches!(
            AccessClaims::decode("not-a-token"),
            Err(TokenDecodeError::Malformed)
        ));
        assert!(matches!(
            AccessClaims::decode("a.b"),
            Err(TokenDecodeError::Malformed)
        ));

        let four = format!("{}.extra", make_token(1_900_000_000, "employee"));
        assert!(matches!(
            AccessClaims::decode(&four),
            Err(TokenDecodeError::Malformed)
        ));
    }

    #[test]
    fn rejects_garbage_payload() {
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode("not json"));
        assert!(matches!(
            AccessClaims::decode(&token),
            Err(TokenDecodeError::Payload(_))
        ));
    }

    #[test]
    fn expiry_is_inclusive_of_now() {
        let claims = AccessClaims::decode(&make_token(1_000, "employee")).unwrap();
        let before = Utc.timestamp_opt(999, 0).unwrap();
        let at = Utc.timestamp_opt(1_000, 0).unwrap();
        assert!(!claims.is_expired(before));
        assert!(claims.is_expired(at));
    }
}
