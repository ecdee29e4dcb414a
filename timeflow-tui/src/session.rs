use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use timeflow_client::{AccessClaims, Role, TimeflowClient};

use crate::store::LocalStore;

/// An authenticated identity. A value of this type only exists after a
/// decodable, non-expired token was verified in this process.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub claims: AccessClaims,
}

impl Session {
    pub fn role(&self) -> Role {
        self.claims.role
    }
}

/// Outcome of inspecting a persisted token. Absent, undecodable and expired
/// tokens all collapse to `NeedsRefresh`: the backend decides whether the
/// refresh cookie is still good.
#[derive(Debug)]
pub(crate) enum TokenCheck {
    Valid(AccessClaims),
    NeedsRefresh,
}

pub(crate) fn evaluate_token(token: Option<&str>, now: DateTime<Utc>) -> TokenCheck {
    let Some(token) = token else {
        return TokenCheck::NeedsRefresh;
    };

    match AccessClaims::decode(token) {
        Ok(claims) if !claims.is_expired(now) => TokenCheck::Valid(claims),
        Ok(_) => TokenCheck::NeedsRefresh,
        Err(e) => {
            tracing::debug!(%e, "persisted token is undecodable, treating as expired");
            TokenCheck::NeedsRefresh
        }
    }
}

/// Owns the access-token lifecycle: reads the persisted token, checks
/// expiry silently, exchanges it for a fresh one via the credentialed
/// refresh endpoint when stale.
pub struct SessionManager {
    store: LocalStore,
    refresh_lock: Mutex<()>,
}

impl SessionManager {
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Establish a session from the persisted token, refreshing it when
    /// absent, undecodable or expired. Every failure degrades to `None`;
    /// callers decide what to do with an unauthenticated start.
    pub async fn initialize_auth(&self, client: &TimeflowClient) -> Option<Session> {
        if let Some(session) = self.persisted_session() {
            return Some(session);
        }
        self.refresh_session(client).await
    }

    fn persisted_session(&self) -> Option<Session> {
        let token = self.store.token().unwrap_or_default()?;
        match evaluate_token(Some(&token), Utc::now()) {
            TokenCheck::Valid(claims) => Some(Session { token, claims }),
            TokenCheck::NeedsRefresh => None,
        }
    }

    /// Single-flight refresh: concurrent initializers serialize on the
    /// lock, and whoever loses the race re-evaluates the freshly persisted
    /// token instead of issuing a second refresh call.
    async fn refresh_session(&self, client: &TimeflowClient) -> Option<Session> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(session) = self.persisted_session() {
            return Some(session);
        }

        let access = match client.refresh().await {
            Ok(access) => access,
            Err(e) => {
                tracing::info!(%e, "silent token refresh failed");
                return None;
            }
        };

        let claims = match AccessClaims::decode(&access) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(%e, "refreshed token is undecodable");
                return None;
            }
        };

        self.persist(client, &access);
        Some(Session {
            token: access,
            claims,
        })
    }

    /// Explicit credential login. The token is assumed fresh at issuance,
    /// so no expiry check happens here. Unlike `initialize_auth`, failures
    /// surface to the caller.
    pub async fn login(
        &self,
        client: &TimeflowClient,
        username: &str,
        password: &str,
    ) -> Result<Session> {
        let access = client
            .login(username, password)
            .await
            .context("Login failed")?;
        let claims = AccessClaims::decode(&access).context("Server issued an unreadable token")?;

        self.persist(client, &access);
        Ok(Session {
            token: access,
            claims,
        })
    }

    pub fn logout(&self) -> Result<()> {
        self.store.clear_token()?;
        self.store.clear_refresh_cookie()?;
        Ok(())
    }

    fn persist(&self, client: &TimeflowClient, access: &str) {
        if let Err(e) = self.store.set_token(access) {
            tracing::warn!(%e, "could not persist access token");
        }
        if let Some(cookie) = client.refresh_cookie() {
            if let Err(e) = self.store.set_refresh_cookie(&cookie) {
                tracing::warn!(%e, "could not persist refresh cookie");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use chrono::TimeZone;

    fn make_token(exp: i64, role: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(
            r#"{{"exp":{},"user_id":1,"role":"{}"}}"#,
            exp, role
        ));
        format!("{}.{}.sig", header, payload)
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_600_000_000, 0).unwrap()
    }

    #[test]
    fn valid_token_authenticates_without_refresh() {
        let token = make_token(1_600_000_000 + 300, "manager");
        match evaluate_token(Some(&token), now()) {
            TokenCheck::Valid(claims) => assert_eq!(claims.role, Role::Manager),
            TokenCheck::NeedsRefresh => panic!("fresh token should not need refresh"),
        }
    }

    #[test]
    fn expired_token_needs_refresh() {
        let token = make_token(1_600_000_000 - 1, "employee");
        assert!(matches!(
            evaluate_token(Some(&token), now()),
            TokenCheck::NeedsRefresh
        ));
    }

    #[test]
    fn missing_and_undecodable_tokens_are_equivalent() {
        assert!(matches!(
            evaluate_token(None, now()),
            TokenCheck::NeedsRefresh
        ));
        assert!(matches!(
            evaluate_token(Some("garbage"), now()),
            TokenCheck::NeedsRefresh
        ));
    }
}
