//! Session model and its persistence

use crate::config::AppConfig;
use crate::countdown::SessionCountdown;
use crate::error::SessionResult;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bearer credential issued by the auth API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    /// Absolute expiry, ISO-8601 on the wire
    pub expires: DateTime<Utc>,
}

/// How the user proved their identity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    #[default]
    Email,
    Otp,
}

impl LoginMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Email => "Email/Password",
            Self::Otp => "OTP",
        }
    }
}

/// Profile returned alongside an access token
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    /// Absent for accounts created with a phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub is_email_verified: bool,
    #[serde(default)]
    pub is_phone_verified: bool,
    #[serde(default)]
    pub auth_method: LoginMethod,
}

fn default_role() -> String {
    "user".to_string()
}

impl UserProfile {
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

/// An authenticated session: token plus profile
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub access: AccessToken,
    pub user: UserProfile,
}

impl Session {
    pub fn countdown(&self, now: DateTime<Utc>) -> SessionCountdown {
        SessionCountdown::start(self.access.expires, now)
    }
}

/// Reads and writes the session through a [`KeyValueStore`].
///
/// The token and the profile live under two separate keys. A session only
/// exists when both are present and parse.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn backend(&self) -> &S {
        &self.store
    }

    /// Persist both halves of the session.
    ///
    /// If the profile cannot be written the token is removed again, so a
    /// failed save never leaves half a session behind.
    pub fn save(&self, session: &Session) -> SessionResult<()> {
        let access = serde_json::to_string(&session.access)?;
        let user = serde_json::to_string(&session.user)?;
        self.store.set(AppConfig::ACCESS_KEY, &access)?;
        if let Err(e) = self.store.set(AppConfig::USER_KEY, &user) {
            if let Err(cleanup) = self.store.remove(AppConfig::ACCESS_KEY) {
                tracing::warn!(error = %cleanup, "Could not roll back access token");
            }
            return Err(e.into());
        }
        tracing::debug!(user_id = %session.user.id, "Session saved");
        Ok(())
    }

    /// Load the session, failing on unreadable storage or corrupt entries
    pub fn try_load(&self) -> SessionResult<Option<Session>> {
        let (Some(access), Some(user)) = (
            self.store.get(AppConfig::ACCESS_KEY)?,
            self.store.get(AppConfig::USER_KEY)?,
        ) else {
            return Ok(None);
        };

        Ok(Some(Session {
            access: serde_json::from_str(&access)?,
            user: serde_json::from_str(&user)?,
        }))
    }

    /// Load the session, treating any failure as "signed out"
    pub fn load(&self) -> Option<Session> {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Discarding unreadable session");
            None
        })
    }

    /// Remove both keys
    pub fn clear(&self) -> SessionResult<()> {
        self.store.remove(AppConfig::USER_KEY)?;
        self.store.remove(AppConfig::ACCESS_KEY)?;
        tracing::debug!("Session cleared");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;

    pub fn expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap()
    }

    pub fn session() -> Session {
        Session {
            access: AccessToken {
                token: "tok_abc".to_string(),
                expires: expiry(),
            },
            user: UserProfile {
                id: "u-1".to_string(),
                name: "Scheherazade".to_string(),
                email: Some("sherry@example.com".to_string()),
                role: "user".to_string(),
                is_email_verified: true,
                is_phone_verified: false,
                auth_method: LoginMethod::Email,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{expiry, session};
    use super::*;
    use crate::storage::{MemoryStore, RejectingStore};
    use chrono::Duration;

    #[test]
    fn save_then_load_returns_the_session() {
        let sessions = SessionStore::new(MemoryStore::new());
        sessions.save(&session()).unwrap();

        assert!(sessions.backend().contains("user"));
        assert!(sessions.backend().contains("access"));
        assert_eq!(sessions.load(), Some(session()));
    }

    #[test]
    fn access_entry_uses_iso_expiry() {
        let sessions = SessionStore::new(MemoryStore::new());
        sessions.save(&session()).unwrap();

        let raw = sessions.backend().get("access").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["token"], "tok_abc");
        assert_eq!(value["expires"], "2030-01-01T12:00:00Z");
    }

    #[test]
    fn user_entry_is_camel_case() {
        let sessions = SessionStore::new(MemoryStore::new());
        sessions.save(&session()).unwrap();

        let raw = sessions.backend().get("user").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["authMethod"], "email");
        assert_eq!(value["isEmailVerified"], true);
    }

    #[test]
    fn failed_profile_write_rolls_back_the_token() {
        let store = RejectingStore::new("user");
        let sessions = SessionStore::new(&store);

        assert!(sessions.save(&session()).is_err());
        assert!(store.inner().is_empty());
        assert_eq!(sessions.load(), None);
    }

    #[test]
    fn failed_token_write_stores_nothing() {
        let store = RejectingStore::new("access");
        let sessions = SessionStore::new(&store);

        assert!(sessions.save(&session()).is_err());
        assert!(store.inner().is_empty());
    }

    #[test]
    fn missing_half_means_no_session() {
        let store = MemoryStore::new();
        let sessions = SessionStore::new(&store);
        sessions.save(&session()).unwrap();

        store.remove("user").unwrap();
        assert_eq!(sessions.load(), None);
    }

    #[test]
    fn corrupt_entry_means_no_session() {
        let store = MemoryStore::new();
        let sessions = SessionStore::new(&store);
        sessions.save(&session()).unwrap();
        store.set("access", "not json").unwrap();

        assert!(sessions.try_load().is_err());
        assert_eq!(sessions.load(), None);
    }

    #[test]
    fn clear_removes_both_keys() {
        let sessions = SessionStore::new(MemoryStore::new());
        sessions.save(&session()).unwrap();

        sessions.clear().unwrap();
        assert!(sessions.backend().is_empty());
        assert_eq!(sessions.load(), None);
    }

    #[test]
    fn profile_tolerates_phone_only_accounts() {
        let user: UserProfile = serde_json::from_str(
            r#"{"id":"42","name":"Aladdin","role":"admin","authMethod":"otp","isPhoneVerified":true}"#,
        )
        .unwrap();

        assert_eq!(user.email, None);
        assert_eq!(user.auth_method, LoginMethod::Otp);
        assert!(user.is_admin());
        assert!(!user.is_email_verified);
    }

    #[test]
    fn countdown_starts_from_token_expiry() {
        let now = expiry() - Duration::seconds(90);
        assert_eq!(session().countdown(now).remaining(), 90);
    }
}
