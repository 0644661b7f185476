//! Contract with the remote authentication API
//!
//! Request and response shapes are explicit per endpoint. Response bodies
//! are validated here, at the boundary, so the rest of the crate only sees
//! well-formed grants.

use crate::session::{AccessToken, Session, UserProfile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /v1/auth/login` with email and password
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PasswordLogin {
    pub email: String,
    pub password: String,
}

/// `POST /v1/auth/login` with a phone number, asking for a one-time code
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeLogin {
    pub phone_number: String,
}

/// `POST /v1/auth/register` with email and password
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PasswordRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// `POST /v1/auth/register` with a phone number, asking for a one-time code
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRegistration {
    pub name: String,
    pub phone_number: String,
}

/// `POST /v1/auth/verify-otp-signup`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeVerification {
    pub name: String,
    pub phone_number: String,
    pub otp: String,
}

/// A successful authentication: token plus profile
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthGrant {
    pub access: AccessToken,
    pub user: UserProfile,
}

impl AuthGrant {
    /// Validate a success body that must carry an access grant
    pub fn from_value(body: Value) -> Result<Self, ApiError> {
        if body.get("access").is_none_or(Value::is_null) {
            return Err(ApiError::MissingAccess);
        }
        serde_json::from_value(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    pub fn into_session(self) -> Session {
        Session {
            access: self.access,
            user: self.user,
        }
    }
}

/// Test backends return the code they sent, as a string or a number
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
enum OtpValue {
    Text(String),
    Number(u64),
}

#[derive(Deserialize)]
struct CodeIssuedBody {
    #[serde(default)]
    otp: Option<OtpValue>,
    #[serde(default)]
    message: Option<String>,
}

/// Answer to a one-time code request
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeIssued {
    /// Echoed code, only present when the backend runs in test mode
    pub otp: Option<String>,
    pub message: Option<String>,
}

impl CodeIssued {
    pub fn from_value(body: Value) -> Result<Self, ApiError> {
        let body: CodeIssuedBody =
            serde_json::from_value(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        let otp = body.otp.map(|otp| match otp {
            OtpValue::Text(code) => code,
            OtpValue::Number(code) => code.to_string(),
        });
        Ok(Self {
            otp: otp.filter(|code| !code.is_empty()),
            message: body.message.filter(|message| !message.is_empty()),
        })
    }
}

/// Answer to a password registration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Registration {
    /// The account is active and signed in
    Granted(AuthGrant),
    /// The account needs verification before it can sign in
    Pending { message: Option<String> },
}

impl Registration {
    pub fn from_value(body: Value) -> Result<Self, ApiError> {
        if body.get("access").is_some_and(|access| !access.is_null()) {
            return AuthGrant::from_value(body).map(Self::Granted);
        }
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_string);
        Ok(Self::Pending { message })
    }
}

/// Failure talking to the auth API
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("Server returned status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The request never produced a response
    #[error("Request failed: {0}")]
    Transport(String),

    /// A success body without an access grant
    #[error("Access token missing")]
    MissingAccess,

    /// A success body that does not match the endpoint's shape
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Message text supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// The remote authentication service.
///
/// Browser futures are not `Send`, so the trait drops the bound on wasm.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait AuthApi {
    async fn login_with_password(&self, request: &PasswordLogin) -> Result<AuthGrant, ApiError>;

    async fn request_login_code(&self, request: &CodeLogin) -> Result<CodeIssued, ApiError>;

    async fn register_with_password(
        &self,
        request: &PasswordRegistration,
    ) -> Result<Registration, ApiError>;

    async fn request_signup_code(
        &self,
        request: &CodeRegistration,
    ) -> Result<CodeIssued, ApiError>;

    async fn verify_signup_code(&self, request: &CodeVerification)
    -> Result<AuthGrant, ApiError>;
}

// Mock implementation for testing
#[cfg(test)]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub AuthApi {}

        #[async_trait]
        impl AuthApi for AuthApi {
            async fn login_with_password(&self, request: &PasswordLogin) -> Result<AuthGrant, ApiError>;
            async fn request_login_code(&self, request: &CodeLogin) -> Result<CodeIssued, ApiError>;
            async fn register_with_password(&self, request: &PasswordRegistration) -> Result<Registration, ApiError>;
            async fn request_signup_code(&self, request: &CodeRegistration) -> Result<CodeIssued, ApiError>;
            async fn verify_signup_code(&self, request: &CodeVerification) -> Result<AuthGrant, ApiError>;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grant_body() -> Value {
        json!({
            "access": { "token": "tok", "expires": "2030-01-01T00:00:00.000Z" },
            "user": { "id": "1", "name": "Sinbad", "email": "sinbad@example.com", "role": "user", "authMethod": "email" }
        })
    }

    #[test]
    fn grant_requires_access() {
        let mut body = grant_body();
        body["access"] = Value::Null;
        assert_eq!(AuthGrant::from_value(body), Err(ApiError::MissingAccess));

        assert_eq!(
            AuthGrant::from_value(json!({ "message": "ok" })),
            Err(ApiError::MissingAccess)
        );
    }

    #[test]
    fn grant_parses_javascript_iso_timestamps() {
        let grant = AuthGrant::from_value(grant_body()).unwrap();
        assert_eq!(grant.access.token, "tok");
        assert_eq!(grant.user.name, "Sinbad");
    }

    #[test]
    fn grant_with_malformed_user_is_invalid() {
        let mut body = grant_body();
        body["user"] = json!("nobody");
        assert!(matches!(
            AuthGrant::from_value(body),
            Err(ApiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn code_accepts_numbers_and_strings() {
        let issued = CodeIssued::from_value(json!({ "otp": 123_456, "message": "sent" })).unwrap();
        assert_eq!(issued.otp.as_deref(), Some("123456"));
        assert_eq!(issued.message.as_deref(), Some("sent"));

        let issued = CodeIssued::from_value(json!({ "otp": "004211" })).unwrap();
        assert_eq!(issued.otp.as_deref(), Some("004211"));

        let issued = CodeIssued::from_value(json!({ "message": "OTP sent" })).unwrap();
        assert_eq!(issued.otp, None);
    }

    #[test]
    fn registration_without_access_is_pending() {
        let registration =
            Registration::from_value(json!({ "message": "Check your inbox" })).unwrap();
        assert_eq!(
            registration,
            Registration::Pending {
                message: Some("Check your inbox".to_string())
            }
        );

        let registration = Registration::from_value(grant_body()).unwrap();
        assert!(matches!(registration, Registration::Granted(_)));
    }

    #[test]
    fn blank_messages_are_dropped() {
        let issued = CodeIssued::from_value(json!({ "message": "" })).unwrap();
        assert_eq!(issued, CodeIssued::default());

        let registration = Registration::from_value(json!({ "message": "" })).unwrap();
        assert_eq!(registration, Registration::Pending { message: None });
    }

    #[test]
    fn requests_use_backend_field_names() {
        let body = serde_json::to_value(CodeVerification {
            name: "Ali".to_string(),
            phone_number: "9876543210".to_string(),
            otp: "1234".to_string(),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "name": "Ali", "phoneNumber": "9876543210", "otp": "1234" })
        );
    }

    #[test]
    fn server_message_ignores_blank_text() {
        let error = ApiError::Rejected {
            status: 401,
            message: Some(String::new()),
        };
        assert_eq!(error.server_message(), None);

        let error = ApiError::Rejected {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(error.server_message(), Some("Invalid credentials"));
        assert_eq!(ApiError::MissingAccess.server_message(), None);
    }
}
