//! Authentication endpoints

use super::AuthClient;
use async_trait::async_trait;
use secure_auth_core::api::{
    ApiError, AuthApi, AuthGrant, CodeIssued, CodeLogin, CodeRegistration, CodeVerification,
    PasswordLogin, PasswordRegistration, Registration,
};

const LOGIN_PATH: &str = "/v1/auth/login";
const REGISTER_PATH: &str = "/v1/auth/register";
const VERIFY_SIGNUP_PATH: &str = "/v1/auth/verify-otp-signup";

// Login and register double as "send me a code" endpoints; the backend
// branches on the payload shape.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AuthApi for AuthClient {
    async fn login_with_password(&self, request: &PasswordLogin) -> Result<AuthGrant, ApiError> {
        let body = self.post_json(LOGIN_PATH, request).await?;
        AuthGrant::from_value(body)
    }

    async fn request_login_code(&self, request: &CodeLogin) -> Result<CodeIssued, ApiError> {
        let body = self.post_json(LOGIN_PATH, request).await?;
        CodeIssued::from_value(body)
    }

    async fn register_with_password(
        &self,
        request: &PasswordRegistration,
    ) -> Result<Registration, ApiError> {
        let body = self.post_json(REGISTER_PATH, request).await?;
        Registration::from_value(body)
    }

    async fn request_signup_code(
        &self,
        request: &CodeRegistration,
    ) -> Result<CodeIssued, ApiError> {
        let body = self.post_json(REGISTER_PATH, request).await?;
        CodeIssued::from_value(body)
    }

    async fn verify_signup_code(
        &self,
        request: &CodeVerification,
    ) -> Result<AuthGrant, ApiError> {
        let body = self.post_json(VERIFY_SIGNUP_PATH, request).await?;
        AuthGrant::from_value(body)
    }
}
