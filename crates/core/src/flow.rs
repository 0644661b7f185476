//! Sign-in / sign-up form flow
//!
//! Two modes (sign in, sign up) crossed with two methods (password,
//! one-time code). [`AuthForm`] holds what the user typed and what the
//! system message panel shows; [`run`] performs one request against an
//! [`AuthApi`] and persists the session on success.

use crate::api::{
    ApiError, AuthApi, CodeIssued, CodeLogin, CodeRegistration, CodeVerification,
    PasswordLogin, PasswordRegistration, Registration,
};
use crate::session::{Session, SessionStore};
use crate::storage::KeyValueStore;

pub const WELCOME_MESSAGE: &str =
    "Welcome to Secure Auth System. Experience the mystique of Arabian nights.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

impl AuthMode {
    const fn greeting(self) -> &'static str {
        match self {
            Self::SignIn => "Welcome back. Choose a sign in method (email or OTP).",
            Self::SignUp => "Create an account. Choose Email signup or OTP signup.",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthMethod {
    #[default]
    Password,
    Otp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Password,
    PhoneNumber,
    Otp,
}

impl FormField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Password => "Password",
            Self::PhoneNumber => "Phone Number",
            Self::Otp => "OTP",
        }
    }
}

/// Where the application should be after an outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Entry,
    Dashboard,
}

impl Screen {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Entry => "/",
            Self::Dashboard => "/dashboard",
        }
    }
}

/// A request snapshot taken when the user submits
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    PasswordLogin(PasswordLogin),
    PasswordSignup(PasswordRegistration),
    VerifyCode(CodeVerification),
    RequestLoginCode(CodeLogin),
    RequestSignupCode(CodeRegistration),
}

impl Submission {
    /// Message shown when the request fails without a server message
    pub const fn fallback(&self) -> &'static str {
        match self {
            Self::PasswordLogin(_) => "Login failed",
            Self::PasswordSignup(_) => "Signup failed",
            Self::VerifyCode(_) => "OTP verification failed",
            Self::RequestLoginCode(_) | Self::RequestSignupCode(_) => {
                "Failed to generate OTP. Try again."
            }
        }
    }

    const fn kind(&self) -> InFlight {
        match self {
            Self::PasswordLogin(_) => InFlight::Login,
            Self::PasswordSignup(_) => InFlight::Signup,
            Self::VerifyCode(_) => InFlight::Verify,
            Self::RequestLoginCode(_) | Self::RequestSignupCode(_) => InFlight::Code,
        }
    }
}

/// Result of one round trip to the auth API
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Session granted and persisted
    Authenticated(Session),
    /// Account created, verification still required
    Pending(String),
    /// A one-time code was sent. `code` is set when the backend echoes it.
    CodeIssued {
        code: Option<String>,
        message: String,
    },
    Failed(String),
}

impl FlowOutcome {
    pub const fn destination(&self) -> Option<Screen> {
        match self {
            Self::Authenticated(_) => Some(Screen::Dashboard),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InFlight {
    Login,
    Signup,
    Verify,
    Code,
}

/// State of the authentication panel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub method: AuthMethod,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub otp: String,
    pub system_message: String,
    pub error: Option<String>,
    in_flight: Option<InFlight>,
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            mode: AuthMode::default(),
            method: AuthMethod::default(),
            name: String::new(),
            email: String::new(),
            password: String::new(),
            phone_number: String::new(),
            otp: String::new(),
            system_message: WELCOME_MESSAGE.to_string(),
            error: None,
            in_flight: None,
        }
    }
}

impl AuthForm {
    pub const fn loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Switch between sign in and sign up. Always lands on the password
    /// method with a fresh greeting.
    pub fn select_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        self.method = AuthMethod::Password;
        self.error = None;
        self.system_message = mode.greeting().to_string();
    }

    pub fn select_method(&mut self, method: AuthMethod) {
        self.method = method;
    }

    pub fn set_field(&mut self, field: FormField, value: String) {
        *self.field_mut(field) = value;
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Password => &self.password,
            FormField::PhoneNumber => &self.phone_number,
            FormField::Otp => &self.otp,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Password => &mut self.password,
            FormField::PhoneNumber => &mut self.phone_number,
            FormField::Otp => &mut self.otp,
        }
    }

    /// Fields the visible form variant marks as required
    pub fn required_fields(&self) -> &'static [FormField] {
        match (self.mode, self.method) {
            (AuthMode::SignIn, AuthMethod::Password) => &[FormField::Email, FormField::Password],
            (AuthMode::SignUp, AuthMethod::Password) => {
                &[FormField::Name, FormField::Email, FormField::Password]
            }
            (AuthMode::SignIn, AuthMethod::Otp) => &[FormField::PhoneNumber, FormField::Otp],
            (AuthMode::SignUp, AuthMethod::Otp) => {
                &[FormField::Name, FormField::PhoneNumber, FormField::Otp]
            }
        }
    }

    /// Label for the main submit button
    pub const fn submit_label(&self) -> &'static str {
        if self.loading() {
            return "Please wait...";
        }
        match self.mode {
            AuthMode::SignIn => "Sign In",
            AuthMode::SignUp => "Create Account",
        }
    }

    /// Snapshot the request for the visible form variant.
    ///
    /// Returns `None` while another request is in flight or when a
    /// required field is blank.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if self.loading() {
            return None;
        }
        if let Some(field) = self
            .required_fields()
            .iter()
            .find(|field| self.field(**field).trim().is_empty())
        {
            self.error = Some(format!("{} is required.", field.label()));
            return None;
        }

        let submission = match (self.mode, self.method) {
            (AuthMode::SignIn, AuthMethod::Password) => Submission::PasswordLogin(PasswordLogin {
                email: self.email.clone(),
                password: self.password.clone(),
            }),
            (AuthMode::SignUp, AuthMethod::Password) => {
                Submission::PasswordSignup(PasswordRegistration {
                    name: self.name.clone(),
                    email: self.email.clone(),
                    password: self.password.clone(),
                })
            }
            // Both modes verify through the signup endpoint
            (_, AuthMethod::Otp) => Submission::VerifyCode(CodeVerification {
                name: self.name.clone(),
                phone_number: self.phone_number.clone(),
                otp: self.otp.clone(),
            }),
        };

        self.error = None;
        self.in_flight = Some(submission.kind());
        Some(submission)
    }

    /// Snapshot a "Generate OTP" request for the current mode
    pub fn begin_code_request(&mut self) -> Option<Submission> {
        if self.loading() {
            return None;
        }
        if self.phone_number.trim().is_empty() {
            self.system_message = "Enter phone number before generating OTP.".to_string();
            return None;
        }

        let submission = match self.mode {
            AuthMode::SignIn => Submission::RequestLoginCode(CodeLogin {
                phone_number: self.phone_number.clone(),
            }),
            AuthMode::SignUp => Submission::RequestSignupCode(CodeRegistration {
                name: self.name.clone(),
                phone_number: self.phone_number.clone(),
            }),
        };

        self.system_message = "Generating OTP...".to_string();
        self.in_flight = Some(InFlight::Code);
        Some(submission)
    }

    /// Apply the outcome of the request started by `begin_*`
    pub fn finish(&mut self, outcome: &FlowOutcome) {
        let in_flight = self.in_flight.take();

        match outcome {
            FlowOutcome::Authenticated(_) => {
                self.system_message = match in_flight {
                    Some(InFlight::Signup) => "Signup successful. Redirecting...",
                    Some(InFlight::Verify) => "Verification successful. Redirecting...",
                    _ => "Login successful. Redirecting...",
                }
                .to_string();
            }
            FlowOutcome::Pending(message) => {
                self.system_message.clone_from(message);
            }
            FlowOutcome::CodeIssued { code, message } => {
                if let Some(code) = code {
                    self.otp.clone_from(code);
                }
                self.system_message.clone_from(message);
            }
            FlowOutcome::Failed(message) => {
                // Code requests only report through the message panel
                if in_flight != Some(InFlight::Code) {
                    self.error = Some(message.clone());
                }
                self.system_message.clone_from(message);
            }
        }
    }
}

/// Perform one submission against the API.
///
/// A granted session is written to `sessions` before returning, so a
/// caller acting on [`FlowOutcome::destination`] always finds it stored.
pub async fn run<A, S>(api: &A, sessions: &SessionStore<S>, submission: Submission) -> FlowOutcome
where
    A: AuthApi + ?Sized,
    S: KeyValueStore,
{
    let fallback = submission.fallback();
    let result = match &submission {
        Submission::PasswordLogin(request) => api
            .login_with_password(request)
            .await
            .map(Registration::Granted),
        Submission::PasswordSignup(request) => api.register_with_password(request).await,
        Submission::VerifyCode(request) => api
            .verify_signup_code(request)
            .await
            .map(Registration::Granted),
        Submission::RequestLoginCode(request) => {
            return code_outcome(api.request_login_code(request).await, fallback);
        }
        Submission::RequestSignupCode(request) => {
            return code_outcome(api.request_signup_code(request).await, fallback);
        }
    };

    match result {
        Ok(Registration::Granted(grant)) => {
            let session = grant.into_session();
            match sessions.save(&session) {
                Ok(()) => {
                    tracing::info!(user_id = %session.user.id, "Signed in");
                    FlowOutcome::Authenticated(session)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to persist session");
                    FlowOutcome::Failed(fallback.to_string())
                }
            }
        }
        Ok(Registration::Pending { message }) => FlowOutcome::Pending(
            message.unwrap_or_else(|| "Signup initiated. Please verify.".to_string()),
        ),
        Err(e) => failure(&e, fallback),
    }
}

fn code_outcome(
    result: Result<CodeIssued, ApiError>,
    fallback: &'static str,
) -> FlowOutcome {
    match result {
        Ok(issued) => {
            if let Some(code) = &issued.otp {
                tracing::debug!(%code, "Backend echoed one-time code");
                FlowOutcome::CodeIssued {
                    code: Some(code.clone()),
                    message: "OTP received (testing), autofilled.".to_string(),
                }
            } else {
                FlowOutcome::CodeIssued {
                    code: None,
                    message: issued
                        .message
                        .unwrap_or_else(|| "OTP sent! Check your phone.".to_string()),
                }
            }
        }
        Err(e) => failure(&e, fallback),
    }
}

fn failure(error: &ApiError, fallback: &str) -> FlowOutcome {
    tracing::warn!(error = %error, "Auth request failed");
    FlowOutcome::Failed(error.server_message().unwrap_or(fallback).to_string())
}
