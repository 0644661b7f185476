//! Secure Auth HTTP client
//!
//! A thin reqwest client for the remote authentication API. Response
//! bodies are handed to the typed constructors in `secure_auth_core::api`
//! so validation lives next to the contract.

pub mod client;

pub use client::AuthClient;
pub use client::error::ClientError;
