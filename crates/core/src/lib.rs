//! Secure Auth core types and utilities
//!
//! Everything here is host independent: the browser front end and any native
//! host drive the same star field, countdown and form flow.

pub mod api;
pub mod config;
pub mod countdown;
pub mod error;
pub mod flow;
pub mod session;
pub mod starfield;
pub mod storage;
#[cfg(not(target_arch = "wasm32"))]
pub mod tasks;

pub use api::{ApiError, AuthApi, AuthGrant, CodeIssued, Registration};
pub use config::AppConfig;
pub use countdown::{ActivityEntry, ActivityKind, SessionCountdown, Tick};
pub use error::{SessionError, StorageError};
pub use flow::{AuthForm, AuthMethod, AuthMode, FlowOutcome, FormField, Screen, Submission};
pub use session::{AccessToken, LoginMethod, Session, SessionStore, UserProfile};
pub use starfield::{Star, StarField, StreakColor, Surface, Viewport};
pub use storage::{KeyValueStore, MemoryStore};
