//! Global session context and provider

use crate::storage::BrowserStore;
use secure_auth_core::{AppConfig, Session, SessionStore};
use std::rc::Rc;
use yew::prelude::*;

/// Session persisted in local storage
pub fn session_store() -> SessionStore<BrowserStore> {
    SessionStore::new(BrowserStore)
}

/// Session context data
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SessionData {
    pub session: Option<Session>,
}

/// Session context actions
pub enum SessionAction {
    /// A session was granted and already persisted
    Established(Session),
    SignedOut,
}

/// Session context
pub type SessionContext = UseReducerHandle<SessionData>;

impl Reducible for SessionData {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            SessionAction::Established(session) => Rc::new(Self {
                session: Some(session),
            }),
            SessionAction::SignedOut => {
                if let Err(e) = session_store().clear() {
                    tracing::warn!(error = %e, "Failed to clear stored session");
                }
                Rc::new(Self { session: None })
            }
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Children,
}

/// Provides the session and the application configuration
#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    // Read once at mount
    let session = use_reducer(|| SessionData {
        session: session_store().load(),
    });
    let config = use_memo((), |_| AppConfig::from_env());

    html! {
        <ContextProvider<Rc<AppConfig>> context={config}>
            <ContextProvider<SessionContext> context={session}>
                {props.children.clone()}
            </ContextProvider<SessionContext>>
        </ContextProvider<Rc<AppConfig>>>
    }
}

/// Hook to use the session context
#[hook]
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
        .expect("SessionContext not found. Make sure to wrap your component with SessionProvider")
}

/// Hook to read the application configuration
#[hook]
pub fn use_config() -> Rc<AppConfig> {
    use_context::<Rc<AppConfig>>()
        .expect("AppConfig not found. Make sure to wrap your component with SessionProvider")
}
