//! Post-login security dashboard

use crate::app::Route;
use crate::components::StarFieldCanvas;
use crate::notice::use_notifier;
use crate::session::{SessionAction, SessionData, use_config, use_session};
use chrono::{DateTime, Utc};
use gloo::timers::callback::Interval;
use secure_auth_core::{Session, SessionCountdown};
use std::rc::Rc;
use yew::prelude::*;
use yew_router::prelude::*;

const CARD_CLASS: &str = "border border-teal-400/30 bg-slate-950/70 backdrop-blur-lg p-6 rounded-xl shadow-[0_0_20px_rgba(45,212,191,0.15)]";
const ROW_CLASS: &str = "flex items-center justify-between bg-black/40 p-3 rounded-lg border border-teal-400/20 hover:border-amber-300/50 transition-all";

struct DefenseItem {
    name: &'static str,
    status: &'static str,
}

const DEFENSES: [DefenseItem; 4] = [
    DefenseItem {
        name: "CORS",
        status: "ACTIVE",
    },
    DefenseItem {
        name: "Helmet",
        status: "ACTIVE",
    },
    DefenseItem {
        name: "Injection Protection",
        status: "ACTIVE",
    },
    DefenseItem {
        name: "Brute Force Lockout",
        status: "ENABLED",
    },
];

struct DirectoryUser {
    id: u32,
    username: &'static str,
    role: &'static str,
}

const DIRECTORY: [DirectoryUser; 3] = [
    DirectoryUser {
        id: 1,
        username: "admin_user",
        role: "admin",
    },
    DirectoryUser {
        id: 2,
        username: "john_doe",
        role: "user",
    },
    DirectoryUser {
        id: 3,
        username: "jane_smith",
        role: "user",
    },
];

/// Redirects to the entry screen when nobody is signed in
#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let session = use_session();

    match guard(&session) {
        Ok(current) => html! { <Dashboard session={current.clone()} /> },
        Err(route) => {
            tracing::debug!("No stored session, leaving dashboard");
            html! { <Redirect<Route> to={route} /> }
        }
    }
}

/// The session to show, or where to send a visitor without one
fn guard(data: &SessionData) -> Result<&Session, Route> {
    data.session.as_ref().ok_or(Route::Entry)
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct CountdownState(SessionCountdown);

enum CountdownAction {
    Tick,
    Extend { seconds: u64, now: DateTime<Utc> },
}

impl Reducible for CountdownState {
    type Action = CountdownAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut countdown = self.0.clone();
        match action {
            CountdownAction::Tick => {
                countdown.tick();
            }
            CountdownAction::Extend { seconds, now } => countdown.extend_by(seconds, now),
        }
        Rc::new(Self(countdown))
    }
}

#[derive(Properties, PartialEq)]
struct DashboardProps {
    session: Session,
}

#[function_component(Dashboard)]
fn dashboard(props: &DashboardProps) -> Html {
    let config = use_config();
    let session = use_session();
    let notifier = use_notifier();
    let navigator = use_navigator();

    let countdown = {
        let start = props.session.clone();
        use_reducer(move || CountdownState(start.countdown(Utc::now())))
    };

    // One tick per interval while mounted
    {
        let countdown = countdown.clone();
        use_effect_with(config.tick_interval_ms, move |&period| {
            let interval = Interval::new(period, move || countdown.dispatch(CountdownAction::Tick));
            move || drop(interval)
        });
    }

    {
        let notifier = notifier.clone();
        let session = session.clone();
        let navigator = navigator.clone();
        use_effect_with(countdown.0.is_expired(), move |&expired| {
            if expired {
                tracing::info!("Session expired, signing out");
                notifier.error("Session expired!", None);
                session.dispatch(SessionAction::SignedOut);
                if let Some(navigator) = navigator {
                    navigator.push(&Route::Entry);
                }
            }
        });
    }

    let on_extend = {
        let countdown = countdown.clone();
        let notifier = notifier.clone();
        let seconds = config.extend_seconds;
        Callback::from(move |_: MouseEvent| {
            countdown.dispatch(CountdownAction::Extend {
                seconds,
                now: Utc::now(),
            });
            notifier.success(format!("Session extended by {} minutes!", seconds / 60));
        })
    };

    let on_edit = {
        let notifier = notifier.clone();
        let is_admin = props.session.user.is_admin();
        Callback::from(move |_: MouseEvent| {
            if is_admin {
                notifier.success("Edit mode enabled");
            } else {
                tracing::warn!("Edit attempt without admin role");
                notifier.error(
                    "Access Denied: Admin privileges required",
                    Some("Unauthorized edit attempt blocked"),
                );
            }
        })
    };

    let on_logout = Callback::from(move |_: MouseEvent| {
        notifier.success("Logged out successfully!");
        session.dispatch(SessionAction::SignedOut);
        if let Some(navigator) = &navigator {
            navigator.push(&Route::Entry);
        }
    });

    let user = &props.session.user;

    html! {
        <div class="min-h-screen relative overflow-hidden bg-[#191970]">
            <StarFieldCanvas />

            <div class="relative z-10 min-h-screen p-6">
                <div class="max-w-7xl mx-auto space-y-6">
                    <div class="text-center space-y-3 mb-8">
                        <h1 class="text-4xl md:text-5xl font-bold text-amber-300">{"Security Monitoring Dashboard"}</h1>
                        <p class="text-slate-300 text-lg">{"Arabian Night Cyber Defense Console"}</p>
                    </div>

                    <div class="grid md:grid-cols-2 gap-6">
                        <section class={CARD_CLASS}>
                            <h2 class="text-xl text-amber-300 mb-4">{"⏱ Session & Token Console"}</h2>
                            <div class="space-y-4">
                                <div class="bg-black/40 p-4 rounded-lg border border-teal-400/20">
                                    <p class="text-slate-300 text-sm mb-2">{"Access Token expires in:"}</p>
                                    <p class="text-3xl font-bold text-teal-300 font-mono">{countdown.0.display()}</p>
                                </div>
                                <button
                                    class="w-full py-2 rounded-md bg-teal-500 hover:bg-teal-400 text-black"
                                    onclick={on_extend}
                                >
                                    {"Extend Session"}
                                </button>
                                <div class="bg-black/40 p-4 rounded-lg border border-teal-400/20 max-h-40 overflow-y-auto">
                                    <p class="text-xs text-slate-400 mb-2 uppercase tracking-wider">{"Token Refresh Log"}</p>
                                    { for countdown.0.log().iter().map(|entry| html! {
                                        <p class="text-xs text-slate-300 font-mono mb-1">{format!("→ {entry}")}</p>
                                    }) }
                                </div>
                            </div>
                        </section>

                        <section class={CARD_CLASS}>
                            <h2 class="text-xl text-amber-300 mb-4">{"👤 Authentication Info"}</h2>
                            <div class="space-y-4">
                                { info_row("Email", user.email.as_deref().unwrap_or("Not provided")) }
                                { info_row("Login Method", user.auth_method.label()) }
                                { info_row("IP Location", "Dubai, UAE (placeholder)") }
                            </div>
                        </section>

                        <section class={CARD_CLASS}>
                            <h2 class="text-xl text-amber-300 mb-4">{"🛡 Security Defense Radar"}</h2>
                            <div class="space-y-3">
                                { for DEFENSES.iter().map(|item| html! {
                                    <div key={item.name} class={ROW_CLASS}>
                                        <span class="font-medium">{item.name}</span>
                                        <span class="text-xs uppercase tracking-wider text-teal-300 font-bold">
                                            { if item.status == "ACTIVE" { "✔ " } else { "⚠ " } }
                                            {item.status}
                                        </span>
                                    </div>
                                }) }
                            </div>
                        </section>

                        <section class={CARD_CLASS}>
                            <h2 class="text-xl text-amber-300 mb-4">{"👥 Users Table"}</h2>
                            <div class="space-y-2">
                                { for DIRECTORY.iter().map(|entry| html! {
                                    <div key={entry.id} class={ROW_CLASS}>
                                        <div class="flex-1">
                                            <p class="font-medium">{entry.username}</p>
                                            <p class="text-xs text-slate-400">{format!("ID: {} • Role: {}", entry.id, entry.role)}</p>
                                        </div>
                                        <button
                                            class="ml-2 px-3 py-1 text-sm rounded-md border border-teal-400/40 hover:bg-teal-500/20"
                                            onclick={on_edit.clone()}
                                        >
                                            {"Edit"}
                                        </button>
                                    </div>
                                }) }
                            </div>
                        </section>
                    </div>

                    <div class="flex justify-center pt-6">
                        <button
                            class="px-6 py-2 rounded-md border border-amber-300/50 text-amber-200 hover:bg-amber-300/10"
                            onclick={on_logout}
                        >
                            {"Logout"}
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}

fn info_row(label: &'static str, value: &str) -> Html {
    html! {
        <div class="bg-black/40 p-3 rounded-lg border border-teal-400/20">
            <p class="text-xs text-slate-400 uppercase tracking-wider">{label}</p>
            <p class="font-medium">{value.to_string()}</p>
        </div>
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use crate::session::session_store;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn cleared_local_storage_redirects_to_entry() {
        session_store().clear().unwrap();

        let data = SessionData {
            session: session_store().load(),
        };
        assert_eq!(guard(&data), Err(Route::Entry));
    }
}
