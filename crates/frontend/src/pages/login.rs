//! Sign in / sign up page

use crate::app::Route;
use crate::components::{LoadingSpinner, StarFieldCanvas};
use crate::session::{SessionAction, session_store, use_config, use_session};
use secure_auth_core::flow::{
    self, AuthForm, AuthMethod, AuthMode, FlowOutcome, FormField, Submission,
};
use secure_auth_http::AuthClient;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

const INPUT_CLASS: &str = "w-full p-3 rounded-md bg-[#0b1a2a] text-gray-200";
const PANEL_CLASS: &str =
    "p-6 bg-[#001122]/40 border border-[#00ffff22] rounded-xl shadow-xl backdrop-blur-md";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct LoginState {
    form: AuthForm,
    /// Request waiting to be sent, tagged so repeated identical
    /// submissions still trigger the effect
    pending: Option<(u32, Submission)>,
    next_ticket: u32,
}

enum LoginAction {
    SelectMode(AuthMode),
    SelectMethod(AuthMethod),
    SetField(FormField, String),
    Submit,
    RequestCode,
    Finish(FlowOutcome),
}

impl Reducible for LoginState {
    type Action = LoginAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            LoginAction::SelectMode(mode) => next.form.select_mode(mode),
            LoginAction::SelectMethod(method) => next.form.select_method(method),
            LoginAction::SetField(field, value) => next.form.set_field(field, value),
            LoginAction::Submit => {
                let submission = next.form.begin_submit();
                next.queue(submission);
            }
            LoginAction::RequestCode => {
                let submission = next.form.begin_code_request();
                next.queue(submission);
            }
            LoginAction::Finish(outcome) => {
                next.form.finish(&outcome);
                next.pending = None;
            }
        }
        Rc::new(next)
    }
}

impl LoginState {
    fn queue(&mut self, submission: Option<Submission>) {
        if let Some(submission) = submission {
            self.pending = Some((self.next_ticket, submission));
            self.next_ticket = self.next_ticket.wrapping_add(1);
        }
    }
}

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let config = use_config();
    let session = use_session();
    let navigator = use_navigator();
    let state = use_reducer(LoginState::default);

    let client = use_memo(config.api_base_url.clone(), |url| {
        AuthClient::new(url.clone())
            .inspect_err(|e| tracing::error!(error = %e, "Invalid API configuration"))
            .ok()
    });

    // Send whatever the form queued
    {
        let state = state.clone();
        use_effect_with(state.pending.clone(), move |pending| {
            if let Some((_, submission)) = pending.clone() {
                let client = (*client).clone();
                spawn_local(async move {
                    let outcome = match client {
                        Some(client) => flow::run(&client, &session_store(), submission).await,
                        None => FlowOutcome::Failed(submission.fallback().to_string()),
                    };
                    let destination = outcome.destination();
                    state.dispatch(LoginAction::Finish(outcome.clone()));

                    if let FlowOutcome::Authenticated(granted) = outcome {
                        session.dispatch(SessionAction::Established(granted));
                    }
                    if let (Some(screen), Some(navigator)) = (destination, navigator) {
                        navigator.push(&Route::from(screen));
                    }
                });
            }
        });
    }

    let form = &state.form;

    let select_mode = |mode: AuthMode| {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| state.dispatch(LoginAction::SelectMode(mode)))
    };
    let select_method = |method: AuthMethod| {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| state.dispatch(LoginAction::SelectMethod(method)))
    };

    let on_submit = {
        let state = state.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            state.dispatch(LoginAction::Submit);
        })
    };

    let on_generate = {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| state.dispatch(LoginAction::RequestCode))
    };

    let input = |field: FormField, kind: &'static str, placeholder: Option<&'static str>| {
        let oninput = {
            let state = state.clone();
            Callback::from(move |e: InputEvent| {
                let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                state.dispatch(LoginAction::SetField(field, input.value()));
            })
        };
        html! {
            <>
                <label class="text-gray-300">{field.label()}</label>
                <input
                    type={kind}
                    class={INPUT_CLASS}
                    value={form.field(field).to_string()}
                    placeholder={placeholder}
                    {oninput}
                    required=true
                />
            </>
        }
    };

    let fields = form
        .required_fields()
        .iter()
        .map(|&field| match field {
            FormField::Email => input(field, "email", None),
            FormField::Password => input(field, "password", None),
            FormField::PhoneNumber => html! {
                <>
                    { input(field, "tel", Some("e.g. 9876543210")) }
                    <div class="flex justify-end">
                        <button
                            type="button"
                            class="px-4 py-2 bg-teal-500 text-black rounded-md shadow"
                            onclick={on_generate.clone()}
                        >
                            {"Generate OTP"}
                        </button>
                    </div>
                </>
            },
            FormField::Name | FormField::Otp => input(field, "text", None),
        })
        .collect::<Html>();

    html! {
        <div class="relative w-full min-h-screen overflow-hidden bg-[#02040a]">
            <StarFieldCanvas />

            <div class="relative z-10 flex flex-col items-center pt-16 text-center text-[#ffcc63]">
                <h1 class="text-5xl font-bold drop-shadow-lg">{"SECURE AUTH SYSTEM"}</h1>
                <p class="mt-2 text-lg text-gray-300">{"Enter the realm of secure authentication"}</p>
            </div>

            <div class="relative z-10 flex flex-wrap justify-center gap-10 mt-10 px-4 pb-24">
                <div class={classes!("w-[420px]", PANEL_CLASS)}>
                    <p class="text-[#ffcc63] font-semibold text-sm">{"● SYSTEM MESSAGE"}</p>
                    <p class="mt-3 text-gray-200 leading-relaxed">{&form.system_message}</p>
                    if let Some(error) = &form.error {
                        <p class="mt-3 text-red-400">{error}</p>
                    }
                </div>

                <div class={classes!("w-[480px]", PANEL_CLASS)}>
                    <div class="flex gap-4 mb-5">
                        <button type="button" class={tab_class(form.mode == AuthMode::SignIn)} onclick={select_mode(AuthMode::SignIn)}>
                            {"Sign In"}
                        </button>
                        <button type="button" class={tab_class(form.mode == AuthMode::SignUp)} onclick={select_mode(AuthMode::SignUp)}>
                            {"Sign Up"}
                        </button>
                    </div>

                    <div class="flex gap-4 mb-5">
                        <button type="button" class={tab_class(form.method == AuthMethod::Password)} onclick={select_method(AuthMethod::Password)}>
                            {"Email/Password"}
                        </button>
                        <button type="button" class={tab_class(form.method == AuthMethod::Otp)} onclick={select_method(AuthMethod::Otp)}>
                            {"OTP"}
                        </button>
                    </div>

                    <form onsubmit={on_submit} class="flex flex-col gap-4">
                        { fields }
                        <button
                            type="submit"
                            class="w-full py-3 mt-3 bg-teal-500 text-black rounded-md disabled:opacity-70"
                            disabled={form.loading()}
                        >
                            if form.loading() {
                                <LoadingSpinner text={Some(form.submit_label().to_string())} />
                            } else {
                                {form.submit_label()}
                            }
                        </button>
                    </form>
                </div>
            </div>

            <p class="absolute bottom-5 w-full text-center text-gray-400 text-sm z-10">
                {"── Protected by Arabian Night Security ──"}
            </p>
        </div>
    }
}

fn tab_class(active: bool) -> Classes {
    let colors = if active {
        "bg-teal-500 text-black"
    } else {
        "bg-[#002233] text-gray-300"
    };
    classes!("w-1/2", "py-2", "rounded-md", "transition-all", colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reduce(state: Rc<LoginState>, action: LoginAction) -> Rc<LoginState> {
        state.reduce(action)
    }

    fn filled() -> Rc<LoginState> {
        let state = Rc::new(LoginState::default());
        let state = reduce(state, LoginAction::SetField(FormField::Email, "a@b.c".to_string()));
        reduce(state, LoginAction::SetField(FormField::Password, "pw".to_string()))
    }

    #[test]
    fn submit_queues_one_request() {
        let state = reduce(filled(), LoginAction::Submit);
        assert!(matches!(state.pending, Some((0, Submission::PasswordLogin(_)))));
        assert!(state.form.loading());

        // Still loading, so nothing new is queued
        let again = reduce(state.clone(), LoginAction::Submit);
        assert_eq!(again.pending, state.pending);
    }

    #[test]
    fn finish_clears_the_queue() {
        let state = reduce(filled(), LoginAction::Submit);
        let failed = FlowOutcome::Failed("Login failed".to_string());
        let state = reduce(state, LoginAction::Finish(failed));

        assert_eq!(state.pending, None);
        assert_eq!(state.form.error.as_deref(), Some("Login failed"));

        let state = reduce(state, LoginAction::Submit);
        assert!(matches!(state.pending, Some((1, _))));
    }

    #[test]
    fn blank_form_queues_nothing() {
        let state = reduce(Rc::new(LoginState::default()), LoginAction::Submit);
        assert_eq!(state.pending, None);
        assert!(state.form.error.is_some());
    }
}
