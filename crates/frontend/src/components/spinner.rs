//! Loading spinner component

use yew::prelude::*;

#[derive(Properties, Clone, PartialEq)]
pub struct SpinnerProps {
    #[prop_or_default]
    pub text: Option<String>,
}

#[function_component(LoadingSpinner)]
pub fn loading_spinner(props: &SpinnerProps) -> Html {
    html! {
        <span class="inline-flex items-center gap-2">
            <span class="w-4 h-4 border-2 border-purple-300/40 border-t-purple-200 rounded-full animate-spin"></span>
            if let Some(text) = &props.text {
                <span>{text}</span>
            }
        </span>
    }
}
