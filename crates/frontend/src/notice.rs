//! Toast notices
//!
//! Notices are pushed through [`Notifier`] and stack in the top right
//! corner. Each one dismisses itself after the configured timeout.

use crate::session::use_config;
use gloo::timers::callback::Timeout;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub id: u32,
    pub kind: NoticeKind,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeList {
    next_id: u32,
    notices: Vec<Notice>,
}

impl NoticeList {
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }
}

pub enum NoticeAction {
    Push {
        kind: NoticeKind,
        title: String,
        description: Option<String>,
    },
    Dismiss(u32),
}

impl Reducible for NoticeList {
    type Action = NoticeAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            NoticeAction::Push {
                kind,
                title,
                description,
            } => {
                let mut notices = self.notices.clone();
                notices.push(Notice {
                    id: self.next_id,
                    kind,
                    title,
                    description,
                });
                Rc::new(Self {
                    next_id: self.next_id.wrapping_add(1),
                    notices,
                })
            }
            NoticeAction::Dismiss(id) => Rc::new(Self {
                next_id: self.next_id,
                notices: self
                    .notices
                    .iter()
                    .filter(|notice| notice.id != id)
                    .cloned()
                    .collect(),
            }),
        }
    }
}

/// Handle for raising notices
#[derive(Clone, PartialEq)]
pub struct Notifier {
    list: UseReducerHandle<NoticeList>,
}

impl Notifier {
    pub fn success(&self, title: impl Into<String>) {
        self.push(NoticeKind::Success, title.into(), None);
    }

    pub fn error(&self, title: impl Into<String>, description: Option<&str>) {
        self.push(
            NoticeKind::Error,
            title.into(),
            description.map(str::to_string),
        );
    }

    fn push(&self, kind: NoticeKind, title: String, description: Option<String>) {
        self.list.dispatch(NoticeAction::Push {
            kind,
            title,
            description,
        });
    }
}

#[derive(Properties, PartialEq)]
pub struct NoticeProviderProps {
    pub children: Children,
}

#[function_component(NoticeProvider)]
pub fn notice_provider(props: &NoticeProviderProps) -> Html {
    let list = use_reducer(NoticeList::default);
    let notifier = Notifier { list: list.clone() };

    let on_dismiss = {
        let list = list.clone();
        Callback::from(move |id| list.dispatch(NoticeAction::Dismiss(id)))
    };

    html! {
        <ContextProvider<Notifier> context={notifier}>
            {props.children.clone()}
            <div class="fixed top-4 right-4 z-50 flex flex-col gap-2 w-80">
                { for list.notices().iter().map(|notice| html! {
                    <NoticeToast
                        key={notice.id}
                        notice={notice.clone()}
                        on_dismiss={on_dismiss.clone()}
                    />
                }) }
            </div>
        </ContextProvider<Notifier>>
    }
}

#[derive(Properties, PartialEq)]
struct NoticeToastProps {
    notice: Notice,
    on_dismiss: Callback<u32>,
}

#[function_component(NoticeToast)]
fn notice_toast(props: &NoticeToastProps) -> Html {
    let config = use_config();

    {
        let id = props.notice.id;
        let on_dismiss = props.on_dismiss.clone();
        let timeout_ms = config.notice_timeout_ms;
        use_effect_with(id, move |_| {
            let handle = Timeout::new(timeout_ms, move || on_dismiss.emit(id));
            move || drop(handle)
        });
    }

    let accent = match props.notice.kind {
        NoticeKind::Success => "border-emerald-500/60 text-emerald-200",
        NoticeKind::Error => "border-red-500/60 text-red-200",
    };

    html! {
        <div class={classes!("rounded-lg", "border", "bg-slate-950/90", "px-4", "py-3", "shadow-lg", "backdrop-blur", accent)}>
            <p class="text-sm font-semibold">{&props.notice.title}</p>
            if let Some(description) = &props.notice.description {
                <p class="text-xs text-slate-400 mt-1">{description}</p>
            }
        </div>
    }
}

/// Hook to raise notices
#[hook]
pub fn use_notifier() -> Notifier {
    use_context::<Notifier>()
        .expect("Notifier not found. Make sure to wrap your component with NoticeProvider")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push(list: Rc<NoticeList>, title: &str) -> Rc<NoticeList> {
        list.reduce(NoticeAction::Push {
            kind: NoticeKind::Success,
            title: title.to_string(),
            description: None,
        })
    }

    #[test]
    fn notices_stack_in_order_with_unique_ids() {
        let list = push(push(Rc::new(NoticeList::default()), "first"), "second");

        let titles: Vec<_> = list.notices().iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
        assert_ne!(list.notices()[0].id, list.notices()[1].id);
    }

    #[test]
    fn dismiss_removes_only_the_matching_notice() {
        let list = push(push(Rc::new(NoticeList::default()), "first"), "second");
        let first = list.notices()[0].id;

        let list = list.reduce(NoticeAction::Dismiss(first));
        assert_eq!(list.notices().len(), 1);
        assert_eq!(list.notices()[0].title, "second");

        let list = list.reduce(NoticeAction::Dismiss(first));
        assert_eq!(list.notices().len(), 1);
    }
}
