use crate::notice::NoticeProvider;
use crate::pages::{DashboardPage, LoginPage};
use crate::session::SessionProvider;
use secure_auth_core::Screen;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Copy, Debug, Routable, PartialEq, Eq)]
pub enum Route {
    #[at("/")]
    Entry,
    #[at("/dashboard")]
    Dashboard,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl From<Screen> for Route {
    fn from(screen: Screen) -> Self {
        match screen {
            Screen::Entry => Self::Entry,
            Screen::Dashboard => Self::Dashboard,
        }
    }
}

fn switch(route: Route) -> Html {
    match route {
        Route::Entry => html! { <LoginPage /> },
        Route::Dashboard => html! { <DashboardPage /> },
        Route::NotFound => html! { <Redirect<Route> to={Route::Entry} /> },
    }
}

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <BrowserRouter>
            <SessionProvider>
                <NoticeProvider>
                    <div class="min-h-screen text-slate-100">
                        <Switch<Route> render={switch} />
                    </div>
                </NoticeProvider>
            </SessionProvider>
        </BrowserRouter>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screens_map_to_their_paths() {
        for screen in [Screen::Entry, Screen::Dashboard] {
            assert_eq!(Route::from(screen).to_path(), screen.path());
        }
    }

    #[test]
    fn unknown_paths_fall_back_to_not_found() {
        assert_eq!(Route::recognize("/nowhere"), Some(Route::NotFound));
        assert_eq!(Route::recognize("/dashboard"), Some(Route::Dashboard));
    }
}
