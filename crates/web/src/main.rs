use dioxus::prelude::*;

use auth::AuthProvider;
use views::{Login, Register, Tasks};

mod api;
mod auth;
mod session;
mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Root {},
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/tasks")]
    Tasks {},
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        AuthProvider {
            Router::<Route> {}
        }
    }
}

/// `/` goes to the task list when signed in, to login otherwise.
#[component]
fn Root() -> Element {
    let nav = use_navigator();
    let auth = auth::use_auth();

    if auth().session.is_some() {
        nav.replace(Route::Tasks {});
    } else {
        nav.replace(Route::Login {});
    }
    rsx! {}
}
