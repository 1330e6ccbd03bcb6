//! Authentication context shared by every view.

use dioxus::prelude::*;

use crate::session::{self, Session};

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Provider component that restores the stored session on mount and makes
/// the auth signal available to the whole app.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let auth_state = use_signal(|| AuthState {
        session: session::load(),
    });
    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Persists the session and updates the context after login or register.
pub fn sign_in(mut auth: Signal<AuthState>, session: Session) {
    session::save(&session);
    auth.set(AuthState {
        session: Some(session),
    });
}

/// Drops the stored session; the next guarded view redirects to login.
pub fn sign_out(mut auth: Signal<AuthState>) {
    session::clear();
    auth.set(AuthState { session: None });
}
