//! Login page view with the email/password form.

use dioxus::prelude::*;

use crate::auth::{sign_in, use_auth};
use crate::{api, Route};

/// Login page component.
#[component]
pub fn Login() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // Already signed in: straight to the task list
    if auth().session.is_some() {
        nav.replace(Route::Tasks {});
        return rsx! {};
    }

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        spawn(async move {
            error.set(None);

            let e = email().trim().to_string();
            let p = password();

            if e.is_empty() || p.is_empty() {
                error.set(Some("Email and password are required".to_string()));
                return;
            }

            loading.set(true);
            match api::login(&e, &p).await {
                Ok(session) => {
                    sign_in(auth, session);
                    nav.push(Route::Tasks {});
                }
                Err(err) => {
                    loading.set(false);
                    error.set(Some(err.to_string()));
                }
            }
        });
    };

    rsx! {
        div {
            style: "display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 100vh; padding: 2rem;",

            h1 { "Task Manager" }
            p { "Sign in to your account" }

            form {
                onsubmit: handle_login,
                style: "display: flex; flex-direction: column; gap: 0.75rem; width: 100%; max-width: 320px;",

                if let Some(err) = error() {
                    div {
                        style: "padding: 0.5rem; border: 1px solid #d33; color: #d33; border-radius: 4px;",
                        "{err}"
                    }
                }

                input {
                    r#type: "email",
                    placeholder: "Email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }

                input {
                    r#type: "password",
                    placeholder: "Password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }

                button {
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Signing in..." } else { "Sign in" }
                }
            }

            p {
                "No account yet? "
                Link { to: Route::Register {}, "Register" }
            }
        }
    }
}
