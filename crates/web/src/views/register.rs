//! Registration page view with the name/email/password form.

use dioxus::prelude::*;

use crate::auth::{sign_in, use_auth};
use crate::{api, Route};

/// Register page component.
#[component]
pub fn Register() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // Already signed in: straight to the task list
    if auth().session.is_some() {
        nav.replace(Route::Tasks {});
        return rsx! {};
    }

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        spawn(async move {
            error.set(None);

            let n = name().trim().to_string();
            let e = email().trim().to_string();
            let p = password();
            let cp = confirm_password();

            // Mirror the server-side rules so most mistakes are caught locally
            if n.is_empty() {
                error.set(Some("Name is required".to_string()));
                return;
            }
            if e.is_empty() || !e.contains('@') {
                error.set(Some("Please enter a valid email".to_string()));
                return;
            }
            if p.len() < 6 {
                error.set(Some("Password must be at least 6 characters".to_string()));
                return;
            }
            if p != cp {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }

            loading.set(true);
            match api::register(&n, &e, &p).await {
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

            h1 { "Create Account" }
            p { "Sign up for the task manager" }

            form {
                onsubmit: handle_register,
                style: "display: flex; flex-direction: column; gap: 0.75rem; width: 100%; max-width: 320px;",

                if let Some(err) = error() {
                    div {
                        style: "padding: 0.5rem; border: 1px solid #d33; color: #d33; border-radius: 4px;",
                        "{err}"
                    }
                }

                input {
                    r#type: "text",
                    placeholder: "Name",
                    value: name(),
                    oninput: move |evt: FormEvent| name.set(evt.value()),
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

                input {
                    r#type: "password",
                    placeholder: "Confirm password",
                    value: confirm_password(),
                    oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                }

                button {
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Creating account..." } else { "Register" }
                }
            }

            p {
                "Already registered? "
                Link { to: Route::Login {}, "Sign in" }
            }
        }
    }
}
