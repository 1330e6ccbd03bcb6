//! Task list view: add form, completion toggles, delete, logout.

use dioxus::prelude::*;

use crate::auth::{sign_out, use_auth};
use crate::{api, Route};

/// Task list page component. Redirects to login when no session is stored.
#[component]
pub fn Tasks() -> Element {
    let auth = use_auth();
    let nav = use_navigator();
    let mut tasks = use_signal(Vec::<api::TaskView>::new);
    let mut title = use_signal(String::new);
    let mut description = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    // Fetch the list on mount; re-runs when the session changes and does
    // nothing once it is gone. Hooks stay above the signed-out return.
    let _loader = use_resource(move || async move {
        let Some(session) = auth().session else {
            return;
        };
        match api::list_tasks(&session.token).await {
            Ok(list) => tasks.set(list),
            Err(api::ApiError::Unauthorized) => {
                sign_out(auth);
                nav.push(Route::Login {});
            }
            Err(err) => error.set(Some(err.to_string())),
        }
    });

    let Some(session) = auth().session else {
        nav.replace(Route::Login {});
        return rsx! {};
    };
    let token = session.token.clone();

    let add_token = token.clone();
    let handle_add = move |evt: FormEvent| {
        evt.prevent_default();
        let token = add_token.clone();
        spawn(async move {
            let t = title().trim().to_string();
            if t.is_empty() {
                error.set(Some("Task title is required".to_string()));
                return;
            }

            loading.set(true);
            match api::create_task(&token, &t, &description()).await {
                Ok(task) => {
                    let mut list = tasks();
                    list.insert(0, task);
                    tasks.set(list);
                    title.set(String::new());
                    description.set(String::new());
                    error.set(None);
                }
                Err(api::ApiError::Unauthorized) => {
                    sign_out(auth);
                    nav.push(Route::Login {});
                }
                Err(err) => error.set(Some(err.to_string())),
            }
            loading.set(false);
        });
    };

    let handle_logout = move |_| {
        sign_out(auth);
        nav.push(Route::Login {});
    };

    rsx! {
        div {
            style: "max-width: 640px; margin: 0 auto; padding: 2rem;",

            div {
                style: "display: flex; justify-content: space-between; align-items: center;",
                h1 { "My Tasks" }
                div {
                    span { "Hello, {session.name}" }
                    button {
                        style: "margin-left: 10px;",
                        onclick: handle_logout,
                        "Log out"
                    }
                }
            }

            if let Some(err) = error() {
                div {
                    style: "padding: 0.5rem; border: 1px solid #d33; color: #d33; border-radius: 4px;",
                    "{err}"
                }
            }

            form {
                onsubmit: handle_add,
                style: "display: flex; flex-direction: column; gap: 0.5rem; margin: 1rem 0;",

                input {
                    r#type: "text",
                    placeholder: "What needs doing?",
                    value: title(),
                    oninput: move |evt: FormEvent| title.set(evt.value()),
                }
                input {
                    r#type: "text",
                    placeholder: "Description (optional)",
                    value: description(),
                    oninput: move |evt: FormEvent| description.set(evt.value()),
                }
                button {
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Adding..." } else { "Add task" }
                }
            }

            ul {
                style: "list-style: none; padding: 0;",

                for task in tasks() {
                    li {
                        key: "{task.id}",
                        style: "display: flex; align-items: center; gap: 0.5rem; padding: 0.5rem 0; border-bottom: 1px solid #eee;",

                        input {
                            r#type: "checkbox",
                            checked: task.completed,
                            onchange: {
                                let token = token.clone();
                                let id = task.id.clone();
                                let completed = task.completed;
                                move |_| {
                                    let token = token.clone();
                                    let id = id.clone();
                                    spawn(async move {
                                        let update = api::TaskUpdate {
                                            completed: Some(!completed),
                                            ..Default::default()
                                        };
                                        match api::update_task(&token, &id, &update).await {
                                            Ok(updated) => {
                                                let mut list = tasks();
                                                if let Some(slot) =
                                                    list.iter_mut().find(|t| t.id == updated.id)
                                                {
                                                    *slot = updated;
                                                }
                                                tasks.set(list);
                                            }
                                            Err(api::ApiError::Unauthorized) => {
                                                sign_out(auth);
                                                nav.push(Route::Login {});
                                            }
                                            Err(err) => error.set(Some(err.to_string())),
                                        }
                                    });
                                }
                            },
                        }

                        div {
                            style: "flex: 1;",
                            span {
                                style: if task.completed {
                                    "text-decoration: line-through; color: #999;"
                                } else {
                                    ""
                                },
                                "{task.title}"
                            }
                            if let Some(desc) = &task.description {
                                p {
                                    style: "margin: 0; font-size: 0.85rem; color: #666;",
                                    "{desc}"
                                }
                            }
                        }

                        button {
                            onclick: {
                                let token = token.clone();
                                let id = task.id.clone();
                                move |_| {
                                    let token = token.clone();
                                    let id = id.clone();
                                    spawn(async move {
                                        match api::delete_task(&token, &id).await {
                                            Ok(()) => {
                                                let list: Vec<api::TaskView> = tasks()
                                                    .into_iter()
                                                    .filter(|t| t.id != id)
                                                    .collect();
                                                tasks.set(list);
                                            }
                                            Err(api::ApiError::Unauthorized) => {
                                                sign_out(auth);
                                                nav.push(Route::Login {});
                                            }
                                            Err(err) => error.set(Some(err.to_string())),
                                        }
                                    });
                                }
                            },
                            "Delete"
                        }
                    }
                }

                if tasks().is_empty() {
                    li {
                        style: "color: #999; padding: 1rem 0;",
                        "Nothing here yet. Add your first task above."
                    }
                }
            }
        }
    }
}
