//! Browser-local persistence for the signed-in session.

use serde::{Deserialize, Serialize};

const SESSION_KEY: &str = "task-manager-session";

/// The signed-in user plus their bearer token, as kept in localStorage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: String,
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

pub fn load() -> Option<Session> {
    #[cfg(target_arch = "wasm32")]
    {
        let raw = local_storage()?.get_item(SESSION_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

pub fn save(session: &Session) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(storage) = local_storage() {
            if let Ok(raw) = serde_json::to_string(session) {
                let _ = storage.set_item(SESSION_KEY, &raw);
            }
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = session;
    }
}

pub fn clear() {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(SESSION_KEY);
        }
    }
}
