//! Typed client for the task-manager REST API.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::Session;

/// Base URL of the backend API.
const API_BASE: &str = "http://localhost:5000";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// The token was missing, invalid or expired; the caller should clear
    /// the session and go back to login.
    #[error("Session expired. Please log in again.")]
    Unauthorized,

    #[error("{0}")]
    Message(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields sent on task update; `None` fields are omitted from the body.
#[derive(Debug, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

async fn error_from(response: reqwest::Response) -> ApiError {
    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized;
    }
    match response.json::<ErrorBody>().await {
        Ok(body) => ApiError::Message(body.error),
        Err(_) => ApiError::Message("Request failed".to_string()),
    }
}

fn send_error(e: reqwest::Error) -> ApiError {
    ApiError::Message(format!("Could not reach the server: {e}"))
}

#[derive(Debug, Deserialize)]
struct AuthBody {
    id: String,
    name: String,
    email: String,
    token: String,
}

impl From<AuthBody> for Session {
    fn from(body: AuthBody) -> Self {
        Session {
            id: body.id,
            name: body.name,
            email: body.email,
            token: body.token,
        }
    }
}

pub async fn register(name: &str, email: &str, password: &str) -> Result<Session, ApiError> {
    let response = reqwest::Client::new()
        .post(format!("{API_BASE}/api/users/register"))
        .json(&serde_json::json!({ "name": name, "email": email, "password": password }))
        .send()
        .await
        .map_err(send_error)?;

    if !response.status().is_success() {
        return Err(error_from(response).await);
    }
    let body: AuthBody = response.json().await.map_err(send_error)?;
    Ok(body.into())
}

pub async fn login(email: &str, password: &str) -> Result<Session, ApiError> {
    let response = reqwest::Client::new()
        .post(format!("{API_BASE}/api/users/login"))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .map_err(send_error)?;

    if !response.status().is_success() {
        return Err(error_from(response).await);
    }
    let body: AuthBody = response.json().await.map_err(send_error)?;
    Ok(body.into())
}

pub async fn list_tasks(token: &str) -> Result<Vec<TaskView>, ApiError> {
    let response = reqwest::Client::new()
        .get(format!("{API_BASE}/api/tasks"))
        .bearer_auth(token)
        .send()
        .await
        .map_err(send_error)?;

    if !response.status().is_success() {
        return Err(error_from(response).await);
    }
    response.json().await.map_err(send_error)
}

pub async fn create_task(
    token: &str,
    title: &str,
    description: &str,
) -> Result<TaskView, ApiError> {
    let description = description.trim();
    let mut body = serde_json::json!({ "title": title });
    if !description.is_empty() {
        body["description"] = serde_json::Value::String(description.to_string());
    }

    let response = reqwest::Client::new()
        .post(format!("{API_BASE}/api/tasks"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .map_err(send_error)?;

    if !response.status().is_success() {
        return Err(error_from(response).await);
    }
    response.json().await.map_err(send_error)
}

pub async fn update_task(token: &str, id: &str, update: &TaskUpdate) -> Result<TaskView, ApiError> {
    let response = reqwest::Client::new()
        .put(format!("{API_BASE}/api/tasks/{id}"))
        .bearer_auth(token)
        .json(update)
        .send()
        .await
        .map_err(send_error)?;

    if !response.status().is_success() {
        return Err(error_from(response).await);
    }
    response.json().await.map_err(send_error)
}

pub async fn delete_task(token: &str, id: &str) -> Result<(), ApiError> {
    let response = reqwest::Client::new()
        .delete(format!("{API_BASE}/api/tasks/{id}"))
        .bearer_auth(token)
        .send()
        .await
        .map_err(send_error)?;

    if !response.status().is_success() {
        return Err(error_from(response).await);
    }
    Ok(())
}
