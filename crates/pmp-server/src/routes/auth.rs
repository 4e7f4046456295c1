use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::AppError;
use crate::session::check_credentials;
use crate::state::AppState;
use crate::validate::{Checks, JsonBody};

/// POST /api/auth/login: check credentials and set the session cookie.
pub async fn login(
    State(app): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<Response, AppError> {
    Checks::new(&body)
        .string("username", 1, 200)
        .string("password", 1, 200)
        .finish()?;
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    if !check_credentials(&app.config.auth.users, username, password) {
        tracing::warn!(username, "login rejected");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let token = app.sessions.issue(username)?;
    tracing::info!(username, "login");
    Ok((
        [(header::SET_COOKIE, app.sessions.session_cookie(&token))],
        Json(serde_json::json!({ "success": true })),
    )
        .into_response())
}

/// POST /api/auth/logout: clear the session cookie.
pub async fn logout(State(app): State<AppState>) -> Response {
    (
        [(header::SET_COOKIE, app.sessions.clear_cookie())],
        Json(serde_json::json!({ "success": true })),
    )
        .into_response()
}
