use crate::error::AppError;
use crate::session::token_from_cookies;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Axum middleware that requires a valid `token` session cookie.
///
/// On success the decoded [`Session`](crate::session::Session) is inserted
/// into the request extensions. Missing, forged or expired tokens get a 401
/// JSON envelope.
pub async fn auth_middleware(State(app): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookies)
        .map(str::to_string);

    let Some(token) = token else {
        tracing::warn!(path = %req.uri().path(), "request without session cookie");
        return AppError::unauthorized("Missing authentication token").into_response();
    };

    match app.sessions.verify(&token) {
        Ok(session) => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Err(e) => {
            tracing::warn!(path = %req.uri().path(), error = %e, "rejected session token");
            AppError::unauthorized("Invalid or expired token").into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
