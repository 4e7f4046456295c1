use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use claude_client::ClaudeClientError;
use pmp_core::PmpError;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Sentinel errors
// ---------------------------------------------------------------------------

/// One rejected request field, reported under `details`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Carries a 400 with optional per-field details through the `anyhow::Error`
/// chain.
#[derive(Debug)]
struct BadRequest {
    message: String,
    details: Vec<FieldError>,
}

impl std::fmt::Display for BadRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BadRequest {}

#[derive(Debug)]
struct Unauthorized(String);

impl std::fmt::Display for Unauthorized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Unauthorized {}

/// A narrative call failed. Only the fixed per-endpoint message reaches the
/// client; the upstream error is logged.
#[derive(Debug)]
struct Upstream(&'static str);

impl std::fmt::Display for Upstream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for Upstream {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(
            BadRequest {
                message: msg.into(),
                details: Vec::new(),
            }
            .into(),
        )
    }

    /// 400 `Invalid input` with one entry per rejected field.
    pub fn invalid_input(details: Vec<FieldError>) -> Self {
        Self(
            BadRequest {
                message: "Invalid input".to_string(),
                details,
            }
            .into(),
        )
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self(Unauthorized(msg.into()).into())
    }

    pub fn upstream(msg: &'static str) -> Self {
        Self(Upstream(msg).into())
    }
}

fn pmp_status(e: &PmpError) -> StatusCode {
    match e {
        PmpError::MissingField(_)
        | PmpError::UnknownProcessGroup(_)
        | PmpError::UnknownKnowledgeArea(_)
        | PmpError::InvalidType { .. } => StatusCode::BAD_REQUEST,
        PmpError::InvalidRange { .. } | PmpError::DivisionByZero(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PmpError::Io(_) | PmpError::Yaml(_) | PmpError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn envelope(status: StatusCode, error: String, details: &[FieldError]) -> Response {
    let body = if details.is_empty() {
        serde_json::json!({ "success": false, "error": error })
    } else {
        serde_json::json!({ "success": false, "error": error, "details": details })
    };
    (status, axum::Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequest>() {
            return envelope(StatusCode::BAD_REQUEST, b.message.clone(), &b.details);
        }
        if let Some(u) = self.0.downcast_ref::<Unauthorized>() {
            return envelope(StatusCode::UNAUTHORIZED, u.0.clone(), &[]);
        }
        if let Some(u) = self.0.downcast_ref::<Upstream>() {
            return envelope(StatusCode::BAD_GATEWAY, u.0.to_string(), &[]);
        }
        if let Some(e) = self.0.downcast_ref::<PmpError>() {
            let status = pmp_status(e);
            let message = if status.is_server_error() {
                "Internal server error".to_string()
            } else {
                e.to_string()
            };
            return envelope(status, message, &[]);
        }
        if self.0.downcast_ref::<ClaudeClientError>().is_some() {
            return envelope(StatusCode::BAD_GATEWAY, "Narrative service failed".into(), &[]);
        }

        tracing::error!("unhandled error: {:#}", self.0);
        envelope(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
            &[],
        )
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn missing_field_maps_to_400() {
        let err = AppError(PmpError::MissingField("budget".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_process_group_maps_to_400() {
        let err = AppError(PmpError::UnknownProcessGroup("Retiring".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_range_maps_to_422() {
        let err = AppError(
            PmpError::InvalidRange {
                field: "probability".into(),
                value: 1.5,
                min: 0.0,
                max: 1.0,
            }
            .into(),
        );
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn division_by_zero_maps_to_422() {
        let err = AppError(PmpError::DivisionByZero("cpi").into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn unauthorized_constructor_maps_to_401() {
        let err = AppError::unauthorized("Missing authentication token");
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn client_error_maps_to_502() {
        let err = AppError(ClaudeClientError::EmptyResponse.into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn non_domain_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn upstream_hides_detail() {
        let response = AppError::upstream("Failed to analyze timeline").into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Failed to analyze timeline");
    }

    #[tokio::test]
    async fn invalid_input_carries_details() {
        let response = AppError::invalid_input(vec![FieldError {
            field: "query".into(),
            message: "must be between 2 and 1000 characters".into(),
        }])
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid input");
        assert_eq!(json["details"][0]["field"], "query");
    }

    #[tokio::test]
    async fn plain_bad_request_has_no_details() {
        let json = body_json(AppError::bad_request("Invalid WBS structure provided").into_response()).await;
        assert!(json.get("details").is_none());
    }
}
