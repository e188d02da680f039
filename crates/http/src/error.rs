//! Error handling for the catalog HTTP layer

use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use catalog_db::DbError;
use handlebars::Handlebars;
use serde::Serialize;
use std::sync::LazyLock;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

const ERROR_TEMPLATE_NAME: &str = "error";

const ERROR_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{{title}}</title>
</head>
<body>
  <h1>{{title}}</h1>
  <p class="error-message">{{message}}</p>
  <p class="error-meta">status {{status}} &middot; trace {{trace_id}} &middot; {{timestamp}}</p>
  <p><a href="/">Home</a></p>
</body>
</html>
"#;

static ERROR_PAGES: LazyLock<Handlebars<'static>> = LazyLock::new(|| {
    let mut registry = Handlebars::new();
    if let Err(err) = registry.register_template_string(ERROR_TEMPLATE_NAME, ERROR_TEMPLATE) {
        tracing::error!(error = %err, "built-in error template failed to compile");
    }
    registry
});

/// Context rendered into the error page
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub title: String,
    pub message: String,
    pub code: String,
    pub trace_id: String,
    pub timestamp: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("not found: {message}")]
    NotFound { message: String, code: String },

    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    #[error("persistence failure: {0}")]
    Persistence(#[from] DbError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            code: "not_found".to_string(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Persistence(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc().to_string();
        let status = self.status();

        let (error_code, message) = match self {
            AppError::NotFound { message, code } => (code, message),
            AppError::BadRequest { message, code } => (code, message),
            AppError::Persistence(e) => ("persistence_error".to_string(), e.to_string()),
            AppError::Internal(e) => ("internal_error".to_string(), format!("{e:#}")),
        };

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                message = %message,
                "Request error"
            );
        } else {
            tracing::warn!(
                error_id = %error_id,
                error_code = %error_code,
                status_code = %status.as_u16(),
                "Request error"
            );
        }

        // Store and template details stay out of release builds
        let message = if cfg!(not(debug_assertions)) && status.is_server_error() {
            "An internal server error occurred".to_string()
        } else {
            message
        };

        let body = ErrorBody {
            status: status.as_u16(),
            title: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message,
            code: error_code,
            trace_id: error_id.to_string(),
            timestamp,
        };

        let page = ERROR_PAGES
            .render(ERROR_TEMPLATE_NAME, &body)
            .unwrap_or_else(|err| {
                tracing::error!(error = %err, "error page rendering failed");
                format!("{} {}", body.status, handlebars::html_escape(&body.message))
            });

        (status, Html(page)).into_response()
    }
}

/// Fallback for unmatched routes
pub async fn not_found_fallback() -> AppError {
    AppError::not_found("Page not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_renders_html_page() {
        let response = AppError::not_found("Book copy not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_text(response).await;
        assert!(body.contains("<h1>Not Found</h1>"));
        assert!(body.contains("Book copy not found"));
        assert!(body.contains("trace"));
    }

    #[tokio::test]
    async fn test_messages_are_escaped() {
        let response = AppError::not_found("<script>alert(1)</script>").into_response();
        let body = body_text(response).await;
        assert!(!body.contains("<script>"));
        assert!(body.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_persistence_error_mapping() {
        let error = AppError::from(DbError::Unavailable("connection reset".to_string()));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_mapping() {
        let internal_error = anyhow::anyhow!("template missing");
        let error = AppError::Internal(internal_error);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_fallback_is_not_found() {
        let response = not_found_fallback().await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Page not found"));
    }
}
