use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hb_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Any id that cannot be served yet, or at all.
    #[error("hash not found")]
    NotFound,

    #[error("missing payload")]
    MissingPayload,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MissingPayload => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::QueueFull { .. } | StoreError::NotInitialized) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Store(_) | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        }
        let body = match self {
            Self::NotFound => "404 page not found\n".to_string(),
            Self::MissingPayload => "Bad Request\n".to_string(),
            other => format!("{other}\n"),
        };
        (status, body).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ServerError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ServerError::MissingPayload.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServerError::Store(StoreError::QueueFull { capacity: 1 }).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServerError::Store(StoreError::NotInitialized).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServerError::Store(StoreError::WriterClosed).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
