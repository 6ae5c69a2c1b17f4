use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Errores que cruzan la frontera HTTP. El detalle interno se loguea,
/// al cliente solo le llega un mensaje genérico.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(&'static str),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.to_string()),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.to_string()),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Internal(m) => {
                tracing::error!("Error interno: {m}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error interno".to_string())
            }
            ApiError::Db(e) => {
                tracing::error!("Error de base de datos: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error interno".to_string())
            }
            ApiError::Io(e) => {
                tracing::error!("Error de E/S: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Error interno".to_string())
            }
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}
