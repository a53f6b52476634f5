use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use std::fmt;

/// Errors surfaced to clients by the request handlers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessError {
    /// Validation errors for user input (400 Bad Request)
    ValidationError { field: String, message: String },
    /// Resource not found (404 Not Found)
    NotFound { resource: String, id: String },
    /// Duplicate resource (409 Conflict)
    Duplicate { resource: String, field: String },
    /// Storage or database failure (500 Internal Server Error)
    InternalError { message: String },
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessError::ValidationError { field, message } => {
                write!(f, "Validation error in field '{field}': {message}")
            }
            BusinessError::NotFound { resource, id } => {
                write!(f, "{resource} with id '{id}' not found")
            }
            BusinessError::Duplicate { resource, field } => {
                write!(f, "{resource} with this {field} already exists")
            }
            BusinessError::InternalError { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for BusinessError {}

impl BusinessError {
    pub fn status(&self) -> StatusCode {
        match self {
            BusinessError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            BusinessError::NotFound { .. } => StatusCode::NOT_FOUND,
            BusinessError::Duplicate { .. } => StatusCode::CONFLICT,
            BusinessError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert `BusinessError` to a `{"error", "code"}` JSON response
impl IntoResponse for BusinessError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_code, message) = match &self {
            BusinessError::ValidationError { message, .. } => {
                ("VALIDATION_ERROR", message.clone())
            }
            BusinessError::NotFound { resource, .. } => {
                ("RESOURCE_NOT_FOUND", format!("{resource} not found"))
            }
            BusinessError::Duplicate { .. } => ("DUPLICATE_RESOURCE", self.to_string()),
            BusinessError::InternalError { message } => {
                tracing::error!("Internal error: {message}");
                ("INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message,
            "code": error_code,
        }));

        (status, body).into_response()
    }
}

/// Maps database errors onto the client-facing taxonomy
pub struct ErrorMapper;

impl ErrorMapper {
    pub fn map_db_error(err: DbErr, context: &str) -> BusinessError {
        match err {
            DbErr::RecordNotFound(msg) => BusinessError::NotFound {
                resource: Self::extract_resource_from_context(context),
                id: Self::extract_id_from_message(&msg),
            },
            DbErr::Exec(_) | DbErr::Query(_) => {
                let err_msg = err.to_string();
                if err_msg.contains("UNIQUE constraint") || err_msg.contains("duplicate key") {
                    BusinessError::Duplicate {
                        resource: Self::extract_resource_from_context(context),
                        field: Self::extract_field_from_constraint(&err_msg),
                    }
                } else {
                    BusinessError::InternalError { message: err_msg }
                }
            }
            _ => BusinessError::InternalError {
                message: err.to_string(),
            },
        }
    }

    fn extract_resource_from_context(context: &str) -> String {
        context.replace('_', " ")
    }

    fn extract_id_from_message(msg: &str) -> String {
        msg.split_whitespace()
            .map(|word| word.trim_matches('\'').trim_matches('"'))
            .find(|word| word.parse::<i64>().is_ok())
            .unwrap_or("unknown")
            .to_string()
    }

    fn extract_field_from_constraint(msg: &str) -> String {
        if msg.contains("code") {
            "code".to_string()
        } else if msg.contains("name") {
            "name".to_string()
        } else {
            "field".to_string()
        }
    }
}

impl From<DbErr> for BusinessError {
    fn from(err: DbErr) -> Self {
        ErrorMapper::map_db_error(err, "record")
    }
}

impl From<std::io::Error> for BusinessError {
    fn from(err: std::io::Error) -> Self {
        BusinessError::InternalError {
            message: format!("I/O error: {err}"),
        }
    }
}

#[macro_export]
macro_rules! validation_error {
    ($field:expr, $message:expr) => {
        $crate::common::errors::BusinessError::ValidationError {
            field: $field.to_string(),
            message: $message.to_string(),
        }
    };
}

#[macro_export]
macro_rules! not_found {
    ($resource:expr, $id:expr) => {
        $crate::common::errors::BusinessError::NotFound {
            resource: $resource.to_string(),
            id: $id.to_string(),
        }
    };
}

/// Extension trait to add business error conversion to `DbErr`
pub trait DbErrorExt {
    fn to_business_error(self, context: &str) -> BusinessError;
}

impl DbErrorExt for DbErr {
    fn to_business_error(self, context: &str) -> BusinessError {
        ErrorMapper::map_db_error(self, context)
    }
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    #[test]
    fn test_validation_error_creation() {
        let err = validation_error!("count", "must be at least 1");
        assert!(matches!(err, BusinessError::ValidationError { .. }));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_mapper_not_found() {
        let db_err = DbErr::RecordNotFound("Analysis with id '42' not found".to_string());
        let business_err = ErrorMapper::map_db_error(db_err, "analysis");

        match business_err {
            BusinessError::NotFound { resource, id } => {
                assert_eq!(resource, "analysis");
                assert_eq!(id, "42");
            }
            _ => panic!("Expected not found error"),
        }
    }

    #[test]
    fn test_error_mapper_falls_back_to_internal() {
        let db_err = DbErr::Custom("connection reset".to_string());
        let business_err = db_err.to_business_error("mark");
        assert_eq!(business_err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_response_shape() {
        let response = validation_error!("body", "Invalid JSON").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Invalid JSON");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = BusinessError::InternalError {
            message: "disk full at /srv/videos".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal server error");
    }
}
