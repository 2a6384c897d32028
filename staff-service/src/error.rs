use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use shared::responses::{ErrorResponse, FieldViolation};
use thiserror::Error;

// Staff Service Error
#[derive(Debug, Error)]
pub enum StaffServiceError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StaffServiceError {
    pub fn staff_not_found(id: i64) -> Self {
        Self::NotFound(format!("Staff member with ID {id} not found"))
    }

    pub fn duplicate_email(email: &str) -> Self {
        Self::Conflict(format!(
            "A staff member with email {email} already exists"
        ))
    }
}

/// Reads the field path out of a serde error detail such as
/// `Failed to deserialize query string: pageSize: invalid digit found in string`.
fn rejected_field(detail: &str) -> Option<FieldViolation> {
    let (_, rest) = detail.split_once(": ")?;
    let (field, message) = rest.split_once(": ")?;
    if field.is_empty() || field == "." || field.contains(char::is_whitespace) {
        return None;
    }

    Some(FieldViolation {
        field: field.to_string(),
        message: message.to_string(),
    })
}

fn from_rejection(detail: String) -> StaffServiceError {
    match rejected_field(&detail) {
        Some(violation) => StaffServiceError::Validation(vec![violation]),
        None => StaffServiceError::BadRequest(detail),
    }
}

impl From<JsonRejection> for StaffServiceError {
    fn from(rejection: JsonRejection) -> Self {
        from_rejection(rejection.body_text())
    }
}

impl From<QueryRejection> for StaffServiceError {
    fn from(rejection: QueryRejection) -> Self {
        from_rejection(rejection.body_text())
    }
}

impl IntoResponse for StaffServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, %status, "Server error");
        } else {
            tracing::warn!(error = %self, %status, "Client error");
        }

        let body = match self {
            Self::NotFound(message) | Self::BadRequest(message) | Self::Conflict(message) => {
                ErrorResponse::new(message)
            }
            Self::Validation(violations) => {
                ErrorResponse::with_violations("One or more fields are invalid", violations)
            }
            Self::Internal(_) | Self::Database(_) => {
                ErrorResponse::new("Oof, something went wrong while processing the request.")
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let response = StaffServiceError::staff_not_found(42).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Staff member with ID 42 not found");
    }

    #[tokio::test]
    async fn validation_lists_every_field() {
        let response = StaffServiceError::Validation(vec![
            FieldViolation {
                field: "email".into(),
                message: "invalid".into(),
            },
            FieldViolation {
                field: "firstName".into(),
                message: "required".into(),
            },
        ])
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["violations"].as_array().unwrap().len(), 2);
        assert_eq!(json["violations"][1]["field"], "firstName");
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let response =
            StaffServiceError::Internal("pool exhausted at 10.0.0.3".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert!(!json["error"].as_str().unwrap().contains("10.0.0.3"));
    }

    #[test]
    fn rejection_detail_names_the_field() {
        let err = from_rejection(
            "Failed to deserialize the JSON body into the target type: hireDate: input contains invalid characters at line 1 column 30"
                .to_string(),
        );
        let StaffServiceError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        assert_eq!(violations[0].field, "hireDate");
        assert!(violations[0].message.starts_with("input contains invalid characters"));
    }

    #[test]
    fn rejection_without_field_is_bad_request() {
        let err = from_rejection(
            "Failed to parse the request body as JSON: expected value at line 1 column 1"
                .to_string(),
        );
        assert!(matches!(err, StaffServiceError::BadRequest(_)));

        let err = from_rejection("Expected request with `Content-Type: application/json`".to_string());
        assert!(matches!(err, StaffServiceError::BadRequest(_)));
    }

    #[tokio::test]
    async fn conflict_maps_to_409() {
        let response = StaffServiceError::duplicate_email("a@b.com").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
