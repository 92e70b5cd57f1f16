use actix_web::http::StatusCode;
use actix_web::ResponseError;
use common::model::notice::Notice;
use common::model::session::TransitionError;
use common::model::validation::ValidationError;
use thiserror::Error;

use crate::clients::RemoteError;

/// Everything an action or a request can fail with.
///
/// Action failures are shown inline through [`AppError::notices`]; the HTTP
/// status mapping only applies to requests that are not actions.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid access code. Please try again.")]
    InvalidAccessCode,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("{} field(s) failed validation.", .0.len())]
    Validation(Vec<ValidationError>),
    #[error("Row {row} is out of range; the table has {rows} rows.")]
    RowOutOfRange { row: usize, rows: usize },
    #[error("Row {0} has no ObjectId.")]
    MissingObjectId(usize),
    #[error("Failed to {action}: {detail}")]
    WriteFailed { action: String, detail: String },
    #[error("Could not resolve the selected address: {0}")]
    Geocode(RemoteError),
    #[error("Failed to fetch records: {0}")]
    Fetch(RemoteError),
    #[error("Address suggestions are unavailable: {0}")]
    Suggest(RemoteError),
    #[error("Session {0} not found.")]
    SessionNotFound(String),
}

impl AppError {
    /// One error notice per failed rule for validation, one notice otherwise.
    pub fn notices(&self) -> Vec<Notice> {
        match self {
            AppError::Validation(errors) => errors
                .iter()
                .map(|e| Notice::error(e.to_string()))
                .collect(),
            other => vec![Notice::error(other.to_string())],
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidAccessCode => StatusCode::UNAUTHORIZED,
            AppError::Transition(TransitionError::AdminOnly) => StatusCode::FORBIDDEN,
            AppError::Transition(TransitionError::NotAuthenticated) => StatusCode::UNAUTHORIZED,
            AppError::Transition(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RowOutOfRange { .. } | AppError::MissingObjectId(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::WriteFailed { .. }
            | AppError::Geocode(_)
            | AppError::Fetch(_)
            | AppError::Suggest(_) => StatusCode::BAD_GATEWAY,
            AppError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::model::notice::NoticeLevel;

    #[test]
    fn validation_yields_one_notice_per_rule() {
        let err = AppError::Validation(vec![
            ValidationError::PhoneFormat {
                field: "Phone_number".into(),
                value: "5551234567".into(),
            },
            ValidationError::NotBinary {
                field: "Showers".into(),
                value: "2".into(),
            },
        ]);
        let notices = err.notices();
        assert_eq!(notices.len(), 2);
        assert!(notices.iter().all(|n| n.level == NoticeLevel::Error));
        assert!(notices[0].text.contains("Phone_number"));
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn guest_writes_map_to_forbidden() {
        let err = AppError::from(TransitionError::AdminOnly);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "This action requires admin access.");
    }
}
