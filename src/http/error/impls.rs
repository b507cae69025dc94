use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;
use serde_json::json;

use super::Error;
use crate::{database, types::Error as ErrorType, util::validation::ValidateError};

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::InvalidUserId
            | ErrorType::NoFieldsProvided
            | ErrorType::InvalidFormBody(..) => StatusCode::BAD_REQUEST,
            ErrorType::Unauthorized | ErrorType::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ErrorType::EmailTaken => StatusCode::CONFLICT,
            ErrorType::ReadonlyMode => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        if self.status_code().is_server_error() {
            tracing::error!(report = ?self, "request failed");
        }

        let mut body = json!({ "message": self.error_type.message() });
        if let ErrorType::InvalidFormBody(form) = &self.error_type {
            body["issues"] = json!(form.issues);
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<Report<database::Error>> for Error {
    fn from(value: Report<database::Error>) -> Self {
        match value.current_context() {
            database::Error::Readonly => Error::from_report(ErrorType::ReadonlyMode, value),
            database::Error::UniqueViolation => Error::from_report(ErrorType::EmailTaken, value),
            _ => Error::from_report(ErrorType::Internal, value),
        }
    }
}

impl From<ValidateError> for Error {
    fn from(value: ValidateError) -> Self {
        #[derive(Debug, thiserror::Error)]
        #[error("Form body failed validation")]
        struct FormRejected;
        Error::from_context(ErrorType::InvalidFormBody(value), FormRejected)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        #[derive(Debug, thiserror::Error)]
        #[error("Background task failed to complete")]
        struct TaskFailed;
        Error::from_report(ErrorType::Internal, Report::new(value).change_context(TaskFailed))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;
    use thiserror::Error as ThisError;

    use super::Error;
    use crate::types::Error as ErrorType;
    use crate::util::validation::ValidateError;

    #[derive(Debug, ThisError)]
    #[error("test failure")]
    struct TestFailure;

    #[track_caller]
    fn assert_status(error_type: ErrorType, status: StatusCode) {
        let error = Error::from_context(error_type, TestFailure);
        assert_eq!(error.status_code(), status);
    }

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_status(ErrorType::Internal, StatusCode::INTERNAL_SERVER_ERROR);
        assert_status(ErrorType::NotFound, StatusCode::NOT_FOUND);
        assert_status(ErrorType::InvalidUserId, StatusCode::BAD_REQUEST);
        assert_status(ErrorType::NoFieldsProvided, StatusCode::BAD_REQUEST);
        assert_status(ErrorType::Unauthorized, StatusCode::UNAUTHORIZED);
        assert_status(ErrorType::InvalidCredentials, StatusCode::UNAUTHORIZED);
        assert_status(ErrorType::EmailTaken, StatusCode::CONFLICT);
        assert_status(ErrorType::ReadonlyMode, StatusCode::SERVICE_UNAVAILABLE);
        assert_status(
            ErrorType::InvalidFormBody(ValidateError::default()),
            StatusCode::BAD_REQUEST,
        );
    }

    #[test]
    fn validation_issues_convert_to_form_body_errors() {
        let mut form = ValidateError::default();
        form.push("email", "invalid email");

        let error = Error::from(form);
        assert!(matches!(error.as_type(), ErrorType::InvalidFormBody(..)));
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
