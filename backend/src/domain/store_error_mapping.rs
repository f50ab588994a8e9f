//! Map driven-port errors onto API errors for the read-side services.
//!
//! Domain-specific variants that a service expects (duplicate codes, missing
//! records) are matched by the caller first; whatever reaches these helpers
//! is either an outage or a bug.

use tracing::error;

use super::Error;
use super::ports::{CourseRepositoryError, EnrollmentLedgerError, StudentRepositoryError};

pub(crate) fn course_store_error(error: CourseRepositoryError) -> Error {
    match error {
        CourseRepositoryError::Connection { message } => {
            error!(%message, "course repository unavailable");
            Error::service_unavailable(format!("course repository unavailable: {message}"))
        }
        other => {
            error!(error = %other, "course repository failed");
            Error::internal(format!("course repository error: {other}"))
        }
    }
}

pub(crate) fn student_store_error(error: StudentRepositoryError) -> Error {
    match error {
        StudentRepositoryError::Connection { message } => {
            error!(%message, "student repository unavailable");
            Error::service_unavailable(format!("student repository unavailable: {message}"))
        }
        other => {
            error!(error = %other, "student repository failed");
            Error::internal(format!("student repository error: {other}"))
        }
    }
}

pub(crate) fn ledger_store_error(error: EnrollmentLedgerError) -> Error {
    match error {
        EnrollmentLedgerError::Connection { message } => {
            error!(%message, "enrollment ledger unavailable");
            Error::service_unavailable(format!("enrollment ledger unavailable: {message}"))
        }
        other => {
            error!(error = %other, "enrollment ledger failed");
            Error::internal(format!("enrollment ledger error: {other}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[test]
    fn connection_failures_are_retryable() {
        assert_eq!(
            course_store_error(CourseRepositoryError::connection("refused")).code(),
            ErrorCode::ServiceUnavailable
        );
        assert_eq!(
            student_store_error(StudentRepositoryError::connection("refused")).code(),
            ErrorCode::ServiceUnavailable
        );
        assert_eq!(
            ledger_store_error(EnrollmentLedgerError::connection("refused")).code(),
            ErrorCode::ServiceUnavailable
        );
    }

    #[test]
    fn query_failures_are_internal() {
        let error = ledger_store_error(EnrollmentLedgerError::query("syntax error"));
        assert_eq!(error.code(), ErrorCode::InternalError);
        assert!(error.message().contains("syntax error"));
    }
}
