//! Typed outcomes of the enroll and withdraw operations.

use serde_json::json;

use super::{CourseId, EnrollmentId, EnrollmentStatus, Error, StudentId};

/// Why an enroll, withdraw, or eligibility check did not succeed.
///
/// Every variant except the store failures is an expected outcome that
/// leaves state unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrollmentFailure {
    /// The student profile does not exist.
    #[error("student profile not found")]
    StudentNotFound { student_id: StudentId },
    /// The course does not exist or is no longer offered.
    #[error("course not found")]
    CourseNotFound { course_id: CourseId },
    /// The enrollment does not exist or belongs to another student.
    #[error("enrollment not found")]
    EnrollmentNotFound { enrollment_id: EnrollmentId },
    /// A ledger entry already exists for the (student, course) pair.
    ///
    /// `existing` is `None` when the duplicate was detected by the store's
    /// uniqueness constraint during a concurrent insert.
    #[error("you already have an enrollment record for this course")]
    AlreadyEnrolled {
        course_id: CourseId,
        existing: Option<EnrollmentStatus>,
    },
    /// The course's live count has reached its capacity.
    #[error("this course is full")]
    CourseFull { course_id: CourseId },
    /// The entry exists but is not currently `Enrolled`.
    #[error("only active enrollments can be withdrawn")]
    NotEnrolled {
        enrollment_id: EnrollmentId,
        status: EnrollmentStatus,
    },
    /// The store could not be reached; the caller may retry.
    #[error("enrollment store unavailable: {message}")]
    StoreUnavailable { message: String },
    /// The store rejected the operation unexpectedly.
    #[error("enrollment store failure: {message}")]
    Store { message: String },
}

impl EnrollmentFailure {
    /// Stable machine-readable reason.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::StudentNotFound { .. } => "student_not_found",
            Self::CourseNotFound { .. } => "course_not_found",
            Self::EnrollmentNotFound { .. } => "enrollment_not_found",
            Self::AlreadyEnrolled { .. } => "already_enrolled",
            Self::CourseFull { .. } => "course_full",
            Self::NotEnrolled { .. } => "not_enrolled",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::Store { .. } => "store_failure",
        }
    }
}

impl From<EnrollmentFailure> for Error {
    fn from(failure: EnrollmentFailure) -> Self {
        let reason = failure.reason();
        let message = failure.to_string();
        match failure {
            EnrollmentFailure::StudentNotFound { student_id } => Self::not_found(message)
                .with_details(json!({ "reason": reason, "studentId": student_id })),
            EnrollmentFailure::CourseNotFound { course_id } => Self::not_found(message)
                .with_details(json!({ "reason": reason, "courseId": course_id })),
            EnrollmentFailure::EnrollmentNotFound { enrollment_id } => Self::not_found(message)
                .with_details(json!({ "reason": reason, "enrollmentId": enrollment_id })),
            EnrollmentFailure::AlreadyEnrolled {
                course_id,
                existing,
            } => Self::conflict(message).with_details(json!({
                "reason": reason,
                "courseId": course_id,
                "existingStatus": existing,
            })),
            EnrollmentFailure::CourseFull { course_id } => Self::conflict(message)
                .with_details(json!({ "reason": reason, "courseId": course_id })),
            EnrollmentFailure::NotEnrolled {
                enrollment_id,
                status,
            } => Self::conflict(message).with_details(json!({
                "reason": reason,
                "enrollmentId": enrollment_id,
                "status": status,
            })),
            EnrollmentFailure::StoreUnavailable { .. } => Self::service_unavailable(message),
            EnrollmentFailure::Store { .. } => Self::internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(
        EnrollmentFailure::StudentNotFound { student_id: StudentId::random() },
        ErrorCode::NotFound
    )]
    #[case(
        EnrollmentFailure::CourseFull { course_id: CourseId::random() },
        ErrorCode::Conflict
    )]
    #[case(
        EnrollmentFailure::AlreadyEnrolled { course_id: CourseId::random(), existing: None },
        ErrorCode::Conflict
    )]
    #[case(
        EnrollmentFailure::NotEnrolled {
            enrollment_id: EnrollmentId::random(),
            status: EnrollmentStatus::Withdrawn,
        },
        ErrorCode::Conflict
    )]
    #[case(
        EnrollmentFailure::StoreUnavailable { message: "pool timeout".to_owned() },
        ErrorCode::ServiceUnavailable
    )]
    #[case(
        EnrollmentFailure::Store { message: "boom".to_owned() },
        ErrorCode::InternalError
    )]
    fn maps_to_error_codes(#[case] failure: EnrollmentFailure, #[case] code: ErrorCode) {
        let error: Error = failure.into();
        assert_eq!(error.code(), code);
    }

    #[rstest]
    fn conflict_details_carry_reason_and_existing_status() {
        let course_id = CourseId::random();
        let error: Error = EnrollmentFailure::AlreadyEnrolled {
            course_id,
            existing: Some(EnrollmentStatus::Withdrawn),
        }
        .into();
        let details = error.details().expect("details");
        assert_eq!(details["reason"], "already_enrolled");
        assert_eq!(details["existingStatus"], "withdrawn");
    }

    #[rstest]
    fn messages_are_distinct() {
        let course_id = CourseId::random();
        let full = EnrollmentFailure::CourseFull { course_id }.to_string();
        let duplicate = EnrollmentFailure::AlreadyEnrolled {
            course_id,
            existing: None,
        }
        .to_string();
        assert_ne!(full, duplicate);
    }
}
