//! Driving port for enroll and withdraw.
//!
//! Failures are reported as [`EnrollmentFailure`] values so callers can tell
//! expected outcomes (full, duplicate, missing) from store outages.

use async_trait::async_trait;

use crate::domain::{Course, CourseId, Enrollment, EnrollmentFailure, EnrollmentId, StudentId};

/// Enrollment use-cases consumed by inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentCommand: Send + Sync {
    /// Enroll a student in a course.
    ///
    /// Preconditions are checked in order: student exists, course exists,
    /// no ledger entry for the pair, a free seat. The entry insert and the
    /// live count increment commit together.
    async fn enroll(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<Enrollment, EnrollmentFailure>;

    /// Withdraw the student's own `Enrolled` entry.
    async fn withdraw(
        &self,
        enrollment_id: EnrollmentId,
        student_id: StudentId,
    ) -> Result<Enrollment, EnrollmentFailure>;

    /// Evaluate the enroll preconditions without writing.
    ///
    /// Returns the course when an enroll would currently succeed.
    async fn check_eligibility(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<Course, EnrollmentFailure>;
}
