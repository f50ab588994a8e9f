//! Driven port for the enrollment ledger.
//!
//! The ledger owns the only writes to a course's live count. Adapters must
//! apply each enroll and withdraw as one atomic unit:
//!
//! - `enroll` inserts the entry and increments the live count with a
//!   conditional update that only succeeds while the count is below
//!   capacity. A uniqueness violation on (student, course) raised by a
//!   concurrent insert is reported as [`EnrollmentLedgerError::AlreadyEnrolled`].
//! - `withdraw` flips an `Enrolled` entry to `Withdrawn` and decrements the
//!   live count.
//!
//! Either both writes commit or neither does.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Course, CourseId, Enrollment, EnrollmentDetails, EnrollmentId, EnrollmentStatus, StudentId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by enrollment ledger adapters.
    pub enum EnrollmentLedgerError {
        /// The store could not be reached.
        Connection { message: String } => "enrollment ledger connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "enrollment ledger query failed: {message}",
        /// The referenced student does not exist.
        StudentNotFound { student_id: StudentId } => "student {student_id} not found",
        /// The referenced course does not exist or is inactive.
        CourseNotFound { course_id: CourseId } => "course {course_id} not found",
        /// An entry for the pair already exists.
        AlreadyEnrolled { student_id: StudentId, course_id: CourseId } =>
            "student {student_id} already has an entry for course {course_id}",
        /// The course has no free seat.
        CourseFull { course_id: CourseId } => "course {course_id} is full",
        /// No entry with this identifier belongs to the student.
        EnrollmentNotFound { enrollment_id: EnrollmentId } => "enrollment {enrollment_id} not found",
        /// The entry is not currently `Enrolled`.
        NotEnrolled { enrollment_id: EnrollmentId, status: EnrollmentStatus } =>
            "enrollment {enrollment_id} is {status}, not enrolled",
    }
}

/// Enrollment ledger store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentLedger: Send + Sync {
    /// Atomically record `entry` and take a seat in its course.
    ///
    /// Returns the course with its updated live count.
    async fn enroll(&self, entry: &Enrollment) -> Result<Course, EnrollmentLedgerError>;

    /// Atomically withdraw the student's `Enrolled` entry and free its seat.
    async fn withdraw(
        &self,
        enrollment_id: EnrollmentId,
        student_id: StudentId,
        now: DateTime<Utc>,
    ) -> Result<Enrollment, EnrollmentLedgerError>;

    /// The entry for a (student, course) pair, whatever its status.
    async fn find_for_pair(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<Option<Enrollment>, EnrollmentLedgerError>;

    /// All entries of a student, newest first.
    async fn list_for_student(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<EnrollmentDetails>, EnrollmentLedgerError>;

    /// All entries of a course, oldest first.
    async fn list_for_course(
        &self,
        course_id: CourseId,
    ) -> Result<Vec<EnrollmentDetails>, EnrollmentLedgerError>;

    /// The `limit` most recent entries across all courses.
    async fn recent(&self, limit: usize) -> Result<Vec<EnrollmentDetails>, EnrollmentLedgerError>;

    /// Number of entries currently `Enrolled`.
    async fn count_enrolled(&self) -> Result<u64, EnrollmentLedgerError>;
}
