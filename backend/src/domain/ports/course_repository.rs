//! Driven port for course record storage.
//!
//! Adapters must enforce code uniqueness and refuse to lower a course's
//! capacity below its live count. Neither operation here changes the live
//! count; only [`super::EnrollmentLedger`] does.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Course, CourseDraft, CourseId, CourseSearch};

use super::define_port_error;

define_port_error! {
    /// Errors raised by course repository adapters.
    pub enum CourseRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "course repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "course repository query failed: {message}",
        /// Another course already uses the code.
        DuplicateCode { code: String } => "course code {code} is already in use",
        /// The course does not exist.
        NotFound { course_id: CourseId } => "course {course_id} not found",
        /// The requested capacity is below the current live count.
        CapacityBelowEnrollment { live_count: u32, requested: u32 } =>
            "capacity {requested} is below the {live_count} students currently enrolled",
    }
}

/// Catalogue-wide counters for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseCounts {
    /// All course records.
    pub total: u64,
    /// Records with the active flag set.
    pub active: u64,
}

/// Course record store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a new course.
    async fn insert(&self, course: &Course) -> Result<(), CourseRepositoryError>;

    /// Replace the editable fields of a course, including its active flag,
    /// leaving its live count untouched.
    ///
    /// The capacity check against the live count and the write happen
    /// atomically.
    async fn update_details(
        &self,
        course_id: CourseId,
        draft: &CourseDraft,
        now: DateTime<Utc>,
    ) -> Result<Course, CourseRepositoryError>;

    /// Set the active flag.
    async fn set_active(
        &self,
        course_id: CourseId,
        active: bool,
        now: DateTime<Utc>,
    ) -> Result<Course, CourseRepositoryError>;

    /// Hard-delete a course together with its ledger entries.
    ///
    /// Returns the number of ledger entries removed.
    async fn delete(&self, course_id: CourseId) -> Result<u64, CourseRepositoryError>;

    /// Fetch a course by identifier, active or not.
    async fn find_by_id(&self, course_id: CourseId) -> Result<Option<Course>, CourseRepositoryError>;

    /// Active courses matching `search`, in the requested order.
    async fn search(&self, search: &CourseSearch) -> Result<Vec<Course>, CourseRepositoryError>;

    /// Total and active course counts.
    async fn counts(&self) -> Result<CourseCounts, CourseRepositoryError>;
}
