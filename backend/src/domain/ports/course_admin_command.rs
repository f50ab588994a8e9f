//! Driving port for catalogue administration.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Course, CourseDraft, CourseId, Error};

/// How a course is removed. There is no implicit default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CourseRemoval {
    /// Hide the course from the directory and stop new enrollments, keeping
    /// its ledger history.
    Deactivate,
    /// Delete the course and every ledger entry that references it.
    Purge,
}

/// Result of a removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", tag = "outcome")]
pub enum CourseRemovalOutcome {
    /// The course remains stored but inactive.
    Deactivated {
        /// The deactivated course.
        course: Course,
    },
    /// The course and its ledger entries are gone.
    Purged {
        /// Identifier of the deleted course.
        #[serde(rename = "courseId")]
        course_id: CourseId,
        /// Ledger entries removed with it.
        #[serde(rename = "enrollmentsRemoved")]
        enrollments_removed: u64,
    },
}

/// Create, edit, and remove course records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseAdminCommand: Send + Sync {
    /// Create an active course with an empty ledger.
    async fn create(&self, draft: CourseDraft) -> Result<Course, Error>;

    /// Edit a course's fields; the live count is never touched.
    async fn update(&self, course_id: CourseId, draft: CourseDraft) -> Result<Course, Error>;

    /// Remove a course using the chosen policy.
    async fn remove(
        &self,
        course_id: CourseId,
        removal: CourseRemoval,
    ) -> Result<CourseRemovalOutcome, Error>;
}
