//! Driving port for browsing the course directory.
use async_trait::async_trait;

use crate::domain::{Course, CourseDetails, CourseId, CourseSearch, DetailsScope, Error};

/// Read-only catalogue use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseDirectoryQuery: Send + Sync {
    /// Active courses matching the search, in the requested order.
    async fn search(&self, search: CourseSearch) -> Result<Vec<Course>, Error>;

    /// A single course; the administrative scope adds the roster and can see
    /// inactive courses.
    async fn details(&self, course_id: CourseId, scope: DetailsScope) -> Result<CourseDetails, Error>;
}
