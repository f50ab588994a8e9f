//! Read-only course directory.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::store_error_mapping::{course_store_error, ledger_store_error};
use crate::domain::ports::{CourseDirectoryQuery, CourseRepository, EnrollmentLedger};
use crate::domain::{Course, CourseDetails, CourseId, CourseSearch, DetailsScope, Error};

/// Course directory service implementing [`CourseDirectoryQuery`].
#[derive(Clone)]
pub struct CourseDirectoryService<C, L> {
    courses: Arc<C>,
    ledger: Arc<L>,
}

impl<C, L> CourseDirectoryService<C, L> {
    /// Create a directory over the course store and ledger.
    pub fn new(courses: Arc<C>, ledger: Arc<L>) -> Self {
        Self { courses, ledger }
    }
}

fn course_not_found(course_id: CourseId) -> Error {
    Error::not_found("course not found")
        .with_details(json!({ "reason": "course_not_found", "courseId": course_id }))
}

#[async_trait]
impl<C, L> CourseDirectoryQuery for CourseDirectoryService<C, L>
where
    C: CourseRepository,
    L: EnrollmentLedger,
{
    async fn search(&self, search: CourseSearch) -> Result<Vec<Course>, Error> {
        self.courses
            .search(&search)
            .await
            .map_err(course_store_error)
    }

    async fn details(&self, course_id: CourseId, scope: DetailsScope) -> Result<CourseDetails, Error> {
        let course = self
            .courses
            .find_by_id(course_id)
            .await
            .map_err(course_store_error)?
            .filter(|course| course.active || scope == DetailsScope::Administrative)
            .ok_or_else(|| course_not_found(course_id))?;

        let roster = match scope {
            DetailsScope::Public => None,
            DetailsScope::Administrative => Some(
                self.ledger
                    .list_for_course(course_id)
                    .await
                    .map_err(ledger_store_error)?,
            ),
        };

        Ok(CourseDetails {
            seats_remaining: course.seats_remaining(),
            course,
            roster,
        })
    }
}
