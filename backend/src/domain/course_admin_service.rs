//! Catalogue administration.
//!
//! Editing never touches a course's live count; the repository refuses a
//! capacity below it atomically. Removal requires an explicit policy.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use super::store_error_mapping::course_store_error;
use crate::domain::ports::{
    CourseAdminCommand, CourseRemoval, CourseRemovalOutcome, CourseRepository,
    CourseRepositoryError,
};
use crate::domain::{Course, CourseDraft, CourseId, Error};

/// Course administration service implementing [`CourseAdminCommand`].
#[derive(Clone)]
pub struct CourseAdminService<C> {
    courses: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> CourseAdminService<C> {
    /// Create a service over the course store.
    pub fn new(courses: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { courses, clock }
    }
}

fn map_course_error(error: CourseRepositoryError) -> Error {
    match error {
        CourseRepositoryError::DuplicateCode { code } => {
            Error::conflict(format!("course code {code} is already in use")).with_details(json!({
                "field": "courseCode",
                "code": "duplicate",
                "value": code,
            }))
        }
        CourseRepositoryError::NotFound { course_id } => Error::not_found("course not found")
            .with_details(json!({ "reason": "course_not_found", "courseId": course_id })),
        CourseRepositoryError::CapacityBelowEnrollment {
            live_count,
            requested,
        } => Error::conflict(format!(
            "capacity {requested} is below the {live_count} students currently enrolled"
        ))
        .with_details(json!({
            "reason": "capacity_below_enrollment",
            "field": "capacity",
            "liveCount": live_count,
            "requested": requested,
        })),
        other => course_store_error(other),
    }
}

#[async_trait]
impl<C> CourseAdminCommand for CourseAdminService<C>
where
    C: CourseRepository,
{
    async fn create(&self, draft: CourseDraft) -> Result<Course, Error> {
        let course = draft.into_course(CourseId::random(), self.clock.utc());
        self.courses
            .insert(&course)
            .await
            .map_err(map_course_error)?;
        info!(course_id = %course.id, code = %course.code, "course created");
        Ok(course)
    }

    async fn update(&self, course_id: CourseId, draft: CourseDraft) -> Result<Course, Error> {
        let course = self
            .courses
            .update_details(course_id, &draft, self.clock.utc())
            .await
            .map_err(map_course_error)?;
        info!(%course_id, code = %course.code, capacity = course.capacity, "course updated");
        Ok(course)
    }

    async fn remove(
        &self,
        course_id: CourseId,
        removal: CourseRemoval,
    ) -> Result<CourseRemovalOutcome, Error> {
        match removal {
            CourseRemoval::Deactivate => {
                let course = self
                    .courses
                    .set_active(course_id, false, self.clock.utc())
                    .await
                    .map_err(map_course_error)?;
                info!(%course_id, "course deactivated");
                Ok(CourseRemovalOutcome::Deactivated { course })
            }
            CourseRemoval::Purge => {
                let enrollments_removed = self
                    .courses
                    .delete(course_id)
                    .await
                    .map_err(map_course_error)?;
                if enrollments_removed > 0 {
                    warn!(%course_id, enrollments_removed, "course purged with ledger history");
                } else {
                    info!(%course_id, "course purged");
                }
                Ok(CourseRemovalOutcome::Purged {
                    course_id,
                    enrollments_removed,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "course_admin_service_tests.rs"]
mod tests;
