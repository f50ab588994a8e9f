//! Administration dashboard statistics.

use std::sync::Arc;

use async_trait::async_trait;

use super::store_error_mapping::{course_store_error, ledger_store_error, student_store_error};
use crate::domain::Error;
use crate::domain::ports::{
    AdminDashboardQuery, CourseRepository, Dashboard, DashboardStats, EnrollmentLedger,
    RECENT_ENROLLMENTS_LIMIT, StudentRepository,
};

/// Dashboard service implementing [`AdminDashboardQuery`].
#[derive(Clone)]
pub struct AdminDashboardService<C, S, L> {
    courses: Arc<C>,
    students: Arc<S>,
    ledger: Arc<L>,
}

impl<C, S, L> AdminDashboardService<C, S, L> {
    /// Create a dashboard over the three stores.
    pub fn new(courses: Arc<C>, students: Arc<S>, ledger: Arc<L>) -> Self {
        Self {
            courses,
            students,
            ledger,
        }
    }
}

#[async_trait]
impl<C, S, L> AdminDashboardQuery for AdminDashboardService<C, S, L>
where
    C: CourseRepository,
    S: StudentRepository,
    L: EnrollmentLedger,
{
    async fn dashboard(&self) -> Result<Dashboard, Error> {
        let course_counts = self.courses.counts().await.map_err(course_store_error)?;
        let total_students = self.students.count().await.map_err(student_store_error)?;
        let total_enrollments = self
            .ledger
            .count_enrolled()
            .await
            .map_err(ledger_store_error)?;
        let recent_enrollments = self
            .ledger
            .recent(RECENT_ENROLLMENTS_LIMIT)
            .await
            .map_err(ledger_store_error)?;

        Ok(Dashboard {
            stats: DashboardStats {
                total_courses: course_counts.total,
                active_courses: course_counts.active,
                total_students,
                total_enrollments,
            },
            recent_enrollments,
        })
    }
}
