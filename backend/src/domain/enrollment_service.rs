//! Enrollment service: the only place enroll and withdraw transitions are
//! validated.
//!
//! The service checks preconditions in a fixed order so callers receive the
//! most specific failure, then hands the write to the ledger, which applies
//! the entry insert and the live count change atomically. The ledger's own
//! checks are the backstop against races between the read and the write.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::ports::{
    CourseRepository, CourseRepositoryError, EnrollmentCommand, EnrollmentLedger,
    EnrollmentLedgerError, StudentRepository, StudentRepositoryError,
};
use crate::domain::{Course, CourseId, Enrollment, EnrollmentFailure, EnrollmentId, StudentId};

/// Enrollment service implementing [`EnrollmentCommand`].
#[derive(Clone)]
pub struct EnrollmentService<S, C, L> {
    students: Arc<S>,
    courses: Arc<C>,
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<S, C, L> EnrollmentService<S, C, L> {
    /// Create a service over the given stores.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use portal_backend::domain::EnrollmentService;
    /// use portal_backend::outbound::memory::InMemoryPortalStore;
    ///
    /// let store = Arc::new(InMemoryPortalStore::new());
    /// let _service = EnrollmentService::new(
    ///     store.clone(),
    ///     store.clone(),
    ///     store,
    ///     Arc::new(DefaultClock),
    /// );
    /// ```
    pub fn new(students: Arc<S>, courses: Arc<C>, ledger: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            students,
            courses,
            ledger,
            clock,
        }
    }
}

fn map_student_error(error: StudentRepositoryError) -> EnrollmentFailure {
    match error {
        StudentRepositoryError::Connection { message } => {
            EnrollmentFailure::StoreUnavailable { message }
        }
        other => EnrollmentFailure::Store {
            message: other.to_string(),
        },
    }
}

fn map_course_error(error: CourseRepositoryError) -> EnrollmentFailure {
    match error {
        CourseRepositoryError::Connection { message } => {
            EnrollmentFailure::StoreUnavailable { message }
        }
        other => EnrollmentFailure::Store {
            message: other.to_string(),
        },
    }
}

fn map_ledger_error(error: EnrollmentLedgerError) -> EnrollmentFailure {
    match error {
        EnrollmentLedgerError::Connection { message } => {
            EnrollmentFailure::StoreUnavailable { message }
        }
        EnrollmentLedgerError::Query { message } => EnrollmentFailure::Store { message },
        EnrollmentLedgerError::StudentNotFound { student_id } => {
            EnrollmentFailure::StudentNotFound { student_id }
        }
        EnrollmentLedgerError::CourseNotFound { course_id } => {
            EnrollmentFailure::CourseNotFound { course_id }
        }
        EnrollmentLedgerError::AlreadyEnrolled { course_id, .. } => {
            EnrollmentFailure::AlreadyEnrolled {
                course_id,
                existing: None,
            }
        }
        EnrollmentLedgerError::CourseFull { course_id } => EnrollmentFailure::CourseFull { course_id },
        EnrollmentLedgerError::EnrollmentNotFound { enrollment_id } => {
            EnrollmentFailure::EnrollmentNotFound { enrollment_id }
        }
        EnrollmentLedgerError::NotEnrolled {
            enrollment_id,
            status,
        } => EnrollmentFailure::NotEnrolled {
            enrollment_id,
            status,
        },
    }
}

fn log_failure(operation: &'static str, failure: &EnrollmentFailure) {
    match failure {
        EnrollmentFailure::StoreUnavailable { .. } | EnrollmentFailure::Store { .. } => {
            error!(operation, error = %failure, "enrollment store failed");
        }
        _ => debug!(operation, reason = failure.reason(), "enrollment rejected"),
    }
}

impl<S, C, L> EnrollmentService<S, C, L>
where
    S: StudentRepository,
    C: CourseRepository,
    L: EnrollmentLedger,
{
    async fn verify_preconditions(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<Course, EnrollmentFailure> {
        self.students
            .find_by_id(student_id)
            .await
            .map_err(map_student_error)?
            .ok_or(EnrollmentFailure::StudentNotFound { student_id })?;

        let course = self
            .courses
            .find_by_id(course_id)
            .await
            .map_err(map_course_error)?
            .filter(|course| course.active)
            .ok_or(EnrollmentFailure::CourseNotFound { course_id })?;

        if let Some(existing) = self
            .ledger
            .find_for_pair(student_id, course_id)
            .await
            .map_err(map_ledger_error)?
        {
            return Err(EnrollmentFailure::AlreadyEnrolled {
                course_id,
                existing: Some(existing.status),
            });
        }

        if !course.has_seat() {
            return Err(EnrollmentFailure::CourseFull { course_id });
        }

        Ok(course)
    }

    async fn perform_enroll(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<Enrollment, EnrollmentFailure> {
        self.verify_preconditions(student_id, course_id).await?;
        let entry = Enrollment::enrolled(student_id, course_id, self.clock.utc());
        let course = self.ledger.enroll(&entry).await.map_err(map_ledger_error)?;
        info!(
            enrollment_id = %entry.id,
            %student_id,
            %course_id,
            live_count = course.live_count,
            capacity = course.capacity,
            "student enrolled"
        );
        Ok(entry)
    }
}

#[async_trait]
impl<S, C, L> EnrollmentCommand for EnrollmentService<S, C, L>
where
    S: StudentRepository,
    C: CourseRepository,
    L: EnrollmentLedger,
{
    async fn enroll(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<Enrollment, EnrollmentFailure> {
        self.perform_enroll(student_id, course_id)
            .await
            .inspect_err(|failure| log_failure("enroll", failure))
    }

    async fn withdraw(
        &self,
        enrollment_id: EnrollmentId,
        student_id: StudentId,
    ) -> Result<Enrollment, EnrollmentFailure> {
        let withdrawn = self
            .ledger
            .withdraw(enrollment_id, student_id, self.clock.utc())
            .await
            .map_err(map_ledger_error)
            .inspect_err(|failure| log_failure("withdraw", failure))?;
        info!(
            %enrollment_id,
            %student_id,
            course_id = %withdrawn.course_id,
            "student withdrew"
        );
        Ok(withdrawn)
    }

    async fn check_eligibility(
        &self,
        student_id: StudentId,
        course_id: CourseId,
    ) -> Result<Course, EnrollmentFailure> {
        self.verify_preconditions(student_id, course_id).await
    }
}

#[cfg(test)]
#[path = "enrollment_service_tests.rs"]
mod tests;
