//! Student profile creation and lookups.
//!
//! A profile is created at most once per identity. Creating one yields a
//! [`RoleGrant`] that the caller applies to the identity's session; the
//! service itself never touches sessions.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use super::store_error_mapping::{ledger_store_error, student_store_error};
use crate::domain::ports::{
    EnrollmentLedger, ProfileOutcome, StudentEnrollments, StudentProfileCommand,
    StudentProfileQuery, StudentRepository, StudentRepositoryError,
};
use crate::domain::{
    Error, IdentityRef, RoleGrant, Student, StudentDraft, StudentFields, StudentId,
};

/// Student profile service implementing the profile driving ports.
#[derive(Clone)]
pub struct StudentProfileService<S, L> {
    students: Arc<S>,
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<S, L> StudentProfileService<S, L> {
    /// Create a service over the student store and ledger.
    pub fn new(students: Arc<S>, ledger: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self {
            students,
            ledger,
            clock,
        }
    }
}

/// Error returned when an identity without a profile asks for
/// profile-scoped data.
pub(crate) fn profile_required() -> Error {
    Error::not_found("create a student profile first")
        .with_details(json!({ "reason": "profile_required" }))
}

impl<S, L> StudentProfileService<S, L>
where
    S: StudentRepository,
    L: EnrollmentLedger,
{
    async fn existing_profile(&self, identity: &IdentityRef) -> Result<Option<Student>, Error> {
        self.students
            .find_by_identity(identity)
            .await
            .map_err(student_store_error)
    }
}

#[async_trait]
impl<S, L> StudentProfileCommand for StudentProfileService<S, L>
where
    S: StudentRepository,
    L: EnrollmentLedger,
{
    async fn create_profile(
        &self,
        identity: IdentityRef,
        fields: StudentFields,
    ) -> Result<ProfileOutcome, Error> {
        if let Some(existing) = self.existing_profile(&identity).await? {
            debug!(student_id = %existing.id, "profile already exists");
            return Ok(ProfileOutcome::Existing(existing));
        }

        let now = self.clock.utc();
        let draft = StudentDraft::try_new(fields, now.date_naive())?;
        let student = draft.into_student(StudentId::random(), identity.clone(), now);

        match self.students.insert(&student).await {
            Ok(()) => {
                info!(student_id = %student.id, "student profile created");
                Ok(ProfileOutcome::Created {
                    student,
                    role_grant: RoleGrant::Student,
                })
            }
            Err(StudentRepositoryError::DuplicateIdentity { .. }) => {
                // A concurrent request created the profile first.
                self.existing_profile(&identity)
                    .await?
                    .map(ProfileOutcome::Existing)
                    .ok_or_else(|| Error::internal("profile vanished after duplicate insert"))
            }
            Err(StudentRepositoryError::DuplicateStudentNumber { student_number }) => Err(
                Error::conflict(format!("student number {student_number} is already in use"))
                    .with_details(json!({
                        "field": "studentNumber",
                        "code": "duplicate",
                        "value": student_number,
                    })),
            ),
            Err(other) => Err(student_store_error(other)),
        }
    }
}

#[async_trait]
impl<S, L> StudentProfileQuery for StudentProfileService<S, L>
where
    S: StudentRepository,
    L: EnrollmentLedger,
{
    async fn find_by_identity(&self, identity: &IdentityRef) -> Result<Option<Student>, Error> {
        self.existing_profile(identity).await
    }

    async fn my_enrollments(&self, identity: &IdentityRef) -> Result<StudentEnrollments, Error> {
        let student = self
            .existing_profile(identity)
            .await?
            .ok_or_else(profile_required)?;
        let enrollments = self
            .ledger
            .list_for_student(student.id)
            .await
            .map_err(ledger_store_error)?;
        Ok(StudentEnrollments {
            student,
            enrollments,
        })
    }
}

#[cfg(test)]
#[path = "student_profile_service_tests.rs"]
mod tests;
