//! Driven port for student profile storage.
use async_trait::async_trait;

use crate::domain::{IdentityRef, Student, StudentId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by student repository adapters.
    pub enum StudentRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "student repository connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } => "student repository query failed: {message}",
        /// A profile already exists for the identity.
        DuplicateIdentity { identity: String } => "a profile already exists for identity {identity}",
        /// Another profile already uses the student number.
        DuplicateStudentNumber { student_number: String } =>
            "student number {student_number} is already in use",
    }
}

/// Student record store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Insert a new profile. Identity and student number are unique.
    async fn insert(&self, student: &Student) -> Result<(), StudentRepositoryError>;

    /// Fetch a profile by identifier.
    async fn find_by_id(&self, student_id: StudentId) -> Result<Option<Student>, StudentRepositoryError>;

    /// Fetch the profile owned by an identity.
    async fn find_by_identity(
        &self,
        identity: &IdentityRef,
    ) -> Result<Option<Student>, StudentRepositoryError>;

    /// Number of stored profiles.
    async fn count(&self) -> Result<u64, StudentRepositoryError>;
}
