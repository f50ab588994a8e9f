//! Driving ports for student profiles.
//!
//! Profile creation never touches sessions. When a profile is created the
//! outcome carries a [`RoleGrant`] the identity layer must apply.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EnrollmentDetails, Error, IdentityRef, RoleGrant, Student, StudentFields};

/// Result of [`StudentProfileCommand::create_profile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileOutcome {
    /// A new profile was stored; the caller must apply `role_grant`.
    Created {
        /// The stored profile.
        student: Student,
        /// Role the identity layer must grant.
        role_grant: RoleGrant,
    },
    /// The identity already had a profile; nothing was written.
    Existing(Student),
}

impl ProfileOutcome {
    /// The profile, whichever branch was taken.
    #[must_use]
    pub fn student(&self) -> &Student {
        match self {
            Self::Created { student, .. } | Self::Existing(student) => student,
        }
    }
}

/// A student together with every ledger entry they hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentEnrollments {
    /// The profile.
    pub student: Student,
    /// Ledger entries, newest first.
    pub enrollments: Vec<EnrollmentDetails>,
}

/// Profile creation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentProfileCommand: Send + Sync {
    /// Validate `fields` and create the identity's profile, once.
    async fn create_profile(
        &self,
        identity: IdentityRef,
        fields: StudentFields,
    ) -> Result<ProfileOutcome, Error>;
}

/// Profile lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentProfileQuery: Send + Sync {
    /// The identity's profile, if one exists.
    async fn find_by_identity(&self, identity: &IdentityRef) -> Result<Option<Student>, Error>;

    /// The identity's profile with all of its ledger entries.
    async fn my_enrollments(&self, identity: &IdentityRef) -> Result<StudentEnrollments, Error>;
}
