//! Student profiles keyed to an external identity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::fields::{FieldError, optional_text, required_text};
use super::{IdentityRef, StudentId};

/// Maximum first or last name length.
pub const NAME_MAX: usize = 50;
/// Maximum student number length.
pub const STUDENT_NUMBER_MAX: usize = 20;
/// Maximum programme/major length.
pub const MAJOR_MAX: usize = 100;

/// Unvalidated profile fields as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentFields {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Institution-issued student number.
    pub student_number: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Optional programme or major.
    #[serde(default)]
    pub major: String,
}

/// Validated profile fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentDraft {
    first_name: String,
    last_name: String,
    student_number: String,
    date_of_birth: NaiveDate,
    major: String,
}

impl StudentDraft {
    /// Validate raw fields; `today` bounds the date of birth.
    pub fn try_new(fields: StudentFields, today: NaiveDate) -> Result<Self, FieldError> {
        let first_name = required_text("firstName", &fields.first_name, NAME_MAX)?;
        let last_name = required_text("lastName", &fields.last_name, NAME_MAX)?;
        let student_number =
            required_text("studentNumber", &fields.student_number, STUDENT_NUMBER_MAX)?;
        if fields.date_of_birth >= today {
            return Err(FieldError::NotInPast {
                field: "dateOfBirth",
            });
        }
        let major = optional_text("major", &fields.major, MAJOR_MAX)?;
        Ok(Self {
            first_name,
            last_name,
            student_number,
            date_of_birth: fields.date_of_birth,
            major,
        })
    }

    /// Student number the draft claims.
    #[must_use]
    pub fn student_number(&self) -> &str {
        &self.student_number
    }

    /// Materialise the profile for `identity`.
    #[must_use]
    pub fn into_student(self, id: StudentId, identity: IdentityRef, now: DateTime<Utc>) -> Student {
        Student {
            id,
            identity,
            first_name: self.first_name,
            last_name: self.last_name,
            student_number: self.student_number,
            date_of_birth: self.date_of_birth,
            major: self.major,
            created_at: now,
        }
    }
}

/// Stored student profile.
///
/// `identity` is fixed at creation; a profile is never re-keyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Profile identifier.
    pub id: StudentId,
    /// Identity the profile belongs to.
    pub identity: IdentityRef,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique student number.
    pub student_number: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Programme or major, possibly empty.
    pub major: String,
    /// Profile creation time.
    pub created_at: DateTime<Utc>,
}

impl Student {
    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
