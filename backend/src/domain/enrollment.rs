//! Enrollment ledger entries and their read views.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::fields::FieldError;
use super::{CourseCode, CourseId, EnrollmentId, StudentId};

/// Lifecycle status of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    /// Currently holds a seat and counts towards the live count.
    Enrolled,
    /// Finished the course.
    Completed,
    /// Left the course before completion.
    Withdrawn,
    /// Did not pass the course.
    Failed,
}

impl EnrollmentStatus {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enrolled => "enrolled",
            Self::Completed => "completed",
            Self::Withdrawn => "withdrawn",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognised stored status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown enrollment status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for EnrollmentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enrolled" => Ok(Self::Enrolled),
            "completed" => Ok(Self::Completed),
            "withdrawn" => Ok(Self::Withdrawn),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownStatus(other.to_owned())),
        }
    }
}

/// Final grade between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Grade(u8);

impl Grade {
    /// Highest possible grade.
    pub const MAX: u8 = 100;

    /// Validate a grade.
    pub fn new(value: i64) -> Result<Self, FieldError> {
        u8::try_from(value)
            .ok()
            .filter(|grade| *grade <= Self::MAX)
            .map(Self)
            .ok_or(FieldError::OutOfRange {
                field: "grade",
                min: 0,
                max: i64::from(Self::MAX),
            })
    }

    /// Raw value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// One ledger entry linking a student to a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    /// Entry identifier.
    pub id: EnrollmentId,
    /// Student holding the entry.
    pub student_id: StudentId,
    /// Course the entry refers to.
    pub course_id: CourseId,
    /// Current status.
    pub status: EnrollmentStatus,
    /// When the entry was created.
    pub enrolled_at: DateTime<Utc>,
    /// Final grade, once awarded.
    pub grade: Option<Grade>,
}

impl Enrollment {
    /// A fresh `Enrolled` entry.
    #[must_use]
    pub fn enrolled(student_id: StudentId, course_id: CourseId, now: DateTime<Utc>) -> Self {
        Self {
            id: EnrollmentId::random(),
            student_id,
            course_id,
            status: EnrollmentStatus::Enrolled,
            enrolled_at: now,
            grade: None,
        }
    }

    /// Whether the entry currently occupies a seat.
    #[must_use]
    pub fn holds_seat(&self) -> bool {
        self.status == EnrollmentStatus::Enrolled
    }
}

/// Student columns joined onto a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    /// "First Last".
    pub name: String,
    /// Student number.
    pub student_number: String,
}

/// Course columns joined onto a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    /// Course code.
    pub code: CourseCode,
    /// Course name.
    pub name: String,
    /// Credit count.
    pub credits: u8,
    /// Instructor name.
    pub instructor: String,
}

/// Ledger entry with the student and course it links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDetails {
    /// The ledger entry.
    pub enrollment: Enrollment,
    /// Student side of the link.
    pub student: StudentSummary,
    /// Course side of the link.
    pub course: CourseSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EnrollmentStatus::Enrolled)]
    #[case(EnrollmentStatus::Completed)]
    #[case(EnrollmentStatus::Withdrawn)]
    #[case(EnrollmentStatus::Failed)]
    fn status_round_trips_through_storage_form(#[case] status: EnrollmentStatus) {
        assert_eq!(status.as_str().parse::<EnrollmentStatus>(), Ok(status));
    }

    #[rstest]
    fn rejects_unknown_status() {
        assert!("dropped".parse::<EnrollmentStatus>().is_err());
    }

    #[rstest]
    #[case(-1, false)]
    #[case(0, true)]
    #[case(100, true)]
    #[case(101, false)]
    fn grade_bounds(#[case] raw: i64, #[case] ok: bool) {
        assert_eq!(Grade::new(raw).is_ok(), ok);
    }

    #[rstest]
    fn only_enrolled_entries_hold_seats() {
        let mut entry = Enrollment::enrolled(StudentId::random(), CourseId::random(), Utc::now());
        assert!(entry.holds_seat());
        entry.status = EnrollmentStatus::Withdrawn;
        assert!(!entry.holds_seat());
    }
}
