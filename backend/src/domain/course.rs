//! Course catalogue records.
//!
//! A [`CourseDraft`] is the validated input for create and edit operations.
//! A [`Course`] is the stored record, including the live enrollment count
//! that only the enrollment ledger may change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::fields::{FieldError, in_range, optional_text, required_text};
use super::CourseId;

/// Maximum course code length.
pub const COURSE_CODE_MAX: usize = 10;
/// Maximum course name length.
pub const COURSE_NAME_MAX: usize = 200;
/// Maximum description length.
pub const DESCRIPTION_MAX: usize = 1000;
/// Maximum instructor name length.
pub const INSTRUCTOR_MAX: usize = 100;
/// Accepted credit range.
pub const CREDITS_RANGE: (i64, i64) = (1, 10);
/// Largest accepted capacity.
pub const CAPACITY_MAX: i64 = 10_000;

/// Unique, upper-cased course code such as `CS101`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "CS101")]
pub struct CourseCode(String);

impl CourseCode {
    /// Trim, upper-case, and validate a course code.
    ///
    /// The length limit applies to the upper-cased form, which can be longer
    /// than the input (`ß` becomes `SS`).
    pub fn new(raw: &str) -> Result<Self, FieldError> {
        required_text("courseCode", &raw.trim().to_uppercase(), COURSE_CODE_MAX).map(Self)
    }

    /// Borrow the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CourseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unvalidated course fields as received from a caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseFields {
    /// Course code, e.g. `CS101`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: String,
    /// Credit count (1–10).
    pub credits: i64,
    /// Optional instructor name.
    #[serde(default)]
    pub instructor: String,
    /// Capacity (`MaxStudents`).
    pub capacity: i64,
    /// Whether the course is listed and open for enrollment.
    #[serde(default = "listed_by_default")]
    pub active: bool,
}

const fn listed_by_default() -> bool {
    true
}

/// Validated course fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    code: CourseCode,
    name: String,
    description: String,
    credits: u8,
    instructor: String,
    capacity: u32,
    active: bool,
}

impl CourseDraft {
    /// Validate raw fields.
    ///
    /// # Examples
    /// ```
    /// use portal_backend::domain::{CourseDraft, CourseFields};
    ///
    /// let draft = CourseDraft::try_new(CourseFields {
    ///     code: "cs999".into(),
    ///     name: "Capstone".into(),
    ///     description: String::new(),
    ///     credits: 3,
    ///     instructor: "Dr. Lee".into(),
    ///     capacity: 2,
    ///     active: true,
    /// })
    /// .expect("valid draft");
    /// assert_eq!(draft.code().as_str(), "CS999");
    /// ```
    pub fn try_new(fields: CourseFields) -> Result<Self, FieldError> {
        let code = CourseCode::new(&fields.code)?;
        let name = required_text("name", &fields.name, COURSE_NAME_MAX)?;
        let description = optional_text("description", &fields.description, DESCRIPTION_MAX)?;
        let credits = in_range("credits", fields.credits, CREDITS_RANGE.0, CREDITS_RANGE.1)?;
        let instructor = optional_text("instructor", &fields.instructor, INSTRUCTOR_MAX)?;
        let capacity = in_range("capacity", fields.capacity, 1, CAPACITY_MAX)?;
        Ok(Self {
            code,
            name,
            description,
            credits: u8::try_from(credits).map_err(|_| FieldError::OutOfRange {
                field: "credits",
                min: CREDITS_RANGE.0,
                max: CREDITS_RANGE.1,
            })?,
            instructor,
            capacity: u32::try_from(capacity).map_err(|_| FieldError::OutOfRange {
                field: "capacity",
                min: 1,
                max: CAPACITY_MAX,
            })?,
            active: fields.active,
        })
    }

    /// Course code.
    #[must_use]
    pub fn code(&self) -> &CourseCode {
        &self.code
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description, possibly empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Credit count.
    #[must_use]
    pub fn credits(&self) -> u8 {
        self.credits
    }

    /// Instructor name, possibly empty.
    #[must_use]
    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    /// Capacity (`MaxStudents`).
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Whether the course is listed and open for enrollment.
    #[must_use]
    pub fn active(&self) -> bool {
        self.active
    }

    /// Materialise a new course with no enrollments.
    #[must_use]
    pub fn into_course(self, id: CourseId, now: DateTime<Utc>) -> Course {
        Course {
            id,
            code: self.code,
            name: self.name,
            description: self.description,
            credits: self.credits,
            instructor: self.instructor,
            capacity: self.capacity,
            live_count: 0,
            active: self.active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Stored course record.
///
/// ## Invariants
/// - `live_count <= capacity`.
/// - `live_count` equals the number of `Enrolled` ledger entries for the
///   course; only the ledger's enroll and withdraw operations change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Course identifier.
    pub id: CourseId,
    /// Unique course code.
    pub code: CourseCode,
    /// Display name.
    pub name: String,
    /// Description, possibly empty.
    pub description: String,
    /// Credit count (1–10).
    pub credits: u8,
    /// Instructor name, possibly empty.
    pub instructor: String,
    /// Capacity (`MaxStudents`).
    pub capacity: u32,
    /// Live count (`CurrentEnrolled`).
    pub live_count: u32,
    /// Whether the course appears in the directory and accepts enrollments.
    pub active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Whether another student may enroll right now.
    #[must_use]
    pub fn has_seat(&self) -> bool {
        self.live_count < self.capacity
    }

    /// Seats left before the course is full.
    #[must_use]
    pub fn seats_remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.live_count)
    }

    /// Apply edited fields, leaving the live count untouched.
    #[must_use]
    pub fn with_details(mut self, draft: CourseDraft, now: DateTime<Utc>) -> Self {
        self.code = draft.code;
        self.name = draft.name;
        self.description = draft.description;
        self.credits = draft.credits;
        self.instructor = draft.instructor;
        self.capacity = draft.capacity;
        self.active = draft.active;
        self.updated_at = now;
        self
    }
}
