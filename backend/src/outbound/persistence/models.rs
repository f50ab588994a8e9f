//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain records
//! report malformed rows as strings so each repository can map them onto its
//! own query error.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Course, CourseCode, CourseId, CourseSummary, Enrollment, EnrollmentDetails, EnrollmentId,
    EnrollmentStatus, Grade, IdentityRef, Student, StudentId, StudentSummary,
};

use super::schema::{courses, enrollments, students};

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

/// Row struct for reading from the courses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub description: String,
    pub credits: i16,
    pub instructor: String,
    pub max_students: i32,
    pub current_enrolled: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseRow {
    pub(crate) fn into_course(self) -> Result<Course, String> {
        let code = CourseCode::new(&self.course_code)
            .map_err(|err| format!("course {} has invalid code: {err}", self.id))?;
        let credits = u8::try_from(self.credits)
            .map_err(|_| format!("course {} has invalid credits {}", self.id, self.credits))?;
        let capacity = u32::try_from(self.max_students).map_err(|_| {
            format!("course {} has invalid capacity {}", self.id, self.max_students)
        })?;
        let live_count = u32::try_from(self.current_enrolled).map_err(|_| {
            format!(
                "course {} has invalid live count {}",
                self.id, self.current_enrolled
            )
        })?;
        Ok(Course {
            id: CourseId::from_uuid(self.id),
            code,
            name: self.course_name,
            description: self.description,
            credits,
            instructor: self.instructor,
            capacity,
            live_count,
            active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for creating course records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub(crate) struct NewCourseRow<'a> {
    pub id: Uuid,
    pub course_code: &'a str,
    pub course_name: &'a str,
    pub description: &'a str,
    pub credits: i16,
    pub instructor: &'a str,
    pub max_students: i32,
    pub current_enrolled: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for editable course fields. Never includes the live count.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = courses)]
pub(crate) struct CourseDetailsUpdate<'a> {
    pub course_code: &'a str,
    pub course_name: &'a str,
    pub description: &'a str,
    pub credits: i16,
    pub instructor: &'a str,
    pub max_students: i32,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

/// Row struct for reading from the students table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentRow {
    pub id: Uuid,
    pub identity_ref: String,
    pub first_name: String,
    pub last_name: String,
    pub student_number: String,
    pub date_of_birth: NaiveDate,
    pub major: String,
    pub created_at: DateTime<Utc>,
}

impl StudentRow {
    pub(crate) fn into_student(self) -> Result<Student, String> {
        let identity = IdentityRef::new(self.identity_ref)
            .map_err(|err| format!("student {} has invalid identity: {err}", self.id))?;
        Ok(Student {
            id: StudentId::from_uuid(self.id),
            identity,
            first_name: self.first_name,
            last_name: self.last_name,
            student_number: self.student_number,
            date_of_birth: self.date_of_birth,
            major: self.major,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for creating student profiles.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = students)]
pub(crate) struct NewStudentRow<'a> {
    pub id: Uuid,
    pub identity_ref: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub student_number: &'a str,
    pub date_of_birth: NaiveDate,
    pub major: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Enrollments
// ---------------------------------------------------------------------------

/// Row struct for reading from the enrollments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrollmentRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub status: String,
    pub enrolled_at: DateTime<Utc>,
    pub grade: Option<i16>,
}

impl EnrollmentRow {
    pub(crate) fn into_enrollment(self) -> Result<Enrollment, String> {
        let status = self
            .status
            .parse::<EnrollmentStatus>()
            .map_err(|err| format!("enrollment {} has unknown status: {}", self.id, err.0))?;
        let grade = self
            .grade
            .map(|value| Grade::new(i64::from(value)))
            .transpose()
            .map_err(|err| format!("enrollment {} has invalid grade: {err}", self.id))?;
        Ok(Enrollment {
            id: EnrollmentId::from_uuid(self.id),
            student_id: StudentId::from_uuid(self.student_id),
            course_id: CourseId::from_uuid(self.course_id),
            status,
            enrolled_at: self.enrolled_at,
            grade,
        })
    }
}

/// Insertable struct for new ledger entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = enrollments)]
pub(crate) struct NewEnrollmentRow<'a> {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub status: &'a str,
    pub enrolled_at: DateTime<Utc>,
    pub grade: Option<i16>,
    pub updated_at: DateTime<Utc>,
}

/// Student columns joined onto a ledger row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentSummaryRow {
    pub first_name: String,
    pub last_name: String,
    pub student_number: String,
}

/// Course columns joined onto a ledger row.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseSummaryRow {
    pub course_code: String,
    pub course_name: String,
    pub credits: i16,
    pub instructor: String,
}

/// A ledger row with the student and course columns it links.
pub(crate) type EnrollmentDetailsRow = (EnrollmentRow, StudentSummaryRow, CourseSummaryRow);

pub(crate) fn into_enrollment_details(
    (enrollment, student, course): EnrollmentDetailsRow,
) -> Result<EnrollmentDetails, String> {
    let enrollment = enrollment.into_enrollment()?;
    let code = CourseCode::new(&course.course_code)
        .map_err(|err| format!("course {} has invalid code: {err}", enrollment.course_id))?;
    let credits = u8::try_from(course.credits).map_err(|_| {
        format!(
            "course {} has invalid credits {}",
            enrollment.course_id, course.credits
        )
    })?;
    Ok(EnrollmentDetails {
        enrollment,
        student: StudentSummary {
            name: format!("{} {}", student.first_name, student.last_name),
            student_number: student.student_number,
        },
        course: CourseSummary {
            code,
            name: course.course_name,
            credits,
            instructor: course.instructor,
        },
    })
}
