//! Shared helpers for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`; this
//! module holds the record builders and embedded PostgreSQL plumbing they
//! share.

#![allow(dead_code, reason = "each test crate uses a different subset")]

pub mod cluster_skip;
pub mod embedded_postgres;

use chrono::{NaiveDate, TimeZone, Utc};
use portal_backend::domain::{
    Course, CourseDraft, CourseFields, CourseId, IdentityRef, Student, StudentDraft,
    StudentFields, StudentId,
};

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::{provision_template_database, shared_cluster};

/// An active course with an empty ledger.
pub fn course(code: &str, capacity: i64) -> Course {
    let now = Utc
        .with_ymd_and_hms(2026, 9, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    CourseDraft::try_new(CourseFields {
        code: code.to_owned(),
        name: format!("{code} seminar"),
        description: String::new(),
        credits: 3,
        instructor: "Dr. Okafor".to_owned(),
        capacity,
        active: true,
    })
    .expect("valid course fields")
    .into_course(CourseId::random(), now)
}

/// A student profile bound to `identity`.
pub fn student(identity: &str, student_number: &str) -> Student {
    let today = NaiveDate::from_ymd_opt(2026, 9, 1).expect("valid date");
    StudentDraft::try_new(
        StudentFields {
            first_name: "Ada".to_owned(),
            last_name: "Byron".to_owned(),
            student_number: student_number.to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(2004, 12, 10).expect("valid date"),
            major: "Mathematics".to_owned(),
        },
        today,
    )
    .expect("valid student fields")
    .into_student(
        StudentId::random(),
        IdentityRef::new(identity).expect("valid identity"),
        Utc::now(),
    )
}
