//! Shared builders for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use super::{
    Course, CourseDraft, CourseFields, CourseId, IdentityRef, Student, StudentDraft, StudentFields,
    StudentId,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, 9, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn course_fields(code: &str, capacity: i64) -> CourseFields {
    CourseFields {
        code: code.to_owned(),
        name: format!("{code} seminar"),
        description: String::new(),
        credits: 3,
        instructor: "Dr. Okafor".to_owned(),
        capacity,
        active: true,
    }
}

pub(crate) fn course(code: &str, capacity: i64, live_count: u32) -> Course {
    let mut course = CourseDraft::try_new(course_fields(code, capacity))
        .expect("valid course fields")
        .into_course(CourseId::random(), fixture_timestamp());
    course.live_count = live_count;
    course
}

pub(crate) fn student_fields(student_number: &str) -> StudentFields {
    StudentFields {
        first_name: "Ada".to_owned(),
        last_name: "Byron".to_owned(),
        student_number: student_number.to_owned(),
        date_of_birth: NaiveDate::from_ymd_opt(2004, 12, 10).expect("valid date"),
        major: "Mathematics".to_owned(),
    }
}

pub(crate) fn student(identity: &str, student_number: &str) -> Student {
    StudentDraft::try_new(
        student_fields(student_number),
        fixture_timestamp().date_naive(),
    )
    .expect("valid student fields")
    .into_student(
        StudentId::random(),
        IdentityRef::new(identity).expect("valid identity"),
        fixture_timestamp(),
    )
}
