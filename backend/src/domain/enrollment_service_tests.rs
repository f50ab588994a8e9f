//! Tests for the enrollment service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{MockCourseRepository, MockEnrollmentLedger, MockStudentRepository};
use crate::domain::test_fixtures::{course, fixture_clock, fixture_timestamp, student};
use crate::domain::{EnrollmentStatus, Error, ErrorCode};

type Service =
    EnrollmentService<MockStudentRepository, MockCourseRepository, MockEnrollmentLedger>;

fn make_service(
    students: MockStudentRepository,
    courses: MockCourseRepository,
    ledger: MockEnrollmentLedger,
) -> Service {
    EnrollmentService::new(
        Arc::new(students),
        Arc::new(courses),
        Arc::new(ledger),
        fixture_clock(),
    )
}

fn students_with_profile(student_id: StudentId) -> MockStudentRepository {
    let mut students = MockStudentRepository::new();
    let mut profile = student("auth0|ada", "S100");
    profile.id = student_id;
    students
        .expect_find_by_id()
        .with(eq(student_id))
        .return_once(move |_| Ok(Some(profile)));
    students
}

fn courses_with(found: Course) -> MockCourseRepository {
    let mut courses = MockCourseRepository::new();
    let course_id = found.id;
    courses
        .expect_find_by_id()
        .with(eq(course_id))
        .return_once(move |_| Ok(Some(found)));
    courses
}

fn ledger_without_entry() -> MockEnrollmentLedger {
    let mut ledger = MockEnrollmentLedger::new();
    ledger.expect_find_for_pair().return_once(|_, _| Ok(None));
    ledger
}

#[tokio::test]
async fn enroll_records_entry_and_returns_it() {
    let student_id = StudentId::random();
    let target = course("CS101", 30, 4);
    let course_id = target.id;
    let mut ledger = ledger_without_entry();
    let mut updated = target.clone();
    updated.live_count = 5;
    ledger
        .expect_enroll()
        .withf(move |entry| {
            entry.student_id == student_id
                && entry.course_id == course_id
                && entry.status == EnrollmentStatus::Enrolled
        })
        .times(1)
        .return_once(move |_| Ok(updated));

    let service = make_service(students_with_profile(student_id), courses_with(target), ledger);
    let entry = service
        .enroll(student_id, course_id)
        .await
        .expect("enroll succeeds");

    assert_eq!(entry.status, EnrollmentStatus::Enrolled);
    assert_eq!(entry.enrolled_at, fixture_timestamp());
    assert!(entry.grade.is_none());
}

#[tokio::test]
async fn enroll_reports_missing_student_before_touching_courses() {
    let student_id = StudentId::random();
    let mut students = MockStudentRepository::new();
    students.expect_find_by_id().return_once(|_| Ok(None));
    let mut courses = MockCourseRepository::new();
    courses.expect_find_by_id().never();
    let mut ledger = MockEnrollmentLedger::new();
    ledger.expect_enroll().never();

    let service = make_service(students, courses, ledger);
    let failure = service
        .enroll(student_id, CourseId::random())
        .await
        .expect_err("student missing");

    assert_eq!(failure, EnrollmentFailure::StudentNotFound { student_id });
}

#[rstest]
#[case::missing(None)]
#[case::inactive(Some(false))]
#[tokio::test]
async fn enroll_treats_missing_and_inactive_courses_alike(#[case] active: Option<bool>) {
    let student_id = StudentId::random();
    let course_id = CourseId::random();
    let mut courses = MockCourseRepository::new();
    courses.expect_find_by_id().return_once(move |_| {
        Ok(active.map(|flag| {
            let mut found = course("HIST210", 10, 0);
            found.id = course_id;
            found.active = flag;
            found
        }))
    });
    let mut ledger = MockEnrollmentLedger::new();
    ledger.expect_find_for_pair().never();
    ledger.expect_enroll().never();

    let service = make_service(students_with_profile(student_id), courses, ledger);
    let failure = service
        .enroll(student_id, course_id)
        .await
        .expect_err("course unavailable");

    assert_eq!(failure, EnrollmentFailure::CourseNotFound { course_id });
}

#[rstest]
#[case(EnrollmentStatus::Enrolled)]
#[case(EnrollmentStatus::Withdrawn)]
#[case(EnrollmentStatus::Completed)]
#[tokio::test]
async fn enroll_rejects_any_existing_entry(#[case] status: EnrollmentStatus) {
    let student_id = StudentId::random();
    let target = course("MATH201", 10, 1);
    let course_id = target.id;
    let mut ledger = MockEnrollmentLedger::new();
    ledger.expect_find_for_pair().return_once(move |student, course| {
        let mut entry = Enrollment::enrolled(student, course, fixture_timestamp());
        entry.status = status;
        Ok(Some(entry))
    });
    ledger.expect_enroll().never();

    let service = make_service(students_with_profile(student_id), courses_with(target), ledger);
    let failure = service
        .enroll(student_id, course_id)
        .await
        .expect_err("duplicate");

    assert_eq!(
        failure,
        EnrollmentFailure::AlreadyEnrolled {
            course_id,
            existing: Some(status),
        }
    );
}

#[tokio::test]
async fn enroll_checks_duplicates_before_capacity() {
    let student_id = StudentId::random();
    let full = course("ENG105", 2, 2);
    let course_id = full.id;
    let mut ledger = MockEnrollmentLedger::new();
    ledger.expect_find_for_pair().return_once(move |student, course| {
        Ok(Some(Enrollment::enrolled(student, course, fixture_timestamp())))
    });

    let service = make_service(students_with_profile(student_id), courses_with(full), ledger);
    let failure = service
        .enroll(student_id, course_id)
        .await
        .expect_err("duplicate wins");

    assert_eq!(failure.reason(), "already_enrolled");
}

#[tokio::test]
async fn enroll_rejects_full_course_without_writing() {
    let student_id = StudentId::random();
    let full = course("CS999", 1, 1);
    let course_id = full.id;
    let mut ledger = ledger_without_entry();
    ledger.expect_enroll().never();

    let service = make_service(students_with_profile(student_id), courses_with(full), ledger);
    let failure = service
        .enroll(student_id, course_id)
        .await
        .expect_err("course full");

    assert_eq!(failure, EnrollmentFailure::CourseFull { course_id });
    assert_eq!(Error::from(failure).code(), ErrorCode::Conflict);
}

#[rstest]
#[case(
    EnrollmentLedgerError::course_full(CourseId::random()),
    "course_full"
)]
#[case(
    EnrollmentLedgerError::already_enrolled(StudentId::random(), CourseId::random()),
    "already_enrolled"
)]
#[case(EnrollmentLedgerError::connection("pool timeout"), "store_unavailable")]
#[case(EnrollmentLedgerError::query("deadlock detected"), "store_failure")]
#[tokio::test]
async fn enroll_surfaces_ledger_rejections(
    #[case] ledger_error: EnrollmentLedgerError,
    #[case] reason: &str,
) {
    let student_id = StudentId::random();
    let target = course("BIO110", 5, 4);
    let course_id = target.id;
    let mut ledger = ledger_without_entry();
    ledger.expect_enroll().return_once(move |_| Err(ledger_error));

    let service = make_service(students_with_profile(student_id), courses_with(target), ledger);
    let failure = service
        .enroll(student_id, course_id)
        .await
        .expect_err("ledger rejects");

    assert_eq!(failure.reason(), reason);
}

#[tokio::test]
async fn enroll_maps_unreachable_student_store() {
    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_id()
        .return_once(|_| Err(StudentRepositoryError::connection("refused")));

    let service = make_service(
        students,
        MockCourseRepository::new(),
        MockEnrollmentLedger::new(),
    );
    let failure = service
        .enroll(StudentId::random(), CourseId::random())
        .await
        .expect_err("store down");

    assert_eq!(
        failure,
        EnrollmentFailure::StoreUnavailable {
            message: "refused".to_owned()
        }
    );
}

#[tokio::test]
async fn withdraw_returns_withdrawn_entry() {
    let student_id = StudentId::random();
    let entry = Enrollment::enrolled(student_id, CourseId::random(), fixture_timestamp());
    let enrollment_id = entry.id;
    let mut ledger = MockEnrollmentLedger::new();
    ledger
        .expect_withdraw()
        .with(eq(enrollment_id), eq(student_id), eq(fixture_timestamp()))
        .times(1)
        .return_once(move |_, _, _| {
            let mut withdrawn = entry;
            withdrawn.status = EnrollmentStatus::Withdrawn;
            Ok(withdrawn)
        });

    let service = make_service(
        MockStudentRepository::new(),
        MockCourseRepository::new(),
        ledger,
    );
    let withdrawn = service
        .withdraw(enrollment_id, student_id)
        .await
        .expect("withdraw succeeds");

    assert_eq!(withdrawn.status, EnrollmentStatus::Withdrawn);
}

#[rstest]
#[case(EnrollmentLedgerError::enrollment_not_found(EnrollmentId::random()), "enrollment_not_found")]
#[case(
    EnrollmentLedgerError::not_enrolled(EnrollmentId::random(), EnrollmentStatus::Withdrawn),
    "not_enrolled"
)]
#[tokio::test]
async fn withdraw_surfaces_ledger_rejections(
    #[case] ledger_error: EnrollmentLedgerError,
    #[case] reason: &str,
) {
    let mut ledger = MockEnrollmentLedger::new();
    ledger
        .expect_withdraw()
        .return_once(move |_, _, _| Err(ledger_error));

    let service = make_service(
        MockStudentRepository::new(),
        MockCourseRepository::new(),
        ledger,
    );
    let failure = service
        .withdraw(EnrollmentId::random(), StudentId::random())
        .await
        .expect_err("withdraw rejected");

    assert_eq!(failure.reason(), reason);
}

#[tokio::test]
async fn eligibility_returns_course_without_writing() {
    let student_id = StudentId::random();
    let target = course("CS101", 30, 29);
    let course_id = target.id;
    let mut ledger = ledger_without_entry();
    ledger.expect_enroll().never();

    let service = make_service(students_with_profile(student_id), courses_with(target), ledger);
    let eligible = service
        .check_eligibility(student_id, course_id)
        .await
        .expect("eligible");

    assert_eq!(eligible.seats_remaining(), 1);
}
