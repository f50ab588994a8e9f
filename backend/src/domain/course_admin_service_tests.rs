//! Tests for the course administration service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::MockCourseRepository;
use crate::domain::test_fixtures::{course, course_fields, fixture_clock, fixture_timestamp};
use crate::domain::ErrorCode;

fn make_service(courses: MockCourseRepository) -> CourseAdminService<MockCourseRepository> {
    CourseAdminService::new(Arc::new(courses), fixture_clock())
}

fn draft(code: &str, capacity: i64) -> CourseDraft {
    CourseDraft::try_new(course_fields(code, capacity)).expect("valid draft")
}

#[tokio::test]
async fn create_stores_active_course_with_empty_ledger() {
    let mut courses = MockCourseRepository::new();
    courses
        .expect_insert()
        .withf(|course| course.code.as_str() == "CS999" && course.live_count == 0 && course.active)
        .times(1)
        .return_once(|_| Ok(()));

    let created = make_service(courses)
        .create(draft("cs999", 2))
        .await
        .expect("create succeeds");

    assert_eq!(created.capacity, 2);
    assert_eq!(created.created_at, fixture_timestamp());
}

#[tokio::test]
async fn create_reports_duplicate_code_as_field_conflict() {
    let mut courses = MockCourseRepository::new();
    courses
        .expect_insert()
        .return_once(|_| Err(CourseRepositoryError::duplicate_code("CS101")));

    let error = make_service(courses)
        .create(draft("CS101", 30))
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
    let details = error.details().expect("details");
    assert_eq!(details["field"], "courseCode");
    assert_eq!(details["code"], "duplicate");
}

#[tokio::test]
async fn update_passes_draft_and_clock_through() {
    let existing = course("CS101", 30, 12);
    let course_id = existing.id;
    let mut courses = MockCourseRepository::new();
    courses
        .expect_update_details()
        .with(
            eq(course_id),
            mockall::predicate::always(),
            eq(fixture_timestamp()),
        )
        .times(1)
        .return_once(move |_, draft, now| Ok(existing.with_details(draft.clone(), now)));

    let updated = make_service(courses)
        .update(course_id, draft("CS101", 40))
        .await
        .expect("update succeeds");

    assert_eq!(updated.capacity, 40);
    assert_eq!(updated.live_count, 12);
}

#[rstest]
#[case(
    CourseRepositoryError::capacity_below_enrollment(12_u32, 10_u32),
    ErrorCode::Conflict,
    "capacity_below_enrollment"
)]
#[case(
    CourseRepositoryError::not_found(CourseId::random()),
    ErrorCode::NotFound,
    "course_not_found"
)]
#[tokio::test]
async fn update_maps_repository_rejections(
    #[case] repo_error: CourseRepositoryError,
    #[case] code: ErrorCode,
    #[case] reason: &str,
) {
    let mut courses = MockCourseRepository::new();
    courses
        .expect_update_details()
        .return_once(move |_, _, _| Err(repo_error));

    let error = make_service(courses)
        .update(CourseId::random(), draft("CS101", 10))
        .await
        .expect_err("rejected");

    assert_eq!(error.code(), code);
    assert_eq!(error.details().expect("details")["reason"], reason);
}

#[tokio::test]
async fn deactivate_keeps_record_and_history() {
    let mut inactive = course("HIST210", 25, 3);
    inactive.active = false;
    let course_id = inactive.id;
    let mut courses = MockCourseRepository::new();
    courses
        .expect_set_active()
        .with(eq(course_id), eq(false), eq(fixture_timestamp()))
        .return_once(move |_, _, _| Ok(inactive));
    courses.expect_delete().never();

    let outcome = make_service(courses)
        .remove(course_id, CourseRemoval::Deactivate)
        .await
        .expect("deactivate succeeds");

    match outcome {
        CourseRemovalOutcome::Deactivated { course } => {
            assert!(!course.active);
            assert_eq!(course.live_count, 3);
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn purge_reports_removed_entries() {
    let course_id = CourseId::random();
    let mut courses = MockCourseRepository::new();
    courses
        .expect_delete()
        .with(eq(course_id))
        .return_once(|_| Ok(4));
    courses.expect_set_active().never();

    let outcome = make_service(courses)
        .remove(course_id, CourseRemoval::Purge)
        .await
        .expect("purge succeeds");

    assert_eq!(
        outcome,
        CourseRemovalOutcome::Purged {
            course_id,
            enrollments_removed: 4,
        }
    );
}

#[tokio::test]
async fn purge_of_missing_course_is_not_found() {
    let course_id = CourseId::random();
    let mut courses = MockCourseRepository::new();
    courses
        .expect_delete()
        .return_once(move |_| Err(CourseRepositoryError::not_found(course_id)));

    let error = make_service(courses)
        .remove(course_id, CourseRemoval::Purge)
        .await
        .expect_err("missing");

    assert_eq!(error.code(), ErrorCode::NotFound);
}
