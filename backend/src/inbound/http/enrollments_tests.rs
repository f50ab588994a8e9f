//! HTTP tests for the enrollment endpoints.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{CourseRepository, MockEnrollmentCommand, StudentRepository};
use crate::domain::test_fixtures::{course, student};
use crate::domain::{EnrollmentFailure, Role};
use crate::inbound::http::test_utils::{api_test_app, in_memory_state, session_cookie};
use crate::outbound::memory::InMemoryPortalStore;

async fn seed(store: &InMemoryPortalStore, capacity: i64) -> Course {
    let cs999 = course("CS999", capacity, 0);
    CourseRepository::insert(store, &cs999).await.expect("seed course");
    for (identity, number) in [("auth0|ada", "S100"), ("auth0|grace", "S200")] {
        StudentRepository::insert(store, &student(identity, number))
            .await
            .expect("seed student");
    }
    cs999
}

fn enroll_request(cookie: Cookie<'static>, course_id: impl ToString) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/v1/enrollments")
        .cookie(cookie)
        .set_json(json!({ "courseId": course_id.to_string() }))
        .to_request()
}

fn withdraw_request(cookie: Cookie<'static>, enrollment_id: &str) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri(&format!("/api/v1/enrollments/{enrollment_id}/withdraw"))
        .cookie(cookie)
        .to_request()
}

#[rstest]
#[actix_web::test]
async fn enroll_withdraw_and_blocked_reenrollment() {
    let (store, state) = in_memory_state();
    let cs999 = seed(&store, 1).await;
    let app = actix_test::init_service(api_test_app(state)).await;
    let ada = session_cookie(&app, "auth0|ada", &[Role::Student]).await;

    let preview = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/enrollments/eligibility?courseId={}", cs999.id))
            .cookie(ada.clone())
            .to_request(),
    )
    .await;
    assert_eq!(preview.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(preview).await;
    assert_eq!(body["seatsRemaining"], 1);

    let enrolled = actix_test::call_service(&app, enroll_request(ada.clone(), cs999.id)).await;
    assert_eq!(enrolled.status(), StatusCode::CREATED);
    let entry: Value = actix_test::read_body_json(enrolled).await;
    assert_eq!(entry["status"], "enrolled");
    let entry_id = entry["id"].as_str().expect("entry id").to_owned();

    let duplicate = actix_test::call_service(&app, enroll_request(ada.clone(), cs999.id)).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(duplicate).await;
    assert_eq!(body["details"]["reason"], "already_enrolled");

    let withdrawn = actix_test::call_service(&app, withdraw_request(ada.clone(), &entry_id)).await;
    assert_eq!(withdrawn.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(withdrawn).await;
    assert_eq!(body["status"], "withdrawn");

    let again = actix_test::call_service(&app, withdraw_request(ada.clone(), &entry_id)).await;
    assert_eq!(again.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(again).await;
    assert_eq!(body["details"]["reason"], "not_enrolled");

    let reenroll = actix_test::call_service(&app, enroll_request(ada, cs999.id)).await;
    assert_eq!(reenroll.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(reenroll).await;
    assert_eq!(body["details"]["existingStatus"], "withdrawn");

    assert!(store.audit().is_empty());
}

#[rstest]
#[actix_web::test]
async fn last_seat_goes_to_the_first_caller() {
    let (store, state) = in_memory_state();
    let cs999 = seed(&store, 1).await;
    let app = actix_test::init_service(api_test_app(state)).await;
    let ada = session_cookie(&app, "auth0|ada", &[Role::Student]).await;
    let grace = session_cookie(&app, "auth0|grace", &[Role::Student]).await;

    let first = actix_test::call_service(&app, enroll_request(ada, cs999.id)).await;
    let second = actix_test::call_service(&app, enroll_request(grace, cs999.id)).await;

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(second).await;
    assert_eq!(body["details"]["reason"], "course_full");
    assert_eq!(body["message"], "this course is full");
}

#[rstest]
#[actix_web::test]
async fn other_students_entries_are_not_found() {
    let (store, state) = in_memory_state();
    let cs999 = seed(&store, 5).await;
    let app = actix_test::init_service(api_test_app(state)).await;
    let ada = session_cookie(&app, "auth0|ada", &[Role::Student]).await;
    let grace = session_cookie(&app, "auth0|grace", &[Role::Student]).await;

    let enrolled = actix_test::call_service(&app, enroll_request(ada, cs999.id)).await;
    let entry: Value = actix_test::read_body_json(enrolled).await;
    let entry_id = entry["id"].as_str().expect("entry id");

    let res = actix_test::call_service(&app, withdraw_request(grace, entry_id)).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case(json!({}), "missing_field")]
#[case(json!({ "courseId": "CS999" }), "invalid_uuid")]
#[actix_web::test]
async fn malformed_course_ids_are_bad_requests(#[case] body: Value, #[case] code: &str) {
    let (store, state) = in_memory_state();
    seed(&store, 5).await;
    let app = actix_test::init_service(api_test_app(state)).await;
    let ada = session_cookie(&app, "auth0|ada", &[Role::Student]).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/enrollments")
            .cookie(ada)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn administrators_without_student_role_are_forbidden() {
    let (store, state) = in_memory_state();
    let cs999 = seed(&store, 5).await;
    let app = actix_test::init_service(api_test_app(state)).await;
    let admin = session_cookie(&app, "auth0|ada", &[Role::Admin]).await;

    let res = actix_test::call_service(&app, enroll_request(admin, cs999.id)).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn store_outage_is_service_unavailable() {
    let (store, mut state) = in_memory_state();
    let cs999 = seed(&store, 5).await;
    let mut command = MockEnrollmentCommand::new();
    command.expect_enroll().times(1).return_once(|_, _| {
        Err(EnrollmentFailure::StoreUnavailable {
            message: "pool timed out".to_owned(),
        })
    });
    state.enrollment = Arc::new(command);
    let app = actix_test::init_service(api_test_app(state)).await;
    let ada = session_cookie(&app, "auth0|ada", &[Role::Student]).await;

    let res = actix_test::call_service(&app, enroll_request(ada, cs999.id)).await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}
