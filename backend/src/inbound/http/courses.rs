//! Course directory endpoints.
//!
//! ```text
//! GET /api/v1/courses?search=calc&sort=credits_desc
//! GET /api/v1/courses/{course_id}
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Course, CourseDetails, CourseId, CourseSearch, DetailsScope, Error};

use super::ApiResult;
use super::auth::is_admin;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, parse_id, parse_sort};

/// Query string for `GET /api/v1/courses`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseListQuery {
    /// Case-insensitive match on code, name, or instructor.
    pub search: Option<String>,
    /// One of `code`, `code_desc`, `name`, `name_desc`, `credits`,
    /// `credits_desc`.
    pub sort: Option<String>,
}

/// Search the active course directory.
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(CourseListQuery),
    responses(
        (status = 200, description = "Matching active courses", body = [Course]),
        (status = 400, description = "Unknown sort order", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["courses"],
    operation_id = "searchCourses",
    security([])
)]
#[get("/courses")]
pub async fn search_courses(
    state: web::Data<HttpState>,
    query: web::Query<CourseListQuery>,
) -> ApiResult<web::Json<Vec<Course>>> {
    let CourseListQuery { search, sort } = query.into_inner();
    let sort = parse_sort(sort.as_deref())?;
    let courses = state
        .directory
        .search(CourseSearch::new(search.as_deref(), sort))
        .await?;
    Ok(web::Json(courses))
}

/// Fetch one course; administrators also receive the roster.
#[utoipa::path(
    get,
    path = "/api/v1/courses/{course_id}",
    params(("course_id" = String, Path, description = "Course identifier")),
    responses(
        (status = 200, description = "Course details", body = CourseDetails),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Course not found or inactive", body = Error)
    ),
    tags = ["courses"],
    operation_id = "getCourse",
    security([])
)]
#[get("/courses/{course_id}")]
pub async fn course_details(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CourseDetails>> {
    let course_id: CourseId = parse_id(&path.into_inner(), FieldName::new("courseId"))?;
    let scope = if is_admin(&session)? {
        DetailsScope::Administrative
    } else {
        DetailsScope::Public
    };
    let details = state.directory.details(course_id, scope).await?;
    Ok(web::Json(details))
}

#[cfg(test)]
mod tests {
    use crate::domain::ports::{CourseRepository, EnrollmentLedger, StudentRepository};
    use crate::domain::test_fixtures::{course, fixture_timestamp, student};
    use crate::domain::{Enrollment, Role};
    use crate::inbound::http::test_utils::{api_test_app, in_memory_state, session_cookie};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[actix_web::test]
    async fn search_filters_and_orders_active_courses() {
        let (store, state) = in_memory_state();
        for code in ["MATH101", "CS201", "CS101"] {
            CourseRepository::insert(store.as_ref(), &course(code, 10, 0))
                .await
                .expect("seed course");
        }
        let mut hidden = course("CS900", 10, 0);
        hidden.active = false;
        CourseRepository::insert(store.as_ref(), &hidden)
            .await
            .expect("seed course");
        let app = actix_test::init_service(api_test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/courses?search=cs&sort=code_desc")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Vec<Value> = actix_test::read_body_json(res).await;
        let codes: Vec<&str> = body.iter().filter_map(|c| c["code"].as_str()).collect();
        assert_eq!(codes, vec!["CS201", "CS101"]);
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_sort_is_a_bad_request() {
        let (_store, state) = in_memory_state();
        let app = actix_test::init_service(api_test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/courses?sort=popularity")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "sort");
    }

    #[rstest]
    #[actix_web::test]
    async fn roster_is_only_shown_to_administrators() {
        let (store, state) = in_memory_state();
        let cs101 = course("CS101", 10, 0);
        let ada = student("auth0|ada", "S100");
        CourseRepository::insert(store.as_ref(), &cs101).await.expect("course");
        StudentRepository::insert(store.as_ref(), &ada).await.expect("student");
        store
            .enroll(&Enrollment::enrolled(ada.id, cs101.id, fixture_timestamp()))
            .await
            .expect("enroll");
        let app = actix_test::init_service(api_test_app(state)).await;
        let uri = format!("/api/v1/courses/{}", cs101.id);

        let public =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(&uri).to_request())
                .await;
        assert_eq!(public.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(public).await;
        assert!(body.get("roster").is_none());
        assert_eq!(body["seatsRemaining"], 9);

        let cookie = session_cookie(&app, "auth0|registrar", &[Role::Admin]).await;
        let admin = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri(&uri).cookie(cookie).to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(admin).await;
        assert_eq!(body["roster"][0]["student"]["studentNumber"], "S100");
    }

    #[rstest]
    #[case("not-a-uuid", StatusCode::BAD_REQUEST)]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::NOT_FOUND)]
    #[actix_web::test]
    async fn bad_or_unknown_ids_are_rejected(#[case] id: &str, #[case] status: StatusCode) {
        let (_store, state) = in_memory_state();
        let app = actix_test::init_service(api_test_app(state)).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/courses/{id}"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), status);
    }
}
