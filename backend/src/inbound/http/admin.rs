//! Administrator endpoints: dashboard and catalogue management.
//!
//! ```text
//! GET /api/v1/admin/dashboard
//! POST /api/v1/admin/courses {"code":"CS999","name":"Capstone",...}
//! PUT /api/v1/admin/courses/{course_id}
//! DELETE /api/v1/admin/courses/{course_id}?mode=deactivate
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::ports::{CourseRemoval, CourseRemovalOutcome, Dashboard};
use crate::domain::{Course, CourseDraft, CourseFields, CourseId, Error};

use super::ApiResult;
use super::auth::require_admin;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, invalid_choice_error, missing_field_error, parse_id};

const COURSE_ID: FieldName = FieldName::new("courseId");
const MODE: FieldName = FieldName::new("mode");

/// Query string for course removal.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RemovalQuery {
    /// `deactivate` keeps ledger history; `purge` deletes it.
    pub mode: Option<String>,
}

fn parse_removal(mode: Option<&str>) -> ApiResult<CourseRemoval> {
    let raw = mode
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| missing_field_error(MODE))?;
    match raw {
        "deactivate" => Ok(CourseRemoval::Deactivate),
        "purge" => Ok(CourseRemoval::Purge),
        other => Err(invalid_choice_error(MODE, other, "deactivate, purge")),
    }
}

/// Catalogue and ledger statistics with recent activity.
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 403, description = "Admin role required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDashboard"
)]
#[get("/admin/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Dashboard>> {
    require_admin(&session)?;
    let dashboard = state.dashboard.dashboard().await?;
    Ok(web::Json(dashboard))
}

/// Create a course.
#[utoipa::path(
    post,
    path = "/api/v1/admin/courses",
    request_body = CourseFields,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Invalid course fields", body = Error),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 409, description = "Course code already in use", body = Error)
    ),
    tags = ["admin"],
    operation_id = "createCourse"
)]
#[post("/admin/courses")]
pub async fn create_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CourseFields>,
) -> ApiResult<HttpResponse> {
    require_admin(&session)?;
    let draft = CourseDraft::try_new(payload.into_inner())?;
    let course = state.course_admin.create(draft).await?;
    Ok(HttpResponse::Created().json(course))
}

/// Edit a course's fields, including whether it is open for enrollment.
#[utoipa::path(
    put,
    path = "/api/v1/admin/courses/{course_id}",
    params(("course_id" = String, Path, description = "Course identifier")),
    request_body = CourseFields,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Invalid fields or identifier", body = Error),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Course not found", body = Error),
        (status = 409, description = "Code in use or capacity below live count", body = Error)
    ),
    tags = ["admin"],
    operation_id = "updateCourse"
)]
#[put("/admin/courses/{course_id}")]
pub async fn update_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CourseFields>,
) -> ApiResult<web::Json<Course>> {
    require_admin(&session)?;
    let course_id: CourseId = parse_id(&path.into_inner(), COURSE_ID)?;
    let draft = CourseDraft::try_new(payload.into_inner())?;
    let course = state.course_admin.update(course_id, draft).await?;
    Ok(web::Json(course))
}

/// Deactivate or purge a course.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/courses/{course_id}",
    params(
        ("course_id" = String, Path, description = "Course identifier"),
        RemovalQuery
    ),
    responses(
        (status = 200, description = "Course removed", body = CourseRemovalOutcome),
        (status = 400, description = "Missing or unknown mode", body = Error),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 403, description = "Admin role required", body = Error),
        (status = 404, description = "Course not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "removeCourse"
)]
#[delete("/admin/courses/{course_id}")]
pub async fn remove_course(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    query: web::Query<RemovalQuery>,
) -> ApiResult<web::Json<CourseRemovalOutcome>> {
    require_admin(&session)?;
    let course_id: CourseId = parse_id(&path.into_inner(), COURSE_ID)?;
    let removal = parse_removal(query.mode.as_deref())?;
    let outcome = state.course_admin.remove(course_id, removal).await?;
    Ok(web::Json(outcome))
}
