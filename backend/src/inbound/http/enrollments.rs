//! Enrollment endpoints for Student-role callers.
//!
//! ```text
//! GET /api/v1/enrollments/eligibility?courseId=3fa85f64-...
//! POST /api/v1/enrollments {"courseId":"3fa85f64-..."}
//! POST /api/v1/enrollments/{enrollment_id}/withdraw
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Course, CourseId, Enrollment, EnrollmentId, Error};

use super::ApiResult;
use super::auth::acting_student;
use super::session::SessionContext;
use super::state::HttpState;
use super::validation::{FieldName, missing_field_error, parse_id};

const COURSE_ID: FieldName = FieldName::new("courseId");

/// Query string for the eligibility preview.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EligibilityQuery {
    /// Course the caller is considering.
    pub course_id: Option<String>,
}

/// Body of `POST /api/v1/enrollments`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    /// Course to enroll in.
    pub course_id: Option<String>,
}

/// Confirmation view data for an enrollment that would succeed.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResponse {
    /// The course on offer.
    pub course: Course,
    /// Seats left at the time of the check.
    pub seats_remaining: u32,
}

fn required_course_id(raw: Option<String>) -> ApiResult<CourseId> {
    let raw = raw.ok_or_else(|| missing_field_error(COURSE_ID))?;
    parse_id(&raw, COURSE_ID)
}

/// Preview whether the caller could enroll in a course right now.
#[utoipa::path(
    get,
    path = "/api/v1/enrollments/eligibility",
    params(EligibilityQuery),
    responses(
        (status = 200, description = "Enrollment would succeed", body = EligibilityResponse),
        (status = 400, description = "Missing or malformed courseId", body = Error),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 403, description = "Student role required", body = Error),
        (status = 404, description = "Course or profile not found", body = Error),
        (status = 409, description = "Already enrolled or course full", body = Error)
    ),
    tags = ["enrollments"],
    operation_id = "checkEligibility"
)]
#[get("/enrollments/eligibility")]
pub async fn check_eligibility(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<EligibilityQuery>,
) -> ApiResult<web::Json<EligibilityResponse>> {
    let student = acting_student(&session, &state).await?;
    let course_id = required_course_id(query.into_inner().course_id)?;
    let course = state
        .enrollment
        .check_eligibility(student.id, course_id)
        .await?;
    Ok(web::Json(EligibilityResponse {
        seats_remaining: course.seats_remaining(),
        course,
    }))
}

/// Enroll the caller in a course.
#[utoipa::path(
    post,
    path = "/api/v1/enrollments",
    request_body = EnrollRequest,
    responses(
        (status = 201, description = "Enrolled", body = Enrollment),
        (status = 400, description = "Missing or malformed courseId", body = Error),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 403, description = "Student role required", body = Error),
        (status = 404, description = "Course or profile not found", body = Error),
        (status = 409, description = "Already enrolled or course full", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["enrollments"],
    operation_id = "enroll"
)]
#[post("/enrollments")]
pub async fn enroll(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<EnrollRequest>,
) -> ApiResult<HttpResponse> {
    let student = acting_student(&session, &state).await?;
    let course_id = required_course_id(payload.into_inner().course_id)?;
    let enrollment = state.enrollment.enroll(student.id, course_id).await?;
    Ok(HttpResponse::Created().json(enrollment))
}

/// Withdraw one of the caller's active enrollments.
#[utoipa::path(
    post,
    path = "/api/v1/enrollments/{enrollment_id}/withdraw",
    params(("enrollment_id" = String, Path, description = "Enrollment identifier")),
    responses(
        (status = 200, description = "Withdrawn", body = Enrollment),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 403, description = "Student role required", body = Error),
        (status = 404, description = "Enrollment not found or not owned", body = Error),
        (status = 409, description = "Enrollment is not active", body = Error)
    ),
    tags = ["enrollments"],
    operation_id = "withdraw"
)]
#[post("/enrollments/{enrollment_id}/withdraw")]
pub async fn withdraw(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Enrollment>> {
    let student = acting_student(&session, &state).await?;
    let enrollment_id: EnrollmentId =
        parse_id(&path.into_inner(), FieldName::new("enrollmentId"))?;
    let enrollment = state.enrollment.withdraw(enrollment_id, student.id).await?;
    Ok(web::Json(enrollment))
}

#[cfg(test)]
#[path = "enrollments_tests.rs"]
mod tests;
