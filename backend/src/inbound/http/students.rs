//! Student profile endpoints.
//!
//! ```text
//! POST /api/v1/students/me {"firstName":"Ada","lastName":"Byron",...}
//! GET /api/v1/students/me/enrollments
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::ports::{ProfileOutcome, StudentEnrollments};
use crate::domain::{Error, Role, Student, StudentFields};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// Create the caller's student profile.
///
/// Returns `201` and grants the Student role on first creation, or `200`
/// with the existing profile when one is already on record.
#[utoipa::path(
    post,
    path = "/api/v1/students/me",
    request_body = StudentFields,
    responses(
        (status = 201, description = "Profile created; Student role granted", body = Student),
        (status = 200, description = "Profile already existed", body = Student),
        (status = 400, description = "Invalid profile fields", body = Error),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 409, description = "Student number already in use", body = Error)
    ),
    tags = ["students"],
    operation_id = "createStudentProfile"
)]
#[post("/students/me")]
pub async fn create_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StudentFields>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_identity()?;
    let outcome = state
        .profiles
        .create_profile(identity, payload.into_inner())
        .await?;
    match outcome {
        ProfileOutcome::Created {
            student,
            role_grant,
        } => {
            session.grant_role(role_grant)?;
            Ok(HttpResponse::Created().json(student))
        }
        ProfileOutcome::Existing(student) => Ok(HttpResponse::Ok().json(student)),
    }
}

/// List the caller's ledger entries, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/students/me/enrollments",
    responses(
        (status = 200, description = "Profile with enrollments", body = StudentEnrollments),
        (status = 401, description = "Sign-in required", body = Error),
        (status = 403, description = "Student role required", body = Error),
        (status = 404, description = "No profile yet (reason: profile_required)", body = Error)
    ),
    tags = ["students"],
    operation_id = "myEnrollments"
)]
#[get("/students/me/enrollments")]
pub async fn my_enrollments(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<StudentEnrollments>> {
    let identity = session.require_role(Role::Student)?;
    let enrollments = state.profiles_query.my_enrollments(&identity).await?;
    Ok(web::Json(enrollments))
}
