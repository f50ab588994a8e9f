//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod admin;
mod auth;
pub mod courses;
pub mod enrollments;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
pub mod students;
#[cfg(test)]
pub mod test_utils;
mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`, with JSON body errors
/// reported as `invalid_request`.
///
/// Callers mount this inside the versioned scope:
///
/// ```
/// use actix_web::{App, web};
/// use portal_backend::inbound::http::api_services;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(api_services));
/// ```
pub fn api_services(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(validation::json_body_error))
        .service(courses::search_courses)
        .service(courses::course_details)
        .service(students::create_profile)
        .service(students::my_enrollments)
        .service(enrollments::check_eligibility)
        .service(enrollments::enroll)
        .service(enrollments::withdraw)
        .service(admin::dashboard)
        .service(admin::create_course)
        .service(admin::update_course)
        .service(admin::remove_course);
}
