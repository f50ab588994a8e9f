//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler, the health probes, and the
//! session cookie security scheme. Schemas are collected from the handler
//! annotations; domain types derive `ToSchema` directly.
//!
//! The document backs Swagger UI in debug builds and is printed by the
//! `openapi-dump` binary for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie written by the identity layer.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Enrollment portal API",
        description = "Course directory, student profiles, enrollments, and catalogue administration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::courses::search_courses,
        crate::inbound::http::courses::course_details,
        crate::inbound::http::students::create_profile,
        crate::inbound::http::students::my_enrollments,
        crate::inbound::http::enrollments::check_eligibility,
        crate::inbound::http::enrollments::enroll,
        crate::inbound::http::enrollments::withdraw,
        crate::inbound::http::admin::dashboard,
        crate::inbound::http::admin::create_course,
        crate::inbound::http::admin::update_course,
        crate::inbound::http::admin::remove_course,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    tags(
        (name = "courses", description = "Public course directory"),
        (name = "students", description = "Student profiles"),
        (name = "enrollments", description = "Enroll and withdraw"),
        (name = "admin", description = "Catalogue administration and statistics"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
