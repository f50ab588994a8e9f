//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed records of the enrollment portal
//! (courses, students, ledger entries) and the services that enforce their
//! invariants. Adapters reach the domain only through [`ports`].
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - EnrollmentFailure: typed outcome of enroll and withdraw.
//! - Course, Student, Enrollment: stored records and their drafts.
//! - The `*Service` types implementing the driving ports.

pub mod error;
pub mod ports;

mod admin_dashboard_service;
mod course;
mod course_admin_service;
mod course_directory;
mod course_directory_service;
mod enrollment;
mod enrollment_failure;
mod enrollment_service;
mod fields;
mod identity;
mod ids;
mod sample_courses;
mod store_error_mapping;
mod student;
mod student_profile_service;
mod trace_id;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::admin_dashboard_service::AdminDashboardService;
pub use self::course::{
    CAPACITY_MAX, COURSE_CODE_MAX, COURSE_NAME_MAX, CREDITS_RANGE, Course, CourseCode,
    CourseDraft, CourseFields, DESCRIPTION_MAX, INSTRUCTOR_MAX,
};
pub use self::course_admin_service::CourseAdminService;
pub use self::course_directory::{
    CourseDetails, CourseSearch, CourseSort, DetailsScope, SortDirection, SortKey, UnknownSort,
};
pub use self::course_directory_service::CourseDirectoryService;
pub use self::enrollment::{
    CourseSummary, Enrollment, EnrollmentDetails, EnrollmentStatus, Grade, StudentSummary,
    UnknownStatus,
};
pub use self::enrollment_failure::EnrollmentFailure;
pub use self::enrollment_service::EnrollmentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::fields::FieldError;
pub use self::identity::{IDENTITY_REF_MAX, IdentityRef, IdentityRefError, Role, RoleGrant, UnknownRole};
pub use self::ids::{CourseId, EnrollmentId, StudentId};
pub use self::sample_courses::SampleCourseSeeder;
pub use self::student::{
    MAJOR_MAX, NAME_MAX, STUDENT_NUMBER_MAX, Student, StudentDraft, StudentFields,
};
pub use self::student_profile_service::StudentProfileService;
pub(crate) use self::student_profile_service::profile_required;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use portal_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
