//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`EnrollmentLedger`]) are implemented by the
//! outbound adapters. Driving ports (`*Command`, `*Query`) are implemented by
//! the domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_dashboard_query;
mod course_admin_command;
mod course_directory_query;
mod course_repository;
mod enrollment_command;
mod enrollment_ledger;
mod student_profile;
mod student_repository;

#[cfg(test)]
pub use admin_dashboard_query::MockAdminDashboardQuery;
pub use admin_dashboard_query::{
    AdminDashboardQuery, Dashboard, DashboardStats, RECENT_ENROLLMENTS_LIMIT,
};
#[cfg(test)]
pub use course_admin_command::MockCourseAdminCommand;
pub use course_admin_command::{CourseAdminCommand, CourseRemoval, CourseRemovalOutcome};
#[cfg(test)]
pub use course_directory_query::MockCourseDirectoryQuery;
pub use course_directory_query::CourseDirectoryQuery;
#[cfg(test)]
pub use course_repository::MockCourseRepository;
pub use course_repository::{CourseCounts, CourseRepository, CourseRepositoryError};
#[cfg(test)]
pub use enrollment_command::MockEnrollmentCommand;
pub use enrollment_command::EnrollmentCommand;
#[cfg(test)]
pub use enrollment_ledger::MockEnrollmentLedger;
pub use enrollment_ledger::{EnrollmentLedger, EnrollmentLedgerError};
#[cfg(test)]
pub use student_profile::{MockStudentProfileCommand, MockStudentProfileQuery};
pub use student_profile::{
    ProfileOutcome, StudentEnrollments, StudentProfileCommand, StudentProfileQuery,
};
#[cfg(test)]
pub use student_repository::MockStudentRepository;
pub use student_repository::{StudentRepository, StudentRepositoryError};
