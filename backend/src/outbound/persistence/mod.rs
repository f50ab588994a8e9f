//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the course, student, and ledger ports backed
//! by PostgreSQL via `diesel-async` with `bb8` pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain records. Invariants that need atomicity (seat counting,
//!   capacity edits) are expressed as conditional updates or transactions.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Constraint-aware errors**: uniqueness and foreign key violations are
//!   recognised by constraint name and mapped to typed port errors.
//!
//! # Example
//!
//! ```ignore
//! use portal_backend::outbound::persistence::{DbPool, DieselCourseRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/portal")).await?;
//! let courses = DieselCourseRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_course_repository;
mod diesel_enrollment_ledger;
mod diesel_student_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_course_repository::DieselCourseRepository;
pub use diesel_enrollment_ledger::DieselEnrollmentLedger;
pub use diesel_student_repository::DieselStudentRepository;
pub use migrations::{MigrationError, apply_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
