//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: a single-process store used when no database is configured
//!   and by tests
//!
//! Adapters are thin translators between domain records and storage
//! representations. They contain no business rules beyond the atomic
//! invariants the ports require of them.

pub mod memory;
pub mod persistence;
