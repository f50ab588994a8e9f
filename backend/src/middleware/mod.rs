//! Request middleware for lifecycle concerns such as request tracing.

pub mod trace;

pub use trace::Trace;
