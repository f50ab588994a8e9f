//! Driving port for the administration dashboard.
use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EnrollmentDetails, Error};

/// Number of recent ledger entries shown on the dashboard.
pub const RECENT_ENROLLMENTS_LIMIT: usize = 10;

/// Catalogue and ledger statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// All course records.
    pub total_courses: u64,
    /// Courses open in the directory.
    pub active_courses: u64,
    /// Student profiles.
    pub total_students: u64,
    /// Ledger entries currently `Enrolled`.
    pub total_enrollments: u64,
}

/// Dashboard payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Headline counters.
    pub stats: DashboardStats,
    /// Most recent ledger entries, newest first.
    pub recent_enrollments: Vec<EnrollmentDetails>,
}

/// Administrative statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminDashboardQuery: Send + Sync {
    /// Gather counters and recent activity.
    async fn dashboard(&self) -> Result<Dashboard, Error>;
}
