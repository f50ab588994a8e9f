//! Builders selecting storage adapters for the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use portal_backend::domain::SampleCourseSeeder;
use portal_backend::domain::ports::{CourseRepository, EnrollmentLedger, StudentRepository};
use portal_backend::inbound::http::state::HttpState;
use portal_backend::outbound::memory::InMemoryPortalStore;
use portal_backend::outbound::persistence::{
    DbPool, DieselCourseRepository, DieselEnrollmentLedger, DieselStudentRepository,
};

use super::ServerConfig;

/// Wire the services over one set of adapters, seeding the catalogue first
/// when asked to.
async fn state_over<C, S, L>(
    courses: Arc<C>,
    students: Arc<S>,
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
    seed_sample_courses: bool,
) -> std::io::Result<HttpState>
where
    C: CourseRepository + 'static,
    S: StudentRepository + 'static,
    L: EnrollmentLedger + 'static,
{
    if seed_sample_courses {
        SampleCourseSeeder::new(courses.clone(), clock.clone())
            .seed_if_empty()
            .await
            .map_err(|err| std::io::Error::other(format!("seed sample courses: {err}")))?;
    }
    Ok(HttpState::from_adapters(courses, students, ledger, clock))
}

async fn diesel_state(
    pool: &DbPool,
    clock: Arc<dyn Clock>,
    seed_sample_courses: bool,
) -> std::io::Result<HttpState> {
    info!("using PostgreSQL storage");
    state_over(
        Arc::new(DieselCourseRepository::new(pool.clone())),
        Arc::new(DieselStudentRepository::new(pool.clone())),
        Arc::new(DieselEnrollmentLedger::new(pool.clone())),
        clock,
        seed_sample_courses,
    )
    .await
}

async fn in_memory_state(
    clock: Arc<dyn Clock>,
    seed_sample_courses: bool,
) -> std::io::Result<HttpState> {
    warn!("no database configured; enrollments are kept in memory and lost on restart");
    let store = Arc::new(InMemoryPortalStore::new());
    state_over(store.clone(), store.clone(), store, clock, seed_sample_courses).await
}

/// Build the shared HTTP state, using Diesel adapters when a pool is
/// configured and the in-memory store otherwise.
pub(super) async fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let state = match &config.db_pool {
        Some(pool) => diesel_state(pool, clock, config.seed_sample_courses).await?,
        None => in_memory_state(clock, config.seed_sample_courses).await?,
    };
    Ok(web::Data::new(state))
}
