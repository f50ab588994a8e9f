//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AdminDashboardQuery, CourseAdminCommand, CourseDirectoryQuery, CourseRepository,
    EnrollmentCommand, EnrollmentLedger, StudentProfileCommand, StudentProfileQuery,
    StudentRepository,
};
use crate::domain::{
    AdminDashboardService, CourseAdminService, CourseDirectoryService, EnrollmentService,
    StudentProfileService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub enrollment: Arc<dyn EnrollmentCommand>,
    pub directory: Arc<dyn CourseDirectoryQuery>,
    pub course_admin: Arc<dyn CourseAdminCommand>,
    pub profiles: Arc<dyn StudentProfileCommand>,
    pub profiles_query: Arc<dyn StudentProfileQuery>,
    pub dashboard: Arc<dyn AdminDashboardQuery>,
}

impl HttpState {
    /// Wire every domain service over one set of driven adapters.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use portal_backend::inbound::http::state::HttpState;
    /// use portal_backend::outbound::memory::InMemoryPortalStore;
    ///
    /// let store = Arc::new(InMemoryPortalStore::new());
    /// let state = HttpState::from_adapters(
    ///     store.clone(),
    ///     store.clone(),
    ///     store,
    ///     Arc::new(DefaultClock),
    /// );
    /// let _directory = state.directory.clone();
    /// ```
    pub fn from_adapters<C, S, L>(
        courses: Arc<C>,
        students: Arc<S>,
        ledger: Arc<L>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        C: CourseRepository + 'static,
        S: StudentRepository + 'static,
        L: EnrollmentLedger + 'static,
    {
        let profiles = Arc::new(StudentProfileService::new(
            students.clone(),
            ledger.clone(),
            clock.clone(),
        ));
        Self {
            enrollment: Arc::new(EnrollmentService::new(
                students.clone(),
                courses.clone(),
                ledger.clone(),
                clock.clone(),
            )),
            directory: Arc::new(CourseDirectoryService::new(courses.clone(), ledger.clone())),
            course_admin: Arc::new(CourseAdminService::new(courses.clone(), clock)),
            profiles: profiles.clone(),
            profiles_query: profiles,
            dashboard: Arc::new(AdminDashboardService::new(courses, students, ledger)),
        }
    }
}
