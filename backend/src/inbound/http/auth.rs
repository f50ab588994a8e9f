//! Caller resolution used by HTTP handlers.
//!
//! Concentrates the role checks and the identity-to-student lookup so the
//! endpoint modules stay focused on request and response mapping.

use crate::domain::{IdentityRef, Role, Student, profile_required};

use super::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;

/// Require the administrator role.
pub(crate) fn require_admin(session: &SessionContext) -> ApiResult<IdentityRef> {
    session.require_role(Role::Admin)
}

/// Whether the caller is a signed-in administrator. Anonymous callers are
/// simply not administrators.
pub(crate) fn is_admin(session: &SessionContext) -> ApiResult<bool> {
    if session.identity()?.is_none() {
        return Ok(false);
    }
    Ok(session.roles()?.contains(&Role::Admin))
}

/// Resolve a Student-role caller to their profile.
///
/// Fails with `401`/`403` per [`SessionContext::require_role`], and with a
/// `404` carrying `reason: profile_required` when no profile exists yet.
pub(crate) async fn acting_student(
    session: &SessionContext,
    state: &HttpState,
) -> ApiResult<Student> {
    let identity = session.require_role(Role::Student)?;
    state
        .profiles_query
        .find_by_identity(&identity)
        .await?
        .ok_or_else(profile_required)
}
