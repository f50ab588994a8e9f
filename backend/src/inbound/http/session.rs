//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The external identity layer signs callers in by writing an opaque
//! identity reference and a list of role names into the cookie session.
//! Handlers only ask this wrapper who is calling and whether they hold a
//! role; they never inspect the cookie themselves.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, IdentityRef, Role, RoleGrant};

pub(crate) const IDENTITY_KEY: &str = "identity";
pub(crate) const ROLES_KEY: &str = "roles";

/// Newtype wrapper that exposes identity and role operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record a signed-in identity and its roles.
    ///
    /// This is the hook the identity layer uses after authenticating a
    /// caller; the session id is renewed to avoid fixation.
    pub fn sign_in(&self, identity: &IdentityRef, roles: &[Role]) -> Result<(), Error> {
        self.0.renew();
        self.insert(IDENTITY_KEY, identity.as_str())?;
        self.write_roles(roles)
    }

    /// The signed-in identity, if any.
    pub fn identity(&self) -> Result<Option<IdentityRef>, Error> {
        let Some(raw) = self.get::<String>(IDENTITY_KEY)? else {
            return Ok(None);
        };
        match IdentityRef::new(raw) {
            Ok(identity) => Ok(Some(identity)),
            Err(error) => {
                warn!(%error, "invalid identity reference in session cookie");
                Ok(None)
            }
        }
    }

    /// Require a signed-in identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<IdentityRef, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("sign-in required"))
    }

    /// Roles held by the caller. Unknown role names are ignored.
    pub fn roles(&self) -> Result<Vec<Role>, Error> {
        let names = self.get::<Vec<String>>(ROLES_KEY)?.unwrap_or_default();
        Ok(names
            .iter()
            .filter_map(|name| match name.parse::<Role>() {
                Ok(role) => Some(role),
                Err(error) => {
                    warn!(%error, "ignoring unrecognised role in session cookie");
                    None
                }
            })
            .collect())
    }

    /// Require a signed-in identity holding `role`.
    ///
    /// Returns `401` without an identity and `403` without the role.
    pub fn require_role(&self, role: Role) -> Result<IdentityRef, Error> {
        let identity = self.require_identity()?;
        if self.roles()?.contains(&role) {
            Ok(identity)
        } else {
            Err(Error::forbidden(format!("{role} role required")))
        }
    }

    /// Apply a role grant issued by a domain operation.
    ///
    /// Adds the role if missing and renews the session so the caller's next
    /// request sees the refreshed roles.
    pub fn grant_role(&self, grant: RoleGrant) -> Result<(), Error> {
        let mut roles = self.roles()?;
        let role = grant.role();
        if !roles.contains(&role) {
            roles.push(role);
        }
        self.write_roles(&roles)?;
        self.0.renew();
        Ok(())
    }

    fn write_roles(&self, roles: &[Role]) -> Result<(), Error> {
        let names: Vec<&str> = roles.iter().map(|role| role.as_str()).collect();
        self.insert(ROLES_KEY, names)
    }

    fn insert(&self, key: &str, value: impl serde::Serialize) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>, Error> {
        self.0
            .get::<T>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
