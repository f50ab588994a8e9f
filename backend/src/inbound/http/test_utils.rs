//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test as actix_test, web};
use serde::{Deserialize, Serialize};

use super::session::SessionContext;
use super::state::HttpState;
use super::{ApiResult, api_services};
use crate::domain::test_fixtures::fixture_clock;
use crate::domain::{Error, IdentityRef, Role};
use crate::outbound::memory::InMemoryPortalStore;

const SIGN_IN_PATH: &str = "/test/sign-in";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// An app with only the test session middleware installed.
pub fn session_test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().wrap(test_session_middleware())
}

/// The full `/api/v1` surface over `state`, plus the test sign-in route.
pub fn api_test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    session_test_app()
        .app_data(web::Data::new(state))
        .configure(sign_in_route)
        .service(web::scope("/api/v1").configure(api_services))
}

/// Handler state over a fresh in-memory store and the fixture clock.
pub fn in_memory_state() -> (Arc<InMemoryPortalStore>, HttpState) {
    let store = Arc::new(InMemoryPortalStore::new());
    let state = HttpState::from_adapters(
        store.clone(),
        store.clone(),
        store.clone(),
        fixture_clock(),
    );
    (store, state)
}

#[derive(Serialize, Deserialize)]
struct SignIn {
    identity: String,
    roles: Vec<Role>,
}

async fn sign_in(session: SessionContext, body: web::Json<SignIn>) -> ApiResult<HttpResponse> {
    let SignIn { identity, roles } = body.into_inner();
    let identity = IdentityRef::new(identity).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.sign_in(&identity, &roles)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register a route standing in for the identity layer's sign-in.
pub fn sign_in_route(cfg: &mut web::ServiceConfig) {
    cfg.route(SIGN_IN_PATH, web::post().to(sign_in));
}

/// Sign in through [`sign_in_route`] and return the session cookie.
pub async fn session_cookie<S, B>(app: &S, identity: &str, roles: &[Role]) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri(SIGN_IN_PATH)
        .set_json(SignIn {
            identity: identity.to_owned(),
            roles: roles.to_vec(),
        })
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "test sign-in failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}
