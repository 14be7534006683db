use std::future::ready;
use std::future::Ready;

use actix_session::Session;
use actix_session::SessionExt;
use actix_session::SessionGetError;
use actix_session::SessionInsertError;
use actix_web::FromRequest;
use uuid::Uuid;

/// Wrapper around `actix_session::Session` with typed accessors, so session
/// keys are not scattered around as strings
pub struct TypedSession(Session);

impl TypedSession {
    const ADMIN_ID_KEY: &'static str = "admin_id";

    /// New session id; call on login, against session fixation
    pub fn renew(&self) { self.0.renew(); }

    pub fn insert_admin_id(
        &self,
        admin_id: Uuid,
    ) -> Result<(), SessionInsertError> {
        self.0.insert(Self::ADMIN_ID_KEY, admin_id)
    }

    pub fn get_admin_id(&self) -> Result<Option<Uuid>, SessionGetError> {
        self.0.get(Self::ADMIN_ID_KEY)
    }

    pub fn logout(self) { self.0.purge() }
}

impl FromRequest for TypedSession {
    // same error as `Session`'s own `FromRequest` impl
    type Error = <Session as FromRequest>::Error;

    // session access needs no I/O, so the future is immediately ready
    type Future = Ready<Result<TypedSession, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        ready(Ok(TypedSession(req.get_session())))
    }
}
