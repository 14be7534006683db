use std::ops::Deref;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceRequest;
use actix_web::dev::ServiceResponse;
use actix_web::error::InternalError;
use actix_web::FromRequest;
use actix_web::HttpMessage;
use actix_web_lab::middleware::Next;
use uuid::Uuid;

use crate::session_state::TypedSession;
use crate::utils::error_500;
use crate::utils::redirect;

/// Id of the logged-in admin, inserted into request extensions by
/// `reject_anonymous_users`; extract with `web::ReqData<AdminId>`.
#[derive(Clone, Copy, Debug)]
pub struct AdminId(Uuid);

impl Deref for AdminId {
    type Target = Uuid;
    fn deref(&self) -> &Self::Target { &self.0 }
}

/// Middleware for the `/admin` scope: requests without a logged-in admin are
/// redirected to `/login`.
pub async fn reject_anonymous_users(
    mut req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let (raw_req, payload) = req.parts_mut();
    let session = TypedSession::from_request(raw_req, payload).await?;

    match session.get_admin_id().map_err(error_500)? {
        Some(admin_id) => {
            req.extensions_mut().insert(AdminId(admin_id));
            next.call(req).await
        }
        None => {
            let resp = redirect("/login");
            let err = anyhow::anyhow!("You must be logged in to access this resource.");
            Err(InternalError::from_response(err, resp).into())
        }
    }
}
