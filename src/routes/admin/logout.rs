use actix_web::web;
use actix_web::HttpResponse;
use actix_web_flash_messages::FlashMessage;

use crate::authentication::AdminId;
use crate::session_state::TypedSession;
use crate::utils::redirect;

/// `POST /admin/logout`
///
/// Only reachable with a session (see `reject_anonymous_users`), so there is
/// always something to purge.
#[tracing::instrument(name = "Logging out", skip_all, fields(admin_id = %**admin_id))]
pub async fn logout(
    session: TypedSession,
    admin_id: web::ReqData<AdminId>,
) -> HttpResponse {
    session.logout();
    FlashMessage::info("You have successfully logged out.").send();
    redirect("/login")
}
