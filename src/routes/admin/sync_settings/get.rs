use actix_web::web;
use actix_web::HttpResponse;

use super::settings_page;
use super::SAVE_NONCE_ACTION;
use crate::authentication::AdminId;
use crate::nonce::create_nonce;
use crate::option_store::get_sync_settings;
use crate::option_store::OptionStore;
use crate::startup::HmacSecret;
use crate::utils::error_500;

/// `GET /admin/mailchimp-user-sync`
pub async fn sync_settings_form(
    options: web::Data<dyn OptionStore>,
    admin_id: web::ReqData<AdminId>,
    secret: web::Data<HmacSecret>,
) -> Result<HttpResponse, actix_web::Error> {
    let settings = get_sync_settings(options.get_ref())
        .await
        .map_err(error_500)?;
    let nonce = create_nonce(&secret, SAVE_NONCE_ACTION, **admin_id).map_err(error_500)?;
    Ok(settings_page(&settings, &nonce, None))
}
