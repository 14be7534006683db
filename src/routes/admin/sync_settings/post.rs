use actix_web::web;
use actix_web::HttpResponse;
use serde::Deserialize;

use super::settings_page;
use super::SAVE_NONCE_ACTION;
use crate::authentication::AdminId;
use crate::nonce::create_nonce;
use crate::nonce::verify_nonce;
use crate::option_store::get_sync_settings;
use crate::option_store::update_sync_settings;
use crate::option_store::OptionStore;
use crate::startup::HmacSecret;
use crate::utils::error_500;

#[derive(Deserialize)]
pub struct SyncSettingsFormData {
    #[serde(default)]
    mailchimp_api_key: String,
    #[serde(default)]
    mailchimp_list_id: String,
    #[serde(default)]
    mailchimp_server_prefix: String,
    /// Present only when the save button was used
    mailchimp_user_sync_save: Option<String>,
    #[serde(rename = "_nonce")]
    nonce: Option<String>,
}

/// `POST /admin/mailchimp-user-sync`
///
/// Without the save marker nothing is written and the page is just rendered
/// again. With it, the nonce must be valid (403 otherwise); the three values
/// are then sanitized and stored.
#[tracing::instrument(
    name = "Saving Mailchimp settings",
    skip_all,
    fields(admin_id = tracing::field::Empty)
)]
pub async fn save_sync_settings(
    form: web::Form<SyncSettingsFormData>,
    options: web::Data<dyn OptionStore>,
    admin_id: web::ReqData<AdminId>,
    secret: web::Data<HmacSecret>,
) -> Result<HttpResponse, actix_web::Error> {
    let admin_id = **admin_id;
    tracing::Span::current().record("admin_id", tracing::field::display(admin_id));
    let form = form.into_inner();
    let mut notice = None;

    if form.mailchimp_user_sync_save.is_some() {
        let nonce = form.nonce.as_deref().unwrap_or_default();
        if let Err(e) = verify_nonce(&secret, SAVE_NONCE_ACTION, admin_id, nonce) {
            tracing::warn!("Rejected settings form: {e}");
            return Ok(HttpResponse::Forbidden().body("The link you followed has expired."));
        }
        update_sync_settings(
            options.get_ref(),
            &form.mailchimp_api_key,
            &form.mailchimp_list_id,
            &form.mailchimp_server_prefix,
        )
        .await
        .map_err(error_500)?;
        tracing::info!("Mailchimp settings updated");
        notice = Some("Settings saved successfully.");
    }

    let settings = get_sync_settings(options.get_ref())
        .await
        .map_err(error_500)?;
    let nonce = create_nonce(&secret, SAVE_NONCE_ACTION, admin_id).map_err(error_500)?;
    Ok(settings_page(&settings, &nonce, notice))
}
