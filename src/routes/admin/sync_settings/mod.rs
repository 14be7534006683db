mod get;
mod post;

use actix_web::http::header::ContentType;
use actix_web::HttpResponse;
pub use get::*;
pub use post::*;
use secrecy::ExposeSecret;

use crate::domain::SyncSettings;

pub const SETTINGS_PATH: &str = "/admin/mailchimp-user-sync";

/// Nonce action for the settings form; a nonce minted for any other form is
/// rejected here.
pub const SAVE_NONCE_ACTION: &str = "mailchimp_user_sync_save_nonce";

/// The settings page, with every stored value attribute-escaped into its
/// input. `notice` is shown above the form when present.
fn settings_page(
    settings: &SyncSettings,
    nonce: &str,
    notice: Option<&str>,
) -> HttpResponse {
    let notice_html = notice
        .map(|n| format!(r#"<div class="updated"><p>{}</p></div>"#, htmlescape::encode_minimal(n)))
        .unwrap_or_default();
    let api_key = htmlescape::encode_attribute(settings.api_key.expose_secret());
    let list_id = htmlescape::encode_attribute(&settings.list_id);
    let server_prefix = htmlescape::encode_attribute(&settings.server_prefix);
    let nonce = htmlescape::encode_attribute(nonce);

    let body = format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8" />
    <title>Mailchimp User Sync</title>
  </head>
  <body>
    <h1>Mailchimp User Sync Settings</h1>
    {notice_html}
    <form action="{SETTINGS_PATH}" method="post">
      <input type="hidden" name="_nonce" value="{nonce}" />
      <label>
        Mailchimp API Key
        <input type="text" name="mailchimp_api_key" value="{api_key}" />
      </label>
      <label>
        Mailchimp List ID
        <input type="text" name="mailchimp_list_id" value="{list_id}" />
      </label>
      <label>
        Mailchimp Server Prefix
        <input type="text" name="mailchimp_server_prefix" value="{server_prefix}" />
      </label>
      <button type="submit" name="mailchimp_user_sync_save" value="1">Save Settings</button>
    </form>
    <form action="/admin/logout" method="post">
      <button type="submit">Logout</button>
    </form>
  </body>
</html>"#,
    );

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body)
}
