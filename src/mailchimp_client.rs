use std::time::Duration;

use base64::engine::general_purpose;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use secrecy::Secret;

use crate::domain::MemberPayload;
use crate::domain::SyncSettings;

/// Thin client for the Mailchimp marketing API (v3.0). Only the list-members
/// endpoint is used.
//
// establishing a HTTP connection is expensive, so `Client` is built once and
// shared (it is an `Arc` internally)
#[derive(Clone, Debug)]
pub struct MailchimpClient {
    http_client: Client,
    /// e.g. `https://{server_prefix}.api.mailchimp.com`
    api_base_url: String,
}

impl MailchimpClient {
    /// Fails only if the TLS backend cannot be initialised
    pub fn new(
        api_base_url: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_base_url,
        })
    }

    /// `{api_base_url}/3.0/lists/{list_id}/members/`, with the stored server
    /// prefix substituted into the base url.
    ///
    /// The key-derived data-center token replaces a literal `<dc>` in the
    /// result; no url produced from the configured template contains one, so
    /// the stored `server_prefix` is what actually routes the request.
    pub fn member_endpoint(
        &self,
        settings: &SyncSettings,
    ) -> String {
        let api_root = self
            .api_base_url
            .replace("{server_prefix}", &settings.server_prefix);
        let url = format!("{api_root}/3.0/lists/{}/members/", settings.list_id);
        url.replace("<dc>", settings.data_center())
    }

    /// Subscribe a member to the configured list.
    ///
    /// Only transport errors (connection refused, timeout, ...) are `Err`.
    /// The response status is returned as-is and -not- checked: a 400
    /// ("Member Exists") or 401 is still `Ok`.
    #[tracing::instrument(name = "Adding Mailchimp list member", skip_all)]
    pub async fn add_list_member(
        &self,
        settings: &SyncSettings,
        member: &MemberPayload<'_>,
    ) -> Result<StatusCode, reqwest::Error> {
        let resp = self
            .http_client
            .post(self.member_endpoint(settings))
            .header(AUTHORIZATION, basic_authorization(&settings.api_key))
            // also sets `Content-Type: application/json`
            .json(member)
            .send()
            .await?;
        Ok(resp.status())
    }
}

/// `Basic base64("user:{api_key}")`; Mailchimp ignores the username
pub fn basic_authorization(api_key: &Secret<String>) -> String {
    let creds = format!("user:{}", api_key.expose_secret());
    format!("Basic {}", general_purpose::STANDARD.encode(creds))
}
