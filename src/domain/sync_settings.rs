use secrecy::ExposeSecret;
use secrecy::Secret;

/// The three admin-supplied settings needed to reach a Mailchimp list. Any of
/// them may be empty at rest.
#[derive(Clone, Debug)]
pub struct SyncSettings {
    pub api_key: Secret<String>,
    pub list_id: String,
    pub server_prefix: String,
}

impl SyncSettings {
    /// Without an api key and a list id there is nothing to sync to. An empty
    /// server prefix is -not- checked.
    pub fn is_configured(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.list_id.is_empty()
    }

    /// Data-center token: whatever follows the first `-` of the api key
    /// (`abc123-us21` -> `us21`), empty if there is no `-`.
    pub fn data_center(&self) -> &str {
        self.api_key
            .expose_secret()
            .split_once('-')
            .map(|(_, dc)| dc)
            .unwrap_or("")
    }
}
