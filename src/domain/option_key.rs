use std::fmt::Display;

/// Names of the persisted settings. These double as the form field names on
/// the admin settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    ApiKey,
    ListId,
    ServerPrefix,
}

impl OptionKey {
    pub const ALL: [OptionKey; 3] = [Self::ApiKey, Self::ListId, Self::ServerPrefix];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::ApiKey => "mailchimp_api_key",
            OptionKey::ListId => "mailchimp_list_id",
            OptionKey::ServerPrefix => "mailchimp_server_prefix",
        }
    }
}

impl Display for OptionKey {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
