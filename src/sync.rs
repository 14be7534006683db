use std::fmt::Debug;

use reqwest::StatusCode;
use tracing::Instrument;

use crate::domain::MemberPayload;
use crate::domain::SyncSettings;
use crate::domain::UserId;
use crate::mailchimp_client::MailchimpClient;
use crate::notifier::HookContext;
use crate::notifier::HookFuture;
use crate::option_store::get_sync_settings;
use crate::users::UserDirectory;
use crate::utils::error_chain_fmt;

/// What happened to one registration. Every variant is a success from the
/// caller's point of view.
#[derive(Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// api key or list id not set; nothing was sent
    Skipped,
    /// The request reached Mailchimp. `status` may well be 4xx.
    Sent { status: StatusCode },
    /// The request never completed; already logged
    TransportFailed { email: String, error: String },
}

#[derive(thiserror::Error)]
pub enum SyncError {
    #[error("No user with id {0} was found")]
    UnknownUser(UserId),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for SyncError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Subscribe a newly registered user to the configured Mailchimp list.
///
/// Best effort, single attempt: transport failures are logged and reported as
/// `SyncOutcome::TransportFailed`, and Mailchimp's response is never
/// inspected. Only a missing user (or a failed lookup) is an `Err`.
pub async fn on_user_registered(
    settings: &SyncSettings,
    users: &dyn UserDirectory,
    client: &MailchimpClient,
    user_id: UserId,
) -> Result<SyncOutcome, SyncError> {
    if !settings.is_configured() {
        return Ok(SyncOutcome::Skipped);
    }

    // bunyan copies span fields onto every line; the email must only ever
    // appear in the failure line, so the span gets the id alone
    let span = tracing::info_span!("Syncing user with Mailchimp", %user_id);
    async move {
        tracing::info!("Syncing user with Mailchimp: {user_id}");

        let user = users
            .get_userdata(user_id)
            .await?
            .ok_or(SyncError::UnknownUser(user_id))?;

        let member = MemberPayload::from(&user);
        match client.add_list_member(settings, &member).await {
            Ok(status) => {
                tracing::debug!(%status, "Mailchimp responded");
                Ok(SyncOutcome::Sent { status })
            }
            Err(e) => {
                tracing::error!("Error registering user with Mailchimp: {}", user.email);
                tracing::error!("Mailchimp API error: {e}");
                Ok(SyncOutcome::TransportFailed {
                    email: user.email,
                    error: e.to_string(),
                })
            }
        }
    }
    .instrument(span)
    .await
}

/// The `user_registered` hook: read the current settings from the option
/// store, then sync. Registered with the `Notifier` at startup.
pub fn sync_registered_user(
    ctx: &HookContext,
    user_id: UserId,
) -> HookFuture<'_> {
    Box::pin(async move {
        let settings = get_sync_settings(ctx.options.as_ref()).await?;
        on_user_registered(&settings, ctx.users.as_ref(), &ctx.mailchimp, user_id).await?;
        Ok::<(), anyhow::Error>(())
    })
}
