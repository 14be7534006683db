use std::fmt::Debug;

use actix_web::error::InternalError;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web_flash_messages::FlashMessage;
use secrecy::Secret;
use serde::Deserialize;
use sqlx::PgPool;

use crate::authentication::validate_credentials;
use crate::authentication::AuthError;
use crate::authentication::Credentials;
use crate::routes::admin::SETTINGS_PATH;
use crate::session_state::TypedSession;
use crate::utils::error_chain_fmt;
use crate::utils::redirect;

#[derive(Deserialize)]
pub struct LoginFormData {
    username: String,
    password: Secret<String>,
}

#[derive(thiserror::Error)]
pub enum LoginError {
    // shown in the browser
    #[error("Authentication failed")]
    AuthError(#[source] anyhow::Error),
    #[error("Something went wrong")]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for LoginError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Flash the error and send the browser back to the login form. The error is
/// still propagated (as `InternalError`) so the logging middleware sees it.
fn login_redirect(err: LoginError) -> InternalError<LoginError> {
    FlashMessage::error(err.to_string()).send();
    InternalError::from_response(err, redirect("/login"))
}

/// `POST /login`
///
/// On success, 303 to the settings page; otherwise 303 back to `/login`.
#[tracing::instrument(
    name = "Validating credentials for login",
    skip(form, pool, session),
    fields(
        username = tracing::field::Empty,
        admin_id = tracing::field::Empty,
    )
)]
pub async fn login(
    form: web::Form<LoginFormData>,
    pool: web::Data<PgPool>,
    session: TypedSession,
) -> Result<HttpResponse, InternalError<LoginError>> {
    let creds = Credentials {
        username: form.0.username,
        password: form.0.password,
    };
    tracing::Span::current().record("username", tracing::field::display(&creds.username));

    match validate_credentials(creds, &pool).await {
        Ok(admin_id) => {
            tracing::Span::current().record("admin_id", tracing::field::display(admin_id));
            session.renew();
            session
                .insert_admin_id(admin_id)
                .map_err(|e| login_redirect(LoginError::UnexpectedError(e.into())))?;
            Ok(redirect(SETTINGS_PATH))
        }
        Err(e) => {
            let e = match e {
                AuthError::InvalidCredentials(_) => LoginError::AuthError(e.into()),
                AuthError::UnexpectedError(_) => LoginError::UnexpectedError(e.into()),
            };
            Err(login_redirect(e))
        }
    }
}
