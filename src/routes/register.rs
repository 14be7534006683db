use std::fmt::Debug;

use actix_web::http::StatusCode;
use actix_web::web;
use actix_web::HttpResponse;
use actix_web::ResponseError;
use serde::Deserialize;
use sqlx::PgPool;

use crate::domain::NewUser;
use crate::domain::PersonName;
use crate::domain::UserEmail;
use crate::notifier::Event;
use crate::notifier::Notifier;
use crate::users::insert_user;
use crate::utils::error_chain_fmt;

#[derive(Deserialize)]
pub struct RegistrationFormData {
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
}

impl TryFrom<RegistrationFormData> for NewUser {
    type Error = String;
    fn try_from(value: RegistrationFormData) -> Result<Self, Self::Error> {
        Ok(NewUser {
            email: UserEmail::parse(value.email)?,
            first_name: PersonName::parse(value.first_name)?,
            last_name: PersonName::parse(value.last_name)?,
        })
    }
}

#[derive(thiserror::Error)]
pub enum RegisterError {
    #[error("{0}")]
    ValidationError(String),
    #[error("A user with this email is already registered")]
    AlreadyRegistered,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for RegisterError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for RegisterError {
    fn status_code(&self) -> StatusCode {
        match self {
            RegisterError::ValidationError(_) => StatusCode::BAD_REQUEST,
            RegisterError::AlreadyRegistered => StatusCode::CONFLICT,
            RegisterError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `POST /register`
///
/// Store a new user, then fire `user_registered`. The hooks run before the
/// response is sent, but their failures never change it: once the user is
/// stored, the registration has succeeded.
///
/// ```sh
///     curl --data 'email=ada@example.com&first_name=Ada&last_name=Lovelace' http://127.0.0.1:8000/register
/// ```
#[tracing::instrument(
    name = "Registering new user",
    skip(form, pool, notifier),
    fields(user_id = tracing::field::Empty)
)]
pub async fn register(
    form: web::Form<RegistrationFormData>,
    pool: web::Data<PgPool>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, RegisterError> {
    let new_user: NewUser = form.0.try_into().map_err(RegisterError::ValidationError)?;

    let user_id = match insert_user(&new_user, &pool).await {
        Ok(id) => id,
        Err(e)
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation()) =>
        {
            return Err(RegisterError::AlreadyRegistered)
        }
        Err(e) => return Err(anyhow::Error::from(e).context("Failed to store new user").into()),
    };
    tracing::Span::current().record("user_id", tracing::field::display(user_id));

    notifier.emit(Event::UserRegistered, user_id).await;
    Ok(HttpResponse::Ok().finish())
}
