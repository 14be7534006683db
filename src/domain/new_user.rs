use super::PersonName;
use super::UserEmail;

/// A parsed registration, not yet stored
#[derive(Debug)]
pub struct NewUser {
    pub email: UserEmail,
    pub first_name: PersonName,
    pub last_name: PersonName,
}
