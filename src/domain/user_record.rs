use std::fmt::Display;

use serde::Deserialize;
use serde::Serialize;

/// Primary key of the `users` table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl Display for UserId {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A registered user, as read back from the user directory. The sync never
/// creates or mutates these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserRecord {
    pub fn user_id(&self) -> UserId { UserId(self.id) }
}
