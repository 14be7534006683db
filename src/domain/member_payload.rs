use serde::Serialize;

use super::UserRecord;

/// Body of `POST /3.0/lists/{list_id}/members/`. Field order is the order in
/// which keys are serialized.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MemberPayload<'a> {
    pub email_address: &'a str,
    pub status: MemberStatus,
    pub merge_fields: MergeFields<'a>,
}

/// Only `subscribed` is ever sent; no double opt-in
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Subscribed,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MergeFields<'a> {
    #[serde(rename = "FNAME")]
    pub first_name: &'a str,
    #[serde(rename = "LNAME")]
    pub last_name: &'a str,
}

impl<'a> From<&'a UserRecord> for MemberPayload<'a> {
    fn from(user: &'a UserRecord) -> Self {
        Self {
            email_address: &user.email,
            status: MemberStatus::Subscribed,
            merge_fields: MergeFields {
                first_name: &user.first_name,
                last_name: &user.last_name,
            },
        }
    }
}
