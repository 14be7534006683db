mod member_payload;
mod new_user;
mod option_key;
mod person_name;
mod sanitized_text;
mod sync_settings;
mod user_email;
mod user_record;
// allow external `use` statements to skip `member_payload` etc
pub use member_payload::MemberPayload;
pub use member_payload::MemberStatus;
pub use member_payload::MergeFields;
pub use new_user::NewUser;
pub use option_key::OptionKey;
pub use person_name::PersonName;
pub use sanitized_text::SanitizedText;
pub use sync_settings::SyncSettings;
pub use user_email::UserEmail;
pub use user_record::UserId;
pub use user_record::UserRecord;
