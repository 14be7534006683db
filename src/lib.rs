//! Registers users and mirrors each new registration onto a Mailchimp
//! audience list. Admins log in to maintain the Mailchimp credentials; the
//! sync itself runs as a `user_registered` hook and never fails a
//! registration.

pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod mailchimp_client;
pub mod nonce;
pub mod notifier;
pub mod option_store;
pub mod routes;
pub mod session_state;
pub mod startup;
pub mod sync;
pub mod telemetry;
pub mod users;
pub mod utils;
