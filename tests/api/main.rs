// one binary for all integration tests; linking is the slow part
mod health_check;
mod helpers;
mod login;
mod sync_settings;
