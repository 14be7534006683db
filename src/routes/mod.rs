pub mod admin;
mod health_check;
mod login;
mod register;

pub use admin::*;
pub use health_check::*;
pub use login::*;
pub use register::*;
