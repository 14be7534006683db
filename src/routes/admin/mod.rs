mod logout;
mod sync_settings;

pub use logout::*;
pub use sync_settings::*;
