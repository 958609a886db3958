pub mod acknowledger;
pub mod identity;
pub mod resolver;
pub mod types;

pub use acknowledger::{acknowledge, format_confirmation};
pub use identity::current_user;
pub use resolver::resolve_environment_id;
pub use types::*;
