//! Command implementations.

mod devices;
mod rooms;
mod status;
mod templates;
mod transfer;
mod watch;

pub use devices::cmd_devices;
pub use rooms::cmd_rooms;
pub use status::cmd_status;
pub use templates::cmd_templates;
pub use transfer::{cmd_export, cmd_import};
pub use watch::cmd_watch;
