//! Command handlers, one submodule per subcommand.
//!
//! `interview` is the default command and runs the full wizard; `config`,
//! `list_devices` and `logs` are maintenance helpers.

pub mod config;
pub mod interview;
pub mod list_devices;
pub mod logs;

pub use config::handle_config;
pub use interview::handle_interview;
pub use list_devices::handle_list_devices;
pub use logs::handle_logs;
