//! CLI commands for Fydo.
//!
//! Each command follows the same shape: an options struct, a serializable
//! output, and a command with `run` and `format_output`.
//! - **find**: one attempt against the gate
//! - **status**: the persisted counter and the next attempt
//! - **shops**, **init**: catalog listing and scaffolding

pub mod find;
pub mod init;
pub mod shops;
pub mod status;

pub use find::{FindCommand, FindOptions, FindOutput};
pub use init::{InitCommand, InitOptions, InitOutput};
pub use shops::{ShopsCommand, ShopsOptions, ShopsOutput};
pub use status::{StatusCommand, StatusOptions, StatusOutput};
