//! Core algorithms shared by the CLI and the HTTP API.

pub mod geo;
pub mod slug;
mod state;

pub use state::{is_shutdown, register_server, setup_shutdown_handler};
