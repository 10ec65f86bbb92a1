//! Command-line interface module.

mod args;
pub mod common;
pub mod compare;
pub mod fetch;
pub mod search;
pub mod serve;
pub mod show;
pub mod slugs;
pub mod suggest;

pub use args::{Cli, Commands, SearchArgs};
