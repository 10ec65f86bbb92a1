//! Small shared helpers.

pub mod date;
pub mod plural;
