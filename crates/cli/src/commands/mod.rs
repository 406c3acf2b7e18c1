//! CLI subcommand implementations.

pub mod agent;
pub mod onboard;
pub mod status;
pub mod tools;
