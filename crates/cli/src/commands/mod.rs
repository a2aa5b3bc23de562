//! CLI subcommand implementations.

pub mod issue;
pub mod migrate;
