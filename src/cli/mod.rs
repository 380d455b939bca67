pub mod commands;

pub use commands::{CliArgs, Commands, ProbeArgs, SchemaArgs};
