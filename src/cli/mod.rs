pub mod commands;
pub mod display;
pub mod install;

pub use commands::CliArgs;
