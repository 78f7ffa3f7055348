pub mod cli;
pub mod commands;
pub mod context;
pub mod display;
pub mod tools;
pub mod utils;

// Re-export commonly used items
pub use cli::{Commands, CommonArgs, LaunchArgs, Xcrunner};
pub use context::CliContext;
