//! xcrunner - resolution and assembly for xcodebuild invocations
//!
//! This crate provides functionality to:
//! - Enumerate execution destinations and filter them by scheme support
//! - Resolve workspace, scheme, configuration, and destination with
//!   per-workspace selection memory behind interactive picks
//! - Assemble the ordered, deduplicated xcodebuild argument vector
//!
//! Everything environment-specific (prompting, subprocesses, terminal
//! output) stays behind the traits in [`interfaces`] and [`context`].
pub mod command;
pub mod config;
pub mod context;
pub mod destination;
pub mod error;
pub mod interfaces;
pub mod resolve;
pub mod state;

// Re-export commonly used types and traits
pub use error::{Error, Result};

pub use command::{BuildRequest, CommandBuilder, XcodebuildCommand};
pub use config::ConfigReader;
pub use context::RuntimeContext;
pub use destination::{Destination, OsFamily, Platform};
pub use destination::catalog::DestinationCatalog;
pub use destination::filter::{Partition, partition};
pub use resolve::{ExplicitParams, ResolvedBuild, Resolver};
pub use state::{SelectionState, SelectionStore};
