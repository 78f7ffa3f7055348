//! Assembly of xcodebuild invocations.
//!
//! [`BuildRequest`] is the structured input, [`CommandBuilder`] the
//! order-aware collector, and [`XcodebuildCommand`] the finished argument
//! vector handed to the process layer.

pub mod builder;
pub mod request;
pub mod xcodebuild;

pub use builder::{ACTION_VERBS, CommandBuilder};
pub use request::BuildRequest;
pub use xcodebuild::{PROGRAM, XcodebuildCommand};
