//! Concrete collaborators behind the core's seams: fzf for picking,
//! xcodebuild for inspection and builds, simctl and devicectl for target
//! enumeration and launching, walkdir for container discovery.

pub mod devicectl;
pub mod fzf;
pub mod locator;
pub mod simctl;
pub mod xcodebuild;

pub use devicectl::Devicectl;
pub use fzf::FzfPicker;
pub use locator::ContainerLocator;
pub use simctl::Simctl;
pub use xcodebuild::XcodebuildTool;
