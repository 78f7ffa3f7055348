//! Seams to the external collaborators this core consumes.
//!
//! The interactive picker, project inspection, and target enumeration are
//! all external processes; the core only ever sees these traits, so it runs
//! identically under a terminal session and under a host integration.

pub mod picker;
pub mod project;
pub mod targets;

pub use picker::Picker;
pub use project::{ProjectInspector, WorkspaceLocator};
pub use targets::{DeviceRecord, DeviceSource, SimulatorRecord, SimulatorSource};
