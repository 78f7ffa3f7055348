//! Terminal-session implementation of the core capability interface.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use xcrunner_core::destination::Destination;
use xcrunner_core::error::Error;
use xcrunner_core::{ConfigReader, DestinationCatalog, Result, RuntimeContext};

use crate::tools::{Devicectl, Simctl};

/// Capability bundle for interactive runs: status goes to stdout,
/// configuration comes from the environment and the workspace config
/// file, and target lookup re-enumerates through the usual tools.
pub struct CliContext {
    root: PathBuf,
    scratch: PathBuf,
    config: ConfigReader,
}

impl CliContext {
    pub fn new(root: PathBuf) -> Self {
        let scratch = root.join(".xcrunner");
        let config = ConfigReader::load_or_default(&root);
        Self {
            root,
            scratch,
            config,
        }
    }

    pub fn config_reader(&self) -> &ConfigReader {
        &self.config
    }
}

impl RuntimeContext for CliContext {
    fn working_dir(&self) -> &Path {
        &self.root
    }

    fn scratch_dir(&self) -> &Path {
        &self.scratch
    }

    fn report_status(&self, message: &str) {
        println!("🔍 {message}");
    }

    fn config(&self, key: &str) -> Option<Value> {
        self.config.get(key)
    }

    /// Matches the stable id first, then falls back to the display name
    /// so `-d "iPhone 15 Pro"` works the same here as in full resolution.
    fn lookup_target(&self, id: &str) -> Result<Destination> {
        let simulators = Simctl;
        let devices = Devicectl;
        let catalog = DestinationCatalog::new(&simulators, &devices);
        let found = catalog.enumerate()?;
        debug!(count = found.len(), id, "looking up target");
        found
            .into_iter()
            .find(|d| d.id() == id || d.name() == Some(id))
            .ok_or_else(|| Error::DestinationNotFound(id.to_string()))
    }

    fn on_target_booted(&self, destination: &Destination) {
        println!("📱 {} is ready", destination.label());
    }

    fn on_build_completed(&self) {
        println!("✅ Build succeeded");
    }
}
