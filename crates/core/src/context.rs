//! The seam between resolution logic and whatever is hosting it.
//!
//! Resolution runs the same whether it was started from an interactive
//! terminal or an embedding integration; only this capability bundle
//! differs between the two. Core code never branches on the host kind.

use std::path::Path;

use serde_json::Value;

use crate::destination::Destination;
use crate::error::Result;

/// Capabilities the hosting shell lends to resolution for one process
/// lifetime.
///
/// The context never owns destinations or assembled commands; it only
/// answers questions and carries side channels (status lines, lifecycle
/// hooks) back to the host.
pub trait RuntimeContext {
    /// Workspace root the run was started for.
    fn working_dir(&self) -> &Path;

    /// Scratch directory for run artifacts such as result bundles.
    fn scratch_dir(&self) -> &Path;

    /// Surface a progress line to the user or host log.
    fn report_status(&self, message: &str);

    /// Configuration lookup, environment over file.
    fn config(&self, key: &str) -> Option<Value>;

    fn config_or(&self, key: &str, fallback: Value) -> Value {
        self.config(key).unwrap_or(fallback)
    }

    /// Find a destination by its stable identifier in a fresh
    /// enumeration. Fails with [`Error::DestinationNotFound`] when the id
    /// matches nothing.
    ///
    /// [`Error::DestinationNotFound`]: crate::error::Error::DestinationNotFound
    fn lookup_target(&self, id: &str) -> Result<Destination>;

    /// Fired once a chosen simulator or device reports ready.
    fn on_target_booted(&self, _destination: &Destination) {}

    /// Fired after the toolchain invocation exits successfully.
    fn on_build_completed(&self) {}
}
