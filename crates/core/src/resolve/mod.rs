//! The override-precedence policy behind every prompt.
//!
//! Each build parameter resolves through the same ladder: an explicit
//! value wins outright, a single available option short-circuits, a
//! remembered value still on offer is reused, and only then does the
//! interactive picker run. Only picked values are written back to memory;
//! explicit and auto-selected ones never are.
//!
//! Resolution is strictly sequential. The scheme list depends on the
//! container, the platform declaration depends on the scheme, and the
//! destination partition depends on that declaration, so each rung blocks
//! on the previous one.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::context::RuntimeContext;
use crate::destination::Destination;
use crate::destination::catalog::DestinationCatalog;
use crate::destination::filter::{Partition, partition};
use crate::error::{Error, Result};
use crate::interfaces::{Picker, ProjectInspector, WorkspaceLocator};
use crate::state::{
    CONFIGURATION_KEY, DESTINATION_KEY, SCHEME_KEY, SelectionStore, WORKSPACE_KEY,
};

/// Values the caller fixed up front, via flags or configuration.
///
/// An explicit value wins its ladder unconditionally and is never echoed
/// into selection memory.
#[derive(Debug, Clone, Default)]
pub struct ExplicitParams {
    pub workspace: Option<PathBuf>,
    pub scheme: Option<String>,
    pub configuration: Option<String>,
    /// Destination id or display name.
    pub destination: Option<String>,
}

/// Outcome of a resolution pass, ready for command assembly.
#[derive(Debug, Clone)]
pub struct ResolvedBuild {
    pub container: PathBuf,
    pub scheme: String,
    pub configuration: String,
    pub destination: Option<Destination>,
}

/// Ties selection memory, the destination catalog, and the interactive
/// picker together per decision point.
pub struct Resolver<'a> {
    pub context: &'a dyn RuntimeContext,
    pub locator: &'a dyn WorkspaceLocator,
    pub inspector: &'a dyn ProjectInspector,
    pub picker: &'a dyn Picker,
}

impl Resolver<'_> {
    /// Resolve container, scheme, and configuration in dependency order,
    /// then a destination compatible with the scheme.
    pub fn resolve(
        &self,
        store: &mut SelectionStore,
        explicit: &ExplicitParams,
        catalog: &DestinationCatalog<'_>,
    ) -> Result<ResolvedBuild> {
        let base = self.resolve_without_destination(store, explicit)?;

        self.context.report_status("Scanning destinations");
        let declared = self
            .inspector
            .supported_platforms(&base.container, &base.scheme)?;
        let split = partition(catalog.enumerate()?, declared.as_deref());
        let destination =
            self.resolve_destination(store, explicit.destination.as_deref(), &split)?;

        Ok(ResolvedBuild {
            destination: Some(destination),
            ..base
        })
    }

    /// The same ladder, stopping before destinations. Container-wide
    /// actions like `clean` run against no particular target.
    pub fn resolve_without_destination(
        &self,
        store: &mut SelectionStore,
        explicit: &ExplicitParams,
    ) -> Result<ResolvedBuild> {
        let container = self.resolve_container(store, explicit.workspace.as_deref())?;

        let schemes = self.inspector.schemes(&container)?;
        let scheme = self.resolve_choice(
            store,
            SCHEME_KEY,
            "scheme",
            explicit.scheme.as_deref(),
            &schemes,
            None,
        )?;

        let configurations = self.inspector.configurations(&container)?;
        // The silent Debug pick only covers the stock two-configuration set.
        // Custom sets go through the picker like any other decision.
        let implicit = (configurations.len() == 2
            && configurations.iter().any(|c| c == "Debug")
            && configurations.iter().any(|c| c == "Release"))
        .then_some("Debug");
        let configuration = self.resolve_choice(
            store,
            CONFIGURATION_KEY,
            "build configuration",
            explicit.configuration.as_deref(),
            &configurations,
            implicit,
        )?;

        Ok(ResolvedBuild {
            container,
            scheme,
            configuration,
            destination: None,
        })
    }

    fn resolve_container(
        &self,
        store: &mut SelectionStore,
        explicit: Option<&Path>,
    ) -> Result<PathBuf> {
        if let Some(path) = explicit {
            debug!(container = %path.display(), "using explicit container");
            // A relative path is anchored at the root, not the process cwd.
            let container = if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.context.working_dir().join(path)
            };
            return Ok(container);
        }

        let root = self.context.working_dir();
        self.context.report_status("Scanning for workspaces");
        let found = self.locator.locate(root)?;
        if found.is_empty() {
            return Err(Error::NoWorkspaceFound(root.to_path_buf()));
        }
        // Picker rows and the remembered value are root-relative.
        let options: Vec<String> = found
            .iter()
            .map(|path| path.strip_prefix(root).unwrap_or(path).display().to_string())
            .collect();
        let chosen = self.resolve_choice(store, WORKSPACE_KEY, "workspace", None, &options, None)?;
        Ok(root.join(chosen))
    }

    /// One rung ladder for a string-valued decision point.
    ///
    /// `implicit_default` sits between memory and the picker: when the
    /// named option is on offer and nothing else decided, it is taken
    /// silently (the Debug-over-Release convention).
    fn resolve_choice(
        &self,
        store: &mut SelectionStore,
        key: &str,
        what: &'static str,
        explicit: Option<&str>,
        options: &[String],
        implicit_default: Option<&str>,
    ) -> Result<String> {
        if let Some(value) = explicit {
            debug!(key, value, "using explicit value");
            return Ok(value.to_string());
        }
        if options.is_empty() {
            return Err(Error::NoOptions(what));
        }
        if let [only] = options {
            debug!(key, only = only.as_str(), "auto-selected the only option");
            return Ok(only.clone());
        }
        if let Some(remembered) = store.get_str(key) {
            if options.iter().any(|option| option == remembered) {
                debug!(key, remembered, "reusing remembered selection");
                return Ok(remembered.to_string());
            }
            debug!(key, remembered, "remembered selection is stale");
        }
        if let Some(default) = implicit_default {
            if options.iter().any(|option| option == default) {
                debug!(key, default, "using the conventional default");
                return Ok(default.to_string());
            }
        }

        let prompt = format!("Select a {what}");
        let index = self.picker.pick(&prompt, options)?;
        let chosen = options.get(index).cloned().ok_or(Error::Cancelled)?;
        store.remember(key, chosen.as_str());
        Ok(chosen)
    }

    /// Destination resolution restricts the memory rung to the supported
    /// half: a remembered id that became unsupported for this scheme must
    /// not be reused silently. The single-option shortcut and the picker
    /// still see the whole partition, unsupported rows marked as such.
    fn resolve_destination(
        &self,
        store: &mut SelectionStore,
        explicit: Option<&str>,
        split: &Partition,
    ) -> Result<Destination> {
        if let Some(wanted) = explicit {
            debug!(wanted, "using explicit destination");
            return split
                .find(wanted)
                .cloned()
                .ok_or_else(|| Error::DestinationNotFound(wanted.to_string()));
        }
        if split.is_empty() {
            return Err(Error::NoDestinations);
        }
        if split.len() == 1 {
            if let Some(only) = split.iter().next() {
                debug!(id = %only.id(), "auto-selected the only destination");
                return Ok(only.clone());
            }
        }
        if let Some(remembered) = store.get_str(DESTINATION_KEY) {
            if let Some(found) = split.supported.iter().find(|d| d.id() == remembered) {
                debug!(id = remembered, "reusing remembered destination");
                return Ok(found.clone());
            }
            debug!(id = remembered, "remembered destination is stale or unsupported");
        }

        let rows: Vec<String> = split
            .supported
            .iter()
            .map(Destination::label)
            .chain(
                split
                    .unsupported
                    .iter()
                    .map(|d| format!("{} (unsupported)", d.label())),
            )
            .collect();
        let index = self.picker.pick("Select a destination", &rows)?;
        let chosen = split
            .iter()
            .nth(index)
            .cloned()
            .ok_or(Error::Cancelled)?;
        store.remember(DESTINATION_KEY, chosen.id());
        Ok(chosen)
    }
}
