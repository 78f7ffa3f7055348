pub mod build;
pub mod clean;
pub mod launch;
pub mod run;

pub use build::build_command;
pub use clean::clean_command;
pub use launch::launch_command;
pub use run::run_command;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use xcrunner_core::config::{
    ARCH_KEY, BUILD_SETTINGS_KEY, DEBUG_KEY, DERIVED_DATA_KEY, DEVELOPER_DIR_KEY,
};
use xcrunner_core::destination::Destination;
use xcrunner_core::resolve::{ExplicitParams, ResolvedBuild};
use xcrunner_core::state::{CONFIGURATION_KEY, DESTINATION_KEY, SCHEME_KEY, WORKSPACE_KEY};
use xcrunner_core::{BuildRequest, DestinationCatalog, Resolver, XcodebuildCommand};

use crate::cli::CommonArgs;
use crate::context::CliContext;
use crate::tools::{ContainerLocator, Devicectl, FzfPicker, Simctl, XcodebuildTool};

/// Everything a subcommand wires together: the capability context plus
/// the concrete collaborators behind the core's seams.
pub(crate) struct Session {
    pub root: PathBuf,
    pub context: CliContext,
    pub locator: ContainerLocator,
    pub xcodebuild: XcodebuildTool,
    pub picker: FzfPicker,
    pub simctl: Simctl,
    pub devicectl: Devicectl,
}

impl Session {
    pub fn open(args: &CommonArgs) -> Result<Self> {
        let root = match &args.root {
            Some(root) => root.clone(),
            None => env::current_dir().context("Failed to get current directory")?,
        };
        let root = root
            .canonicalize()
            .with_context(|| format!("Cannot access workspace root {}", root.display()))?;
        Ok(Self {
            context: CliContext::new(root.clone()),
            root,
            locator: ContainerLocator,
            xcodebuild: XcodebuildTool,
            picker: FzfPicker,
            simctl: Simctl,
            devicectl: Devicectl,
        })
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver {
            context: &self.context,
            locator: &self.locator,
            inspector: &self.xcodebuild,
            picker: &self.picker,
        }
    }

    pub fn catalog(&self) -> DestinationCatalog<'_> {
        DestinationCatalog::new(&self.simctl, &self.devicectl)
    }

    /// Flags first, then configuration (environment or file). Both count
    /// as explicit for resolution and are never persisted.
    pub fn explicit(&self, args: &CommonArgs) -> ExplicitParams {
        let config = self.context.config_reader();
        ExplicitParams {
            workspace: args
                .workspace
                .clone()
                .or_else(|| config.get_path(WORKSPACE_KEY)),
            scheme: args.scheme.clone().or_else(|| config.get_str(SCHEME_KEY)),
            configuration: args
                .configuration
                .clone()
                .or_else(|| config.get_str(CONFIGURATION_KEY)),
            destination: args
                .destination
                .clone()
                .or_else(|| config.get_str(DESTINATION_KEY)),
        }
    }

    /// A request carrying the resolved parameters plus everything that
    /// arrives outside resolution: configured arch and derived data,
    /// passthrough tokens, and the configured override map.
    pub fn request(&self, args: &CommonArgs, resolved: &ResolvedBuild) -> BuildRequest {
        let config = self.context.config_reader();

        let mut extra = Vec::new();
        if let Some(sdk) = &args.sdk {
            extra.push("-sdk".to_string());
            extra.push(sdk.clone());
        }
        extra.extend(args.extra.iter().cloned());

        let overrides = config
            .get(BUILD_SETTINGS_KEY)
            .and_then(|value| match value {
                Value::Object(map) => Some(
                    map.into_iter()
                        .filter_map(|(key, value)| scalar(value).map(|v| (key, v)))
                        .collect(),
                ),
                _ => None,
            })
            .unwrap_or_default();

        BuildRequest {
            container: resolved.container.clone(),
            scheme: resolved.scheme.clone(),
            configuration: resolved.configuration.clone(),
            destination: resolved.destination.as_ref().map(Destination::specifier),
            arch: config.get_str(ARCH_KEY),
            debug: args.debug || config.get_bool(DEBUG_KEY).unwrap_or(false),
            result_bundle: None,
            derived_data: config.get_path(DERIVED_DATA_KEY),
            allow_provisioning_updates: matches!(
                resolved.destination,
                Some(Destination::Device(_))
            ),
            clean: false,
            build: false,
            test: false,
            extra_args: extra,
            overrides,
        }
    }

    /// Assemble and pin the spawn environment: xcodebuild runs from the
    /// workspace root, under the configured Xcode installation if
    /// `cli.developer_dir` is set.
    pub fn assemble(&self, request: BuildRequest) -> XcodebuildCommand {
        let mut command = request
            .assemble()
            .with_working_dir(self.root.display().to_string());
        if let Some(dir) = self.context.config_reader().get_str(DEVELOPER_DIR_KEY) {
            command = command.with_env("DEVELOPER_DIR".to_string(), dir);
        }
        command
    }
}

fn scalar(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
