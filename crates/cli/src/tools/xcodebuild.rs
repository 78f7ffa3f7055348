use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::process::Command;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use xcrunner_core::command::{PROGRAM, XcodebuildCommand};
use xcrunner_core::destination::Platform;
use xcrunner_core::error::{Error, Result};
use xcrunner_core::interfaces::ProjectInspector;

const INSTALL_HINT: &str = "install Xcode and run `xcode-select --install`";

/// The xcodebuild binary, both as build runner and as project inspector.
pub struct XcodebuildTool;

impl XcodebuildTool {
    fn container_args(container: &Path) -> [String; 2] {
        let flag = if container.extension().is_some_and(|ext| ext == "xcworkspace") {
            "-workspace"
        } else {
            "-project"
        };
        [flag.to_string(), container.display().to_string()]
    }

    fn capture(&self, args: &[String]) -> Result<String> {
        debug!(?args, "invoking xcodebuild");
        let output = Command::new(PROGRAM)
            .args(args)
            .output()
            .map_err(missing_tool)?;
        if !output.status.success() {
            return Err(Error::ExecutionFailed {
                tool: PROGRAM.to_string(),
                status: output.status,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn list(&self, container: &Path) -> Result<ListEntry> {
        let mut args = vec!["-list".to_string(), "-json".to_string()];
        args.extend(Self::container_args(container));
        parse_list(&self.capture(&args)?)
    }

    /// Full build-settings dump for a scheme, one `KEY = VALUE` per line.
    /// Without a configuration the scheme's default applies.
    pub fn build_settings(
        &self,
        container: &Path,
        scheme: &str,
        configuration: Option<&str>,
    ) -> Result<BTreeMap<String, String>> {
        let mut args = vec!["-showBuildSettings".to_string()];
        args.extend(Self::container_args(container));
        args.extend(["-scheme".to_string(), scheme.to_string()]);
        if let Some(configuration) = configuration {
            args.extend(["-configuration".to_string(), configuration.to_string()]);
        }
        Ok(parse_build_settings(&self.capture(&args)?))
    }

    /// Run an assembled invocation with inherited stdio, so xcodebuild's
    /// own progress output reaches the terminal untouched.
    pub fn run(&self, command: &XcodebuildCommand) -> Result<()> {
        info!("running: {}", command.to_shell_command());
        let mut process = Command::new(PROGRAM);
        process.args(&command.args);
        if let Some(dir) = &command.working_dir {
            process.current_dir(dir);
        }
        for (key, value) in &command.env {
            process.env(key, value);
        }
        let status = process.status().map_err(missing_tool)?;
        if !status.success() {
            return Err(Error::ExecutionFailed {
                tool: PROGRAM.to_string(),
                status,
            });
        }
        Ok(())
    }
}

impl ProjectInspector for XcodebuildTool {
    fn schemes(&self, container: &Path) -> Result<Vec<String>> {
        Ok(self.list(container)?.schemes)
    }

    fn configurations(&self, container: &Path) -> Result<Vec<String>> {
        let listed = self.list(container)?.configurations;
        if listed.is_empty() {
            // workspace listings never carry configurations
            return Ok(vec!["Debug".to_string(), "Release".to_string()]);
        }
        Ok(listed)
    }

    fn supported_platforms(
        &self,
        container: &Path,
        scheme: &str,
    ) -> Result<Option<Vec<Platform>>> {
        let settings = self.build_settings(container, scheme, None)?;
        Ok(declared_platforms(&settings))
    }
}

fn missing_tool(err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound => Error::ToolMissing {
            tool: PROGRAM.to_string(),
            hint: INSTALL_HINT.to_string(),
        },
        _ => Error::Io(err),
    }
}

#[derive(Debug, Default, Deserialize)]
struct ListDocument {
    workspace: Option<ListEntry>,
    project: Option<ListEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct ListEntry {
    #[serde(default)]
    schemes: Vec<String>,
    #[serde(default)]
    configurations: Vec<String>,
}

fn parse_list(raw: &str) -> Result<ListEntry> {
    let doc: ListDocument = serde_json::from_str(raw)?;
    Ok(doc.workspace.or(doc.project).unwrap_or_default())
}

fn parse_build_settings(raw: &str) -> BTreeMap<String, String> {
    let line = Regex::new(r"(?m)^\s{4}(\w+) = (.*)$").unwrap();
    line.captures_iter(raw)
        .map(|caps| (caps[1].to_string(), caps[2].trim_end().to_string()))
        .collect()
}

/// `SUPPORTED_PLATFORMS` as declared by the scheme, or `None` when absent.
/// Tokens outside the known platform set are dropped.
fn declared_platforms(settings: &BTreeMap<String, String>) -> Option<Vec<Platform>> {
    let raw = settings.get("SUPPORTED_PLATFORMS")?;
    let platforms = raw
        .split_whitespace()
        .filter_map(|token| {
            let platform = Platform::parse(token);
            if platform.is_none() {
                warn!(token, "skipping unrecognized platform in SUPPORTED_PLATFORMS");
            }
            platform
        })
        .collect();
    Some(platforms)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW_SETTINGS: &str = "Build settings for action build and \
scheme App\n    ARCHS = arm64\n    PRODUCT_BUNDLE_IDENTIFIER = com.example.App\n    \
SUPPORTED_PLATFORMS = iphoneos iphonesimulator\n    TARGET_BUILD_DIR = /tmp/Debug-iphonesimulator\n";

    #[test]
    fn settings_lines_parse_into_a_map() {
        let settings = parse_build_settings(SHOW_SETTINGS);
        assert_eq!(settings.get("ARCHS").map(String::as_str), Some("arm64"));
        assert_eq!(
            settings.get("PRODUCT_BUNDLE_IDENTIFIER").map(String::as_str),
            Some("com.example.App")
        );
        // the headline line is not a setting
        assert!(!settings.contains_key("Build"));
    }

    #[test]
    fn declared_platforms_come_from_supported_platforms() {
        let settings = parse_build_settings(SHOW_SETTINGS);
        assert_eq!(
            declared_platforms(&settings),
            Some(vec![Platform::Ios, Platform::IosSimulator])
        );
    }

    #[test]
    fn absent_supported_platforms_reads_as_none() {
        let settings = parse_build_settings("    ARCHS = arm64\n");
        assert_eq!(declared_platforms(&settings), None);
    }

    #[test]
    fn unknown_platform_tokens_are_dropped() {
        let settings = parse_build_settings("    SUPPORTED_PLATFORMS = iphoneos hyperos\n");
        assert_eq!(declared_platforms(&settings), Some(vec![Platform::Ios]));
    }

    #[test]
    fn workspace_listing_wins_over_project() {
        let entry = parse_list(
            r#"{"workspace":{"name":"App","schemes":["App","AppTests"]}}"#,
        )
        .unwrap();
        assert_eq!(entry.schemes, vec!["App", "AppTests"]);
        assert!(entry.configurations.is_empty());
    }

    #[test]
    fn project_listing_carries_configurations() {
        let entry = parse_list(
            r#"{"project":{"configurations":["Debug","Release"],"name":"App","schemes":["App"]}}"#,
        )
        .unwrap();
        assert_eq!(entry.configurations, vec!["Debug", "Release"]);
    }

    #[test]
    fn malformed_listing_is_an_error() {
        assert!(parse_list("xcodebuild: error").is_err());
    }
}
