use std::path::PathBuf;

use super::builder::CommandBuilder;
use super::xcodebuild::XcodebuildCommand;

/// Everything a resolved build needs to become one xcodebuild invocation.
///
/// Resolution fills the required fields before assembly; the optional ones
/// stay `None` rather than leaking sentinel strings into the argument
/// vector.
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    /// `.xcworkspace` or `.xcodeproj` path, decides the container flag.
    pub container: PathBuf,
    pub scheme: String,
    pub configuration: String,
    /// Rendered destination specifier, absent for container-wide actions
    /// like `clean`.
    pub destination: Option<String>,
    pub arch: Option<String>,
    pub debug: bool,
    pub result_bundle: Option<PathBuf>,
    pub derived_data: Option<PathBuf>,
    pub allow_provisioning_updates: bool,
    pub clean: bool,
    pub build: bool,
    pub test: bool,
    /// Free-form passthrough tokens, classified heuristically.
    pub extra_args: Vec<String>,
    /// Build-setting overrides applied after everything else, in order.
    pub overrides: Vec<(String, String)>,
}

impl BuildRequest {
    /// Assemble the invocation.
    ///
    /// Declaration order fixes which value wins on collision: structured
    /// fields first, then free-form tokens, then the override map. Class
    /// rendering order and per-class dedup are the builder's business.
    pub fn assemble(&self) -> XcodebuildCommand {
        let mut builder = CommandBuilder::new();

        if let Some(arch) = &self.arch {
            builder.setting("ARCHS", arch);
            builder.setting("ONLY_ACTIVE_ARCH", "YES");
        }
        if self.debug {
            builder.setting("GCC_OPTIMIZATION_LEVEL", "0");
            builder.setting("SWIFT_OPTIMIZATION_LEVEL", "-Onone");
        }

        builder.parameter("-scheme", &self.scheme);
        builder.parameter("-configuration", &self.configuration);
        builder.parameter(self.container_flag(), self.container.display().to_string());
        if let Some(destination) = &self.destination {
            builder.parameter("-destination", destination);
        }
        if let Some(path) = &self.result_bundle {
            builder.parameter("-resultBundlePath", path.display().to_string());
        }
        if let Some(path) = &self.derived_data {
            builder.parameter("-derivedDataPath", path.display().to_string());
        }
        if self.allow_provisioning_updates {
            builder.bare("-allowProvisioningUpdates");
        }

        if self.clean {
            builder.action("clean");
        }
        if self.build {
            builder.action("build");
        }
        if self.test {
            builder.action("test");
        }

        builder.push_raw(&self.extra_args);
        for (key, value) in &self.overrides {
            builder.setting(key, value);
        }

        builder.finish()
    }

    fn container_flag(&self) -> &'static str {
        if self
            .container
            .extension()
            .is_some_and(|ext| ext == "xcworkspace")
        {
            "-workspace"
        } else {
            "-project"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> BuildRequest {
        BuildRequest {
            container: PathBuf::from("App.xcworkspace"),
            scheme: "App".to_string(),
            configuration: "Debug".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn assembles_all_classes_in_render_order() {
        let mut req = request();
        req.arch = Some("arm64".to_string());
        req.debug = true;
        req.destination = Some("id=ABC123".to_string());
        req.result_bundle = Some(PathBuf::from("/tmp/results.xcresult"));
        req.derived_data = Some(PathBuf::from("/tmp/dd"));
        req.build = true;
        req.extra_args = vec!["-quiet".to_string()];

        insta::assert_snapshot!(
            req.assemble().to_shell_command(),
            @"xcodebuild ARCHS=arm64 ONLY_ACTIVE_ARCH=YES GCC_OPTIMIZATION_LEVEL=0 SWIFT_OPTIMIZATION_LEVEL=-Onone -scheme App -configuration Debug -workspace App.xcworkspace -destination id=ABC123 -resultBundlePath /tmp/results.xcresult -derivedDataPath /tmp/dd -quiet build"
        );
    }

    #[test]
    fn project_container_switches_the_flag() {
        let mut req = request();
        req.container = PathBuf::from("App.xcodeproj");
        req.build = true;

        let args = req.assemble().args;
        assert!(args.contains(&"-project".to_string()));
        assert!(!args.contains(&"-workspace".to_string()));
    }

    #[test]
    fn clean_needs_no_destination() {
        let mut req = request();
        req.clean = true;

        let cmd = req.assemble();
        assert!(!cmd.args.contains(&"-destination".to_string()));
        assert_eq!(cmd.args.last().map(String::as_str), Some("clean"));
    }

    #[test]
    fn override_map_beats_free_form_settings() {
        let mut req = request();
        req.build = true;
        req.extra_args = vec!["ARCHS=arm64".to_string()];
        req.overrides = vec![("ARCHS".to_string(), "x86_64".to_string())];

        let cmd = req.assemble();
        assert_eq!(cmd.args.first().map(String::as_str), Some("ARCHS=x86_64"));
        assert_eq!(
            cmd.args.iter().filter(|a| a.starts_with("ARCHS=")).count(),
            1
        );
    }

    #[test]
    fn clean_and_build_render_as_two_actions() {
        let mut req = request();
        req.clean = true;
        req.build = true;

        let cmd = req.assemble();
        let n = cmd.args.len();
        assert_eq!(&cmd.args[n - 2..], ["clean", "build"]);
    }

    #[test]
    fn classifier_warnings_surface_on_the_command() {
        let mut req = request();
        req.build = true;
        req.extra_args = vec!["definitely-not-an-action".to_string()];

        let cmd = req.assemble();
        assert_eq!(cmd.warnings.len(), 1);
    }
}
