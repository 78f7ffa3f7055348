use std::fmt;

/// The toolchain binary every assembled invocation targets.
pub const PROGRAM: &str = "xcodebuild";

/// A fully assembled xcodebuild invocation.
///
/// `args` is already ordered and deduplicated; callers spawn it verbatim.
/// `warnings` carries the free-form tokens the assembler dropped, so the
/// front end can surface them before running the build.
#[derive(Debug, Clone)]
pub struct XcodebuildCommand {
    pub args: Vec<String>,
    pub warnings: Vec<String>,
    pub working_dir: Option<String>,
    pub env: Vec<(String, String)>,
}

impl XcodebuildCommand {
    pub fn with_working_dir(mut self, dir: String) -> Self {
        self.working_dir = Some(dir);
        self
    }

    pub fn with_env(mut self, key: String, value: String) -> Self {
        self.env.push((key, value));
        self
    }

    /// Program name plus arguments, ready for a process spawn.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(PROGRAM.to_string());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Render as a copy-pasteable shell line, quoting arguments that
    /// contain spaces.
    pub fn to_shell_command(&self) -> String {
        let mut cmd = String::from(PROGRAM);
        for arg in &self.args {
            cmd.push(' ');
            if arg.contains(' ') {
                cmd.push_str(&format!("'{arg}'"));
            } else {
                cmd.push_str(arg);
            }
        }
        cmd
    }
}

impl fmt::Display for XcodebuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_shell_command())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> XcodebuildCommand {
        XcodebuildCommand {
            args: args.iter().map(|a| a.to_string()).collect(),
            warnings: Vec::new(),
            working_dir: None,
            env: Vec::new(),
        }
    }

    #[test]
    fn argv_starts_with_the_program() {
        let cmd = command(&["-scheme", "App", "build"]);
        assert_eq!(cmd.argv(), vec!["xcodebuild", "-scheme", "App", "build"]);
    }

    #[test]
    fn shell_rendering_quotes_spaced_arguments() {
        let cmd = command(&["-destination", "platform=macOS,arch=arm64", "-scheme", "My App"]);
        assert_eq!(
            cmd.to_shell_command(),
            "xcodebuild -destination platform=macOS,arch=arm64 -scheme 'My App'"
        );
    }

    #[test]
    fn env_and_working_dir_accumulate() {
        let cmd = command(&["build"])
            .with_working_dir("/tmp/proj".to_string())
            .with_env("RUST_LOG".to_string(), "debug".to_string());
        assert_eq!(cmd.working_dir.as_deref(), Some("/tmp/proj"));
        assert_eq!(cmd.env.len(), 1);
    }
}
