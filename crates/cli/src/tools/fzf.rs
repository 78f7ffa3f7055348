use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use xcrunner_core::error::{Error, Result};
use xcrunner_core::interfaces::Picker;

const FZF: &str = "fzf";
const INSTALL_HINT: &str = "install it with `brew install fzf`";

/// Interactive selection through the `fzf` binary.
///
/// Rows go in on stdin behind a hidden index prefix and the chosen row
/// comes back on stdout. The prefix is what gets mapped back, so two
/// rows rendering identically still resolve to their own positions.
pub struct FzfPicker;

impl Picker for FzfPicker {
    fn pick(&self, prompt: &str, items: &[String]) -> Result<usize> {
        let mut child = Command::new(FZF)
            .arg("--prompt")
            .arg(format!("{prompt} > "))
            .arg("--height=40%")
            .arg("--reverse")
            .arg("--delimiter=\t")
            .arg("--with-nth=2..")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => Error::ToolMissing {
                    tool: FZF.to_string(),
                    hint: INSTALL_HINT.to_string(),
                },
                _ => Error::Io(err),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            for (index, item) in items.iter().enumerate() {
                match writeln!(stdin, "{index}\t{item}") {
                    Ok(()) => {}
                    // the user can dismiss fzf before the rows finish
                    Err(err) if err.kind() == io::ErrorKind::BrokenPipe => break,
                    Err(err) => return Err(err.into()),
                }
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            debug!(status = %output.status, "picker exited abnormally");
            return Err(exit_error(output.status));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        selected_index(stdout.trim_end(), items.len()).ok_or(Error::Cancelled)
    }
}

/// fzf exits 130 when the user backs out and 1 when nothing matched;
/// other statuses are fzf itself failing.
fn exit_error(status: ExitStatus) -> Error {
    match status.code() {
        Some(1) | Some(130) | None => Error::Cancelled,
        Some(_) => Error::ExecutionFailed {
            tool: FZF.to_string(),
            status,
        },
    }
}

/// Map the line fzf echoed back to the position it was fed with.
fn selected_index(selection: &str, len: usize) -> Option<usize> {
    selection
        .split('\t')
        .next()
        .and_then(|field| field.parse().ok())
        .filter(|index| *index < len)
}
