use std::path::{Path, PathBuf};

use crate::destination::Platform;
use crate::error::Result;

/// Finds the workspace/project containers a run could target.
pub trait WorkspaceLocator {
    /// Paths of every `.xcworkspace` and `.xcodeproj` under `root`,
    /// workspaces first.
    fn locate(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// Asks the build toolchain about a container's schemes and settings.
pub trait ProjectInspector {
    fn schemes(&self, container: &Path) -> Result<Vec<String>>;

    /// Build configurations of the container. Implementations fall back to
    /// `Debug`/`Release` when the toolchain does not report any (workspace
    /// listings never do).
    fn configurations(&self, container: &Path) -> Result<Vec<String>>;

    /// The scheme's declared SUPPORTED_PLATFORMS, or `None` when the
    /// toolchain is silent. The compatibility filter fails open on that.
    fn supported_platforms(
        &self,
        container: &Path,
        scheme: &str,
    ) -> Result<Option<Vec<Platform>>>;
}
