use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use xcrunner_core::error::Result;
use xcrunner_core::interfaces::WorkspaceLocator;

/// Finds `.xcworkspace` and `.xcodeproj` bundles under a root.
///
/// Hidden and dependency directories are skipped, and so are containers
/// nested inside another container: every project bundle carries an
/// internal `project.xcworkspace` that must not show up as a choice.
pub struct ContainerLocator;

const CONTAINER_EXTENSIONS: [&str; 2] = ["xcworkspace", "xcodeproj"];

// Directories whose bundles belong to dependencies, not the user.
const SKIPPED_DIRS: [&str; 4] = ["Pods", "Carthage", "DerivedData", "node_modules"];

fn is_container(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CONTAINER_EXTENSIONS.contains(&ext))
}

fn skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
}

impl WorkspaceLocator for ContainerLocator {
    fn locate(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| !skipped(entry))
            .filter_map(|entry| entry.ok())
        {
            let path = entry.path();
            if !is_container(path) {
                continue;
            }
            if path.ancestors().skip(1).any(is_container) {
                continue;
            }
            found.push(path.to_path_buf());
        }

        // Workspaces first, then projects, each alphabetical.
        found.sort_by_key(|path| {
            (
                !path.extension().is_some_and(|ext| ext == "xcworkspace"),
                path.display().to_string(),
            )
        });
        debug!(count = found.len(), root = %root.display(), "located containers");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_containers_workspaces_first() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("Beta.xcodeproj"))?;
        fs::create_dir_all(dir.path().join("App.xcworkspace"))?;

        let found = ContainerLocator.locate(dir.path())?;
        let names: Vec<_> = found
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["App.xcworkspace", "Beta.xcodeproj"]);
        Ok(())
    }

    #[test]
    fn skips_the_workspace_inside_a_project_bundle() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("App.xcodeproj/project.xcworkspace"))?;

        let found = ContainerLocator.locate(dir.path())?;
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("App.xcodeproj"));
        Ok(())
    }

    #[test]
    fn skips_hidden_directories() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join(".build/Ghost.xcodeproj"))?;

        let found = ContainerLocator.locate(dir.path())?;
        assert!(found.is_empty());
        Ok(())
    }

    #[test]
    fn skips_dependency_directories() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("App.xcodeproj"))?;
        fs::create_dir_all(dir.path().join("Pods/Pods.xcodeproj"))?;
        fs::create_dir_all(dir.path().join("node_modules/dep/Dep.xcodeproj"))?;

        let found = ContainerLocator.locate(dir.path())?;
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("App.xcodeproj"));
        Ok(())
    }

    #[test]
    fn empty_root_yields_nothing() -> Result<()> {
        let dir = TempDir::new()?;
        assert!(ContainerLocator.locate(dir.path())?.is_empty());
        Ok(())
    }
}
