//! Terminal output helpers shared by the subcommands.

use std::path::Path;

use xcrunner_core::XcodebuildCommand;
use xcrunner_core::resolve::ResolvedBuild;

pub fn print_resolution(root: &Path, resolved: &ResolvedBuild) {
    println!(
        "📋 Scheme: {} ({})",
        resolved.scheme, resolved.configuration
    );
    // Containers resolve to absolute paths; echo them relative to the root.
    let container = resolved
        .container
        .strip_prefix(root)
        .unwrap_or(&resolved.container);
    println!("📦 Container: {}", container.display());
    if let Some(destination) = &resolved.destination {
        println!("🎯 Destination: {}", destination.label());
    }
}

pub fn print_invocation(command: &XcodebuildCommand) {
    for warning in &command.warnings {
        println!("⚠️  {warning}");
    }
    println!("🔨 {}", command.to_shell_command());
}
