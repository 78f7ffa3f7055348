use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use tracing::debug;

use xcrunner_core::destination::{Destination, SimState};
use xcrunner_core::resolve::ResolvedBuild;
use xcrunner_core::{RuntimeContext, SelectionStore};

use crate::cli::{CommonArgs, LaunchArgs};
use crate::commands::Session;
use crate::utils::{parse_launch_args, parse_launch_env};

/// Launch the app as last built, without rebuilding or reinstalling.
///
/// With `-d` the target is looked up directly in the catalog; the full
/// destination ladder only runs when nothing was pinned.
pub fn launch_command(args: &CommonArgs, launch: &LaunchArgs) -> Result<()> {
    let session = Session::open(args)?;
    let mut store = SelectionStore::load_or_default(&session.root);
    let explicit = session.explicit(args);

    let (resolved, destination) = match &explicit.destination {
        Some(id) => {
            let base = session
                .resolver()
                .resolve_without_destination(&mut store, &explicit)?;
            let target = session.context.lookup_target(id)?;
            (base, target)
        }
        None => {
            let resolved = session
                .resolver()
                .resolve(&mut store, &explicit, &session.catalog())?;
            let target = resolved
                .destination
                .clone()
                .context("Resolution produced no destination")?;
            (resolved, target)
        }
    };
    store.flush()?;

    launch_on(&session, &destination, &resolved, launch, false)
}

/// Install (optionally) and launch on the given destination. Shared by
/// `run` and `launch`; only `run` installs first.
pub(crate) fn launch_on(
    session: &Session,
    destination: &Destination,
    resolved: &ResolvedBuild,
    launch: &LaunchArgs,
    install: bool,
) -> Result<()> {
    let settings = session.xcodebuild.build_settings(
        &resolved.container,
        &resolved.scheme,
        Some(&resolved.configuration),
    )?;
    let bundle_id = settings
        .get("PRODUCT_BUNDLE_IDENTIFIER")
        .context("Build settings carry no PRODUCT_BUNDLE_IDENTIFIER")?;
    let launch_args = parse_launch_args(launch.args.as_deref())?;
    let launch_env = parse_launch_env(launch.env.as_deref())?;
    debug!(bundle_id, ?launch_args, "launching");

    match destination {
        Destination::Mac(_) => {
            let executable = product_path(&settings, "EXECUTABLE_PATH")?;
            println!("🚀 Launching {}", executable.display());
            let status = Command::new(&executable)
                .args(&launch_args)
                .envs(launch_env.iter().map(|(k, v)| (k, v)))
                .status()
                .with_context(|| format!("Failed to launch {}", executable.display()))?;
            std::process::exit(status.code().unwrap_or(1));
        }
        Destination::Simulator(sim) => {
            if sim.state == SimState::Shutdown {
                session.simctl.boot(&sim.udid)?;
            }
            session.simctl.open_ui();
            session.context.on_target_booted(destination);
            if install {
                let app = product_path(&settings, "WRAPPER_NAME")?;
                session.simctl.install(&sim.udid, &app)?;
            }
            session.simctl.terminate(&sim.udid, bundle_id);
            println!("🚀 Launching {bundle_id}");
            session
                .simctl
                .launch(&sim.udid, bundle_id, &launch_args, &launch_env)?;
        }
        Destination::Device(device) => {
            if install {
                let app = product_path(&settings, "WRAPPER_NAME")?;
                session.devicectl.install(&device.udid, &app)?;
            }
            session.context.on_target_booted(destination);
            println!("🚀 Launching {bundle_id}");
            session
                .devicectl
                .launch(&device.udid, bundle_id, &launch_args, &launch_env)?;
        }
    }
    Ok(())
}

/// Join a product-relative setting onto `TARGET_BUILD_DIR`.
fn product_path(settings: &BTreeMap<String, String>, key: &str) -> Result<PathBuf> {
    let dir = settings
        .get("TARGET_BUILD_DIR")
        .context("Build settings carry no TARGET_BUILD_DIR")?;
    let leaf = settings
        .get(key)
        .with_context(|| format!("Build settings carry no {key}"))?;
    Ok(Path::new(dir).join(leaf))
}
