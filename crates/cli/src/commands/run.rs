use anyhow::{Context, Result};

use xcrunner_core::{RuntimeContext, SelectionStore};

use crate::cli::{CommonArgs, LaunchArgs};
use crate::commands::Session;
use crate::commands::launch::launch_on;
use crate::display::{print_invocation, print_resolution};

/// Build, install, and launch in one pass. The destination resolved for
/// the build is the one the product lands on.
pub fn run_command(args: &CommonArgs, launch: &LaunchArgs) -> Result<()> {
    let session = Session::open(args)?;
    let mut store = SelectionStore::load_or_default(&session.root);

    let resolved = session
        .resolver()
        .resolve(&mut store, &session.explicit(args), &session.catalog())?;
    store.flush()?;
    print_resolution(&session.root, &resolved);

    let mut request = session.request(args, &resolved);
    request.build = true;

    let command = session.assemble(request);
    print_invocation(&command);

    session.xcodebuild.run(&command)?;
    session.context.on_build_completed();

    let destination = resolved
        .destination
        .clone()
        .context("Resolution produced no destination")?;
    launch_on(&session, &destination, &resolved, launch, true)
}
