use anyhow::Result;
use tracing::debug;

use xcrunner_core::{RuntimeContext, SelectionStore};

use crate::cli::CommonArgs;
use crate::commands::Session;
use crate::display::{print_invocation, print_resolution};

/// Resolve every build parameter, then hand the assembled invocation to
/// xcodebuild with inherited stdio.
pub fn build_command(args: &CommonArgs, clean: bool) -> Result<()> {
    let session = Session::open(args)?;
    let mut store = SelectionStore::load_or_default(&session.root);

    let resolved = session
        .resolver()
        .resolve(&mut store, &session.explicit(args), &session.catalog())?;
    store.flush()?;
    print_resolution(&session.root, &resolved);

    let mut request = session.request(args, &resolved);
    request.clean = clean;
    request.build = true;

    let command = session.assemble(request);
    debug!(args = ?command.args, "assembled invocation");
    print_invocation(&command);

    session.xcodebuild.run(&command)?;
    session.context.on_build_completed();
    Ok(())
}
