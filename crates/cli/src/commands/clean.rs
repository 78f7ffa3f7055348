use anyhow::Result;

use xcrunner_core::SelectionStore;

use crate::cli::CommonArgs;
use crate::commands::Session;
use crate::display::{print_invocation, print_resolution};

/// `xcodebuild clean` for the resolved scheme. Destinations stay out of
/// it; cleaning is container-wide.
pub fn clean_command(args: &CommonArgs) -> Result<()> {
    let session = Session::open(args)?;
    let mut store = SelectionStore::load_or_default(&session.root);

    let resolved = session
        .resolver()
        .resolve_without_destination(&mut store, &session.explicit(args))?;
    store.flush()?;
    print_resolution(&session.root, &resolved);

    let mut request = session.request(args, &resolved);
    request.clean = true;

    let command = session.assemble(request);
    print_invocation(&command);

    session.xcodebuild.run(&command)?;
    println!("🧹 Cleaned {}", resolved.scheme);
    Ok(())
}
