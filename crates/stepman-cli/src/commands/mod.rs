//! Command dispatch and handler modules.

mod activate;
mod delete;
mod export_spec;
mod libraries;
mod setup;
mod step_info;
mod step_list;
mod update;

use miette::Result;

use stepman_library::cache::LibraryCache;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let cache = LibraryCache::from_env();
    tracing::debug!("stepman home: {}", cache.root().display());

    match cli.command {
        Command::Setup { library, copy_spec } => {
            setup::exec(&cache, library.library.as_deref(), copy_spec.as_deref())
        }
        Command::Update { library } => update::exec(&cache, library.library.as_deref()),
        Command::Activate {
            library,
            id,
            version,
            path,
            copy_definition,
            update,
        } => {
            activate::exec(
                &cache,
                library.library.as_deref(),
                &id,
                &version,
                &path,
                copy_definition.as_deref(),
                update,
            )
            .await
        }
        Command::StepInfo {
            library,
            id,
            version,
            format,
        } => step_info::exec(&cache, library.library.as_deref(), &id, &version, &format),
        Command::StepList { library, format } => {
            step_list::exec(&cache, library.library.as_deref(), &format)
        }
        Command::Libraries { format } => libraries::exec(&cache, &format),
        Command::Delete { library, yes } => delete::exec(&cache, library.library.as_deref(), yes),
        Command::ExportSpec {
            library,
            output,
            latest,
        } => export_spec::exec(&cache, library.library.as_deref(), &output, latest),
    }
}
