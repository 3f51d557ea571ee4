//! Git operations through the system `git` binary.

use std::path::Path;

use stepman_util::errors::StepmanError;
use stepman_util::process::CommandBuilder;

fn run(cmd: CommandBuilder) -> miette::Result<()> {
    cmd.exec_checked().map_err(|e| StepmanError::Git {
        message: e.to_string(),
    })?;
    Ok(())
}

/// Whether a usable `git` is on the `PATH`.
pub fn is_available() -> bool {
    CommandBuilder::new("git")
        .arg("--version")
        .exec()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Clone `uri` into `dest`. `depth` makes a shallow clone.
pub fn clone(uri: &str, dest: &Path, depth: Option<u32>) -> miette::Result<()> {
    tracing::info!("Cloning {uri} into {}", dest.display());
    let mut cmd = CommandBuilder::new("git").arg("clone").arg("--quiet");
    if let Some(depth) = depth {
        cmd = cmd.arg("--depth").arg(depth.to_string());
    }
    run(cmd.arg(uri).arg(dest.to_string_lossy()))
}

/// Fast-forward the checkout at `repo` from its upstream.
pub fn pull(repo: &Path) -> miette::Result<()> {
    tracing::info!("Pulling {}", repo.display());
    run(CommandBuilder::new("git")
        .args(["pull", "--quiet", "--ff-only"])
        .cwd(repo))
}

/// Clone `uri` into `dest` and check out `commit` (detached).
pub fn clone_at_commit(uri: &str, commit: &str, dest: &Path) -> miette::Result<()> {
    clone(uri, dest, None)?;
    run(CommandBuilder::new("git")
        .args(["-c", "advice.detachedHead=false", "checkout", "--quiet", commit])
        .cwd(dest))
}
