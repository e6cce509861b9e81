//! Publishing through git.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::Command;

/// Stage everything under `root`, commit with `message` and push.
///
/// Stops at the first failing step.
pub fn commit_and_push(root: &Path, message: &str) -> Result<()> {
    tracing::info!("Pushing to remote...");
    run_git(root, &["add", "."])?;
    run_git(root, &["commit", "-m", message])?;
    run_git(root, &["push"])?;
    tracing::info!("Pushed: {}", message);
    Ok(())
}

pub fn commit_message(title: &str, slug: &str) -> String {
    format!("New post: {} ({})", title, slug)
}

fn run_git(root: &Path, args: &[&str]) -> Result<()> {
    let output = Command::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "git {} failed ({}): {}",
            args[0],
            output.status,
            stderr.trim()
        ));
    }
    Ok(())
}
