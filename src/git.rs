//! Thin wrappers around the system `git` command.
//!
//! Every function takes the working-tree directory to run in plus the
//! repository name used in error messages. Running the system binary means
//! SSH keys, credential helpers and `~/.gitconfig` all apply to `push`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output};

use log::{trace, warn};

use crate::error::{Error, Result};

fn git(dir: &Path, repo: &str, args: &[&str]) -> Result<Output> {
    trace!("git -C {} {}", dir.display(), args.join(" "));

    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: args.join(" "),
            repo: repo.to_string(),
            stderr: e.to_string(),
        })
}

/// Run git and fail unless it exits successfully.
fn git_checked(dir: &Path, repo: &str, args: &[&str]) -> Result<String> {
    let output = git(dir, repo, args)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::GitCommand {
            command: args.join(" "),
            repo: repo.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// List all local tags of the repository.
pub fn list_tags(dir: &Path, repo: &str) -> Result<Vec<String>> {
    let stdout = git_checked(dir, repo, &["tag", "--list"])?;

    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// The reference HEAD points at: the branch name when on a branch, otherwise
/// the full commit id.
pub fn current_reference(dir: &Path, repo: &str) -> Result<String> {
    let output = git(dir, repo, &["symbolic-ref", "--quiet", "--short", "HEAD"])?;
    if output.status.success() {
        let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !branch.is_empty() {
            return Ok(branch);
        }
    }

    let commit = git_checked(dir, repo, &["rev-parse", "HEAD"])?;
    Ok(commit.trim().to_string())
}

/// Switch the working tree to `reference`.
pub fn checkout(dir: &Path, repo: &str, reference: &str) -> Result<()> {
    git_checked(dir, repo, &["checkout", "--quiet", reference])?;
    Ok(())
}

/// Whether the working tree differs from HEAD.
///
/// Uses `git diff-index --quiet HEAD`, which exits with 1 when there are
/// differences. Changed submodule commits count as differences.
pub fn is_dirty(dir: &Path, repo: &str) -> Result<bool> {
    let args = ["diff-index", "--quiet", "HEAD", "--"];
    let output = git(dir, repo, &args)?;

    match output.status.code() {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(Error::GitCommand {
            command: args.join(" "),
            repo: repo.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
    }
}

/// Commit every tracked change with `message`.
pub fn commit_all(dir: &Path, repo: &str, message: &str) -> Result<()> {
    git_checked(dir, repo, &["commit", "--all", "--quiet", "--message", message])?;
    Ok(())
}

/// Push the current branch to its upstream.
pub fn push(dir: &Path, repo: &str) -> Result<()> {
    git_checked(dir, repo, &["push", "--quiet"])?;
    Ok(())
}

/// Read a file from the working tree, `None` if it does not exist.
///
/// Lines that are not valid UTF-8 are dropped with a warning.
pub fn read_worktree_file(dir: &Path, path: &str) -> Result<Option<String>> {
    match fs::read(dir.join(path)) {
        Ok(bytes) => Ok(Some(utf8_lines(&bytes, path))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn utf8_lines(bytes: &[u8], path: &str) -> String {
    if let Ok(content) = std::str::from_utf8(bytes) {
        return content.to_string();
    }

    let mut content = String::with_capacity(bytes.len());
    for (index, line) in bytes.split_inclusive(|b| *b == b'\n').enumerate() {
        match std::str::from_utf8(line) {
            Ok(line) => content.push_str(line),
            Err(_) => warn!("{}:{}: skipping line that is not valid UTF-8", path, index + 1),
        }
    }
    content
}
