//! # Error Handling
//!
//! This module defines the centralized error type for `treeconf`. It uses the
//! `thiserror` library to build one `Error` enum that covers every fatal
//! condition of a resolution run.
//!
//! ## What is *not* an error
//!
//! An unsatisfiable requirement is a normal outcome of resolution: it shows up
//! as a version missing from a repository's forest, never as an `Error`.
//! Likewise, malformed requirement lines and tags that are not semantic
//! versions are skipped where they are read.
//!
//! ## Key Components
//!
//! - **`Error`**: every failure mode, with enough context (repository name,
//!   reference, git command, stderr) to explain what went wrong.
//! - **`Result<T>`**: alias for `std::result::Result<T, Error>`.

use thiserror::Error;

/// Main error type for treeconf operations
#[derive(Error, Debug)]
pub enum Error {
    /// A git command exited unsuccessfully or could not be spawned.
    #[error("Git command failed for {repo}: {command} - {stderr}")]
    GitCommand {
        command: String,
        repo: String,
        stderr: String,
    },

    /// The backend does not know a repository with this name.
    #[error("Unknown repository: {repo}")]
    UnknownRepository { repo: String },

    /// A checkout was requested for a reference the repository does not have.
    #[error("Unknown reference {reference} in repository {repo}")]
    UnknownReference { repo: String, reference: String },

    /// The requirement graph loops back onto a repository that is still being
    /// resolved.
    #[error("Cycle detected in repository requirements: {cycle}")]
    CycleDetected { cycle: String },

    /// Nothing achievable was found for the requested root repository.
    #[error("No suitable configuration found for {repo}")]
    NoSuitableConfiguration { repo: String },

    /// One resolved tree pins the same repository at two different versions.
    #[error("Diamond conflict for {repo}: required at both {first} and {second}")]
    DiamondConflict {
        repo: String,
        first: String,
        second: String,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_git_command() {
        let error = Error::GitCommand {
            command: "checkout 1.0.0".to_string(),
            repo: "libfoo".to_string(),
            stderr: "pathspec did not match".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Git command failed"));
        assert!(display.contains("libfoo"));
        assert!(display.contains("checkout 1.0.0"));
        assert!(display.contains("pathspec did not match"));
    }

    #[test]
    fn test_error_display_cycle_detected() {
        let error = Error::CycleDetected {
            cycle: "repo-a -> repo-b -> repo-a".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Cycle detected"));
        assert!(display.contains("repo-a -> repo-b -> repo-a"));
    }

    #[test]
    fn test_error_display_no_suitable_configuration() {
        let error = Error::NoSuitableConfiguration {
            repo: "app".to_string(),
        };
        assert_eq!(error.to_string(), "No suitable configuration found for app");
    }

    #[test]
    fn test_error_display_diamond_conflict() {
        let error = Error::DiamondConflict {
            repo: "common".to_string(),
            first: "1.2.0".to_string(),
            second: "1.4.0".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Diamond conflict for common"));
        assert!(display.contains("1.2.0"));
        assert!(display.contains("1.4.0"));
    }

    #[test]
    fn test_error_display_unknown_reference() {
        let error = Error::UnknownReference {
            repo: "lib".to_string(),
            reference: "9.9.9".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("9.9.9"));
        assert!(display.contains("lib"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();
        let display = format!("{}", error);
        assert!(display.contains("I/O error"));
        assert!(display.contains("File not found"));
    }
}
