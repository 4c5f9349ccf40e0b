//! Backend abstraction for Salt master operations.
//!
//! The [`MasterBackend`] trait defines the remote-execution interface,
//! allowing for different implementations (real CLI, stub for testing).

pub mod cli;

use crate::error::Result;
use crate::target::Target;
use crate::types::ReturnSet;

/// Backend trait for Salt master operations.
///
/// This trait abstracts how remote-execution calls reach the master,
/// enabling:
/// - Real dispatch via the `salt` CLI
/// - Stub implementations for testing
/// - Potential future native transport integrations
pub trait MasterBackend: Send + Sync {
    /// Check if the master interface is available.
    fn is_available(&self) -> bool;

    /// Run a remote-execution function against a target.
    ///
    /// Blocks until the master returns the aggregated result: a mapping
    /// from each answering minion's id to that minion's raw JSON result.
    fn execute(&self, target: &Target, function: &str, args: &[&str]) -> Result<ReturnSet>;
}

/// Get the default backend (real salt CLI).
pub fn default_backend() -> Result<cli::SaltCliBackend> {
    cli::SaltCliBackend::new()
}
