//! Descriptor engines: turn remote getent results into SLS trees.

pub mod group;
pub mod state;
pub mod user;

pub use group::{describe_groups, GroupOptions};
pub use user::{describe_users, UserOptions};

use std::path::PathBuf;

/// Totals for one describe run.
#[derive(Debug, Default)]
pub struct DescribeSummary {
    /// Minions that returned results
    pub minions: usize,
    /// Accounts or groups captured into state entries
    pub entries: usize,
    /// Password hashes captured into pillar data
    pub pillar_entries: usize,
    /// Files written (empty on dry runs)
    pub files: Vec<PathBuf>,
}

// ============================================================================
// Test support
// ============================================================================
