//! # saltkit
//!
//! Rust client library for a Salt master's remote-execution interface.
//!
//! This crate provides:
//! - A [`MasterBackend`] trait abstracting remote dispatch, with a real
//!   implementation that drives the `salt` CLI in JSON output mode
//! - Minion targeting types matching Salt's `tgt_type` modes
//! - Typed results for the account/group introspection queries
//!   (`user.getent`, `shadow.info`, `group.getent`, `file.directory_exists`)
//!
//! Dispatch, transport, and minion matching stay owned by the master;
//! this crate only issues calls and shapes the aggregated results.
//!
//! ## Example
//!
//! ```no_run
//! use saltkit::{Client, Target};
//!
//! // Create a client
//! let client = Client::new().expect("salt CLI not available");
//!
//! // Query every account on the matched minions
//! let users = client.users(&Target::glob("web-*")).expect("query failed");
//! for (minion, accounts) in &users {
//!     println!("{}: {} accounts", minion, accounts.len());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod target;
pub mod types;

pub use error::{Error, ErrorCategory, Result};
pub use target::{Target, TargetType};
pub use types::{GroupEntry, ReturnSet, ShadowEntry, UserEntry, UNSET_PASSWORD};

use backend::{cli::SaltCliBackend, MasterBackend};
use std::collections::BTreeMap;

/// High-level client for Salt master operations.
///
/// The client wraps a backend and provides typed helpers for the remote
/// queries the describe workflow issues.
pub struct Client {
    backend: Box<dyn MasterBackend>,
}

impl Client {
    /// Create a new Client with the default backend.
    ///
    /// Returns an error if the salt CLI is not installed.
    pub fn new() -> Result<Self> {
        let backend = SaltCliBackend::new()?;
        Ok(Self {
            backend: Box::new(backend),
        })
    }

    /// Create a client with a custom backend (useful for testing).
    pub fn with_backend(backend: Box<dyn MasterBackend>) -> Self {
        Self { backend }
    }

    /// Check if the master interface is available.
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Run a raw remote-execution function against a target.
    pub fn execute(&self, target: &Target, function: &str, args: &[&str]) -> Result<ReturnSet> {
        self.backend.execute(target, function, args)
    }

    // =========================================================================
    // Typed queries
    // =========================================================================

    /// Fetch every account from the matched minions via `user.getent`.
    pub fn users(&self, target: &Target) -> Result<BTreeMap<String, Vec<UserEntry>>> {
        let ret = self.backend.execute(target, "user.getent", &[])?;
        decode_per_minion(ret)
    }

    /// Fetch every group from the matched minions via `group.getent`.
    pub fn groups(&self, target: &Target) -> Result<BTreeMap<String, Vec<GroupEntry>>> {
        let ret = self.backend.execute(target, "group.getent", &[])?;
        decode_per_minion(ret)
    }

    /// Fetch one account's `shadow.info` record from a single minion.
    pub fn shadow_info(&self, minion: &str, name: &str) -> Result<ShadowEntry> {
        let ret = self
            .backend
            .execute(&Target::glob(minion), "shadow.info", &[name])?;
        decode_single(ret, minion)
    }

    /// Check whether a directory exists on a single minion.
    pub fn directory_exists(&self, minion: &str, path: &str) -> Result<bool> {
        let ret = self
            .backend
            .execute(&Target::glob(minion), "file.directory_exists", &[path])?;
        decode_single(ret, minion)
    }
}

/// Decode every minion's return in an aggregated result.
fn decode_per_minion<T>(ret: ReturnSet) -> Result<BTreeMap<String, Vec<T>>>
where
    T: serde::de::DeserializeOwned,
{
    let mut decoded = BTreeMap::new();
    for (minion, value) in ret {
        let entries = serde_json::from_value(value).map_err(|source| Error::Decode {
            minion: minion.clone(),
            source,
        })?;
        decoded.insert(minion, entries);
    }
    Ok(decoded)
}

/// Pull one minion's entry out of an aggregated result and decode it.
fn decode_single<T>(mut ret: ReturnSet, minion: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let value = ret.remove(minion).ok_or_else(|| Error::MissingReturn {
        minion: minion.to_string(),
    })?;
    serde_json::from_value(value).map_err(|source| Error::Decode {
        minion: minion.to_string(),
        source,
    })
}
