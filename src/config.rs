//! Master configuration: where the state and pillar trees live.
//!
//! The Salt master's YAML config carries `file_roots` and `pillar_roots`,
//! each an environment-keyed mapping of ordered path lists. Only the first
//! `base` entry of each is used as the root the describe workflow writes
//! under. Every other key in the master config is ignored.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the Salt master config file
pub const DEFAULT_MASTER_CONFIG: &str = "/etc/salt/master";

/// Environment name whose first root is used
const BASE_ENV: &str = "base";

/// Salt's stock state root when the master config does not set one
const DEFAULT_STATE_ROOT: &str = "/srv/salt";

/// Salt's stock pillar root when the master config does not set one
const DEFAULT_PILLAR_ROOT: &str = "/srv/pillar";

/// The subset of the master config the describe workflow consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct MasterConfig {
    #[serde(default = "default_file_roots")]
    pub file_roots: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_pillar_roots")]
    pub pillar_roots: BTreeMap<String, Vec<String>>,
}

fn default_file_roots() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([(BASE_ENV.to_string(), vec![DEFAULT_STATE_ROOT.to_string()])])
}

fn default_pillar_roots() -> BTreeMap<String, Vec<String>> {
    BTreeMap::from([(BASE_ENV.to_string(), vec![DEFAULT_PILLAR_ROOT.to_string()])])
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            file_roots: default_file_roots(),
            pillar_roots: default_pillar_roots(),
        }
    }
}

impl MasterConfig {
    /// Load a master config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid master config: {}", path.display()))
    }

    /// Resolve the config to use for this invocation.
    ///
    /// An explicit path (flag or environment) must load; the default path
    /// falls back to Salt's stock roots when the file does not exist.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        if let Some(path) = path {
            let expanded = expand_path(path);
            return Self::load(&expanded);
        }

        let default = Path::new(DEFAULT_MASTER_CONFIG);
        if default.exists() {
            Self::load(default)
        } else {
            log::debug!(
                "{} not found, using default roots",
                DEFAULT_MASTER_CONFIG
            );
            Ok(Self::default())
        }
    }

    /// The state tree root: first `base` entry of `file_roots`.
    pub fn state_root(&self) -> Result<PathBuf> {
        first_root(&self.file_roots, "file_roots")
    }

    /// The pillar tree root: first `base` entry of `pillar_roots`.
    pub fn pillar_root(&self) -> Result<PathBuf> {
        first_root(&self.pillar_roots, "pillar_roots")
    }
}

fn first_root(roots: &BTreeMap<String, Vec<String>>, key: &str) -> Result<PathBuf> {
    let base = roots
        .get(BASE_ENV)
        .with_context(|| format!("master config has no '{BASE_ENV}' environment in {key}"))?;
    let first = base
        .first()
        .with_context(|| format!("master config has an empty '{BASE_ENV}' list in {key}"))?;
    Ok(expand_path(first))
}

/// Expand ~ and environment variables in a path string.
fn expand_path(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

// ============================================================================
// Tests
// ============================================================================
