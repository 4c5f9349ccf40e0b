//! Writers for the per-minion SLS and pillar trees.
//!
//! Every minion gets a subdirectory under the configured root holding its
//! captured `.sls` files plus an `init.sls` manifest including them as
//! dotted `<minion>.<name>` references. The manifest is re-derived from
//! the directory contents on every write, so unrelated `.sls` files other
//! tooling placed there are preserved and re-included. Writes take no
//! lock; concurrent runs against the same minion directory race with
//! last-writer-wins manifest regeneration.

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Manifest file name, excluded from its own include list
pub const INIT_SLS: &str = "init.sls";

const SLS_EXT: &str = "sls";

/// Write an SLS file under the state tree and regenerate the minion's
/// manifest.
pub fn write_sls(state_root: &Path, minion: &str, name: &str, content: &str) -> Result<PathBuf> {
    let path = write_tree_file(state_root, minion, name, content)?;
    write_init(state_root, minion)?;
    Ok(path)
}

/// Write a pillar SLS file and regenerate the minion's pillar manifest.
pub fn write_pillar_sls(
    pillar_root: &Path,
    minion: &str,
    name: &str,
    content: &str,
) -> Result<PathBuf> {
    let path = write_tree_file(pillar_root, minion, name, content)?;
    write_pillar_init(pillar_root, minion)?;
    Ok(path)
}

/// Recompute the minion's `init.sls` under the state tree.
pub fn write_init(state_root: &Path, minion: &str) -> Result<PathBuf> {
    regenerate_init(state_root, minion)
}

/// Recompute the minion's `init.sls` under the pillar tree.
pub fn write_pillar_init(pillar_root: &Path, minion: &str) -> Result<PathBuf> {
    regenerate_init(pillar_root, minion)
}

/// Ensure the minion directory exists and write `<name>.sls` into it.
fn write_tree_file(root: &Path, minion: &str, name: &str, content: &str) -> Result<PathBuf> {
    let minion_dir = root.join(minion);
    fs::create_dir_all(&minion_dir)
        .with_context(|| format!("Could not create {}", minion_dir.display()))?;

    let path = minion_dir.join(format!("{name}.{SLS_EXT}"));
    fs::write(&path, content).with_context(|| format!("Could not write {}", path.display()))?;
    log::debug!("wrote {}", path.display());
    Ok(path)
}

/// Re-derive the manifest from the `.sls` files currently on disk.
fn regenerate_init(root: &Path, minion: &str) -> Result<PathBuf> {
    let minion_dir = root.join(minion);
    fs::create_dir_all(&minion_dir)
        .with_context(|| format!("Could not create {}", minion_dir.display()))?;

    let mut includes = BTreeSet::new();
    let entries = fs::read_dir(&minion_dir)
        .with_context(|| format!("Could not list {}", minion_dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Could not list {}", minion_dir.display()))?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if file_name == INIT_SLS {
            continue;
        }
        if let Some(stem) = file_name.strip_suffix(&format!(".{SLS_EXT}")) {
            includes.insert(format!("{minion}.{stem}"));
        }
    }

    let path = minion_dir.join(INIT_SLS);
    fs::write(&path, render_manifest(&includes)?)
        .with_context(|| format!("Could not write {}", path.display()))?;
    log::debug!("regenerated {}", path.display());
    Ok(path)
}

/// Render the `include:` manifest for the given dotted references.
fn render_manifest(includes: &BTreeSet<String>) -> Result<String> {
    let mut manifest = Mapping::new();
    manifest.insert(
        Value::from("include"),
        Value::Sequence(includes.iter().map(|i| Value::from(i.as_str())).collect()),
    );
    serde_yaml::to_string(&manifest).context("Could not serialize manifest")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_write_sls_creates_minion_dir_and_manifest() {
        let root = TempDir::new().unwrap();
        let path = write_sls(root.path(), "minion", "users", "user-root:\n").unwrap();

        assert_eq!(path, root.path().join("minion/users.sls"));
        assert_eq!(read(&path), "user-root:\n");
        assert_eq!(
            read(&root.path().join("minion/init.sls")),
            "include:\n- minion.users\n"
        );
    }

    #[test]
    fn test_manifest_preserves_unrelated_sls_files() {
        let root = TempDir::new().unwrap();
        let minion_dir = root.path().join("minion");
        fs::create_dir_all(&minion_dir).unwrap();
        fs::write(minion_dir.join("firewall.sls"), "fw:\n").unwrap();

        write_sls(root.path(), "minion", "groups", "group-adm:\n").unwrap();

        assert_eq!(
            read(&minion_dir.join("init.sls")),
            "include:\n- minion.firewall\n- minion.groups\n"
        );
        assert_eq!(read(&minion_dir.join("firewall.sls")), "fw:\n");
    }

    #[test]
    fn test_manifest_excludes_itself_and_non_sls_files() {
        let root = TempDir::new().unwrap();
        let minion_dir = root.path().join("minion");
        fs::create_dir_all(&minion_dir).unwrap();
        fs::write(minion_dir.join("notes.txt"), "scratch").unwrap();
        fs::write(minion_dir.join("init.sls"), "stale\n").unwrap();

        write_sls(root.path(), "minion", "users", "user-root:\n").unwrap();

        assert_eq!(
            read(&minion_dir.join("init.sls")),
            "include:\n- minion.users\n"
        );
    }

    #[test]
    fn test_manifest_rederives_after_removal() {
        let root = TempDir::new().unwrap();
        write_sls(root.path(), "minion", "users", "u:\n").unwrap();
        write_sls(root.path(), "minion", "groups", "g:\n").unwrap();

        fs::remove_file(root.path().join("minion/users.sls")).unwrap();
        write_init(root.path(), "minion").unwrap();

        assert_eq!(
            read(&root.path().join("minion/init.sls")),
            "include:\n- minion.groups\n"
        );
    }

    #[test]
    fn test_manifest_order_is_stable() {
        let root = TempDir::new().unwrap();
        write_sls(root.path(), "minion", "users", "u:\n").unwrap();
        write_sls(root.path(), "minion", "groups", "g:\n").unwrap();
        let first = read(&root.path().join("minion/init.sls"));

        let root2 = TempDir::new().unwrap();
        write_sls(root2.path(), "minion", "groups", "g:\n").unwrap();
        write_sls(root2.path(), "minion", "users", "u:\n").unwrap();
        let second = read(&root2.path().join("minion/init.sls"));

        assert_eq!(first, second);
        assert_eq!(first, "include:\n- minion.groups\n- minion.users\n");
    }

    #[test]
    fn test_pillar_tree_mirrors_state_tree() {
        let root = TempDir::new().unwrap();
        let path = write_pillar_sls(root.path(), "minion", "users", "users: {}\n").unwrap();

        assert_eq!(path, root.path().join("minion/users.sls"));
        assert_eq!(
            read(&root.path().join("minion/init.sls")),
            "include:\n- minion.users\n"
        );
    }

    #[test]
    fn test_write_init_on_empty_dir() {
        let root = TempDir::new().unwrap();
        write_init(root.path(), "minion").unwrap();

        assert_eq!(read(&root.path().join("minion/init.sls")), "include: []\n");
    }
}
