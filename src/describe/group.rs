//! Group descriptor.

use anyhow::Result;
use saltkit::{Client, GroupEntry, Target};
use serde_yaml::Value;

use crate::config::MasterConfig;
use crate::describe::state::{PropertyList, StateDocument};
use crate::describe::DescribeSummary;
use crate::statetree;

/// SLS name the captured group states are written under
pub const GROUPS_SLS: &str = "groups";

#[derive(Debug, Clone, Copy, Default)]
pub struct GroupOptions {
    /// Include group member lists in the emitted states
    pub include_members: bool,
    /// Render without writing any files
    pub dry_run: bool,
}

/// Capture groups from the targeted minions.
///
/// Writes one `groups.sls` per minion under the state root and
/// regenerates the minion's manifest.
pub fn describe_groups(
    client: &Client,
    config: &MasterConfig,
    target: &Target,
    options: GroupOptions,
) -> Result<DescribeSummary> {
    let state_root = config.state_root()?;
    let groups = client.groups(target)?;

    let mut summary = DescribeSummary::default();
    for (minion, entries) in &groups {
        let mut document = StateDocument::new();
        for group in entries {
            document.add(
                format!("group-{}", group.name),
                "group.present",
                group_properties(group, options.include_members),
            );
            summary.entries += 1;
        }

        summary.minions += 1;
        log::info!("captured {} groups from {}", document.len(), minion);
        if document.is_empty() {
            log::debug!("{} returned no groups", minion);
        }

        if options.dry_run {
            continue;
        }
        summary
            .files
            .push(statetree::write_sls(&state_root, minion, GROUPS_SLS, &document.render()?)?);
    }

    Ok(summary)
}

/// Build the `group.present` property list for one group.
fn group_properties(group: &GroupEntry, include_members: bool) -> PropertyList {
    let mut properties = PropertyList::new();
    properties.push("name", group.name.as_str());
    properties.push("gid", group.gid);
    if include_members {
        properties.push(
            "members",
            Value::Sequence(group.members.iter().map(|m| Value::from(m.as_str())).collect()),
        );
    }
    properties
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::testing::{ret, StubBackend};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn test_config(tmp: &TempDir) -> MasterConfig {
        MasterConfig {
            file_roots: [(
                "base".to_string(),
                vec![tmp.path().join("salt").display().to_string()],
            )]
            .into(),
            pillar_roots: [(
                "base".to_string(),
                vec![tmp.path().join("pillar").display().to_string()],
            )]
            .into(),
        }
    }

    #[test]
    fn test_group_capture_without_members() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);

        let mut stub = StubBackend::new();
        stub.push(
            "group.getent",
            ret("minion", json!([{"gid": 4, "members": ["a"], "name": "adm", "passwd": "x"}])),
        );

        let summary = describe_groups(
            &Client::with_backend(Box::new(stub)),
            &config,
            &Target::glob("minion"),
            GroupOptions::default(),
        )
        .unwrap();

        assert_eq!(summary.minions, 1);
        assert_eq!(summary.entries, 1);
        assert_eq!(
            fs::read_to_string(tmp.path().join("salt/minion/groups.sls")).unwrap(),
            "group-adm:\n  group.present:\n  - name: adm\n  - gid: 4\n"
        );
        assert_eq!(
            fs::read_to_string(tmp.path().join("salt/minion/init.sls")).unwrap(),
            "include:\n- minion.groups\n"
        );
    }

    #[test]
    fn test_group_capture_with_members() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);

        let mut stub = StubBackend::new();
        stub.push(
            "group.getent",
            ret(
                "minion",
                json!([
                    {"gid": 4, "members": ["syslog", "whytewolf"], "name": "adm", "passwd": "x"},
                    {"gid": 0, "members": [], "name": "root", "passwd": "x"}
                ]),
            ),
        );

        describe_groups(
            &Client::with_backend(Box::new(stub)),
            &config,
            &Target::glob("minion"),
            GroupOptions {
                include_members: true,
                dry_run: false,
            },
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("salt/minion/groups.sls")).unwrap(),
            "group-adm:\n  group.present:\n  - name: adm\n  - gid: 4\n  - members:\n    - syslog\n    - whytewolf\n\
             group-root:\n  group.present:\n  - name: root\n  - gid: 0\n  - members: []\n"
        );
    }

    #[test]
    fn test_group_entries_keep_returned_order() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);

        let mut stub = StubBackend::new();
        stub.push(
            "group.getent",
            ret(
                "minion",
                json!([
                    {"gid": 27, "members": [], "name": "sudo", "passwd": "x"},
                    {"gid": 4, "members": [], "name": "adm", "passwd": "x"}
                ]),
            ),
        );

        describe_groups(
            &Client::with_backend(Box::new(stub)),
            &config,
            &Target::glob("minion"),
            GroupOptions::default(),
        )
        .unwrap();

        let state = fs::read_to_string(tmp.path().join("salt/minion/groups.sls")).unwrap();
        assert!(state.find("group-sudo").unwrap() < state.find("group-adm").unwrap());
    }

    #[test]
    fn test_group_dry_run_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(&tmp);

        let mut stub = StubBackend::new();
        stub.push(
            "group.getent",
            ret("minion", json!([{"gid": 4, "members": [], "name": "adm", "passwd": "x"}])),
        );

        let summary = describe_groups(
            &Client::with_backend(Box::new(stub)),
            &config,
            &Target::glob("minion"),
            GroupOptions {
                include_members: false,
                dry_run: true,
            },
        )
        .unwrap();

        assert_eq!(summary.entries, 1);
        assert!(summary.files.is_empty());
        assert!(!tmp.path().join("salt").exists());
    }
}
