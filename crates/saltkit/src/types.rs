//! Typed results for the remote queries this crate issues.
//!
//! The master aggregates remote-execution output as a JSON object keyed by
//! minion id; [`ReturnSet`] holds that raw form, and the entry structs give
//! `user.getent` / `shadow.info` / `group.getent` results their shape.
//! Unknown fields are ignored so newer minion modules stay compatible.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Aggregated remote-execution output: minion id to raw JSON result.
pub type ReturnSet = BTreeMap<String, serde_json::Value>;

/// The placeholder hash Salt reports for accounts with no password set.
pub const UNSET_PASSWORD: &str = "*";

/// One account from a minion's `user.getent` output.
///
/// GECOS fields come back as empty strings when unset on the minion, and
/// may be missing entirely from older execution modules.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEntry {
    /// Login name
    pub name: String,
    /// Numeric user id
    pub uid: u32,
    /// Primary group id
    pub gid: u32,
    /// Secondary group memberships
    #[serde(default)]
    pub groups: Vec<String>,
    /// Home directory path
    pub home: String,
    /// Login shell
    pub shell: String,
    /// GECOS full name
    #[serde(default)]
    pub fullname: String,
    /// GECOS room number
    #[serde(default)]
    pub roomnumber: String,
    /// GECOS work phone
    #[serde(default)]
    pub workphone: String,
    /// GECOS home phone
    #[serde(default)]
    pub homephone: String,
    /// GECOS other field
    #[serde(default)]
    pub other: String,
}

/// One record from a minion's `shadow.info` output.
///
/// Day counts use shadow(5) conventions: days since the epoch for
/// `lstchg`, `-1` for unset limits.
#[derive(Debug, Clone, Deserialize)]
pub struct ShadowEntry {
    /// Login name the record belongs to
    #[serde(default)]
    pub name: String,
    /// Password hash, or [`UNSET_PASSWORD`] when no password is set
    pub passwd: String,
    /// Day of last password change
    pub lstchg: i64,
    /// Minimum days between changes
    pub min: i64,
    /// Maximum password age in days
    pub max: i64,
    /// Days of warning before expiry
    #[serde(default)]
    pub warn: i64,
    /// Days of inactivity allowed after expiry
    pub inact: i64,
    /// Account expiration day
    pub expire: i64,
}

impl ShadowEntry {
    /// Whether the record carries a real hash rather than the placeholder.
    pub fn has_hash(&self) -> bool {
        self.passwd != UNSET_PASSWORD
    }
}

/// One group from a minion's `group.getent` output.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupEntry {
    /// Group name
    pub name: String,
    /// Numeric group id
    pub gid: u32,
    /// Member login names
    #[serde(default)]
    pub members: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_entry_from_getent_json() {
        let raw = serde_json::json!({
            "name": "testuser",
            "uid": 1000,
            "gid": 1000,
            "groups": ["adm"],
            "home": "/home/testuser",
            "passwd": "x",
            "shell": "/usr/bin/zsh",
            "fullname": "",
            "homephone": "",
            "other": "",
            "roomnumber": "",
            "workphone": ""
        });

        let user: UserEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(user.name, "testuser");
        assert_eq!(user.uid, 1000);
        assert_eq!(user.groups, vec!["adm"]);
        assert!(user.fullname.is_empty());
    }

    #[test]
    fn test_user_entry_missing_gecos_defaults() {
        // Older modules omit the "other" field entirely
        let raw = serde_json::json!({
            "name": "svc",
            "uid": 999,
            "gid": 999,
            "home": "/var/lib/svc",
            "shell": "/usr/sbin/nologin"
        });

        let user: UserEntry = serde_json::from_value(raw).unwrap();
        assert!(user.groups.is_empty());
        assert!(user.other.is_empty());
    }

    #[test]
    fn test_shadow_entry_from_json() {
        let raw = serde_json::json!({
            "expire": -1,
            "inact": -1,
            "lstchg": 19103,
            "max": 99999,
            "min": 0,
            "name": "testuser",
            "passwd": "$5$k69zJBp1LxA3q8az$XKEp1knAex0j.xoi/sdU4XllHpZ0JzYYRfASKGl6qZA",
            "warn": 7
        });

        let shadow: ShadowEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(shadow.lstchg, 19103);
        assert_eq!(shadow.max, 99999);
        assert!(shadow.has_hash());
    }

    #[test]
    fn test_shadow_placeholder_hash() {
        let raw = serde_json::json!({
            "expire": -1,
            "inact": -1,
            "lstchg": 18000,
            "max": 99999,
            "min": 0,
            "name": "daemon",
            "passwd": "*",
            "warn": 7
        });

        let shadow: ShadowEntry = serde_json::from_value(raw).unwrap();
        assert!(!shadow.has_hash());
    }

    #[test]
    fn test_group_entry_from_json() {
        let raw = serde_json::json!({
            "gid": 4,
            "members": ["syslog", "whytewolf"],
            "name": "adm",
            "passwd": "x"
        });

        let group: GroupEntry = serde_json::from_value(raw).unwrap();
        assert_eq!(group.name, "adm");
        assert_eq!(group.gid, 4);
        assert_eq!(group.members.len(), 2);
    }
}
