//! User descriptor: accounts, shadow aging, and home-directory checks.
//!
//! For every account a matched minion reports, the emitted `user.present`
//! state carries the identity and aging fields verbatim while the password
//! property defers to a pillar lookup at apply time; real hashes land in
//! pillar data so secrets stay out of the state tree.

use anyhow::Result;
use saltkit::{Client, ShadowEntry, Target, UserEntry};
use serde_yaml::Value;

use crate::config::MasterConfig;
use crate::describe::state::{PillarDocument, PropertyList, StateDocument};
use crate::describe::{group, DescribeSummary, GroupOptions};
use crate::statetree;

/// SLS name the captured user states are written under
pub const USERS_SLS: &str = "users";

/// Pillar section holding captured password hashes
const PILLAR_SECTION: &str = "users";

#[derive(Debug, Clone, Copy, Default)]
pub struct UserOptions {
    /// Capture groups first so group states exist before the users that
    /// reference them
    pub require_groups: bool,
    /// Render without writing any files
    pub dry_run: bool,
}

/// Capture user accounts from the targeted minions.
///
/// Writes one `users.sls` per minion under the state root and the
/// captured hashes under the pillar root, regenerating both manifests.
pub fn describe_users(
    client: &Client,
    config: &MasterConfig,
    target: &Target,
    options: UserOptions,
) -> Result<DescribeSummary> {
    if options.require_groups {
        group::describe_groups(
            client,
            config,
            target,
            GroupOptions {
                include_members: false,
                dry_run: options.dry_run,
            },
        )?;
    }

    let state_root = config.state_root()?;
    let pillar_root = config.pillar_root()?;
    let users = client.users(target)?;

    let mut summary = DescribeSummary::default();
    for (minion, accounts) in &users {
        let mut document = StateDocument::new();
        let mut pillar = PillarDocument::new(PILLAR_SECTION);

        for account in accounts {
            let shadow = client.shadow_info(minion, &account.name)?;
            let home_exists = client.directory_exists(minion, &account.home)?;

            document.add(
                format!("user-{}", account.name),
                "user.present",
                user_properties(account, &shadow, home_exists),
            );
            if shadow.has_hash() {
                pillar.insert(&account.name, &shadow.passwd);
                summary.pillar_entries += 1;
            }
            summary.entries += 1;
        }

        summary.minions += 1;
        log::info!(
            "captured {} accounts from {} ({} with hashes)",
            document.len(),
            minion,
            pillar.len()
        );
        if document.is_empty() {
            log::debug!("{} returned no accounts", minion);
        }
        if pillar.is_empty() {
            log::debug!("no hashes captured from {}, pillar data will be empty", minion);
        }

        if options.dry_run {
            continue;
        }
        summary
            .files
            .push(statetree::write_sls(&state_root, minion, USERS_SLS, &document.render()?)?);
        summary.files.push(statetree::write_pillar_sls(
            &pillar_root,
            minion,
            USERS_SLS,
            &pillar.render()?,
        )?);
    }

    Ok(summary)
}

/// Build the ordered `user.present` property list for one account.
fn user_properties(account: &UserEntry, shadow: &ShadowEntry, home_exists: bool) -> PropertyList {
    let mut properties = PropertyList::new();
    properties.push("name", account.name.as_str());
    properties.push("uid", account.uid);
    properties.push("gid", account.gid);
    properties.push("allow_uid_change", true);
    properties.push("allow_gid_change", true);
    properties.push("home", account.home.as_str());
    properties.push("shell", account.shell.as_str());
    properties.push(
        "groups",
        Value::Sequence(account.groups.iter().map(|g| Value::from(g.as_str())).collect()),
    );
    properties.push("password", pillar_lookup(&account.name));
    properties.push("date", shadow.lstchg);
    properties.push("mindays", shadow.min);
    properties.push("maxdays", shadow.max);
    properties.push("inactdays", shadow.inact);
    properties.push("expire", shadow.expire);
    properties.push("createhome", home_exists);
    properties.push_nonempty("fullname", &account.fullname);
    properties.push_nonempty("homephone", &account.homephone);
    properties.push_nonempty("other", &account.other);
    properties.push_nonempty("roomnumber", &account.roomnumber);
    properties.push_nonempty("workphone", &account.workphone);
    properties
}

/// The apply-time pillar lookup the password property defers to.
fn pillar_lookup(name: &str) -> String {
    format!(r#"{{{{ salt["pillar.get"]("{PILLAR_SECTION}:{name}","*") }}}}"#)
}

// ============================================================================
// Tests
// ============================================================================
