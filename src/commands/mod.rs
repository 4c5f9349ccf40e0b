//! Command implementations for the saltcap CLI.

pub mod group;
pub mod status;
pub mod user;

/// Create a saltkit client, with better error handling.
pub(crate) fn create_client() -> Result<saltkit::Client, String> {
    match saltkit::Client::new() {
        Ok(client) => Ok(client),
        Err(saltkit::Error::SaltNotFound) => Err(
            "The salt CLI is not installed.\n\n  saltcap runs on the Salt master and drives the salt command.\n  Install the master package, e.g.:\n    apt install salt-master\n\n  Or visit: https://docs.saltproject.io/salt/install-guide/"
                .to_string(),
        ),
        Err(e) => Err(format!("Failed to initialize Salt client: {}", e)),
    }
}
