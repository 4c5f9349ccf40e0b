//! Real Salt backend using the `salt` CLI.

use crate::backend::MasterBackend;
use crate::error::{Error, Result};
use crate::target::Target;
use crate::types::ReturnSet;
use std::process::Command;

/// Backend that executes real `salt` commands on the master.
pub struct SaltCliBackend {
    /// Path to the salt executable
    salt_path: String,
}

impl SaltCliBackend {
    /// Create a new SaltCliBackend.
    ///
    /// Returns an error if the salt CLI is not installed.
    pub fn new() -> Result<Self> {
        let salt_path = find_salt()?;
        Ok(Self { salt_path })
    }

    /// Run a salt command and return output.
    fn run_salt(&self, args: &[String]) -> Result<std::process::Output> {
        log::debug!("running {} {}", self.salt_path, args.join(" "));
        let output = Command::new(&self.salt_path)
            .args(args)
            .output()
            .map_err(|e| Error::CommandFailed {
                message: format!("failed to execute salt: {}", e),
                stderr: String::new(),
            })?;
        Ok(output)
    }
}

impl MasterBackend for SaltCliBackend {
    fn is_available(&self) -> bool {
        self.run_salt(&["--version".to_string()])
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn execute(&self, target: &Target, function: &str, args: &[&str]) -> Result<ReturnSet> {
        let cli_args = build_args(target, function, args);
        let output = self.run_salt(&cli_args)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::from_salt_output(&stderr, &target.expr, function));
        }

        parse_return(&output.stdout)
    }
}

/// Build the argument vector for one remote-execution call.
///
/// `--out=json --static` makes the master emit a single aggregated JSON
/// document once every matched minion has answered.
fn build_args(target: &Target, function: &str, args: &[&str]) -> Vec<String> {
    let mut cli_args = vec!["--out=json".to_string(), "--static".to_string()];
    if let Some(flag) = target.tgt_type.cli_flag() {
        cli_args.push(flag.to_string());
    }
    cli_args.push(target.expr.clone());
    cli_args.push(function.to_string());
    cli_args.extend(args.iter().map(|a| (*a).to_string()));
    cli_args
}

/// Parse the aggregated JSON document into a [`ReturnSet`].
fn parse_return(stdout: &[u8]) -> Result<ReturnSet> {
    let value: serde_json::Value = serde_json::from_slice(stdout)?;
    match value {
        serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(Error::Other(format!(
            "expected a minion-keyed JSON object from salt, got: {}",
            other
        ))),
    }
}

/// Find the salt executable path.
fn find_salt() -> Result<String> {
    // Check common locations
    let paths = [
        "/usr/bin/salt",
        "/usr/local/bin/salt",
        "/opt/saltstack/salt/salt", // onedir install
    ];

    for path in &paths {
        if std::path::Path::new(path).exists() {
            return Ok(path.to_string());
        }
    }

    // Try which
    let output = Command::new("which")
        .arg("salt")
        .output()
        .map_err(|_| Error::SaltNotFound)?;

    if output.status.success() {
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !path.is_empty() {
            return Ok(path);
        }
    }

    Err(Error::SaltNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TargetType;

    #[test]
    fn test_build_args_glob() {
        let target = Target::glob("minion");
        let args = build_args(&target, "user.getent", &[]);
        assert_eq!(args, vec!["--out=json", "--static", "minion", "user.getent"]);
    }

    #[test]
    fn test_build_args_with_tgt_type_flag() {
        let target = Target::new("os:Debian", TargetType::Grain);
        let args = build_args(&target, "group.getent", &[]);
        assert_eq!(
            args,
            vec!["--out=json", "--static", "--grain", "os:Debian", "group.getent"]
        );
    }

    #[test]
    fn test_build_args_with_function_args() {
        let target = Target::glob("minion");
        let args = build_args(&target, "shadow.info", &["testuser"]);
        assert_eq!(
            args,
            vec!["--out=json", "--static", "minion", "shadow.info", "testuser"]
        );
    }

    #[test]
    fn test_parse_return_object() {
        let raw = br#"{"minion": [{"name": "adm", "gid": 4}]}"#;
        let ret = parse_return(raw).unwrap();
        assert!(ret.contains_key("minion"));
    }

    #[test]
    fn test_parse_return_rejects_non_object() {
        assert!(parse_return(b"[1, 2, 3]").is_err());
    }
}
