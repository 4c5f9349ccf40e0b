//! Minion targeting: a target expression plus the matching mode the
//! master should use to resolve it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the master interprets a target expression.
///
/// Mirrors the `tgt_type` accepted by Salt's remote-execution layer; the
/// actual matching happens on the master, this type only selects the mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Shell-style glob on minion ids (Salt's default)
    #[default]
    Glob,
    /// Perl-compatible regular expression on minion ids
    Pcre,
    /// Comma-separated list of exact minion ids
    List,
    /// Grain match
    Grain,
    /// Pillar match
    Pillar,
    /// Named nodegroup from the master config
    Nodegroup,
    /// Compound expression combining other matchers
    Compound,
    /// IP address or CIDR subnet
    Ipcidr,
}

impl TargetType {
    /// The `salt` CLI flag selecting this mode, if any.
    ///
    /// Glob is the CLI default and carries no flag.
    pub fn cli_flag(&self) -> Option<&'static str> {
        match self {
            TargetType::Glob => None,
            TargetType::Pcre => Some("--pcre"),
            TargetType::List => Some("--list"),
            TargetType::Grain => Some("--grain"),
            TargetType::Pillar => Some("--pillar"),
            TargetType::Nodegroup => Some("--nodegroup"),
            TargetType::Compound => Some("--compound"),
            TargetType::Ipcidr => Some("--ipcidr"),
        }
    }

    /// The `tgt_type` name as Salt spells it.
    pub fn name(&self) -> &'static str {
        match self {
            TargetType::Glob => "glob",
            TargetType::Pcre => "pcre",
            TargetType::List => "list",
            TargetType::Grain => "grain",
            TargetType::Pillar => "pillar",
            TargetType::Nodegroup => "nodegroup",
            TargetType::Compound => "compound",
            TargetType::Ipcidr => "ipcidr",
        }
    }

    /// Parse a `tgt_type` name.
    pub fn from_name(name: &str) -> Option<TargetType> {
        match name {
            "glob" => Some(TargetType::Glob),
            "pcre" => Some(TargetType::Pcre),
            "list" => Some(TargetType::List),
            "grain" => Some(TargetType::Grain),
            "pillar" => Some(TargetType::Pillar),
            "nodegroup" => Some(TargetType::Nodegroup),
            "compound" => Some(TargetType::Compound),
            "ipcidr" => Some(TargetType::Ipcidr),
            _ => None,
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown target type: {s}"))
    }
}

/// A target selector: expression plus targeting mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// The target expression (minion id glob, regex, grain match, ...)
    pub expr: String,
    /// How the master interprets the expression
    pub tgt_type: TargetType,
}

impl Target {
    /// Create a target with an explicit targeting mode.
    pub fn new(expr: impl Into<String>, tgt_type: TargetType) -> Self {
        Self {
            expr: expr.into(),
            tgt_type,
        }
    }

    /// Create a glob target (Salt's default mode).
    ///
    /// Per-minion follow-up queries address a single minion id this way.
    pub fn glob(expr: impl Into<String>) -> Self {
        Self::new(expr, TargetType::Glob)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tgt_type {
            TargetType::Glob => f.write_str(&self.expr),
            _ => write!(f, "{} ({})", self.expr, self.tgt_type),
        }
    }
}
