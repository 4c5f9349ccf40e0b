use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use saltkit::TargetType;

#[derive(Parser)]
#[command(name = "saltcap")]
#[command(version)]
#[command(about = "Capture Salt minion users and groups into state and pillar trees", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the Salt master config file
    #[arg(long, global = true, env = "SALTCAP_MASTER_CONFIG", value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Capture user accounts from targeted minions into state and pillar files
    User(UserArgs),

    /// Capture groups from targeted minions into state files
    Group(GroupArgs),

    /// Show the captured state and pillar trees
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// User Command
// ============================================================================

#[derive(Parser)]
pub struct UserArgs {
    /// Target expression matching the minions to capture
    pub target: String,

    /// Capture groups first so group states exist before the users that
    /// reference them
    #[arg(short = 'g', long)]
    pub require_groups: bool,

    /// Targeting mode used by the master to match minions
    #[arg(short, long, value_enum, default_value = "glob")]
    pub tgt_type: TgtTypeArg,

    /// Render and report without writing any files
    #[arg(long)]
    pub dry_run: bool,
}

// ============================================================================
// Group Command
// ============================================================================

#[derive(Parser)]
pub struct GroupArgs {
    /// Target expression matching the minions to capture
    pub target: String,

    /// Include group member lists in the emitted states
    #[arg(short = 'm', long)]
    pub include_members: bool,

    /// Targeting mode used by the master to match minions
    #[arg(short, long, value_enum, default_value = "glob")]
    pub tgt_type: TgtTypeArg,

    /// Render and report without writing any files
    #[arg(long)]
    pub dry_run: bool,
}

// ============================================================================
// Target Types
// ============================================================================

/// Targeting modes accepted on the command line, mirroring Salt's tgt_type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TgtTypeArg {
    Glob,
    Pcre,
    List,
    Grain,
    Pillar,
    Nodegroup,
    Compound,
    Ipcidr,
}

impl From<TgtTypeArg> for TargetType {
    fn from(arg: TgtTypeArg) -> Self {
        match arg {
            TgtTypeArg::Glob => TargetType::Glob,
            TgtTypeArg::Pcre => TargetType::Pcre,
            TgtTypeArg::List => TargetType::List,
            TgtTypeArg::Grain => TargetType::Grain,
            TgtTypeArg::Pillar => TargetType::Pillar,
            TgtTypeArg::Nodegroup => TargetType::Nodegroup,
            TgtTypeArg::Compound => TargetType::Compound,
            TgtTypeArg::Ipcidr => TargetType::Ipcidr,
        }
    }
}
