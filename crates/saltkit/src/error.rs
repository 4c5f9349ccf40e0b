//! Error types for Salt master operations.
//!
//! Errors are categorized so callers can distinguish transient transport
//! problems from targeting mistakes and give appropriate user feedback.
//! Each error type carries enough context to point at the failing minion
//! or remote function.

use thiserror::Error;

/// Categories of Salt errors.
///
/// Categories drive retryability decisions and user feedback; the raw
/// error keeps the full stderr for diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The master or a minion did not answer in time (transient)
    Timeout,
    /// The target expression matched no minions
    NoMinions,
    /// Authentication or permission failure talking to the master
    Auth,
    /// The remote execution function is not loadable on the target
    FunctionUnavailable,
    /// The salt CLI is not installed or not on PATH
    SaltNotFound,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Timeout => "Request timed out",
            Self::NoMinions => "No minions matched",
            Self::Auth => "Authentication failure",
            Self::FunctionUnavailable => "Remote function unavailable",
            Self::SaltNotFound => "Salt not installed",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Timeout => "Check that the master is running and the minions are connected",
            Self::NoMinions => "Verify the target expression and targeting mode",
            Self::Auth => "Run against the master with sufficient privileges (usually root)",
            Self::FunctionUnavailable => {
                "Verify the execution module is loadable on the targeted minions"
            }
            Self::SaltNotFound => "Install the Salt master package so the salt CLI is on PATH",
            Self::Other => "Check the error details for more information",
        }
    }
}

/// Errors that can occur during Salt master operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The master or a minion did not answer before the request timed out
    #[error("salt request timed out: {message}")]
    Timeout {
        /// Detailed error message from the timed-out request
        message: String,
    },

    /// The target expression matched no minions
    #[error("no minions matched target: {target}")]
    NoMinions {
        /// The target expression that matched nothing
        target: String,
    },

    /// Authentication or permission failure
    #[error("authentication failure: {message}")]
    Auth {
        /// Details from the master's rejection
        message: String,
    },

    /// The remote execution function is not available on the target
    #[error("remote function not available: {function}")]
    FunctionUnavailable {
        /// Name of the unavailable execution function
        function: String,
    },

    /// The salt CLI is not installed or not found in PATH
    #[error("salt CLI not found. Install the Salt master package")]
    SaltNotFound,

    /// A minion expected in the aggregated return is missing
    #[error("no return from minion: {minion}")]
    MissingReturn {
        /// Minion id absent from the aggregated result
        minion: String,
    },

    /// A minion's return did not match the expected shape
    #[error("unexpected result shape from {minion}: {source}")]
    Decode {
        /// Minion id whose return failed to deserialize
        minion: String,
        /// Underlying deserialization error
        source: serde_json::Error,
    },

    /// Command execution failed
    #[error("command failed: {message}")]
    CommandFailed {
        /// Description of what command failed
        message: String,
        /// Standard error output from the failed command
        stderr: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Timeout { .. } => ErrorCategory::Timeout,
            Error::NoMinions { .. } => ErrorCategory::NoMinions,
            Error::Auth { .. } => ErrorCategory::Auth,
            Error::FunctionUnavailable { .. } => ErrorCategory::FunctionUnavailable,
            Error::SaltNotFound => ErrorCategory::SaltNotFound,
            _ => ErrorCategory::Other,
        }
    }

    /// Whether this error is typically transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Create an error from salt command output.
    ///
    /// Analyzes stderr to categorize the error appropriately.
    pub fn from_salt_output(stderr: &str, target: &str, function: &str) -> Self {
        let stderr_lower = stderr.to_lowercase();

        // Timeouts and unreachable master
        if stderr_lower.contains("timed out")
            || stderr_lower.contains("master is not responding")
            || stderr_lower.contains("failed to connect")
        {
            return Error::Timeout {
                message: stderr.trim().to_string(),
            };
        }

        // Targeting misses
        if stderr_lower.contains("no minions matched")
            || stderr_lower.contains("no minions found")
        {
            return Error::NoMinions {
                target: target.to_string(),
            };
        }

        // Authentication / permissions
        if stderr_lower.contains("authentication")
            || stderr_lower.contains("permission denied")
            || stderr_lower.contains("authorization error")
        {
            return Error::Auth {
                message: stderr.trim().to_string(),
            };
        }

        // Unloadable execution module
        if stderr_lower.contains("is not available") {
            return Error::FunctionUnavailable {
                function: function.to_string(),
            };
        }

        Error::CommandFailed {
            message: format!("salt call failed for '{function}' on '{target}'"),
            stderr: stderr.trim().to_string(),
        }
    }
}

/// Result type for Salt master operations.
pub type Result<T> = std::result::Result<T, Error>;
