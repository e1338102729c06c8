//! JSON output formatting

use serde::{Deserialize, Serialize};

use branchsweep_core::{Branch, SweepError};

const SCHEMA_VERSION: &str = "1";

/// JSON response envelope shared by every command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    /// Schema version for forward compatibility
    pub schema_version: String,
    /// Command that generated this response
    pub command: String,
    /// Status: "ok" or "error"
    pub status: String,
    /// Command-specific payload
    pub data: T,
    /// Warnings and errors
    pub issues: Vec<JsonIssue>,
}

impl<T> JsonResponse<T> {
    /// Create a successful response with issues
    pub fn ok_with_issues(command: &str, data: T, issues: Vec<JsonIssue>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            command: command.to_string(),
            status: "ok".to_string(),
            data,
            issues,
        }
    }

    /// Create an error response
    pub fn error(command: &str, data: T, issues: Vec<JsonIssue>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            command: command.to_string(),
            status: "error".to_string(),
            data,
            issues,
        }
    }
}

impl<T: Serialize> JsonResponse<T> {
    /// Print the response as pretty JSON on stdout
    pub fn print(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("error: failed to serialize response: {}", e),
        }
    }
}

/// Issue object structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonIssue {
    /// Error/warning code (e.g., "E004")
    pub code: String,
    /// Severity level
    pub severity: String,
    /// Human-readable message
    pub message: String,
}

impl From<&SweepError> for JsonIssue {
    fn from(err: &SweepError) -> Self {
        Self {
            code: err.code().to_string(),
            severity: "error".to_string(),
            message: err.to_string(),
        }
    }
}

impl JsonIssue {
    /// Build a warning from a classification warning
    ///
    /// Warnings carry the code of the error they were rendered from
    /// (`E004: ...`); anything else gets the generic `W001`.
    pub fn warning(message: &str) -> Self {
        let code = message
            .split_once(':')
            .map(|(code, _)| code)
            .filter(|code| {
                code.len() == 4
                    && code.starts_with('E')
                    && code[1..].chars().all(|c| c.is_ascii_digit())
            })
            .unwrap_or("W001");
        Self {
            code: code.to_string(),
            severity: "warning".to_string(),
            message: message.to_string(),
        }
    }
}

/// Data payload for the purge command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurgeData {
    /// Resolved default branch
    pub default_branch: String,
    /// Whether deletion was skipped
    pub dry_run: bool,
    /// Branches merged or squashed into the default branch
    pub candidates: Vec<Branch>,
    /// Branches actually deleted
    pub deleted: Vec<String>,
}

/// Data payload for the recent command
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentData {
    /// Checked-out branch, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_branch: Option<String>,
    /// Local branches, most recently committed first
    pub branches: Vec<Branch>,
    /// Branch switched to by the prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switched_to: Option<String>,
}
