//! User interaction abstraction
//!
//! Commands prompt through [`InteractionAdapter`] so the pipeline can be
//! driven by a terminal implementation or a scripted one in tests.

use thiserror::Error;

use crate::error::SweepError;

/// Errors raised by an interaction adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InteractionError {
    /// Prompting requires a terminal
    #[error("interactive prompt requires a terminal (use --dry-run, --yes or --json)")]
    NonTty,

    /// User pressed Ctrl+C or Esc
    #[error("cancelled by user")]
    Cancelled,

    /// Bad prompt arguments
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Terminal IO failure
    #[error("terminal error: {0}")]
    Io(String),
}

pub type InteractionResult<T> = Result<T, InteractionError>;

impl From<InteractionError> for SweepError {
    fn from(err: InteractionError) -> Self {
        SweepError::Interaction(err.to_string())
    }
}

/// Handle for a running progress indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressHandle {
    id: u64,
    message: String,
}

impl ProgressHandle {
    pub fn new(id: u64, message: &str) -> Self {
        Self {
            id,
            message: message.to_string(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Prompts and status output used by the commands
pub trait InteractionAdapter {
    /// Pick one option, returning its index
    fn ask_select(&self, prompt: &str, options: &[&str]) -> InteractionResult<usize>;

    /// Pick any number of options, returning their indices
    fn ask_multi_select(&self, prompt: &str, options: &[&str]) -> InteractionResult<Vec<usize>>;

    fn start_progress(&self, message: &str) -> ProgressHandle;

    fn end_progress(&self, handle: ProgressHandle, success: bool);

    fn print_info(&self, message: &str);

    fn print_warning(&self, message: &str);

    fn print_error(&self, message: &str);

    fn print_success(&self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_handle() {
        let handle = ProgressHandle::new(7, "Scanning branches");
        assert_eq!(handle.id(), 7);
        assert_eq!(handle.message(), "Scanning branches");
    }

    #[test]
    fn test_interaction_error_converts() {
        let err: SweepError = InteractionError::NonTty.into();
        assert_eq!(err.code(), "E016");
        assert!(err.to_string().contains("--dry-run"));
    }
}
