//! Scripted adapter for command tests

use std::cell::RefCell;
use std::collections::VecDeque;

use branchsweep_core::interaction::{
    InteractionAdapter, InteractionError, InteractionResult, ProgressHandle,
};

/// Answers prompts from a queue and records everything printed
#[derive(Default)]
pub struct ScriptedAdapter {
    selections: RefCell<VecDeque<InteractionResult<Vec<usize>>>>,
    pub prompts: RefCell<Vec<(String, Vec<String>)>>,
    pub output: RefCell<Vec<String>>,
}

impl ScriptedAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer for the next prompt
    pub fn answer(self, indices: &[usize]) -> Self {
        self.selections.borrow_mut().push_back(Ok(indices.to_vec()));
        self
    }

    /// Queue a failure for the next prompt
    pub fn answer_err(self, err: InteractionError) -> Self {
        self.selections.borrow_mut().push_back(Err(err));
        self
    }

    pub fn printed(&self, needle: &str) -> bool {
        self.output.borrow().iter().any(|line| line.contains(needle))
    }

    fn next(&self, prompt: &str, options: &[&str]) -> InteractionResult<Vec<usize>> {
        self.prompts.borrow_mut().push((
            prompt.to_string(),
            options.iter().map(|o| o.to_string()).collect(),
        ));
        self.selections
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(InteractionError::NonTty))
    }
}

impl InteractionAdapter for ScriptedAdapter {
    fn ask_select(&self, prompt: &str, options: &[&str]) -> InteractionResult<usize> {
        self.next(prompt, options)?
            .first()
            .copied()
            .ok_or_else(|| InteractionError::InvalidInput("no selection queued".to_string()))
    }

    fn ask_multi_select(&self, prompt: &str, options: &[&str]) -> InteractionResult<Vec<usize>> {
        self.next(prompt, options)
    }

    fn start_progress(&self, message: &str) -> ProgressHandle {
        ProgressHandle::new(0, message)
    }

    fn end_progress(&self, _handle: ProgressHandle, _success: bool) {}

    fn print_info(&self, message: &str) {
        self.output.borrow_mut().push(message.to_string());
    }

    fn print_warning(&self, message: &str) {
        self.output.borrow_mut().push(format!("warning: {}", message));
    }

    fn print_error(&self, message: &str) {
        self.output.borrow_mut().push(format!("error: {}", message));
    }

    fn print_success(&self, message: &str) {
        self.output.borrow_mut().push(message.to_string());
    }
}
