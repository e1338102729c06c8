//! CLI interaction module
//!
//! Provides `CliAdapter`, the terminal implementation of the core
//! `InteractionAdapter` trait built on dialoguer and indicatif.

mod cli_adapter;
#[cfg(test)]
pub(crate) mod scripted;

pub use cli_adapter::CliAdapter;
