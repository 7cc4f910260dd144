// SPDX-License-Identifier: GPL-3.0-or-later

//! Operator interaction seam.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("prompt cancelled")]
    Cancelled,

    #[error("terminal error: {0}")]
    Terminal(String),
}

/// Presents choices and free-text edits to the operator.
///
/// Any error ends the current edit session without writing.
pub trait Prompter {
    /// Return the index of the chosen item.
    fn select_one(&mut self, label: &str, items: &[String]) -> Result<usize, PromptError>;

    /// Return the replacement for `default_value`.
    fn edit_value(&mut self, label: &str, default_value: &str) -> Result<String, PromptError>;
}
