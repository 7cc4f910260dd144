// SPDX-License-Identifier: GPL-3.0-or-later

//! Terminal prompter: numbered choices and pre-filled line editing.

use crossterm::style::{Color, Stylize};
use fingertag_application::{PromptError, Prompter};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const CHOICE_PROMPT: &str = "> ";
const LABEL: Color = Color::Cyan;
const INDEX: Color = Color::Magenta;
const WARNING: Color = Color::Yellow;

pub struct TerminalPrompter {
    editor: DefaultEditor,
}

impl TerminalPrompter {
    pub fn new() -> Result<Self, PromptError> {
        let editor = DefaultEditor::new().map_err(terminal_error)?;
        Ok(Self { editor })
    }
}

impl Prompter for TerminalPrompter {
    fn select_one(&mut self, label: &str, items: &[String]) -> Result<usize, PromptError> {
        if items.is_empty() {
            return Err(PromptError::Terminal("nothing to choose from".to_string()));
        }

        println!();
        println!("{}", label.with(LABEL).bold());
        for (position, item) in items.iter().enumerate() {
            println!("  {} {}", format!("{:>2})", position + 1).with(INDEX), item);
        }

        loop {
            let line = self.editor.readline(CHOICE_PROMPT).map_err(readline_error)?;
            match parse_choice(&line, items.len()) {
                Some(index) => return Ok(index),
                None => println!(
                    "{}",
                    format!("Enter a number between 1 and {}", items.len()).with(WARNING)
                ),
            }
        }
    }

    fn edit_value(&mut self, label: &str, default_value: &str) -> Result<String, PromptError> {
        let prompt = format!("{label}: ");
        self.editor
            .readline_with_initial(&prompt, (default_value, ""))
            .map_err(readline_error)
    }
}

/// Map a 1-based answer onto a 0-based index.
fn parse_choice(line: &str, len: usize) -> Option<usize> {
    let position: usize = line.trim().parse().ok()?;
    (1..=len).contains(&position).then(|| position - 1)
}

fn readline_error(err: ReadlineError) -> PromptError {
    match err {
        ReadlineError::Interrupted | ReadlineError::Eof => PromptError::Cancelled,
        other => terminal_error(other),
    }
}

fn terminal_error(err: ReadlineError) -> PromptError {
    PromptError::Terminal(err.to_string())
}
