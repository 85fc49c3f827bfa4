//! Last-resort manual input when neither the lexicon nor the picture index
//! knows an answer.

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Question<'a> {
    /// Translation of a prompt word.
    Term(&'a str),
    /// Word shown by an image `src`.
    Picture(&'a str),
}

impl Question<'_> {
    pub fn prompt(&self) -> String {
        match self {
            Question::Term(word) => format!("[operator] Enter translation for unknown word '{word}': "),
            Question::Picture(src) => format!("[operator] Enter word for image {src}: "),
        }
    }
}

pub trait TermPrompter {
    /// `Ok(None)` means the operator gave no answer.
    fn ask(&mut self, question: Question<'_>) -> Result<Option<String>>;
}

/// Blocks on the terminal with a line editor.
pub struct ConsolePrompter {
    editor: DefaultEditor,
}

impl ConsolePrompter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl TermPrompter for ConsolePrompter {
    fn ask(&mut self, question: Question<'_>) -> Result<Option<String>> {
        tracing::warn!(target: "operator", ?question, "waiting for manual answer");
        match self.editor.readline(&question.prompt()) {
            Ok(line) => {
                let answer = line.trim().to_string();
                if answer.is_empty() {
                    tracing::warn!(target: "operator", "no answer given");
                    Ok(None)
                } else {
                    tracing::info!(target: "operator", answer = %answer, "manual answer received");
                    Ok(Some(answer))
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Never answers. Used with `--no-prompt` for unattended runs.
pub struct NoPrompter;

impl TermPrompter for NoPrompter {
    fn ask(&mut self, question: Question<'_>) -> Result<Option<String>> {
        tracing::warn!(target: "operator", ?question, "unknown answer, prompting disabled");
        Ok(None)
    }
}
