//! Test doubles shared by the handler, store and supervisor tests.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};

use anyhow::Result;

use crate::engine::exercise::ExerciseContext;
use crate::engine::pacing::Pacer;
use crate::notify::Notifier;
use crate::prompt::{Question, TermPrompter};
use crate::store::lexicon::Lexicon;
use crate::store::pictures::PictureIndex;

/// Replays scripted operator answers in order. Once the script runs out
/// every question goes unanswered.
#[derive(Default)]
pub struct CannedPrompter {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

impl CannedPrompter {
    pub fn new<'a>(answers: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            answers: answers.into_iter().map(str::to_string).collect(),
            ..Self::default()
        }
    }

    /// An operator who never answers.
    pub fn silent() -> Self {
        Self::default()
    }
}

impl TermPrompter for CannedPrompter {
    fn ask(&mut self, question: Question<'_>) -> Result<Option<String>> {
        let asked = match question {
            Question::Term(term) => term,
            Question::Picture(src) => src,
        };
        self.asked.push(asked.to_string());
        Ok(self.answers.pop_front())
    }
}

fn default_placeholders() -> HashSet<String> {
    ["", "translate", "check"].iter().map(|w| w.to_string()).collect()
}

fn build<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    prompter: CannedPrompter,
) -> ExerciseContext {
    let mut ctx = ExerciseContext::new(
        Lexicon::in_memory(entries),
        PictureIndex::in_memory(Vec::<(&str, &str)>::new()),
        Box::new(prompter),
        default_placeholders(),
    );
    ctx.pacer = Pacer::seeded(7);
    ctx
}

/// In-memory context whose operator never answers.
pub fn context_with<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> ExerciseContext {
    build(entries, CannedPrompter::silent())
}

/// In-memory context whose operator answers with `answers` in order.
pub fn context_with_answers<'a>(
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    answers: impl IntoIterator<Item = &'a str>,
) -> ExerciseContext {
    build(entries, CannedPrompter::new(answers))
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.borrow().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|(t, _)| t.clone()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.sent
            .borrow_mut()
            .push((title.to_string(), message.to_string()));
    }
}
