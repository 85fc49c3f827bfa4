use anyhow::Result;

use crate::engine::normalize::normalize;
use crate::prompt::{Question, TermPrompter};
use crate::store::lexicon::Lexicon;
use crate::store::pictures::PictureIndex;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// Found in the store.
    Known(String),
    /// Supplied by the operator and persisted.
    Learned(String),
    Unresolved,
}

impl Lookup {
    pub fn answer(&self) -> Option<&str> {
        match self {
            Lookup::Known(a) | Lookup::Learned(a) => Some(a.as_str()),
            Lookup::Unresolved => None,
        }
    }
}

/// Resolve the translation of `term` through the lexicon, asking the
/// operator as a last resort.
pub fn resolve_term(
    lexicon: &mut Lexicon,
    term: &str,
    prompter: &mut dyn TermPrompter,
) -> Result<Lookup> {
    let term = normalize(term);
    if let Some(answer) = lexicon.lookup(&term) {
        return Ok(Lookup::Known(answer.to_string()));
    }

    match prompter.ask(Question::Term(&term))? {
        Some(answer) => {
            lexicon.learn(&term, &answer)?;
            Ok(Lookup::Learned(answer))
        }
        None => Ok(Lookup::Unresolved),
    }
}

/// Resolve the word shown by image `src`, asking the operator as a last
/// resort.
pub fn resolve_picture(
    pictures: &mut PictureIndex,
    src: &str,
    prompter: &mut dyn TermPrompter,
) -> Result<Lookup> {
    if let Some(word) = pictures.word_for(src) {
        return Ok(Lookup::Known(word.to_string()));
    }

    match prompter.ask(Question::Picture(src))? {
        Some(word) => {
            pictures.learn(src, &word)?;
            Ok(Lookup::Learned(word))
        }
        None => Ok(Lookup::Unresolved),
    }
}
