use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;

use crate::engine::normalize::normalize;
use crate::engine::pacing::Pacer;
use crate::engine::resolve::{resolve_picture, resolve_term};
use crate::engine::{choice, complete_word, pairs, picture, typed};
use crate::page::{Locator, Page};
use crate::prompt::TermPrompter;
use crate::store::lexicon::Lexicon;
use crate::store::pictures::PictureIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Acted,
    NotApplicable,
}

/// Everything a handler may consult while answering.
pub struct ExerciseContext {
    pub lexicon: Lexicon,
    pub pictures: PictureIndex,
    pub prompter: Box<dyn TermPrompter>,
    pub pacer: Pacer,
    pub placeholders: HashSet<String>,
}

impl ExerciseContext {
    pub fn new(
        lexicon: Lexicon,
        pictures: PictureIndex,
        prompter: Box<dyn TermPrompter>,
        placeholders: HashSet<String>,
    ) -> Self {
        Self {
            lexicon,
            pictures,
            prompter,
            pacer: Pacer::new(),
            placeholders,
        }
    }

    pub fn is_placeholder(&self, word: &str) -> bool {
        self.placeholders.contains(word)
    }

    /// Translation for raw prompt text. `None` for placeholder prompts and
    /// for words nobody could resolve.
    pub fn answer_for(&mut self, prompt: &str) -> Result<Option<String>> {
        let word = normalize(prompt);
        if self.is_placeholder(&word) {
            tracing::debug!(prompt, "placeholder prompt, skipping");
            return Ok(None);
        }
        let lookup = resolve_term(&mut self.lexicon, &word, self.prompter.as_mut())?;
        Ok(lookup.answer().map(str::to_string))
    }

    pub fn picture_word(&mut self, src: &str) -> Result<Option<String>> {
        let lookup = resolve_picture(&mut self.pictures, src, self.prompter.as_mut())?;
        Ok(lookup.answer().map(str::to_string))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exercise {
    OneOutOfMany,
    TranslateFallingWord,
    ChoosePicture,
    DescribePicture,
    Pexeso,
    CompleteWord,
    ChooseWord,
    Transcribe,
    FindPair,
    TranslateInput,
}

/// Order in which handlers are offered the page.
pub const PRIORITY: [Exercise; 10] = [
    Exercise::OneOutOfMany,
    Exercise::TranslateFallingWord,
    Exercise::ChoosePicture,
    Exercise::DescribePicture,
    Exercise::Pexeso,
    Exercise::CompleteWord,
    Exercise::ChooseWord,
    Exercise::Transcribe,
    Exercise::FindPair,
    Exercise::TranslateInput,
];

const TRANSCRIBE_SKIP: &str = "#transcribeSkipBtn";

impl Exercise {
    pub fn name(self) -> &'static str {
        match self {
            Exercise::OneOutOfMany => "one-out-of-many",
            Exercise::TranslateFallingWord => "translate-falling-word",
            Exercise::ChoosePicture => "choose-picture",
            Exercise::DescribePicture => "describe-picture",
            Exercise::Pexeso => "pexeso",
            Exercise::CompleteWord => "complete-word",
            Exercise::ChooseWord => "choose-word",
            Exercise::Transcribe => "transcribe",
            Exercise::FindPair => "find-pair",
            Exercise::TranslateInput => "translate-input",
        }
    }

    /// Marker element whose visibility means this variant is on screen.
    pub fn container(self) -> &'static str {
        match self {
            Exercise::OneOutOfMany => "#oneOutOfMany",
            Exercise::TranslateFallingWord => "#translateFallingWord",
            Exercise::ChoosePicture => "#choosePicture",
            Exercise::DescribePicture => "#describePicture",
            Exercise::Pexeso => "#pexeso",
            Exercise::CompleteWord => "#completeWord",
            Exercise::ChooseWord => "#chooseWord",
            Exercise::Transcribe => "#transcribe",
            Exercise::FindPair => "#findPair",
            Exercise::TranslateInput => typed::TRANSLATE_INPUT.prompt,
        }
    }

    /// Time the UI gets to react after this handler acted.
    pub fn settle(self) -> Duration {
        match self {
            Exercise::Transcribe => Duration::from_millis(300),
            _ => Duration::from_millis(400),
        }
    }

    /// Detect this variant and answer it. A hidden or missing container is
    /// `NotApplicable` with no interaction at all.
    pub fn try_handle(self, page: &mut dyn Page, ctx: &mut ExerciseContext) -> Result<Outcome> {
        if !page.is_live(self.container())? {
            return Ok(Outcome::NotApplicable);
        }
        match self {
            Exercise::OneOutOfMany => choice::answer(page, ctx, &choice::ONE_OUT_OF_MANY),
            Exercise::ChooseWord => choice::answer(page, ctx, &choice::CHOOSE_WORD),
            Exercise::TranslateFallingWord => typed::answer(page, ctx, &typed::FALLING_WORD),
            Exercise::TranslateInput => typed::answer(page, ctx, &typed::TRANSLATE_INPUT),
            Exercise::ChoosePicture => picture::choose(page, ctx),
            Exercise::DescribePicture => picture::describe(page, ctx),
            Exercise::Pexeso => pairs::pexeso(page, ctx),
            Exercise::CompleteWord => complete_word::complete(page, ctx),
            Exercise::FindPair => pairs::find_pair(page, ctx),
            Exercise::Transcribe => skip_transcribe(page),
        }
    }
}

/// Audio transcription is out of reach, so the exercise is skipped.
fn skip_transcribe(page: &mut dyn Page) -> Result<Outcome> {
    let skip = Locator::new(TRANSCRIBE_SKIP);
    if !page.is_present(&skip)? {
        return Ok(Outcome::NotApplicable);
    }
    tracing::info!("skipping transcribe");
    page.click(&skip)?;
    Ok(Outcome::Acted)
}

/// Offer the page to each handler in [`PRIORITY`] order; stop at the first
/// that acts.
pub fn dispatch(page: &mut dyn Page, ctx: &mut ExerciseContext) -> Result<Option<Exercise>> {
    for exercise in PRIORITY {
        if exercise.try_handle(page, ctx)? == Outcome::Acted {
            tracing::info!(exercise = exercise.name(), "handler acted");
            return Ok(Some(exercise));
        }
    }
    Ok(None)
}
