use std::time::Duration;

use anyhow::Result;

use crate::engine::exercise::{ExerciseContext, Outcome};
use crate::engine::normalize::{normalize, split_terms};
use crate::page::{Locator, Page};

/// A prompt word plus a list of clickable candidate translations.
pub struct ChoiceExercise {
    pub name: &'static str,
    pub prompt: &'static str,
    pub options: &'static str,
    /// Options are plain spans that react to a DOM `click()` only.
    pub dom_click: bool,
}

pub const ONE_OUT_OF_MANY: ChoiceExercise = ChoiceExercise {
    name: "one-out-of-many",
    prompt: "#oneOutOfManyQuestionWord",
    options: ".oneOutOfManyWord",
    dom_click: false,
};

pub const CHOOSE_WORD: ChoiceExercise = ChoiceExercise {
    name: "choose-word",
    prompt: "#ch_word",
    options: ".chooseWordAnswer",
    dom_click: true,
};

/// Index of the first option whose normalized text contains, or is
/// contained in, one of the comma-separated parts of `answer`.
pub fn pick_option<'a>(options: impl IntoIterator<Item = &'a str>, answer: &str) -> Option<usize> {
    let expected = split_terms(answer);
    if expected.is_empty() {
        return None;
    }
    options.into_iter().position(|raw| {
        let text = normalize(raw);
        !text.is_empty()
            && expected
                .iter()
                .any(|e| text.contains(e.as_str()) || e.contains(text.as_str()))
    })
}

pub fn answer(page: &mut dyn Page, ctx: &mut ExerciseContext, ex: &ChoiceExercise) -> Result<Outcome> {
    let prompt = Locator::new(ex.prompt);
    if !page.is_present(&prompt)? || page.count(ex.options)? == 0 {
        return Ok(Outcome::NotApplicable);
    }

    let question = page.text(&prompt)?;
    tracing::info!(exercise = ex.name, question = %question.trim(), "question");
    let Some(answer) = ctx.answer_for(&question)? else {
        tracing::info!(exercise = ex.name, "no known answer");
        return Ok(Outcome::NotApplicable);
    };

    let mut visible = Vec::new();
    for el in page.all(ex.options)? {
        if page.is_visible(&el)? {
            let text = page.text(&el)?;
            visible.push((el, text));
        }
    }

    let Some(idx) = pick_option(visible.iter().map(|(_, t)| t.as_str()), &answer) else {
        tracing::info!(exercise = ex.name, answer = %answer, "answer not present in choices");
        page.pause(Duration::from_millis(500));
        return Ok(Outcome::NotApplicable);
    };

    let (el, text) = &visible[idx];
    ctx.pacer.jitter(page, 100, 300);
    if ex.dom_click {
        page.dom_click(el)?;
    } else {
        page.click(el)?;
    }
    tracing::info!(exercise = ex.name, choice = %text.trim(), "clicked");
    Ok(Outcome::Acted)
}
