use anyhow::Result;

use crate::engine::exercise::{ExerciseContext, Outcome};
use crate::engine::normalize::normalize;
use crate::page::{Locator, Page};

const QUESTION: &str = "#completeWordQuestion";
const ANSWER: &str = "#completeWordAnswer";
const TILES: &str = "#characters .char";
const SUBMIT: &str = "#completeWordSubmitBtn";

/// Letters of `target` that are not yet in place in `current`, left to right.
/// Positions past the end of `current` count as blanks.
pub fn missing_letters(target: &str, current: &str) -> Vec<char> {
    let current: Vec<char> = current.chars().collect();
    target
        .chars()
        .enumerate()
        .filter(|(i, t)| current.get(*i).copied().unwrap_or('_') != *t)
        .map(|(_, t)| t)
        .collect()
}

/// Uppercase tiles belong to a separate pool and are never picked.
fn is_uppercase_tile(text: &str) -> bool {
    let mut cased = text
        .chars()
        .filter(|c| c.is_uppercase() || c.is_lowercase())
        .peekable();
    cased.peek().is_some() && cased.all(char::is_uppercase)
}

pub fn complete(page: &mut dyn Page, ctx: &mut ExerciseContext) -> Result<Outcome> {
    let question = Locator::new(QUESTION);
    let answer = Locator::new(ANSWER);
    let submit = Locator::new(SUBMIT);
    if !page.is_present(&question)? || !page.is_present(&answer)? || !page.is_present(&submit)? {
        return Ok(Outcome::NotApplicable);
    }

    let word = page.text(&question)?;
    if normalize(&word).is_empty() {
        return Ok(Outcome::NotApplicable);
    }
    let current = normalize(&page.text(&answer)?);

    let Some(target) = ctx.answer_for(&word)? else {
        tracing::info!(word = %word.trim(), "complete-word: no answer found");
        return Ok(Outcome::NotApplicable);
    };
    let target = normalize(&target);

    if current == target {
        if page.is_visible(&submit)? && page.is_enabled(&submit)? {
            tracing::info!("complete-word: already complete, submitting");
            page.dom_click(&submit)?;
        }
        return Ok(Outcome::Acted);
    }

    let missing = missing_letters(&target, &current);
    tracing::info!(word = %word.trim(), target = %target, ?missing, "complete-word");

    // The UI consumes a tile once it is clicked, so the tiles are located
    // afresh for every letter.
    for letter in missing {
        for tile in page.all(TILES)? {
            let text = page.text(&tile)?;
            if is_uppercase_tile(&text) {
                continue;
            }
            if normalize(&text).chars().eq(std::iter::once(letter)) {
                ctx.pacer.jitter(page, 50, 200);
                page.dom_click(&tile)?;
                break;
            }
        }
    }

    if page.is_visible(&submit)? && page.is_enabled(&submit)? {
        ctx.pacer.jitter(page, 100, 300);
        tracing::info!("complete-word: submitting");
        page.dom_click(&submit)?;
    } else {
        tracing::info!("complete-word: submit not ready yet, deferring");
    }
    Ok(Outcome::Acted)
}
