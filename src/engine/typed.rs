use anyhow::Result;

use crate::engine::exercise::{ExerciseContext, Outcome};
use crate::engine::pacing::RetryPolicy;
use crate::page::{Locator, Page};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Submit {
    /// Click this button once it is enabled.
    Button(&'static str),
    /// Press Enter in the input.
    Enter,
}

/// A prompt word answered by typing into a text input.
pub struct TypedExercise {
    pub name: &'static str,
    pub prompt: &'static str,
    pub input: &'static str,
    pub submit: Submit,
}

pub const FALLING_WORD: TypedExercise = TypedExercise {
    name: "translate-falling-word",
    prompt: "#tfw_word",
    input: "#translateFallingWordAnswer",
    submit: Submit::Button("#translateFallingWordSubmitBtn"),
};

pub const TRANSLATE_INPUT: TypedExercise = TypedExercise {
    name: "translate-input",
    prompt: "#q_word",
    input: "#translateWordAnswer",
    submit: Submit::Enter,
};

pub fn answer(page: &mut dyn Page, ctx: &mut ExerciseContext, ex: &TypedExercise) -> Result<Outcome> {
    let prompt = Locator::new(ex.prompt);
    let input = Locator::new(ex.input);
    if !page.is_present(&prompt)? || !page.is_present(&input)? {
        return Ok(Outcome::NotApplicable);
    }
    if let Submit::Button(selector) = ex.submit
        && !page.is_present(&Locator::new(selector))?
    {
        return Ok(Outcome::NotApplicable);
    }

    let word = page.text(&prompt)?;
    let Some(answer) = ctx.answer_for(&word)? else {
        tracing::info!(exercise = ex.name, word = %word.trim(), "no answer found");
        return Ok(Outcome::NotApplicable);
    };

    page.click(&input)?;
    let delay = ctx.pacer.keystroke();
    page.type_text(&input, &answer, delay)?;

    match ex.submit {
        Submit::Button(selector) => {
            let button = Locator::new(selector);
            let ready = RetryPolicy::submit_enable().wait_until(page, |p| p.is_enabled(&button))?;
            if !ready {
                tracing::warn!(exercise = ex.name, "submit still disabled, clicking anyway");
            }
            page.click(&button)?;
        }
        Submit::Enter => page.press_key(&input, "Enter")?,
    }

    tracing::info!(exercise = ex.name, word = %word.trim(), answer = %answer, "answered");
    Ok(Outcome::Acted)
}
