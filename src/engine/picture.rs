use std::time::Duration;

use anyhow::Result;

use crate::engine::exercise::{ExerciseContext, Outcome};
use crate::engine::normalize::normalize;
use crate::page::{Locator, Page};

/// Navigation steps tried before giving up on the carousel.
pub const CAROUSEL_ATTEMPTS: usize = 10;

const CHOOSE_WORD_LABEL: &str = "#choosePictureWord";
const CAROUSEL: &str = "#word-img-container";
const CAROUSEL_CURRENT: &str = "#word-img-container .slick-slide.slick-current img.picture";
const CAROUSEL_NEXT: &str = "#word-img-container .slick-next";
const CAROUSEL_PREV: &str = "#word-img-container .slick-prev";

const DESCRIBE_IMG: &str = "#describePictureImg";
const DESCRIBE_INPUT: &str = "#describePictureAnswer";
const DESCRIBE_SUBMIT: &str = "#describePictureSubmitBtn";

/// Page through the carousel until the slide for the labelled word is
/// centred, then confirm it with a double click.
pub fn choose(page: &mut dyn Page, ctx: &mut ExerciseContext) -> Result<Outcome> {
    let label = Locator::new(CHOOSE_WORD_LABEL);
    if !page.is_present(&label)? {
        return Ok(Outcome::NotApplicable);
    }
    let word = normalize(&page.text(&label)?);

    let Some(expected) = ctx.pictures.src_for(&word).map(str::to_string) else {
        tracing::info!(word = %word, "choose-picture: no mapping found");
        return Ok(Outcome::NotApplicable);
    };
    if page.count(CAROUSEL)? == 0 {
        return Ok(Outcome::NotApplicable);
    }

    let current = Locator::new(CAROUSEL_CURRENT);
    let next = Locator::new(CAROUSEL_NEXT);
    let prev = Locator::new(CAROUSEL_PREV);

    for _ in 0..CAROUSEL_ATTEMPTS {
        if !page.is_present(&current)? {
            break;
        }
        if page.attribute(&current, "src")?.as_deref() == Some(expected.as_str()) {
            page.dom_click(&current)?;
            page.pause(Duration::from_millis(50));
            page.dom_click(&current)?;
            tracing::info!(word = %word, src = %expected, "choose-picture: clicked");
            return Ok(Outcome::Acted);
        }

        if page.is_enabled(&next)? {
            page.click(&next)?;
        } else if page.is_enabled(&prev)? {
            page.click(&prev)?;
        } else {
            tracing::info!("choose-picture: cannot navigate carousel");
            break;
        }
        ctx.pacer.jitter(page, 200, 400);
    }

    tracing::info!(word = %word, "choose-picture: could not find correct picture");
    Ok(Outcome::NotApplicable)
}

/// Type the word shown by the image and submit once.
pub fn describe(page: &mut dyn Page, ctx: &mut ExerciseContext) -> Result<Outcome> {
    let img = Locator::new(DESCRIBE_IMG);
    let input = Locator::new(DESCRIBE_INPUT);
    let submit = Locator::new(DESCRIBE_SUBMIT);
    if !page.is_present(&img)? || !page.is_present(&input)? || !page.is_present(&submit)? {
        return Ok(Outcome::NotApplicable);
    }

    let Some(src) = page.attribute(&img, "src")? else {
        return Ok(Outcome::NotApplicable);
    };
    let Some(word) = ctx.picture_word(&src)? else {
        tracing::info!(src = %src, "describe-picture: no word known");
        return Ok(Outcome::NotApplicable);
    };

    page.click(&input)?;
    let delay = ctx.pacer.keystroke();
    page.type_text(&input, &word, delay)?;
    page.click(&submit)?;
    tracing::info!(src = %src, answer = %word, "describe-picture: answered");
    Ok(Outcome::Acted)
}
