use std::collections::HashMap;

use anyhow::Result;

use crate::engine::exercise::{ExerciseContext, Outcome};
use crate::engine::normalize::normalize;
use crate::page::{Locator, Page};

const PEXESO_CARD: &str = ".pexesoCardWrapper";
const PEXESO_FRONT: &str = ".pexesoFront";
const PEXESO_PAIR_ID: &str = "w_id";

const FIND_PAIR_QUESTIONS: &str = "#q_words .fp_q";
const FIND_PAIR_ANSWERS: &str = "#a_words .fp_a";

/// Flip matching pexeso cards. The UI's own pairing ids decide what
/// matches, so no lexicon lookup happens.
pub fn pexeso(page: &mut dyn Page, ctx: &mut ExerciseContext) -> Result<Outcome> {
    let mut groups: Vec<(Option<String>, Vec<Locator>)> = Vec::new();
    let mut fronts = 0;
    for card in page.all(PEXESO_CARD)? {
        let front = card.inner(PEXESO_FRONT);
        if !page.is_visible(&front)? {
            continue;
        }
        fronts += 1;
        let id = page.attribute(&card, PEXESO_PAIR_ID)?;
        match groups.iter_mut().find(|(g, _)| *g == id) {
            Some((_, members)) => members.push(front),
            None => groups.push((id, vec![front])),
        }
    }
    if fronts == 0 {
        return Ok(Outcome::NotApplicable);
    }

    for (id, members) in &groups {
        if members.len() < 2 {
            continue;
        }
        for card in &members[..2] {
            page.dom_click(card)?;
            ctx.pacer.jitter(page, 50, 150);
            page.dom_click(card)?;
            ctx.pacer.jitter(page, 50, 200);
        }
        tracing::info!(pair = ?id, "pexeso: flipped pair");
    }
    Ok(Outcome::Acted)
}

/// Walk the whole lexicon and connect every visible question with its
/// answer. Misses are logged and skipped.
pub fn find_pair(page: &mut dyn Page, ctx: &mut ExerciseContext) -> Result<Outcome> {
    let questions = page.all(FIND_PAIR_QUESTIONS)?;
    let answers = page.all(FIND_PAIR_ANSWERS)?;
    if questions.is_empty() || answers.is_empty() {
        return Ok(Outcome::NotApplicable);
    }

    let mut by_text: HashMap<String, Locator> = HashMap::new();
    for q in questions {
        if page.is_visible(&q)? {
            let text = normalize(&page.text(&q)?);
            by_text.insert(text, q);
        }
    }

    let entries: Vec<(String, String)> = ctx
        .lexicon
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    for (term, translation) in entries {
        let Some(question) = by_text.get(&normalize(&term)) else {
            continue;
        };
        page.dom_click(question)?;
        ctx.pacer.jitter(page, 50, 200);

        let expected = normalize(&translation);
        let mut found = false;
        for a in &answers {
            if normalize(&page.text(a)?) == expected && page.attribute(a, "disabled")?.is_none() {
                page.dom_click(a)?;
                found = true;
                break;
            }
        }
        if found {
            tracing::info!(term = %term, answer = %translation, "find-pair: matched");
        } else {
            tracing::info!(term = %term, answer = %translation, "find-pair: answer not present or disabled");
        }
    }
    Ok(Outcome::Acted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::fake::{FakeElement, FakePage};
    use crate::test_support::context_with;

    fn card(id: &str) -> FakeElement {
        FakeElement::new("")
            .attr(PEXESO_PAIR_ID, id)
            .child(PEXESO_FRONT, FakeElement::new("?"))
    }

    #[test]
    fn test_pexeso_clicks_first_two_of_each_group_twice() {
        let mut page = FakePage::new()
            .with("#pexeso", vec![FakeElement::new("")])
            .with(PEXESO_CARD, vec![card("7"), card("3"), card("7"), card("9"), card("3"), card("7")]);
        let mut ctx = context_with([("krok", "step")]);

        assert_eq!(pexeso(&mut page, &mut ctx).unwrap(), Outcome::Acted);
        let front = |i: usize| format!(".pexesoCardWrapper[{i}] .pexesoFront");
        assert_eq!(
            page.clicks(),
            vec![front(0), front(0), front(2), front(2), front(1), front(1), front(4), front(4)]
        );
        assert_eq!(page.dom_clicks(), page.clicks());
    }

    #[test]
    fn test_pexeso_without_fronts_is_not_applicable() {
        let mut page = FakePage::new().with(PEXESO_CARD, vec![FakeElement::new("")]);
        let mut ctx = context_with([("krok", "step")]);
        assert_eq!(pexeso(&mut page, &mut ctx).unwrap(), Outcome::NotApplicable);
    }

    #[test]
    fn test_pexeso_skips_hidden_fronts() {
        let hidden = FakeElement::new("")
            .attr(PEXESO_PAIR_ID, "1")
            .child(PEXESO_FRONT, FakeElement::new("?").hidden());
        let mut page = FakePage::new().with(PEXESO_CARD, vec![hidden, card("1")]);
        let mut ctx = context_with([("krok", "step")]);
        assert_eq!(pexeso(&mut page, &mut ctx).unwrap(), Outcome::Acted);
        assert!(page.clicks().is_empty());
    }

    #[test]
    fn test_find_pair_matches_each_known_entry() {
        let mut page = FakePage::new()
            .with("#findPair", vec![FakeElement::new("")])
            .with(
                FIND_PAIR_QUESTIONS,
                vec![FakeElement::new("Búrka"), FakeElement::new("krok")],
            )
            .with(
                FIND_PAIR_ANSWERS,
                vec![
                    FakeElement::new("step").attr("disabled", ""),
                    FakeElement::new("Storm"),
                    FakeElement::new("step"),
                ],
            );
        let mut ctx = context_with([("krok", "step"), ("mesto", "town"), ("burka", "storm")]);

        assert_eq!(find_pair(&mut page, &mut ctx).unwrap(), Outcome::Acted);
        assert_eq!(
            page.clicks(),
            vec![
                "#q_words .fp_q[1]".to_string(),
                "#a_words .fp_a[2]".to_string(),
                "#q_words .fp_q[0]".to_string(),
                "#a_words .fp_a[1]".to_string(),
            ]
        );
        assert_eq!(page.dom_clicks().len(), 4);
    }

    #[test]
    fn test_find_pair_miss_is_not_fatal() {
        let mut page = FakePage::new()
            .with(FIND_PAIR_QUESTIONS, vec![FakeElement::new("krok"), FakeElement::new("burka")])
            .with(FIND_PAIR_ANSWERS, vec![FakeElement::new("storm")]);
        let mut ctx = context_with([("krok", "step"), ("burka", "storm")]);

        assert_eq!(find_pair(&mut page, &mut ctx).unwrap(), Outcome::Acted);
        assert_eq!(
            page.clicks(),
            vec![
                "#q_words .fp_q[0]".to_string(),
                "#q_words .fp_q[1]".to_string(),
                "#a_words .fp_a[0]".to_string(),
            ]
        );
    }
}
