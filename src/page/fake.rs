//! Scripted in-memory page for handler and supervisor tests.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;

use crate::error::BotError;
use crate::page::{Locator, Page};

pub type Dom = HashMap<String, Vec<FakeElement>>;

#[derive(Clone, Debug)]
pub struct FakeElement {
    pub text: String,
    pub attrs: HashMap<String, String>,
    pub visible: bool,
    pub enabled: bool,
    pub children: HashMap<String, FakeElement>,
}

impl FakeElement {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            attrs: HashMap::new(),
            visible: true,
            enabled: true,
            children: HashMap::new(),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, selector: &str, el: FakeElement) -> Self {
        self.children.insert(selector.to_string(), el);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Click(String),
    DomClick(String),
    Type(String, String),
    Key(String, String),
}

type Reaction = Box<dyn FnMut(&mut Dom)>;

#[derive(Default)]
pub struct FakePage {
    pub dom: Dom,
    pub actions: Vec<Action>,
    pub pauses: Vec<Duration>,
    reactions: Vec<(String, Reaction)>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, selector: &str, elements: Vec<FakeElement>) -> Self {
        self.dom.insert(selector.to_string(), elements);
        self
    }

    pub fn set(&mut self, selector: &str, elements: Vec<FakeElement>) {
        self.dom.insert(selector.to_string(), elements);
    }

    pub fn remove(&mut self, selector: &str) {
        self.dom.remove(selector);
    }

    /// Run `reaction` every time the element rendered as `locator` is clicked.
    pub fn on_click(&mut self, locator: &str, reaction: impl FnMut(&mut Dom) + 'static) {
        self.reactions.push((locator.to_string(), Box::new(reaction)));
    }

    /// Every click in order, pointer and DOM alike.
    pub fn clicks(&self) -> Vec<String> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::Click(el) | Action::DomClick(el) => Some(el.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn dom_clicks(&self) -> Vec<String> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::DomClick(el) => Some(el.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clicks_on(&self, locator: &str) -> usize {
        self.clicks().iter().filter(|c| *c == locator).count()
    }

    pub fn typed(&self) -> Vec<(String, String)> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::Type(el, text) => Some((el.clone(), text.clone())),
                _ => None,
            })
            .collect()
    }

    fn find(&self, el: &Locator) -> Option<&FakeElement> {
        let base = self.dom.get(el.selector())?.get(el.index())?;
        match el.inner_selector() {
            Some(inner) => base.children.get(inner),
            None => Some(base),
        }
    }

    fn react(&mut self, key: &str) {
        for (target, reaction) in &mut self.reactions {
            if target == key {
                reaction(&mut self.dom);
            }
        }
    }

    fn require(&self, el: &Locator) -> Result<&FakeElement> {
        self.find(el)
            .ok_or_else(|| BotError::ElementMissing(el.to_string()).into())
    }
}

impl Page for FakePage {
    fn count(&mut self, selector: &str) -> Result<usize> {
        Ok(self.dom.get(selector).map_or(0, Vec::len))
    }

    fn is_present(&mut self, el: &Locator) -> Result<bool> {
        Ok(self.find(el).is_some())
    }

    fn text(&mut self, el: &Locator) -> Result<String> {
        Ok(self.require(el)?.text.clone())
    }

    fn attribute(&mut self, el: &Locator, name: &str) -> Result<Option<String>> {
        Ok(self.find(el).and_then(|e| e.attrs.get(name).cloned()))
    }

    fn is_visible(&mut self, el: &Locator) -> Result<bool> {
        Ok(self.find(el).is_some_and(|e| e.visible))
    }

    fn is_enabled(&mut self, el: &Locator) -> Result<bool> {
        Ok(self.find(el).is_some_and(|e| e.enabled))
    }

    fn click(&mut self, el: &Locator) -> Result<()> {
        self.require(el)?;
        let key = el.to_string();
        self.actions.push(Action::Click(key.clone()));
        self.react(&key);
        Ok(())
    }

    fn dom_click(&mut self, el: &Locator) -> Result<()> {
        self.require(el)?;
        let key = el.to_string();
        self.actions.push(Action::DomClick(key.clone()));
        self.react(&key);
        Ok(())
    }

    fn type_text(&mut self, el: &Locator, text: &str, _delay: Duration) -> Result<()> {
        self.require(el)?;
        self.actions
            .push(Action::Type(el.to_string(), text.to_string()));
        Ok(())
    }

    fn press_key(&mut self, el: &Locator, key: &str) -> Result<()> {
        self.require(el)?;
        self.actions.push(Action::Key(el.to_string(), key.to_string()));
        Ok(())
    }

    fn wait_for_selector(&mut self, selector: &str, _timeout: Duration) -> Result<bool> {
        self.is_live(selector)
    }

    fn wait_for_load_state(&mut self, _timeout: Duration) -> Result<bool> {
        Ok(true)
    }

    fn pause(&mut self, duration: Duration) {
        self.pauses.push(duration);
    }
}
