//! The live page as the exercise handlers see it.
//!
//! Elements are addressed by [`Locator`]s that are resolved against the DOM
//! on every call, so nothing observed is ever cached between polls.

pub mod chromium;
#[cfg(test)]
pub mod fake;

use std::fmt;
use std::time::Duration;

use anyhow::Result;

/// `selector` match number `index`, optionally narrowed to the first
/// descendant matching `inner`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locator {
    selector: String,
    index: usize,
    inner: Option<String>,
}

impl Locator {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            index: 0,
            inner: None,
        }
    }

    pub fn nth(&self, index: usize) -> Self {
        Self {
            index,
            ..self.clone()
        }
    }

    pub fn inner(&self, selector: impl Into<String>) -> Self {
        Self {
            inner: Some(selector.into()),
            ..self.clone()
        }
    }

    pub fn selector(&self) -> &str {
        &self.selector
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn inner_selector(&self) -> Option<&str> {
        self.inner.as_deref()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.selector, self.index)?;
        if let Some(inner) = &self.inner {
            write!(f, " {inner}")?;
        }
        Ok(())
    }
}

pub trait Page {
    /// Number of elements matching `selector`.
    fn count(&mut self, selector: &str) -> Result<usize>;

    fn is_present(&mut self, el: &Locator) -> Result<bool>;

    /// Rendered text. Errors when the element is missing.
    fn text(&mut self, el: &Locator) -> Result<String>;

    fn attribute(&mut self, el: &Locator, name: &str) -> Result<Option<String>>;

    /// False for missing elements.
    fn is_visible(&mut self, el: &Locator) -> Result<bool>;

    /// False for missing elements.
    fn is_enabled(&mut self, el: &Locator) -> Result<bool>;

    /// Pointer click at the centre of the element's box.
    fn click(&mut self, el: &Locator) -> Result<()>;

    /// Fire the element's DOM `click()` directly. Works on elements that are
    /// covered, flipped or mid-animation and so have no clickable box.
    fn dom_click(&mut self, el: &Locator) -> Result<()>;

    /// Type `text` into `el` one character at a time, `delay` apart.
    fn type_text(&mut self, el: &Locator, text: &str, delay: Duration) -> Result<()>;

    fn press_key(&mut self, el: &Locator, key: &str) -> Result<()>;

    /// Wait until `selector` is visible. `Ok(false)` on timeout.
    fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<bool>;

    /// Wait until the document has finished loading. `Ok(false)` on timeout.
    fn wait_for_load_state(&mut self, timeout: Duration) -> Result<bool>;

    fn pause(&mut self, duration: Duration);

    /// The first match exists and is visible.
    fn is_live(&mut self, selector: &str) -> Result<bool> {
        let el = Locator::new(selector);
        Ok(self.count(selector)? > 0 && self.is_visible(&el)?)
    }

    fn all(&mut self, selector: &str) -> Result<Vec<Locator>> {
        let base = Locator::new(selector);
        Ok((0..self.count(selector)?).map(|i| base.nth(i)).collect())
    }
}
