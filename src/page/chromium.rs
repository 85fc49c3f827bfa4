//! [`Page`] backed by a Chromium tab over the DevTools protocol.
//!
//! chromiumoxide is async; the bot is not. The page owns a private tokio
//! runtime and blocks on every call.

use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::runtime::Runtime;

use crate::error::BotError;
use crate::page::{Locator, Page};

const POLL: Duration = Duration::from_millis(100);

pub struct ChromiumPage {
    page: chromiumoxide::Page,
    // Keeps the CDP connection alive.
    _browser: Browser,
    // Declared last so it outlives the handles above.
    runtime: Runtime,
}

impl ChromiumPage {
    /// Attach to the first tab of a running browser whose URL contains
    /// `urlbase`. If nothing listens on `debug_url`, launch a headed browser
    /// and open `urlbase` instead.
    pub fn attach_or_launch(debug_url: &str, urlbase: &str) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to start tokio runtime")?;

        let (browser, page) = runtime.block_on(async {
            match Browser::connect(debug_url).await {
                Ok((mut browser, handler)) => {
                    tracing::info!(debug_url, "connected to running browser");
                    spawn_handler(handler);
                    let page = find_tab(&mut browser, urlbase).await?;
                    Ok::<_, anyhow::Error>((browser, page))
                }
                Err(err) => {
                    tracing::warn!(debug_url, error = %err, "could not connect, launching a browser");
                    launch(urlbase).await
                }
            }
        })?;

        Ok(Self {
            page,
            _browser: browser,
            runtime,
        })
    }

    fn eval<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        let script = format!("(() => {{ {body} }})() ?? null");
        let result = self
            .runtime
            .block_on(self.page.evaluate(script))
            .map_err(|e| BotError::Browser(e.to_string()))?;
        result
            .into_value::<T>()
            .map_err(|e| anyhow!("unexpected script result: {e:?}"))
    }

    /// Evaluate `body` with `el` bound to the located element, or `null`.
    fn eval_at<T: DeserializeOwned>(&self, loc: &Locator, body: &str) -> Result<T> {
        self.eval(&format!("{} {body}", resolve_js(loc)))
    }

    fn element(&self, loc: &Locator) -> Result<Element> {
        self.runtime.block_on(locate(&self.page, loc))
    }

    fn poll(&mut self, timeout: Duration, mut check: impl FnMut(&mut Self) -> Result<bool>) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if check(self)? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            self.pause(POLL);
        }
    }
}

fn spawn_handler(mut handler: chromiumoxide::Handler) {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(err) = event {
                tracing::debug!(error = %err, "cdp handler event failed");
            }
        }
    });
}

async fn find_tab(browser: &mut Browser, urlbase: &str) -> Result<chromiumoxide::Page> {
    browser.fetch_targets().await.context("listing browser targets")?;
    let pages = browser.pages().await.context("listing browser tabs")?;
    for page in pages {
        let url = page.url().await.ok().flatten().unwrap_or_default();
        if url.contains(urlbase) {
            tracing::info!(url = %url, "found target tab");
            return Ok(page);
        }
    }
    Err(BotError::NoTargetPage(urlbase.to_string()).into())
}

async fn locate(page: &chromiumoxide::Page, loc: &Locator) -> Result<Element> {
    let missing = || BotError::ElementMissing(loc.to_string());
    let all = page.find_elements(loc.selector()).await.map_err(|_| missing())?;
    let base = all.into_iter().nth(loc.index()).ok_or_else(missing)?;
    match loc.inner_selector() {
        Some(inner) => Ok(base.find_element(inner).await.map_err(|_| missing())?),
        None => Ok(base),
    }
}

async fn launch(urlbase: &str) -> Result<(Browser, chromiumoxide::Page)> {
    let config = BrowserConfig::builder()
        .with_head()
        .arg("--no-sandbox")
        .build()
        .map_err(|e| anyhow!("failed to build browser config: {e}"))?;
    let (browser, handler) = Browser::launch(config)
        .await
        .context("failed to launch Chromium")?;
    spawn_handler(handler);

    let page = browser
        .new_page(urlbase)
        .await
        .with_context(|| format!("failed to open {urlbase}"))?;
    if let Err(err) = page.wait_for_navigation().await {
        tracing::warn!(url = urlbase, error = %err, "navigation did not complete");
    }
    tracing::info!(url = urlbase, "opened new browser");
    Ok((browser, page))
}

fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

fn resolve_js(loc: &Locator) -> String {
    let base = format!(
        "const base = document.querySelectorAll({})[{}] ?? null;",
        js_str(loc.selector()),
        loc.index()
    );
    match loc.inner_selector() {
        Some(inner) => format!("{base} const el = base ? base.querySelector({}) : null;", js_str(inner)),
        None => format!("{base} const el = base;"),
    }
}

const VISIBLE_JS: &str = "if (!el) return false; \
    const s = getComputedStyle(el); \
    return s.display !== 'none' && s.visibility !== 'hidden' && el.getClientRects().length > 0;";

const ENABLED_JS: &str = "if (!el) return false; \
    return !el.disabled && el.getAttribute('aria-disabled') !== 'true' \
        && !el.classList.contains('slick-disabled');";

impl Page for ChromiumPage {
    fn count(&mut self, selector: &str) -> Result<usize> {
        self.eval(&format!("return document.querySelectorAll({}).length;", js_str(selector)))
    }

    fn is_present(&mut self, el: &Locator) -> Result<bool> {
        self.eval_at(el, "return el !== null;")
    }

    fn text(&mut self, el: &Locator) -> Result<String> {
        let text: Option<String> = self.eval_at(el, "return el ? el.innerText : null;")?;
        text.ok_or_else(|| BotError::ElementMissing(el.to_string()).into())
    }

    fn attribute(&mut self, el: &Locator, name: &str) -> Result<Option<String>> {
        self.eval_at(el, &format!("return el ? el.getAttribute({}) : null;", js_str(name)))
    }

    fn is_visible(&mut self, el: &Locator) -> Result<bool> {
        self.eval_at(el, VISIBLE_JS)
    }

    fn is_enabled(&mut self, el: &Locator) -> Result<bool> {
        self.eval_at(el, ENABLED_JS)
    }

    fn click(&mut self, el: &Locator) -> Result<()> {
        let element = self.element(el)?;
        self.runtime
            .block_on(element.click())
            .map_err(|e| BotError::Browser(format!("click on {el}: {e}")))?;
        Ok(())
    }

    fn dom_click(&mut self, el: &Locator) -> Result<()> {
        let clicked: bool = self.eval_at(el, "if (!el) return false; el.click(); return true;")?;
        if !clicked {
            return Err(BotError::ElementMissing(el.to_string()).into());
        }
        Ok(())
    }

    fn type_text(&mut self, el: &Locator, text: &str, delay: Duration) -> Result<()> {
        let element = self.element(el)?;
        self.runtime
            .block_on(element.focus())
            .map_err(|e| BotError::Browser(format!("focus on {el}: {e}")))?;
        let mut buf = [0u8; 4];
        for c in text.chars() {
            self.runtime
                .block_on(element.type_str(c.encode_utf8(&mut buf)))
                .map_err(|e| BotError::Browser(format!("typing into {el}: {e}")))?;
            self.pause(delay);
        }
        Ok(())
    }

    fn press_key(&mut self, el: &Locator, key: &str) -> Result<()> {
        let element = self.element(el)?;
        self.runtime
            .block_on(element.press_key(key))
            .map_err(|e| BotError::Browser(format!("key {key} on {el}: {e}")))?;
        Ok(())
    }

    fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<bool> {
        self.poll(timeout, |page| page.is_live(selector))
    }

    fn wait_for_load_state(&mut self, timeout: Duration) -> Result<bool> {
        self.poll(timeout, |page| {
            page.eval::<bool>("return document.readyState === 'complete';")
        })
    }

    fn pause(&mut self, duration: Duration) {
        self.runtime.block_on(tokio::time::sleep(duration));
    }
}
