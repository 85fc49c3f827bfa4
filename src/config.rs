use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_urlbase")]
    pub urlbase: String,
    #[serde(default = "default_debug_port")]
    pub debug_port: String,
    #[serde(default = "default_wordlist_file")]
    pub wordlist_file: String,
    #[serde(default = "default_picture_file")]
    pub picture_file: String,
    #[serde(default = "default_addon_points")]
    pub addon_points: u64,
    #[serde(default = "default_milestone_reminder")]
    pub milestone_reminder: u64,
    #[serde(default = "default_placeholder_words")]
    pub placeholder_words: Vec<String>,
    #[serde(default)]
    pub ntfy_server: Option<String>,
    #[serde(default)]
    pub ntfy_topic: Option<String>,
    #[serde(default)]
    pub ntfy_token: Option<String>,
}

fn default_urlbase() -> String {
    "wocabee.app/app".to_string()
}
fn default_debug_port() -> String {
    "http://127.0.0.1:9222".to_string()
}
fn default_wordlist_file() -> String {
    "wordlist.json".to_string()
}
fn default_picture_file() -> String {
    "picturelist.json".to_string()
}
fn default_addon_points() -> u64 {
    0
}
fn default_milestone_reminder() -> u64 {
    1000
}
fn default_placeholder_words() -> Vec<String> {
    vec![String::new(), "translate".to_string(), "check".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            urlbase: default_urlbase(),
            debug_port: default_debug_port(),
            wordlist_file: default_wordlist_file(),
            picture_file: default_picture_file(),
            addon_points: default_addon_points(),
            milestone_reminder: default_milestone_reminder(),
            placeholder_words: default_placeholder_words(),
            ntfy_server: None,
            ntfy_topic: None,
            ntfy_token: None,
        }
    }
}

/// Immutable snapshot handed to the supervisor and handlers.
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub target_delta: u64,
    pub milestone_interval: u64,
    pub placeholders: HashSet<String>,
}

impl Config {
    /// Load from `path` if given, else `./config.toml`, else the platform
    /// config dir. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path(),
        };
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    fn config_path() -> PathBuf {
        let local = PathBuf::from("config.toml");
        if local.exists() {
            return local;
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wocabot")
            .join("config.toml")
    }

    /// Overlay environment variables. `lookup` is `std::env::var(..).ok()`
    /// in production.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("URLBASE") {
            self.urlbase = v;
        }
        if let Some(v) = get("DEBUG_PORT") {
            self.debug_port = v;
        }
        if let Some(v) = get("WORDLIST_FILE") {
            self.wordlist_file = v;
        }
        if let Some(v) = get("PICTURE_FILE") {
            self.picture_file = v;
        }
        if let Some(v) = get("ADDON_POINTS").and_then(|v| v.parse().ok()) {
            self.addon_points = v;
        }
        if let Some(v) = get("MILESTONE_REMINDER").and_then(|v| v.parse().ok()) {
            self.milestone_reminder = v;
        }
        // An empty PLACEHOLDER_WORDS is meaningful only as part of a list, so
        // read it raw.
        if let Some(v) = lookup("PLACEHOLDER_WORDS") {
            self.placeholder_words = v.split(',').map(|w| w.trim().to_string()).collect();
        }
        if let Some(v) = get("NTFY_SERVER") {
            self.ntfy_server = Some(v);
        }
        if let Some(v) = get("NTFY_TOPIC") {
            self.ntfy_topic = Some(v);
        }
        if let Some(v) = get("NTFY_TOKEN") {
            self.ntfy_token = Some(v);
        }
    }

    /// Fix up values that would otherwise break the session.
    pub fn validate(&mut self) {
        if !self.urlbase.starts_with("http://") && !self.urlbase.starts_with("https://") {
            self.urlbase = format!("https://{}", self.urlbase);
        }
        if !self.debug_port.is_empty() && self.debug_port.chars().all(|c| c.is_ascii_digit()) {
            self.debug_port = format!("http://127.0.0.1:{}", self.debug_port);
        }
        self.milestone_reminder = self.milestone_reminder.max(1);
        for opt in [&mut self.ntfy_server, &mut self.ntfy_topic, &mut self.ntfy_token] {
            if opt.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *opt = None;
            }
        }
        if let Some(server) = self.ntfy_server.as_mut() {
            while server.ends_with('/') {
                server.pop();
            }
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            target_delta: self.addon_points,
            milestone_interval: self.milestone_reminder,
            placeholders: self
                .placeholder_words
                .iter()
                .map(|w| crate::engine::normalize::normalize(w))
                .collect(),
        }
    }

    /// Rough wall-clock estimate used in the start notification.
    pub fn estimated_seconds(&self) -> f64 {
        self.addon_points as f64 * 1.75
    }
}
