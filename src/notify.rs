//! Push notifications to an ntfy-style server.
//!
//! Delivery is best effort: failures are logged and swallowed so a flaky
//! notification server never interrupts a session.

use crate::config::Config;

pub trait Notifier {
    fn notify(&self, title: &str, message: &str);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NtfyTarget {
    pub server: String,
    pub topic: String,
    pub token: Option<String>,
}

impl NtfyTarget {
    pub fn url(&self) -> String {
        format!("{}/{}", self.server, self.topic)
    }
}

/// Posts to `{server}/{topic}` when configured, otherwise only logs.
pub struct NtfyNotifier {
    target: Option<NtfyTarget>,
}

impl NtfyNotifier {
    pub fn new(target: Option<NtfyTarget>) -> Self {
        Self { target }
    }

    /// Disabled unless both server and topic are set.
    pub fn from_config(config: &Config) -> Self {
        let target = match (&config.ntfy_server, &config.ntfy_topic) {
            (Some(server), Some(topic)) => Some(NtfyTarget {
                server: server.clone(),
                topic: topic.clone(),
                token: config.ntfy_token.clone(),
            }),
            _ => None,
        };
        if target.is_none() {
            tracing::debug!("ntfy not configured, notifications are log-only");
        }
        Self::new(target)
    }

    pub fn target(&self) -> Option<&NtfyTarget> {
        self.target.as_ref()
    }
}

impl Notifier for NtfyNotifier {
    fn notify(&self, title: &str, message: &str) {
        tracing::info!(title, "{message}");
        let Some(target) = &self.target else {
            return;
        };
        if let Err(err) = post(target, title, message) {
            tracing::warn!(error = %err, url = %target.url(), "failed to send notification");
        }
    }
}

#[cfg(feature = "network")]
fn post(target: &NtfyTarget, title: &str, message: &str) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;
    let mut request = client
        .post(target.url())
        .header("Title", title)
        .body(message.to_string());
    if let Some(token) = &target.token {
        request = request.bearer_auth(token);
    }
    request.send()?.error_for_status()?;
    Ok(())
}

#[cfg(not(feature = "network"))]
fn post(_target: &NtfyTarget, _title: &str, _message: &str) -> anyhow::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_server_and_topic() {
        let config = Config {
            ntfy_server: Some("https://ntfy.sh".to_string()),
            ..Config::default()
        };
        assert!(NtfyNotifier::from_config(&config).target().is_none());

        let config = Config {
            ntfy_server: Some("https://ntfy.sh".to_string()),
            ntfy_topic: Some("vocab".to_string()),
            ntfy_token: Some("tk".to_string()),
            ..Config::default()
        };
        let notifier = NtfyNotifier::from_config(&config);
        let target = notifier.target().unwrap();
        assert_eq!(target.url(), "https://ntfy.sh/vocab");
        assert_eq!(target.token.as_deref(), Some("tk"));
    }

    #[test]
    fn test_disabled_notifier_is_silent() {
        NtfyNotifier::new(None).notify("Title", "body");
    }
}
