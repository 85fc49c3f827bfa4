use thiserror::Error;

/// Structural failures that callers match on. Everything else travels as
/// `anyhow::Error`.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("no open tab found containing '{0}'")]
    NoTargetPage(String),

    #[error("score indicator text {0:?} is not a number")]
    ScoreUnreadable(String),

    #[error("element {0} is not present on the page")]
    ElementMissing(String),

    #[error("browser error: {0}")]
    Browser(String),
}
