use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local};

use crate::config::SessionSettings;
use crate::engine::exercise::{ExerciseContext, dispatch};
use crate::engine::progress::Progress;
use crate::error::BotError;
use crate::notify::Notifier;
use crate::page::{Locator, Page};

const SCORE: &str = "#WocaPoints";
const BACK: &str = "#backBtn";
const STANDARD_VIEW: &str = "#standardView";

const IDLE: Duration = Duration::from_millis(100);
const RECOVERY: Duration = Duration::from_secs(1);
const BACK_TIMEOUT: Duration = Duration::from_secs(5);
const STANDARD_VIEW_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Attaching,
    Running,
    Stopping,
    Terminated,
}

/// Current score, or `None` when the indicator is gone.
pub fn read_score(page: &mut dyn Page) -> Result<Option<u64>> {
    if !page.is_live(SCORE)? {
        return Ok(None);
    }
    let raw = page.text(&Locator::new(SCORE))?;
    let score = raw
        .trim()
        .parse()
        .map_err(|_| BotError::ScoreUnreadable(raw.clone()))?;
    Ok(Some(score))
}

/// Drives one session: offers the page to the handlers, watches the score and
/// leaves the exercise view once the target is reached.
pub struct Supervisor<P: Page, N: Notifier> {
    page: P,
    ctx: ExerciseContext,
    notifier: N,
    progress: Progress,
    state: SessionState,
    started: DateTime<Local>,
}

impl<P: Page, N: Notifier> Supervisor<P, N> {
    pub fn new(page: P, ctx: ExerciseContext, notifier: N, settings: &SessionSettings) -> Self {
        Self {
            page,
            ctx,
            notifier,
            progress: Progress::new(0, settings.target_delta, settings.milestone_interval),
            state: SessionState::Attaching,
            started: Local::now(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn page(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Capture the starting score. A missing or unreadable indicator is a
    /// startup failure.
    pub fn attach(&mut self) -> Result<u64> {
        let Some(original) = read_score(&mut self.page)? else {
            return Err(BotError::ScoreUnreadable(format!("{SCORE} not found")).into());
        };
        self.progress = Progress::new(
            original,
            self.progress.target_delta,
            self.progress.milestone_interval,
        );
        self.started = Local::now();
        self.state = SessionState::Running;
        tracing::info!(original, target = self.progress.target(), "attached");
        Ok(original)
    }

    /// Advance the state machine by one iteration.
    pub fn step(&mut self) -> Result<SessionState> {
        match self.state {
            SessionState::Attaching => {
                self.attach()?;
            }
            SessionState::Running => self.run_once()?,
            SessionState::Stopping => self.leave_exercise()?,
            SessionState::Terminated => {}
        }
        Ok(self.state)
    }

    /// Step until terminated. Iteration errors are reported and the loop
    /// resumes after a short pause.
    pub fn run(&mut self) {
        while self.state != SessionState::Terminated {
            if let Err(err) = self.step() {
                self.recover(&err);
            }
        }
        tracing::info!("session terminated");
    }

    fn recover(&mut self, err: &anyhow::Error) {
        tracing::error!("iteration failed: {err:?}");
        self.notifier
            .notify("Wocabee Bot Runtime Error", &format!("{err:?}"));
        self.page.pause(RECOVERY);
    }

    fn run_once(&mut self) -> Result<()> {
        let fired = dispatch(&mut self.page, &mut self.ctx)?;
        if let Some(exercise) = fired {
            self.page.pause(exercise.settle());
        }

        match read_score(&mut self.page)? {
            Some(points) => self.record(points),
            None if fired.is_none() => self.finished_externally(),
            None => tracing::debug!("score indicator hidden after an action, not observing"),
        }

        if fired.is_none() && self.state == SessionState::Running {
            self.page.pause(IDLE);
        }
        Ok(())
    }

    fn record(&mut self, points: u64) {
        let observation = self.progress.observe(points);
        let original = self.progress.original;
        let target = self.progress.target();
        for milestone in &observation.milestones {
            tracing::info!(points, milestone, "milestone reached");
            self.notifier.notify(
                "Wocabee Bot Progress Report",
                &format!("Current points: {points} (original: {original}, target: {target})"),
            );
        }
        if observation.target_reached {
            tracing::info!(points, target, "target reached, stopping");
            self.notifier.notify(
                "Wocabee Bot reached the target",
                &format!(
                    "Wocabee Bot has reached the target of {points} points (original: {original}, addon: {}), stopping and saving!",
                    self.progress.target_delta
                ),
            );
            self.state = SessionState::Stopping;
        }
    }

    fn finished_externally(&mut self) {
        tracing::info!("{SCORE} not present, probably returned to standard view");
        let original = self.progress.original;
        let addon = self.progress.target_delta;
        let elapsed = (Local::now() - self.started).num_seconds();
        self.notifier.notify(
            "Wocabee Bot Finished",
            "Bot has stopped because it seems to have returned to standard view.",
        );
        self.notifier.notify(
            "Wocabee Bot Final Report",
            &format!(
                "Final points: {} (original: {original}, addon: {addon}) | Total time running: {elapsed} seconds",
                self.progress.target()
            ),
        );
        self.state = SessionState::Terminated;
    }

    fn leave_exercise(&mut self) -> Result<()> {
        if !self.page.wait_for_selector(BACK, BACK_TIMEOUT)? {
            self.notifier.notify(
                "Wocabee Bot Error",
                &format!("{BACK} did not appear within {}s. Exiting anyway.", BACK_TIMEOUT.as_secs()),
            );
            self.state = SessionState::Terminated;
            return Ok(());
        }
        self.page.click(&Locator::new(BACK))?;

        if self.page.wait_for_selector(STANDARD_VIEW, STANDARD_VIEW_TIMEOUT)? {
            self.notifier.notify(
                "Wocabee Bot Finished",
                "Bot has stopped and returned to standard view.",
            );
        } else {
            self.notifier.notify(
                "Wocabee Bot Error",
                &format!("Failed to load {STANDARD_VIEW} after clicking back. Exiting anyway."),
            );
        }
        self.state = SessionState::Terminated;
        Ok(())
    }
}
