//
// (C) Copyright IBM 2026
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.


//! Status polling for backend jobs that report completion only when asked.
//!
//! A [`Poller`] queries a [`StatusSource`] on a fixed interval until the
//! status turns terminal, a budget runs out, too many requests in a row
//! fail, or the caller cancels. Each run yields at most one [`PollReport`];
//! a cancelled run yields none.

mod session;

pub use session::PollSession;

use crate::sources::{PollStatus, StatusSource, Verdict};
use anyhow::{anyhow, bail, Result};
use log::{debug, info, warn};
use std::future;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Timing and budgets of one polling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Time between two checks.
    pub interval: Duration,
    /// Wait before the first check.
    pub initial_delay: Duration,
    /// Wall-clock budget, measured from the start of the run.
    pub max_elapsed: Option<Duration>,
    pub max_attempts: Option<u32>,
    /// Consecutive failed requests tolerated before giving up.
    pub error_budget: u32,
    /// Per-request limit; an expired request counts as a failed one.
    pub request_timeout: Option<Duration>,
    /// Check once more when a budget runs out.
    pub final_check: bool,
}

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_ERROR_BUDGET: u32 = 6;

impl PollConfig {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            initial_delay: Duration::ZERO,
            max_elapsed: None,
            max_attempts: None,
            error_budget: DEFAULT_ERROR_BUDGET,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            final_check: false,
        }
    }

    /// Waiting for AI enrichment after it was triggered.
    pub fn enrichment() -> Self {
        Self::new(Duration::from_secs(5))
            .with_initial_delay(Duration::from_secs(2))
            .with_max_elapsed(Duration::from_secs(60))
            .with_max_attempts(12)
            .with_final_check(true)
    }

    /// Waiting for enrichment with per-platform progress.
    pub fn enrichment_progress() -> Self {
        Self::new(Duration::from_secs(3))
            .with_max_elapsed(Duration::from_secs(300))
            .with_final_check(true)
    }

    /// Waiting for an open-source recommendation job.
    pub fn recommendations() -> Self {
        Self::new(Duration::from_secs(3)).with_max_elapsed(Duration::from_secs(180))
    }

    /// Waiting for repository structures after a profile combination was analyzed.
    pub fn repository_analysis() -> Self {
        Self::new(Duration::from_secs(8))
            .with_initial_delay(Duration::from_secs(8))
            .with_max_elapsed(Duration::from_secs(180))
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_elapsed(mut self, budget: Duration) -> Self {
        self.max_elapsed = Some(budget);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_error_budget(mut self, errors: u32) -> Self {
        self.error_budget = errors;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_final_check(mut self, enabled: bool) -> Self {
        self.final_check = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            bail!("poll interval must be greater than zero");
        }
        if self.error_budget == 0 {
            bail!("error budget must allow at least one failed request");
        }
        if self.max_elapsed.is_none() && self.max_attempts.is_none() {
            bail!("either a time budget or an attempt budget is required");
        }
        if self.max_attempts == Some(0) || self.max_elapsed == Some(Duration::ZERO) {
            bail!("poll budgets must be greater than zero");
        }
        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            bail!("request timeout must be greater than zero");
        }
        Ok(())
    }
}

/// Observable lifecycle of a polling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollState {
    #[default]
    Idle,
    Polling,
    Succeeded,
    /// Job failure or lost connectivity.
    Failed,
    TimedOut,
}

/// Emitted while a run is in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent<S> {
    /// A check came back non-terminal.
    Progress {
        attempt: u32,
        progress: u8,
        message: String,
        status: S,
    },
    /// A check failed; polling continues while the error budget lasts.
    FetchFailed {
        attempt: u32,
        consecutive_errors: u32,
        error: String,
    },
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<S> {
    Succeeded(S),
    /// The backend reported the job as failed.
    Failed { message: String, status: S },
    /// A budget ran out first; `last` is the latest status seen.
    TimedOut { last: Option<S> },
    ConnectivityLost {
        consecutive_errors: u32,
        last_error: String,
    },
}

impl<S> PollOutcome<S> {
    pub fn state(&self) -> PollState {
        match self {
            PollOutcome::Succeeded(_) => PollState::Succeeded,
            PollOutcome::Failed { .. } | PollOutcome::ConnectivityLost { .. } => PollState::Failed,
            PollOutcome::TimedOut { .. } => PollState::TimedOut,
        }
    }
}

/// Final result of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport<S> {
    pub outcome: PollOutcome<S>,
    /// Status requests issued, final check included.
    pub attempts: u32,
    /// Failed requests over the whole run.
    pub errors: u32,
    pub elapsed: Duration,
}

impl<S> PollReport<S> {
    /// Converts anything but success into a [`PollError`].
    pub fn into_result(self) -> std::result::Result<S, PollError> {
        match self.outcome {
            PollOutcome::Succeeded(status) => Ok(status),
            PollOutcome::Failed { message, .. } => Err(PollError::JobFailed(message)),
            PollOutcome::TimedOut { .. } => Err(PollError::BudgetExhausted {
                elapsed: self.elapsed,
                attempts: self.attempts,
            }),
            PollOutcome::ConnectivityLost {
                consecutive_errors,
                last_error,
            } => Err(PollError::ConnectivityExhausted {
                consecutive_errors,
                last_error,
            }),
        }
    }
}

/// Unhappy endings of a polling run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    #[error("{0}")]
    JobFailed(String),

    #[error("no terminal status after {attempts} checks in {elapsed:?}")]
    BudgetExhausted { elapsed: Duration, attempts: u32 },

    #[error("status checks failed {consecutive_errors} times in a row: {last_error}")]
    ConnectivityExhausted {
        consecutive_errors: u32,
        last_error: String,
    },

    #[error("polling was cancelled")]
    Cancelled,
}

/// Polls a [`StatusSource`] according to a [`PollConfig`].
pub struct Poller<S> {
    source: S,
    config: PollConfig,
}

impl<S: StatusSource> Poller<S> {
    pub fn new(source: S, config: PollConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Runs in a background task and returns a handle to the session.
    pub fn spawn(self) -> PollSession<S::Status>
    where
        S: 'static,
    {
        PollSession::spawn(self)
    }

    async fn fetch(&self) -> Result<S::Status> {
        match self.config.request_timeout {
            Some(limit) => time::timeout(limit, self.source.fetch_status())
                .await
                .map_err(|_| anyhow!("status request timed out after {:?}", limit))?,
            None => self.source.fetch_status().await,
        }
    }

    /// Polls until the run resolves. Returns `None` when `cancel` fires first.
    ///
    /// Checks never overlap: a slow request delays the next check and ticks
    /// missed meanwhile are skipped. A request still in flight when the time
    /// budget ends is abandoned.
    pub async fn run(
        &self,
        cancel: &CancellationToken,
        events: &UnboundedSender<PollEvent<S::Status>>,
    ) -> Option<PollReport<S::Status>> {
        let start = Instant::now();
        let mut ticker = time::interval_at(start + self.config.initial_delay, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let deadline = self.config.max_elapsed.map(|budget| start + budget);
        let expired = async {
            match deadline {
                Some(at) => time::sleep_until(at).await,
                None => future::pending::<()>().await,
            }
        };
        tokio::pin!(expired);

        let mut attempts = 0u32;
        let mut errors = 0u32;
        let mut consecutive = 0u32;
        let mut last: Option<S::Status> = None;

        let report = |outcome: PollOutcome<S::Status>, attempts: u32, errors: u32| {
            Some(PollReport {
                outcome,
                attempts,
                errors,
                elapsed: start.elapsed(),
            })
        };

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("polling cancelled after {} checks", attempts);
                    return None;
                }
                _ = &mut expired => {
                    info!("poll budget of {:?} exhausted after {} checks", self.config.max_elapsed, attempts);
                    break;
                }
                _ = ticker.tick() => {}
            }

            attempts += 1;
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("polling cancelled during check {}", attempts);
                    return None;
                }
                _ = &mut expired => {
                    info!("poll budget of {:?} exhausted during check {}", self.config.max_elapsed, attempts);
                    break;
                }
                fetched = self.fetch() => fetched,
            };

            match fetched {
                Ok(status) => {
                    consecutive = 0;
                    match status.verdict() {
                        Verdict::Succeeded => {
                            info!("terminal status after {} checks: {:?}", attempts, status);
                            return report(PollOutcome::Succeeded(status), attempts, errors);
                        }
                        Verdict::Failed(message) => {
                            warn!("backend reported failure: {}", message);
                            return report(PollOutcome::Failed { message, status }, attempts, errors);
                        }
                        Verdict::Pending => {
                            debug!("check {}: {:?}", attempts, status);
                            let _ = events.send(PollEvent::Progress {
                                attempt: attempts,
                                progress: status.progress(),
                                message: status.message(),
                                status: status.clone(),
                            });
                            last = Some(status);
                        }
                    }
                }
                Err(e) => {
                    errors += 1;
                    consecutive += 1;
                    warn!("status check {} failed ({} in a row): {:#}", attempts, consecutive, e);
                    let _ = events.send(PollEvent::FetchFailed {
                        attempt: attempts,
                        consecutive_errors: consecutive,
                        error: e.to_string(),
                    });
                    if consecutive >= self.config.error_budget {
                        return report(
                            PollOutcome::ConnectivityLost {
                                consecutive_errors: consecutive,
                                last_error: e.to_string(),
                            },
                            attempts,
                            errors,
                        );
                    }
                }
            }

            if self.config.max_attempts.is_some_and(|max| attempts >= max) {
                info!("attempt budget of {} checks exhausted", attempts);
                break;
            }
        }

        if self.config.final_check {
            attempts += 1;
            // Bounded by one interval so the run never outlasts budget + interval.
            let limit = self.config.interval;
            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => return None,
                fetched = time::timeout(limit, self.fetch()) => fetched
                    .map_err(|_| anyhow!("final status check timed out after {:?}", limit))
                    .and_then(|fetched| fetched),
            };
            match fetched {
                Ok(status) => match status.verdict() {
                    Verdict::Succeeded => {
                        info!("final check found a terminal status: {:?}", status);
                        return report(PollOutcome::Succeeded(status), attempts, errors);
                    }
                    Verdict::Failed(message) => {
                        return report(PollOutcome::Failed { message, status }, attempts, errors);
                    }
                    Verdict::Pending => last = Some(status),
                },
                Err(e) => {
                    errors += 1;
                    warn!("final status check failed: {:#}", e);
                }
            }
        }

        report(PollOutcome::TimedOut { last }, attempts, errors)
    }
}

#[cfg(test)]
#[path = "tests/poller.rs"]
mod tests;
