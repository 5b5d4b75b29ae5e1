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


use super::TimeoutPolicy;
use crate::backend::InsightBackend;
use crate::models::{Destination, Notice, Severity};
use crate::poller::{PollConfig, PollEvent, PollOutcome, Poller};
use crate::sources::EnrichmentSource;

use anyhow::Result;
use log::{error, info, warn};
use skillsync_api::models::EnrichmentStatus;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

const DUPLICATE_MARKERS: [&str; 3] = ["duplicate", "already", "processed"];

/// How an enrichment request ended for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentResolution {
    /// Insights existed before anything was triggered.
    AlreadyAvailable,
    Ready,
    /// The backend refused to enrich again because it already had.
    AlreadyCompleted,
    /// Ran out of budget; treated as done under [`TimeoutPolicy::Optimistic`].
    ReadyAssumed,
    /// Ran out of budget under [`TimeoutPolicy::Strict`].
    TimedOut,
    ConnectionError { last_error: String },
    Failed(String),
    Cancelled,
}

impl EnrichmentResolution {
    pub fn notice(&self) -> Option<Notice> {
        let notice = match self {
            EnrichmentResolution::AlreadyAvailable => Notice::new(
                Severity::Success,
                "Insights Ready!",
                "Your AI-powered analysis was already available.",
            ),
            EnrichmentResolution::Ready => Notice::new(
                Severity::Success,
                "Success!",
                "Your AI-powered insights are ready.",
            ),
            EnrichmentResolution::AlreadyCompleted => Notice::new(
                Severity::Info,
                "Analysis Already Complete",
                "Your profiles have already been analyzed.",
            ),
            EnrichmentResolution::ReadyAssumed => Notice::new(
                Severity::Info,
                "Analysis Complete",
                "Your profiles have already been analyzed. Redirecting to insights...",
            ),
            EnrichmentResolution::TimedOut => Notice::new(
                Severity::Warning,
                "Analysis Still Running",
                "Your insights are not ready yet. Check back in a few minutes.",
            ),
            EnrichmentResolution::ConnectionError { .. } => Notice::new(
                Severity::Destructive,
                "Connection Error",
                "Unable to check analysis status. Redirecting to dashboard...",
            ),
            EnrichmentResolution::Failed(message) => Notice::new(
                Severity::Destructive,
                "Analysis Failed",
                if message.is_empty() {
                    "Could not start the AI analysis process."
                } else {
                    message.as_str()
                },
            ),
            EnrichmentResolution::Cancelled => return None,
        };
        Some(notice)
    }

    /// Lost connectivity still goes to the dashboard: the data may be there.
    pub fn destination(&self) -> Destination {
        match self {
            EnrichmentResolution::Failed(_) => Destination::Analyzer,
            EnrichmentResolution::TimedOut | EnrichmentResolution::Cancelled => {
                Destination::Stay
            }
            _ => Destination::Dashboard,
        }
    }
}

fn is_duplicate(message: &str) -> bool {
    let message = message.to_lowercase();
    DUPLICATE_MARKERS.iter().any(|m| message.contains(m))
}

/// Check, trigger, then wait for AI enrichment of the connected profiles.
pub struct EnrichmentFlow {
    backend: Arc<dyn InsightBackend>,
    config: PollConfig,
    policy: TimeoutPolicy,
}

impl EnrichmentFlow {
    pub fn new(backend: Arc<dyn InsightBackend>) -> Self {
        Self {
            backend,
            config: PollConfig::enrichment(),
            policy: TimeoutPolicy::default(),
        }
    }

    pub fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fails only when the poll configuration is invalid.
    pub async fn run(
        &self,
        cancel: &CancellationToken,
        events: &UnboundedSender<PollEvent<EnrichmentStatus>>,
    ) -> Result<EnrichmentResolution> {
        let source = EnrichmentSource::new(self.backend.clone());
        let poller = Poller::new(source, self.config.clone())?;

        let current = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(EnrichmentResolution::Cancelled),
            current = self.backend.processing_status() => current,
        };
        match current {
            Ok(status) if status.enriched => {
                info!("insights already available");
                return Ok(EnrichmentResolution::AlreadyAvailable);
            }
            Ok(_) => {}
            Err(e) => {
                error!("could not read enrichment status: {:#}", e);
                return Ok(EnrichmentResolution::Failed(e.to_string()));
            }
        }

        let triggered = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(EnrichmentResolution::Cancelled),
            triggered = self.backend.trigger_enrichment() => triggered,
        };
        if let Err(e) = triggered {
            let message = e.to_string();
            if is_duplicate(&message) {
                info!("enrichment was already done: {}", message);
                return Ok(EnrichmentResolution::AlreadyCompleted);
            }
            error!("enrichment could not be started: {}", message);
            return Ok(EnrichmentResolution::Failed(message));
        }
        info!("enrichment triggered, waiting for results");

        let Some(report) = poller.run(cancel, events).await else {
            return Ok(EnrichmentResolution::Cancelled);
        };
        let resolution = match report.outcome {
            PollOutcome::Succeeded(_) => EnrichmentResolution::Ready,
            // The status endpoint has no failure state; kept for completeness.
            PollOutcome::Failed { message, .. } => EnrichmentResolution::Failed(message),
            PollOutcome::TimedOut { .. } => match self.policy {
                TimeoutPolicy::Optimistic => {
                    warn!(
                        "no enriched status after {} checks, assuming it finished",
                        report.attempts
                    );
                    EnrichmentResolution::ReadyAssumed
                }
                TimeoutPolicy::Strict => EnrichmentResolution::TimedOut,
            },
            PollOutcome::ConnectivityLost { last_error, .. } => {
                EnrichmentResolution::ConnectionError { last_error }
            }
        };
        Ok(resolution)
    }
}

#[cfg(test)]
#[path = "tests/enrichment.rs"]
mod tests;
