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
use crate::models::{Notice, Severity};
use crate::poller::{PollConfig, PollEvent, PollOutcome, Poller};
use crate::session::SessionContext;
use crate::sources::RecommendationJobSource;

use anyhow::Result;
use log::{error, info, warn};
use skillsync_api::models::{GenerateRequest, JobStatusResponse, Recommendation};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

pub const NO_JOB_ID: &str = "No job ID received from server";
pub const NO_RECOMMENDATIONS: &str = "No recommendations found in response";

/// How a recommendation request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationResolution {
    /// `complete` is false when results were picked up after the wait ran out.
    Found {
        recommendations: Vec<Recommendation>,
        complete: bool,
    },
    /// The job completed but its results could not be loaded.
    ResultsUnavailable { reason: String },
    /// The job could not be started.
    GenerationError(String),
    /// The backend reported the job as failed.
    GenerationFailed(String),
    StillProcessing { job_id: String },
    ConnectionError { last_error: String },
    Cancelled,
}

impl RecommendationResolution {
    pub fn recommendations(&self) -> &[Recommendation] {
        match self {
            RecommendationResolution::Found {
                recommendations, ..
            } => recommendations,
            _ => &[],
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        let notice = match self {
            RecommendationResolution::Found {
                recommendations,
                complete: true,
            } => Notice::new(
                Severity::Success,
                "Success!",
                format!(
                    "Found {} projects matching your skills",
                    recommendations.len()
                ),
            ),
            RecommendationResolution::Found {
                recommendations,
                complete: false,
            } => Notice::new(
                Severity::Warning,
                "Recommendations Loaded",
                format!(
                    "Found {} projects matching your skills. The job was still finishing, more may appear later.",
                    recommendations.len()
                ),
            ),
            RecommendationResolution::ResultsUnavailable { .. } => Notice::new(
                Severity::Destructive,
                "Results Error",
                "Failed to load recommendations",
            ),
            RecommendationResolution::GenerationError(message) => {
                Notice::new(Severity::Destructive, "Generation Error", message.as_str())
            }
            RecommendationResolution::GenerationFailed(message) => {
                Notice::new(Severity::Destructive, "Generation Failed", message.as_str())
            }
            RecommendationResolution::StillProcessing { .. } => Notice::new(
                Severity::Warning,
                "Still Working",
                "Recommendations are still being generated. Check your saved recommendations in a few minutes.",
            ),
            RecommendationResolution::ConnectionError { .. } => Notice::new(
                Severity::Destructive,
                "Connection Error",
                "Unable to check recommendation status. Check your connection.",
            ),
            RecommendationResolution::Cancelled => return None,
        };
        Some(notice)
    }
}

/// Greeting for a user who already has saved recommendations.
pub fn saved_notice(saved: &[Recommendation]) -> Option<Notice> {
    if saved.is_empty() {
        return None;
    }
    Some(Notice::new(
        Severity::Success,
        "Welcome back!",
        format!("Loaded {} saved recommendations", saved.len()),
    ))
}

/// Open-source project recommendations for the signed-in user.
pub struct RecommendationFlow {
    backend: Arc<dyn InsightBackend>,
    config: PollConfig,
    policy: TimeoutPolicy,
}

impl RecommendationFlow {
    /// Fails when nobody is signed in.
    pub fn new(session: &SessionContext) -> Result<Self> {
        let user = session.require_user()?;
        info!("recommendations for user {}", user.id);
        Ok(Self {
            backend: session.backend(),
            config: PollConfig::recommendations(),
            policy: TimeoutPolicy::default(),
        })
    }

    pub fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_timeout_policy(mut self, policy: TimeoutPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Saved recommendations; empty when there are none or they could not be read.
    pub async fn load_saved(&self) -> Vec<Recommendation> {
        match self.backend.saved_recommendations().await {
            Ok(saved) => saved.recommendations,
            Err(e) => {
                info!("no saved recommendations: {:#}", e);
                Vec::new()
            }
        }
    }

    /// Starts a recommendation job and waits for it.
    ///
    /// Fails only when the poll configuration is invalid.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
        cancel: &CancellationToken,
        events: &UnboundedSender<PollEvent<JobStatusResponse>>,
    ) -> Result<RecommendationResolution> {
        self.config.validate()?;

        let started = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(RecommendationResolution::Cancelled),
            started = self.backend.generate_recommendations(request) => started,
        };
        let job_id = match started {
            Ok(resp) => match resp.job_id.filter(|id| !id.is_empty()) {
                Some(id) => id,
                None => {
                    error!("{}", NO_JOB_ID);
                    return Ok(RecommendationResolution::GenerationError(NO_JOB_ID.to_string()));
                }
            },
            Err(e) => {
                error!("could not start recommendation job: {:#}", e);
                return Ok(RecommendationResolution::GenerationError(e.to_string()));
            }
        };
        info!("recommendation job {} started", job_id);

        let source = RecommendationJobSource::new(self.backend.clone(), job_id.as_str());
        let poller = Poller::new(source, self.config.clone())?;
        let Some(report) = poller.run(cancel, events).await else {
            return Ok(RecommendationResolution::Cancelled);
        };

        let resolution = match report.outcome {
            PollOutcome::Succeeded(_) => self.fetch_results(&job_id, true).await,
            PollOutcome::Failed { message, .. } => {
                RecommendationResolution::GenerationFailed(message)
            }
            PollOutcome::TimedOut { .. } => match self.policy {
                TimeoutPolicy::Optimistic => {
                    warn!("job {} still running after {:?}", job_id, report.elapsed);
                    match self.fetch_results(&job_id, false).await {
                        found @ RecommendationResolution::Found { .. } => found,
                        _ => RecommendationResolution::StillProcessing { job_id },
                    }
                }
                TimeoutPolicy::Strict => RecommendationResolution::StillProcessing { job_id },
            },
            PollOutcome::ConnectivityLost { last_error, .. } => {
                RecommendationResolution::ConnectionError { last_error }
            }
        };
        Ok(resolution)
    }

    async fn fetch_results(&self, job_id: &str, complete: bool) -> RecommendationResolution {
        match self.backend.job_results(job_id).await {
            Ok(set) if !set.is_empty() => RecommendationResolution::Found {
                recommendations: set.recommendations,
                complete,
            },
            Ok(_) => {
                warn!("job {}: {}", job_id, NO_RECOMMENDATIONS);
                RecommendationResolution::ResultsUnavailable {
                    reason: NO_RECOMMENDATIONS.to_string(),
                }
            }
            Err(e) => {
                error!("job {}: could not load results: {:#}", job_id, e);
                RecommendationResolution::ResultsUnavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Clears the saved recommendations.
    pub async fn delete(&self) -> Result<()> {
        self.backend.delete_recommendations().await?;
        info!("saved recommendations cleared");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/recommendations.rs"]
mod tests;
