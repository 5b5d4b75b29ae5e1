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


use crate::backend::InsightBackend;
use crate::models::{Notice, Severity};
use crate::poller::{PollConfig, PollEvent, PollOutcome, Poller};
use crate::sources::RepositoryAnalysisSource;

use anyhow::Result;
use log::{info, warn};
use skillsync_api::models::{GithubStats, ProfileCombination};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub enum RepositoryAnalysisResolution {
    Analyzed {
        profile_name: String,
        stats: GithubStats,
    },
    /// Structures did not show up in time; the backend keeps working.
    StillRunning,
    ConnectionError { last_error: String },
    /// The combination has no GitHub account to analyze.
    NoGithubProfile,
    Cancelled,
}

impl RepositoryAnalysisResolution {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            RepositoryAnalysisResolution::Analyzed { profile_name, .. } => Some(Notice::new(
                Severity::Success,
                "Analysis Complete",
                format!("Detailed analysis for \"{profile_name}\" is now ready."),
            )),
            RepositoryAnalysisResolution::StillRunning => Some(Notice::new(
                Severity::Destructive,
                "Analysis Taking Longer Than Expected",
                "The repository analysis is still processing. You can check back in a few moments.",
            )),
            RepositoryAnalysisResolution::ConnectionError { last_error } => Some(Notice::new(
                Severity::Destructive,
                "Error",
                last_error.as_str(),
            )),
            RepositoryAnalysisResolution::NoGithubProfile
            | RepositoryAnalysisResolution::Cancelled => None,
        }
    }
}

/// Waits for repository structures of a freshly analyzed profile combination.
pub struct RepositoryAnalysisFlow {
    backend: Arc<dyn InsightBackend>,
    config: PollConfig,
}

impl RepositoryAnalysisFlow {
    pub fn new(backend: Arc<dyn InsightBackend>) -> Self {
        Self {
            backend,
            config: PollConfig::repository_analysis(),
        }
    }

    pub fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    pub async fn run(
        &self,
        combination: &ProfileCombination,
        cancel: &CancellationToken,
        events: &UnboundedSender<PollEvent<GithubStats>>,
    ) -> Result<RepositoryAnalysisResolution> {
        let Some(github_username) = combination
            .github_username
            .as_deref()
            .filter(|u| !u.trim().is_empty())
        else {
            return Ok(RepositoryAnalysisResolution::NoGithubProfile);
        };
        let profile_name = combination
            .profile_name
            .clone()
            .unwrap_or_else(|| github_username.to_string());

        info!(
            "waiting for repository analysis of combination {} ({})",
            combination.combination_id, github_username
        );
        let source = RepositoryAnalysisSource::new(self.backend.clone(), github_username);
        let poller = Poller::new(source, self.config.clone())?;
        let Some(report) = poller.run(cancel, events).await else {
            return Ok(RepositoryAnalysisResolution::Cancelled);
        };

        let resolution = match report.outcome {
            PollOutcome::Succeeded(stats) => {
                RepositoryAnalysisResolution::Analyzed { profile_name, stats }
            }
            // Stats carry no failure state, a run can only succeed or stop.
            PollOutcome::Failed { .. } | PollOutcome::TimedOut { .. } => {
                warn!(
                    "repository analysis of combination {} not done after {:?}",
                    combination.combination_id, report.elapsed
                );
                RepositoryAnalysisResolution::StillRunning
            }
            PollOutcome::ConnectivityLost { last_error, .. } => {
                RepositoryAnalysisResolution::ConnectionError { last_error }
            }
        };
        Ok(resolution)
    }
}

#[cfg(test)]
#[path = "tests/repository.rs"]
mod tests;
