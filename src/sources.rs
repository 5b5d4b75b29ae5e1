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


//! What the poller polls: status endpoints and how their answers classify.

use crate::backend::InsightBackend;
use anyhow::Result;
use async_trait::async_trait;
use skillsync_api::models::{EnrichmentStatus, GithubStats, JobStatusResponse};
use skillsync_api::JobStatus;
use std::fmt::Debug;
use std::sync::Arc;

/// Message shown for a failed job that did not say why.
pub const UNKNOWN_FAILURE: &str = "Unknown error occurred";

/// Classification of one status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Still running.
    Pending,
    Succeeded,
    /// The backend gave up on the job.
    Failed(String),
}

/// A status response the poller knows how to classify.
pub trait PollStatus: Clone + Debug + Send + Sync + 'static {
    fn verdict(&self) -> Verdict;

    /// Completion estimate in percent.
    fn progress(&self) -> u8;

    /// One-line description of the current stage.
    fn message(&self) -> String;
}

/// A status endpoint that can be queried repeatedly.
#[async_trait]
pub trait StatusSource: Send + Sync {
    type Status: PollStatus;

    async fn fetch_status(&self) -> Result<Self::Status>;
}

/// Progress of a recommendation job at `status`.
pub fn job_progress(status: JobStatus) -> u8 {
    match status {
        JobStatus::Pending => 10,
        JobStatus::ExtractedProfile => 20,
        JobStatus::DomainsExtracted => 30,
        JobStatus::SearchCompleted => 50,
        JobStatus::AnalyzedProjects => 70,
        JobStatus::Completed | JobStatus::Failed => 100,
        JobStatus::Unknown => 10,
    }
}

pub fn job_message(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Pending => "Starting recommendation engine...",
        JobStatus::ExtractedProfile => "Extracted your GitHub profile",
        JobStatus::DomainsExtracted => "Analyzed your technical domains",
        JobStatus::SearchCompleted => "Searching matching projects...",
        JobStatus::AnalyzedProjects => "Analyzing project structures...",
        JobStatus::Completed => "Finalizing recommendations...",
        JobStatus::Failed => "Process failed",
        JobStatus::Unknown => "Processing...",
    }
}

impl PollStatus for JobStatusResponse {
    fn verdict(&self) -> Verdict {
        match self.status {
            JobStatus::Completed => Verdict::Succeeded,
            JobStatus::Failed => Verdict::Failed(
                self.error_message
                    .clone()
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| UNKNOWN_FAILURE.to_string()),
            ),
            _ => Verdict::Pending,
        }
    }

    fn progress(&self) -> u8 {
        job_progress(self.status)
    }

    fn message(&self) -> String {
        job_message(self.status).to_string()
    }
}

impl PollStatus for EnrichmentStatus {
    fn verdict(&self) -> Verdict {
        if self.enriched {
            Verdict::Succeeded
        } else {
            Verdict::Pending
        }
    }

    /// 100 once enriched, otherwise the share of platforms already done.
    fn progress(&self) -> u8 {
        if self.enriched {
            return 100;
        }
        let flags = [self.github_enriched, self.leetcode_enriched];
        let known = flags.iter().flatten().count();
        if known == 0 {
            return 0;
        }
        let done = flags.iter().flatten().filter(|done| **done).count();
        (done * 100 / flags.len()) as u8
    }

    fn message(&self) -> String {
        if self.enriched {
            return "Analysis complete!".to_string();
        }
        match (self.github_enriched, self.leetcode_enriched) {
            (Some(true), Some(true)) => "Combining platform insights...".to_string(),
            (Some(true), _) => "GitHub analyzed, waiting for LeetCode...".to_string(),
            (_, Some(true)) => "LeetCode analyzed, waiting for GitHub...".to_string(),
            _ => "AI is analyzing your profiles...".to_string(),
        }
    }
}

impl PollStatus for GithubStats {
    fn verdict(&self) -> Verdict {
        if self.structure_analyzed() {
            Verdict::Succeeded
        } else {
            Verdict::Pending
        }
    }

    fn progress(&self) -> u8 {
        if self.structure_analyzed() {
            100
        } else {
            0
        }
    }

    fn message(&self) -> String {
        if self.structure_analyzed() {
            "Repository analysis complete".to_string()
        } else {
            format!("Analyzing {} repositories...", self.repos.len())
        }
    }
}

/// `GET /api/indepth/profiles/enriched/status`
pub struct EnrichmentSource {
    backend: Arc<dyn InsightBackend>,
}

impl EnrichmentSource {
    pub fn new(backend: Arc<dyn InsightBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl StatusSource for EnrichmentSource {
    type Status = EnrichmentStatus;

    async fn fetch_status(&self) -> Result<EnrichmentStatus> {
        self.backend.processing_status().await
    }
}

/// `GET /api/opensource/status/{jobId}`
pub struct RecommendationJobSource {
    backend: Arc<dyn InsightBackend>,
    job_id: String,
}

impl RecommendationJobSource {
    pub fn new(backend: Arc<dyn InsightBackend>, job_id: impl Into<String>) -> Self {
        Self {
            backend,
            job_id: job_id.into(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

#[async_trait]
impl StatusSource for RecommendationJobSource {
    type Status = JobStatusResponse;

    async fn fetch_status(&self) -> Result<JobStatusResponse> {
        self.backend.job_status(&self.job_id).await
    }
}

/// `GET /api/github/raw-stats` for one GitHub account.
pub struct RepositoryAnalysisSource {
    backend: Arc<dyn InsightBackend>,
    github_username: String,
}

impl RepositoryAnalysisSource {
    pub fn new(backend: Arc<dyn InsightBackend>, github_username: impl Into<String>) -> Self {
        Self {
            backend,
            github_username: github_username.into(),
        }
    }
}

#[async_trait]
impl StatusSource for RepositoryAnalysisSource {
    type Status = GithubStats;

    async fn fetch_status(&self) -> Result<GithubStats> {
        self.backend.github_stats(&self.github_username).await
    }
}
