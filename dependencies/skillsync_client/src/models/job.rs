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

use serde::{Deserialize, Serialize};
use std::fmt;

// SCREAMING_SNAKE_CASE converts capitalization and separates words with underscores
// e.g. "ExtractedProfile" matches "EXTRACTED_PROFILE" as in our API.
/// Stage of a recommendation job, in the order the backend moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    ExtractedProfile,
    DomainsExtracted,
    SearchCompleted,
    AnalyzedProjects,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// `COMPLETED` and `FAILED` end a job; every other stage is still running.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl Default for JobStatus {
    fn default() -> Self {
        JobStatus::Pending
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "PENDING",
            JobStatus::ExtractedProfile => "EXTRACTED_PROFILE",
            JobStatus::DomainsExtracted => "DOMAINS_EXTRACTED",
            JobStatus::SearchCompleted => "SEARCH_COMPLETED",
            JobStatus::AnalyzedProjects => "ANALYZED_PROJECTS",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

/// Response of `GET /api/opensource/status/{jobId}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    /// A missing status means the job has not been picked up yet.
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
