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


use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use skillsync_api::models::{
    AuthStatus, EnrichmentStatus, GenerateRequest, GenerateResponse, GithubStats,
    JobStatusResponse, Me, RecommendationSet,
};
use skillsync_api::Client;

/// The backend operations the flows depend on.
///
/// Implemented by the HTTP [`Client`] and by [`crate::MockBackend`] for
/// offline runs and tests.
#[async_trait]
pub trait InsightBackend: Send + Sync {
    /// Whether the current session is still accepted. Never fails.
    async fn auth_status(&self) -> AuthStatus;

    /// The signed-in user, or `None` when there is no session.
    async fn me(&self) -> Result<Option<Me>>;

    async fn logout(&self) -> Result<()>;

    async fn processing_status(&self) -> Result<EnrichmentStatus>;

    /// Starts AI enrichment of the connected profiles.
    async fn trigger_enrichment(&self) -> Result<Value>;

    async fn generate_recommendations(&self, request: &GenerateRequest)
        -> Result<GenerateResponse>;

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse>;

    async fn job_results(&self, job_id: &str) -> Result<RecommendationSet>;

    async fn saved_recommendations(&self) -> Result<RecommendationSet>;

    async fn delete_recommendations(&self) -> Result<()>;

    async fn github_stats(&self, github_username: &str) -> Result<GithubStats>;
}

#[async_trait]
impl InsightBackend for Client {
    async fn auth_status(&self) -> AuthStatus {
        Client::auth_status(self).await
    }

    async fn me(&self) -> Result<Option<Me>> {
        Client::me(self).await
    }

    async fn logout(&self) -> Result<()> {
        Client::logout(self).await
    }

    async fn processing_status(&self) -> Result<EnrichmentStatus> {
        Client::processing_status(self).await
    }

    async fn trigger_enrichment(&self) -> Result<Value> {
        Client::trigger_enrichment(self).await
    }

    async fn generate_recommendations(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse> {
        Client::generate_recommendations(self, request).await
    }

    async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse> {
        Client::job_status(self, job_id).await
    }

    async fn job_results(&self, job_id: &str) -> Result<RecommendationSet> {
        Client::job_results(self, job_id).await
    }

    async fn saved_recommendations(&self) -> Result<RecommendationSet> {
        Client::saved_recommendations(self).await
    }

    async fn delete_recommendations(&self) -> Result<()> {
        Client::delete_recommendations(self).await
    }

    async fn github_stats(&self, github_username: &str) -> Result<GithubStats> {
        Client::github_stats(self, github_username).await
    }
}
