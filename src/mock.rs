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

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use serde_json::{json, Value};
use skillsync_api::models::{
    AuthStatus, EnrichmentStatus, GenerateRequest, GenerateResponse, GithubRepo, GithubStats,
    JobStatusResponse, Me, Recommendation, RecommendationSet,
};
use skillsync_api::JobStatus;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

type Reply<T> = std::result::Result<T, String>;

/// Answers replayed in order; the last one repeats once the others are used up.
#[derive(Debug)]
struct Script<T> {
    replies: VecDeque<Reply<T>>,
}

impl<T: Clone + Default> Script<T> {
    fn new() -> Self {
        Self {
            replies: VecDeque::new(),
        }
    }

    fn set(&mut self, replies: impl IntoIterator<Item = Reply<T>>) {
        self.replies = replies.into_iter().collect();
    }

    fn next(&mut self) -> Result<T> {
        let reply = if self.replies.len() > 1 {
            self.replies.pop_front()
        } else {
            self.replies.front().cloned()
        };
        reply.unwrap_or_else(|| Ok(T::default())).map_err(|e| anyhow!(e))
    }
}

/// In-process stand-in for the SkillSync backend.
///
/// Never touches the network. Every answer is scripted up front and every
/// call is counted, so tests can check both what a flow saw and how often
/// it asked.
#[derive(Debug)]
pub struct MockBackend {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    user: Option<Me>,
    session_valid: bool,
    logout_error: Option<String>,
    processing: Script<EnrichmentStatus>,
    trigger: Reply<Value>,
    job_id: Option<String>,
    jobs: Script<JobStatusResponse>,
    results: Script<RecommendationSet>,
    saved: Script<RecommendationSet>,
    github: Script<GithubStats>,
    start_delay: Option<Duration>,
    calls: HashMap<&'static str, u32>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// A signed-out backend where nothing has been processed yet.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                user: None,
                session_valid: false,
                logout_error: None,
                processing: Script::new(),
                trigger: Ok(json!({ "message": "Enrichment started" })),
                job_id: Some(format!("MOCK_JOB_{}", Uuid::new_v4())),
                jobs: Script::new(),
                results: Script::new(),
                saved: Script::new(),
                github: Script::new(),
                start_delay: None,
                calls: HashMap::new(),
            }),
        }
    }

    /// A signed-in backend whose jobs all finish after a few checks.
    pub fn demo() -> Self {
        let mock = Self::new();
        mock.sign_in(Me {
            user_id: Some("demo-user".to_string()),
            email: Some("demo@skillsync.dev".to_string()),
            name: Some("Demo User".to_string()),
            picture: None,
        });
        let pending = EnrichmentStatus {
            github_enriched: Some(true),
            leetcode_enriched: Some(false),
            ..Default::default()
        };
        mock.script_processing_status([
            Ok(EnrichmentStatus::default()),
            Ok(pending),
            Ok(EnrichmentStatus {
                enriched: true,
                github_enriched: Some(true),
                leetcode_enriched: Some(true),
                user_id: Some("demo-user".to_string()),
            }),
        ]);
        mock.script_job_statuses(
            [
                JobStatus::Pending,
                JobStatus::ExtractedProfile,
                JobStatus::DomainsExtracted,
                JobStatus::SearchCompleted,
                JobStatus::AnalyzedProjects,
                JobStatus::Completed,
            ]
            .into_iter()
            .map(|status| {
                Ok(JobStatusResponse {
                    status,
                    error_message: None,
                })
            }),
        );
        let set = RecommendationSet {
            recommendations: vec![
                sample_recommendation("tokio", "tokio-rs", "Rust", 27000),
                sample_recommendation("serde", "serde-rs", "Rust", 9000),
            ],
        };
        mock.script_job_results([Ok(set)]);
        mock.script_github_stats([
            Ok(GithubStats {
                repos: vec![repo("hello-world", None)],
                ..Default::default()
            }),
            Ok(GithubStats {
                repos: vec![repo("hello-world", Some(json!({ "src": ["main.rs"] })))],
                ..Default::default()
            }),
        ]);
        mock
    }

    pub fn sign_in(&self, user: Me) {
        let mut inner = self.inner.lock().unwrap();
        inner.user = Some(user);
        inner.session_valid = true;
    }

    pub fn sign_out(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.user = None;
        inner.session_valid = false;
    }

    /// Makes `logout` fail with `message`.
    pub fn fail_logout(&self, message: &str) {
        self.inner.lock().unwrap().logout_error = Some(message.to_string());
    }

    pub fn script_processing_status(
        &self,
        replies: impl IntoIterator<Item = Reply<EnrichmentStatus>>,
    ) {
        self.inner.lock().unwrap().processing.set(replies);
    }

    pub fn set_trigger_reply(&self, reply: Reply<Value>) {
        self.inner.lock().unwrap().trigger = reply;
    }

    /// Delays the answers of `trigger_enrichment` and `generate_recommendations`.
    pub fn set_start_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().start_delay = Some(delay);
    }

    /// `None` makes `generate_recommendations` answer without a job id.
    pub fn set_job_id(&self, job_id: Option<&str>) {
        self.inner.lock().unwrap().job_id = job_id.map(str::to_string);
    }

    pub fn script_job_statuses(&self, replies: impl IntoIterator<Item = Reply<JobStatusResponse>>) {
        self.inner.lock().unwrap().jobs.set(replies);
    }

    pub fn script_job_results(&self, replies: impl IntoIterator<Item = Reply<RecommendationSet>>) {
        self.inner.lock().unwrap().results.set(replies);
    }

    pub fn script_saved(&self, replies: impl IntoIterator<Item = Reply<RecommendationSet>>) {
        self.inner.lock().unwrap().saved.set(replies);
    }

    pub fn script_github_stats(&self, replies: impl IntoIterator<Item = Reply<GithubStats>>) {
        self.inner.lock().unwrap().github.set(replies);
    }

    /// How often `operation` (an [`InsightBackend`] method name) was called.
    pub fn calls(&self, operation: &str) -> u32 {
        let inner = self.inner.lock().unwrap();
        inner.calls.get(operation).copied().unwrap_or(0)
    }

    fn record(&self, operation: &'static str) -> std::sync::MutexGuard<'_, Inner> {
        let mut inner = self.inner.lock().unwrap();
        *inner.calls.entry(operation).or_insert(0) += 1;
        debug!("mock backend: {}", operation);
        inner
    }
}

fn sample_recommendation(name: &str, owner: &str, language: &str, stars: u64) -> Recommendation {
    Recommendation {
        project_name: Some(name.to_string()),
        owner: Some(owner.to_string()),
        project_url: Some(format!("https://github.com/{owner}/{name}")),
        description: Some(format!("{name} ({language})")),
        primary_language: Some(language.to_string()),
        stars: Some(stars),
        match_reason: Some(format!("You write a lot of {language}")),
        ..Default::default()
    }
}

fn repo(name: &str, structure: Option<Value>) -> GithubRepo {
    GithubRepo {
        name: Some(name.to_string()),
        repository_structure: structure,
        ..Default::default()
    }
}

#[async_trait]
impl InsightBackend for MockBackend {
    async fn auth_status(&self) -> AuthStatus {
        let inner = self.record("auth_status");
        AuthStatus {
            valid: inner.session_valid,
        }
    }

    async fn me(&self) -> Result<Option<Me>> {
        let inner = self.record("me");
        Ok(inner.user.clone())
    }

    async fn logout(&self) -> Result<()> {
        let mut inner = self.record("logout");
        if let Some(message) = inner.logout_error.clone() {
            return Err(anyhow!(message));
        }
        inner.user = None;
        inner.session_valid = false;
        Ok(())
    }

    async fn processing_status(&self) -> Result<EnrichmentStatus> {
        self.record("processing_status").processing.next()
    }

    async fn trigger_enrichment(&self) -> Result<Value> {
        let (reply, delay) = {
            let inner = self.record("trigger_enrichment");
            (inner.trigger.clone(), inner.start_delay)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        reply.map_err(|e| anyhow!(e))
    }

    async fn generate_recommendations(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse> {
        let (job_id, delay) = {
            let inner = self.record("generate_recommendations");
            (inner.job_id.clone(), inner.start_delay)
        };
        debug!("mock generate: {:?}", request);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(GenerateResponse { job_id })
    }

    async fn job_status(&self, _job_id: &str) -> Result<JobStatusResponse> {
        self.record("job_status").jobs.next()
    }

    async fn job_results(&self, _job_id: &str) -> Result<RecommendationSet> {
        self.record("job_results").results.next()
    }

    async fn saved_recommendations(&self) -> Result<RecommendationSet> {
        self.record("saved_recommendations").saved.next()
    }

    async fn delete_recommendations(&self) -> Result<()> {
        let mut inner = self.record("delete_recommendations");
        inner.saved.set([Ok(RecommendationSet::default())]);
        Ok(())
    }

    async fn github_stats(&self, _github_username: &str) -> Result<GithubStats> {
        self.record("github_stats").github.next()
    }
}
