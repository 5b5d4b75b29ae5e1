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


use super::*;
use crate::MockBackend;
use serde_json::json;
use skillsync_api::models::GithubRepo;
use tokio::sync::mpsc;

fn combination(github_username: Option<&str>) -> ProfileCombination {
    ProfileCombination {
        combination_id: "c-1".to_string(),
        profile_name: Some("Backend profile".to_string()),
        github_username: github_username.map(str::to_string),
        leetcode_username: Some("leet".to_string()),
        ..Default::default()
    }
}

fn stats(analyzed: bool) -> GithubStats {
    GithubStats {
        repos: vec![GithubRepo {
            name: Some("service".to_string()),
            repository_structure: analyzed.then(|| json!({ "src": ["lib.rs"] })),
            ..Default::default()
        }],
        ..Default::default()
    }
}

async fn run_flow(backend: &Arc<MockBackend>, github_username: Option<&str>) -> RepositoryAnalysisResolution {
    let (tx, _rx) = mpsc::unbounded_channel();
    RepositoryAnalysisFlow::new(backend.clone())
        .run(&combination(github_username), &CancellationToken::new(), &tx)
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_structures_end_the_wait() {
    let backend = Arc::new(MockBackend::new());
    backend.script_github_stats([Ok(stats(false)), Ok(stats(true))]);

    let resolution = run_flow(&backend, Some("octocat")).await;

    assert_eq!(
        resolution,
        RepositoryAnalysisResolution::Analyzed {
            profile_name: "Backend profile".to_string(),
            stats: stats(true),
        }
    );
    assert_eq!(
        resolution.notice().unwrap().description,
        "Detailed analysis for \"Backend profile\" is now ready."
    );
    assert_eq!(backend.calls("github_stats"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_slow_analysis_warns_after_budget() {
    let backend = Arc::new(MockBackend::new());
    backend.script_github_stats([Ok(stats(false))]);

    let resolution = run_flow(&backend, Some("octocat")).await;

    assert_eq!(resolution, RepositoryAnalysisResolution::StillRunning);
    let notice = resolution.notice().unwrap();
    assert_eq!(notice.title, "Analysis Taking Longer Than Expected");
    assert_eq!(notice.severity, Severity::Destructive);
    // every 8s from 8s to 176s
    assert_eq!(backend.calls("github_stats"), 22);
}

#[tokio::test(start_paused = true)]
async fn test_combination_without_github() {
    let backend = Arc::new(MockBackend::new());

    let resolution = run_flow(&backend, None).await;

    assert_eq!(resolution, RepositoryAnalysisResolution::NoGithubProfile);
    assert_eq!(backend.calls("github_stats"), 0);
}
