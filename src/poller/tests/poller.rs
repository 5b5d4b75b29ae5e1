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
use crate::sources::StatusSource;
use async_trait::async_trait;
use skillsync_api::models::JobStatusResponse;
use skillsync_api::JobStatus;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

type Step = std::result::Result<JobStatusResponse, String>;

/// Replays scripted answers, then repeats `fallback` forever.
struct ScriptedSource {
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    delay: Option<Duration>,
    slow_from: Option<(Instant, Duration)>,
    calls: Arc<AtomicU32>,
    in_flight: Arc<AtomicU32>,
    max_in_flight: Arc<AtomicU32>,
}

impl ScriptedSource {
    fn new(script: Vec<Step>, fallback: Step) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            delay: None,
            slow_from: None,
            calls: Arc::new(AtomicU32::new(0)),
            in_flight: Arc::new(AtomicU32::new(0)),
            max_in_flight: Arc::new(AtomicU32::new(0)),
        }
    }

    fn pending_forever() -> Self {
        Self::new(vec![], Ok(status(JobStatus::Pending)))
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests started `after` from now take `delay` each.
    fn slow_after(mut self, after: Duration, delay: Duration) -> Self {
        self.slow_from = Some((Instant::now() + after, delay));
        self
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    type Status = JobStatusResponse;

    async fn fetch_status(&self) -> Result<JobStatusResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let delay = match self.slow_from {
            Some((from, slow)) if Instant::now() >= from => Some(slow),
            _ => self.delay,
        };
        if let Some(delay) = delay {
            time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        step.map_err(|e| anyhow!(e))
    }
}

fn status(status: JobStatus) -> JobStatusResponse {
    JobStatusResponse {
        status,
        error_message: None,
    }
}

fn every_5s_for_60s() -> PollConfig {
    PollConfig::new(Duration::from_secs(5)).with_max_elapsed(Duration::from_secs(60))
}

async fn run_to_end(
    source: ScriptedSource,
    config: PollConfig,
) -> (PollReport<JobStatusResponse>, Vec<PollEvent<JobStatusResponse>>) {
    let poller = Poller::new(source, config).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let report = poller
        .run(&CancellationToken::new(), &tx)
        .await
        .expect("run was not cancelled");
    drop(tx);
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    (report, events)
}

#[tokio::test(start_paused = true)]
async fn test_pending_three_times_then_completed() {
    let source = ScriptedSource::new(
        vec![
            Ok(status(JobStatus::Pending)),
            Ok(status(JobStatus::Pending)),
            Ok(status(JobStatus::Pending)),
            Ok(status(JobStatus::Completed)),
        ],
        Ok(status(JobStatus::Pending)),
    );
    let calls = source.calls.clone();

    let session = Poller::new(source, every_5s_for_60s()).unwrap().spawn();
    let report = session.outcome().await.unwrap();

    assert_eq!(report.outcome, PollOutcome::Succeeded(status(JobStatus::Completed)));
    assert_eq!(report.attempts, 4);
    assert!(report.elapsed >= Duration::from_secs(15));
    assert!(report.elapsed < Duration::from_secs(60));

    time::sleep(Duration::from_secs(120)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn test_failed_on_first_check() {
    let source = ScriptedSource::new(
        vec![Ok(JobStatusResponse {
            status: JobStatus::Failed,
            error_message: Some("quota exceeded".to_string()),
        })],
        Ok(status(JobStatus::Pending)),
    );
    let calls = source.calls.clone();

    let (report, events) = run_to_end(source, every_5s_for_60s()).await;

    assert!(matches!(
        &report.outcome,
        PollOutcome::Failed { message, .. } if message == "quota exceeded"
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(events.is_empty());
    assert_eq!(
        report.into_result(),
        Err(PollError::JobFailed("quota exceeded".to_string()))
    );
}

#[tokio::test(start_paused = true)]
async fn test_always_pending_times_out_at_budget() {
    let source = ScriptedSource::pending_forever();
    let calls = source.calls.clone();

    let (report, events) = run_to_end(source, every_5s_for_60s()).await;

    assert_eq!(
        report.outcome,
        PollOutcome::TimedOut {
            last: Some(status(JobStatus::Pending))
        }
    );
    assert!(report.elapsed >= Duration::from_secs(60));
    assert!(report.elapsed <= Duration::from_secs(65));
    let calls = calls.load(Ordering::SeqCst);
    assert!((12..=13).contains(&calls), "{calls} checks");
    assert_eq!(events.len() as u32, calls);
    assert!(matches!(
        report.into_result(),
        Err(PollError::BudgetExhausted { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_final_check_after_time_budget() {
    let source = ScriptedSource::pending_forever();
    let calls = source.calls.clone();

    let (report, _) = run_to_end(source, every_5s_for_60s().with_final_check(true)).await;

    assert!(matches!(report.outcome, PollOutcome::TimedOut { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 13);
    assert_eq!(report.attempts, 13);
}

#[tokio::test(start_paused = true)]
async fn test_attempt_budget_with_final_check() {
    // 2s delay, then every 5s: the 12th check lands at 57s, before the 60s budget.
    let source = ScriptedSource::pending_forever();
    let calls = source.calls.clone();

    let (report, _) = run_to_end(source, PollConfig::enrichment()).await;

    assert!(matches!(report.outcome, PollOutcome::TimedOut { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 13);
    assert!(report.elapsed >= Duration::from_secs(57));
    assert!(report.elapsed < Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_final_check_can_still_succeed() {
    let mut script: Vec<Step> = (0..12).map(|_| Ok(status(JobStatus::SearchCompleted))).collect();
    script.push(Ok(status(JobStatus::Completed)));
    let source = ScriptedSource::new(script, Ok(status(JobStatus::Pending)));

    let (report, _) = run_to_end(source, PollConfig::enrichment()).await;

    assert_eq!(report.outcome, PollOutcome::Succeeded(status(JobStatus::Completed)));
    assert_eq!(report.attempts, 13);
}

#[tokio::test(start_paused = true)]
async fn test_consecutive_errors_lose_connectivity() {
    let source = ScriptedSource::new(vec![], Err("connection refused".to_string()));
    let calls = source.calls.clone();

    let (report, events) = run_to_end(source, every_5s_for_60s()).await;

    assert_eq!(
        report.outcome,
        PollOutcome::ConnectivityLost {
            consecutive_errors: 6,
            last_error: "connection refused".to_string(),
        }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 6);
    assert!(report.elapsed < Duration::from_secs(60));
    assert_eq!(events.len(), 6);
    assert!(matches!(
        events.last(),
        Some(PollEvent::FetchFailed {
            consecutive_errors: 6,
            ..
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_success_resets_error_streak() {
    let err = || Err("503 Service Unavailable".to_string());
    let source = ScriptedSource::new(
        vec![
            err(),
            err(),
            Ok(status(JobStatus::DomainsExtracted)),
            err(),
            err(),
            Ok(status(JobStatus::Completed)),
        ],
        Ok(status(JobStatus::Pending)),
    );

    let (report, _) = run_to_end(source, every_5s_for_60s().with_error_budget(3)).await;

    assert!(matches!(report.outcome, PollOutcome::Succeeded(_)));
    assert_eq!(report.errors, 4);
    assert_eq!(report.attempts, 6);
}

#[tokio::test(start_paused = true)]
async fn test_progress_events_follow_job_stages() {
    let source = ScriptedSource::new(
        vec![
            Ok(status(JobStatus::Pending)),
            Ok(status(JobStatus::ExtractedProfile)),
            Ok(status(JobStatus::AnalyzedProjects)),
            Ok(status(JobStatus::Completed)),
        ],
        Ok(status(JobStatus::Pending)),
    );

    let (_, events) = run_to_end(source, every_5s_for_60s()).await;

    let progress: Vec<(u32, u8)> = events
        .iter()
        .filter_map(|e| match e {
            PollEvent::Progress {
                attempt, progress, ..
            } => Some((*attempt, *progress)),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![(1, 10), (2, 20), (3, 70)]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_all_checks() {
    let source = ScriptedSource::pending_forever();
    let calls = source.calls.clone();

    let session = Poller::new(source, every_5s_for_60s()).unwrap().spawn();
    time::sleep(Duration::from_secs(7)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(session.state(), PollState::Polling);

    session.cancel();
    let mut state = session.subscribe();
    time::sleep(Duration::from_secs(120)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(*state.borrow_and_update(), PollState::Idle);
    assert_eq!(session.outcome().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_session_cancels_it() {
    let source = ScriptedSource::pending_forever();
    let calls = source.calls.clone();

    let session = Poller::new(source, every_5s_for_60s()).unwrap().spawn();
    time::sleep(Duration::from_secs(1)).await;
    drop(session);
    time::sleep(Duration::from_secs(120)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_checks_never_overlap() {
    let source = ScriptedSource::pending_forever().with_delay(Duration::from_secs(7));
    let max_in_flight = source.max_in_flight.clone();

    let (report, _) = run_to_end(source, every_5s_for_60s()).await;

    assert!(matches!(report.outcome, PollOutcome::TimedOut { .. }));
    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    assert!(report.attempts < 12);
}

#[tokio::test(start_paused = true)]
async fn test_check_in_flight_at_deadline_is_abandoned() {
    // Instant answers until 55s, then 14s per request: under the 15s request timeout.
    let source = ScriptedSource::pending_forever()
        .slow_after(Duration::from_secs(55), Duration::from_secs(14));
    let calls = source.calls.clone();

    let (report, _) = run_to_end(source, every_5s_for_60s()).await;

    assert!(matches!(report.outcome, PollOutcome::TimedOut { .. }));
    assert!(report.elapsed >= Duration::from_secs(60));
    assert!(
        report.elapsed <= Duration::from_secs(65),
        "timed out after {:?}",
        report.elapsed
    );
    assert_eq!(calls.load(Ordering::SeqCst), 12);
    assert_eq!(report.errors, 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_final_check_stays_within_one_interval() {
    let source = ScriptedSource::pending_forever()
        .slow_after(Duration::from_secs(55), Duration::from_secs(14));
    let calls = source.calls.clone();

    let (report, _) = run_to_end(source, every_5s_for_60s().with_final_check(true)).await;

    assert_eq!(
        report.outcome,
        PollOutcome::TimedOut {
            last: Some(status(JobStatus::Pending))
        }
    );
    assert!(
        report.elapsed <= Duration::from_secs(65),
        "timed out after {:?}",
        report.elapsed
    );
    assert_eq!(calls.load(Ordering::SeqCst), 13);
    assert_eq!(report.attempts, 13);
    assert_eq!(report.errors, 1);
}

#[tokio::test(start_paused = true)]
async fn test_request_timeout_counts_as_error() {
    let source = ScriptedSource::pending_forever().with_delay(Duration::from_secs(20));
    let config = every_5s_for_60s().with_request_timeout(Some(Duration::from_secs(2)));

    let (report, _) = run_to_end(source, config).await;

    assert!(matches!(
        &report.outcome,
        PollOutcome::ConnectivityLost { last_error, .. } if last_error.contains("timed out")
    ));
    assert_eq!(report.errors, 6);
}

#[tokio::test(start_paused = true)]
async fn test_session_reports_state_changes() {
    let source = ScriptedSource::new(
        vec![Ok(status(JobStatus::Pending)), Ok(status(JobStatus::Completed))],
        Ok(status(JobStatus::Pending)),
    );

    let mut session = Poller::new(source, every_5s_for_60s()).unwrap().spawn();
    let first = session.next_event().await.unwrap();
    assert!(matches!(first, PollEvent::Progress { attempt: 1, .. }));
    assert_eq!(session.next_event().await, None);
    assert_eq!(session.state(), PollState::Succeeded);
}

#[test]
fn test_invalid_configs_are_rejected() {
    assert!(PollConfig::new(Duration::ZERO)
        .with_max_attempts(3)
        .validate()
        .is_err());
    assert!(PollConfig::new(Duration::from_secs(1)).validate().is_err());
    assert!(PollConfig::new(Duration::from_secs(1))
        .with_max_elapsed(Duration::from_secs(10))
        .with_error_budget(0)
        .validate()
        .is_err());
    assert!(Poller::new(ScriptedSource::pending_forever(), PollConfig::new(Duration::from_secs(1))).is_err());

    for preset in [
        PollConfig::enrichment(),
        PollConfig::enrichment_progress(),
        PollConfig::recommendations(),
        PollConfig::repository_analysis(),
    ] {
        assert!(preset.validate().is_ok(), "{preset:?}");
    }
}
