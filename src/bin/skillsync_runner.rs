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


//! Command-line runner for the SkillSync client.
//!
//! Set `RUST_LOG=info` (or `debug`) to see what the client does.

use clap::{Args, Parser, Subcommand};
use eyre::{eyre, Result};
use futures::stream::StreamExt;
use log::{info, warn};
use reqwest_retry::policies::ExponentialBackoff;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook_tokio::Signals;
use skillsync::flows::recommendations::saved_notice;
use skillsync::flows::{
    EnrichmentFlow, RecommendationFlow, RepositoryAnalysisFlow, TimeoutPolicy,
};
use skillsync::models::Notice;
use skillsync::{InsightBackend, MockBackend, PollConfig, PollEvent, SessionContext, Settings};
use skillsync_api::models::{GenerateRequest, ProfileCombination};
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "skillsync_runner")]
#[command(about = "Track SkillSync analysis jobs from the command line.")]
struct Cli {
    /// Use the in-process offline mock (no network / no session required)
    #[arg(long, default_value_t = false)]
    mock: bool,

    /// Backend URL; overrides SKILLSYNC_BACKEND_URL and ~/.skillsync/config
    #[arg(long)]
    backend_url: Option<String>,

    /// How to read a wait that ran out of time: optimistic | strict
    #[arg(long)]
    timeout_policy: Option<TimeoutPolicy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Copy)]
struct PollArgs {
    /// Poll interval in seconds
    #[arg(long)]
    interval_s: Option<u64>,

    /// Max time to wait in seconds
    #[arg(long)]
    timeout_s: Option<u64>,
}

impl PollArgs {
    fn apply(&self, mut config: PollConfig) -> PollConfig {
        if let Some(secs) = self.interval_s {
            config.interval = Duration::from_secs(secs);
            config.initial_delay = config.initial_delay.min(config.interval);
        }
        if let Some(secs) = self.timeout_s {
            config.max_elapsed = Some(Duration::from_secs(secs));
        }
        config
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the signed-in user
    Whoami,
    /// Show enrichment and processing status
    Status,
    /// Run AI enrichment of the connected profiles and wait for it
    Enrich {
        /// Wait up to five minutes and report per-platform progress
        #[arg(long, default_value_t = false)]
        progress: bool,
        #[command(flatten)]
        poll: PollArgs,
    },
    /// Generate open-source project recommendations and wait for them
    Recommend {
        #[arg(long, default_value_t = false)]
        force_refresh: bool,
        #[arg(long, default_value_t = 10)]
        max: u32,
        /// Skip repository structure analysis of candidate projects
        #[arg(long, default_value_t = false)]
        no_structures: bool,
        #[command(flatten)]
        poll: PollArgs,
    },
    /// List saved recommendations
    Saved {
        /// Delete them instead
        #[arg(long, default_value_t = false)]
        delete: bool,
    },
    /// Wait for repository analysis of a GitHub account
    Repos {
        #[arg(long)]
        github: String,
        /// Profile name shown in the result
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        poll: PollArgs,
    },
    /// End the session
    Logout,
}

fn report(e: anyhow::Error) -> eyre::Report {
    eyre!("{:#}", e)
}

fn print_notice(notice: Option<Notice>) {
    if let Some(notice) = notice {
        println!("{notice}");
    }
}

/// Prints progress events until the sender side is dropped.
fn spawn_event_printer<S: Debug + Send + 'static>(
    mut rx: mpsc::UnboundedReceiver<PollEvent<S>>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                PollEvent::Progress {
                    attempt,
                    progress,
                    message,
                    ..
                } => println!("[{progress:>3}%] {message} (check {attempt})"),
                PollEvent::FetchFailed {
                    attempt,
                    consecutive_errors,
                    error,
                } => println!("check {attempt} failed ({consecutive_errors} in a row): {error}"),
            }
        }
    })
}

fn build_backend(cli: &Cli, settings: &Settings, retry: bool) -> Result<Arc<dyn InsightBackend>> {
    if cli.mock {
        info!("using the offline mock backend");
        return Ok(Arc::new(MockBackend::demo()));
    }
    let mut builder = settings.client_builder();
    if retry {
        builder.with_retry_policy(ExponentialBackoff::builder().build_with_max_retries(3));
    }
    Ok(Arc::new(builder.build().map_err(report)?))
}

async fn run(cli: Cli, settings: Settings, cancel: CancellationToken) -> Result<()> {
    let policy = cli.timeout_policy.unwrap_or(settings.timeout_policy);
    let polls = matches!(
        cli.command,
        Command::Enrich { .. } | Command::Recommend { .. } | Command::Repos { .. }
    );
    // Pollers retry on their own schedule.
    let backend = build_backend(&cli, &settings, !polls)?;
    let mut session = SessionContext::new(backend.clone());

    match cli.command {
        Command::Whoami => match session.refresh().await {
            Some(user) => println!("{}", serde_json::to_string_pretty(user)?),
            None => println!("Not signed in."),
        },
        Command::Status => {
            let status = backend.processing_status().await.map_err(report)?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Command::Enrich { progress, poll } => {
            let preset = if progress {
                PollConfig::enrichment_progress()
            } else {
                PollConfig::enrichment()
            };
            let (tx, rx) = mpsc::unbounded_channel();
            let printer = spawn_event_printer(rx);
            let resolution = EnrichmentFlow::new(backend)
                .with_poll_config(poll.apply(preset))
                .with_timeout_policy(policy)
                .run(&cancel, &tx)
                .await
                .map_err(report)?;
            drop(tx);
            let _ = printer.await;
            print_notice(resolution.notice());
            println!("next: {:?}", resolution.destination());
        }
        Command::Recommend {
            force_refresh,
            max,
            no_structures,
            poll,
        } => {
            session.refresh().await;
            let flow = RecommendationFlow::new(&session)
                .map_err(report)?
                .with_poll_config(poll.apply(PollConfig::recommendations()))
                .with_timeout_policy(policy);
            let request = GenerateRequest {
                force_refresh,
                max_recommendations: max,
                analyze_structures: !no_structures,
            };
            let (tx, rx) = mpsc::unbounded_channel();
            let printer = spawn_event_printer(rx);
            let resolution = flow
                .generate(&request, &cancel, &tx)
                .await
                .map_err(report)?;
            drop(tx);
            let _ = printer.await;
            print_notice(resolution.notice());
            for project in resolution.recommendations() {
                println!("{}", serde_json::to_string(project)?);
            }
        }
        Command::Saved { delete } => {
            session.refresh().await;
            let flow = RecommendationFlow::new(&session).map_err(report)?;
            if delete {
                flow.delete().await.map_err(report)?;
                println!("Recommendations deleted: your project recommendations have been cleared");
            } else {
                let saved = flow.load_saved().await;
                print_notice(saved_notice(&saved));
                for project in &saved {
                    println!("{}", serde_json::to_string(project)?);
                }
            }
        }
        Command::Repos { github, name, poll } => {
            let combination = ProfileCombination {
                combination_id: "cli".to_string(),
                profile_name: name,
                github_username: Some(github),
                ..Default::default()
            };
            let (tx, rx) = mpsc::unbounded_channel();
            let printer = spawn_event_printer(rx);
            let resolution = RepositoryAnalysisFlow::new(backend)
                .with_poll_config(poll.apply(PollConfig::repository_analysis()))
                .run(&combination, &cancel, &tx)
                .await
                .map_err(report)?;
            drop(tx);
            let _ = printer.await;
            print_notice(resolution.notice());
        }
        Command::Logout => {
            session.logout().await;
            println!("Signed out.");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    skillsync::initialize();

    let cli = Cli::parse();
    let mut settings = Settings::load().map_err(report)?;
    if let Some(url) = &cli.backend_url {
        settings.backend_url = url.clone();
    }
    if !cli.mock && settings.session_cookie.is_none() {
        warn!(
            "SKILLSYNC_SESSION_COOKIE is not set. Backend calls will likely be rejected.\n\
             Or run with --mock for offline testing."
        );
    }

    let cancel = CancellationToken::new();
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let signals_handle = signals.handle();
    let watcher = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if let Some(signal) = signals.next().await {
                warn!("received signal {}, cancelling", signal);
                cancel.cancel();
            }
        }
    });

    let result = run(cli, settings, cancel).await;

    signals_handle.close();
    let _ = watcher.await;
    result
}
