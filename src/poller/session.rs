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


use super::{PollEvent, PollReport, PollState, Poller};
use crate::sources::{PollStatus, StatusSource};
use log::{debug, error};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Handle to a polling run executing in its own task.
///
/// Dropping the handle cancels the run; no status request is issued after
/// that.
#[derive(Debug)]
pub struct PollSession<S> {
    id: Uuid,
    cancel: CancellationToken,
    events: mpsc::UnboundedReceiver<PollEvent<S>>,
    state: watch::Receiver<PollState>,
    handle: Option<JoinHandle<Option<PollReport<S>>>>,
}

impl<S: PollStatus> PollSession<S> {
    pub(super) fn spawn<Src>(poller: Poller<Src>) -> Self
    where
        Src: StatusSource<Status = S> + 'static,
    {
        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let (events_tx, events) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(PollState::Idle);

        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            debug!("poll session {} started", id);
            let _ = state_tx.send(PollState::Polling);
            let report = poller.run(&token, &events_tx).await;
            let next = report
                .as_ref()
                .map_or(PollState::Idle, |r| r.outcome.state());
            let _ = state_tx.send(next);
            debug!("poll session {} ended in {:?}", id, next);
            report
        });

        Self {
            id,
            cancel,
            events,
            state,
            handle: Some(handle),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stops the run. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A token that cancels this session when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> PollState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.clone()
    }

    /// Next progress event; `None` once the run has ended and all events were read.
    pub async fn next_event(&mut self) -> Option<PollEvent<S>> {
        self.events.recv().await
    }

    /// Waits for the run to end. `None` means it was cancelled.
    pub async fn outcome(mut self) -> Option<PollReport<S>> {
        let handle = self.handle.take()?;
        match handle.await {
            Ok(report) => report,
            Err(e) => {
                error!("poll session {} task failed: {}", self.id, e);
                None
            }
        }
    }
}

impl<S> Drop for PollSession<S> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
