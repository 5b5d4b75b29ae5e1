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


//! # skillsync
//!
//! Client-side tracking of long-running SkillSync backend jobs.
//!
//! The backend has no push channel, so profile enrichment, open-source
//! recommendation generation and repository analysis are followed by
//! polling a status endpoint. [`poller::Poller`] owns that loop; the
//! [`flows`] turn its reports into what a user should see next.

pub mod backend;
pub(crate) mod common;
pub mod config;
pub mod flows;
pub mod mock;
pub mod models;
pub mod poller;
pub mod session;
pub mod sources;

pub use backend::InsightBackend;
pub use config::Settings;
pub use mock::MockBackend;
pub use poller::{PollConfig, PollEvent, PollOutcome, PollReport, PollSession, PollState, Poller};
pub use session::SessionContext;
pub use sources::{PollStatus, StatusSource, Verdict};

/// Initializes logging for the library. Later calls are ignored.
pub fn initialize() {
    common::initialize();
}
