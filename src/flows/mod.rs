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


//! What happens around a polling run: starting the job, deciding what a
//! report means for the user, and where they go next.

pub mod enrichment;
pub mod recommendations;
pub mod repository;

pub use enrichment::{EnrichmentFlow, EnrichmentResolution};
pub use recommendations::{RecommendationFlow, RecommendationResolution};
pub use repository::{RepositoryAnalysisFlow, RepositoryAnalysisResolution};

use anyhow::{bail, Error};
use std::fmt;
use std::str::FromStr;

/// How to read a run that ran out of budget without a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPolicy {
    /// The job is most likely finishing server side; carry on as if it succeeded.
    #[default]
    Optimistic,
    /// Report the timeout as such.
    Strict,
}

impl FromStr for TimeoutPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(TimeoutPolicy::Optimistic),
            "strict" => Ok(TimeoutPolicy::Strict),
            other => bail!("unknown timeout policy '{other}', expected 'optimistic' or 'strict'"),
        }
    }
}

impl fmt::Display for TimeoutPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutPolicy::Optimistic => write!(f, "optimistic"),
            TimeoutPolicy::Strict => write!(f, "strict"),
        }
    }
}
