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

pub mod auth;
pub mod enrichment;
pub mod job;
pub mod opensource;
pub mod platforms;
pub mod profile;

pub use auth::{AuthStatus, LoginUrl, Me};
pub use enrichment::EnrichmentStatus;
pub use job::{JobStatus, JobStatusResponse};
pub use opensource::{GenerateRequest, GenerateResponse, Recommendation, RecommendationSet};
pub use platforms::{GithubRepo, GithubStats};
pub use profile::{ProfileCombination, ProfileCombinationRequest};
