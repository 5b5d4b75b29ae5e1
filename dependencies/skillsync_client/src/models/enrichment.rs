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

/// Progress of the AI enrichment of the user's connected profiles.
///
/// Returned by `GET /api/indepth/profiles/enriched/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentStatus {
    #[serde(default)]
    pub enriched: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_enriched: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leetcode_enriched: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}
