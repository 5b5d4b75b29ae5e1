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

use crate::models::EnrichmentStatus;
use crate::Client;
use anyhow::Result;
use serde_json::{json, Value};

const STATUS: &str = "/api/status";
const ENRICH: &str = "/api/profiles/enrich";
const PROCESSING_STATUS: &str = "/api/indepth/profiles/enriched/status";
const ENRICHED_PROFILE: &str = "/api/indepth/profiles/enriched";

impl Client {
    /// Per-platform enrichment status as reported by `GET /api/status`.
    pub async fn enrichment_status(&self) -> Result<Value> {
        self.get(STATUS).await
    }

    /// Queues AI enrichment of the user's connected profiles.
    pub async fn trigger_enrichment(&self) -> Result<Value> {
        self.post(ENRICH, &json!({})).await
    }

    /// Whether the enrichment job has finished. This is the endpoint the
    /// enrichment poller watches.
    pub async fn processing_status(&self) -> Result<EnrichmentStatus> {
        self.get(PROCESSING_STATUS).await
    }

    /// The enriched profile rendered by the dashboards (skill graph, repo
    /// quality, career recommendations). Passed through as-is.
    pub async fn enriched_profile(&self) -> Result<Value> {
        self.get(ENRICHED_PROFILE).await
    }
}
