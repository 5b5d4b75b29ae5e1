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

use crate::models::{GenerateRequest, GenerateResponse, JobStatusResponse, RecommendationSet};
use crate::Client;
use anyhow::Result;
use serde_json::Value;

const OPENSOURCE: &str = "/api/opensource";

impl Client {
    /// Starts a recommendation job. The returned `jobId` is what
    /// [`Client::job_status`] polls.
    pub async fn generate_recommendations(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse> {
        self.post(&format!("{OPENSOURCE}/generate"), request).await
    }

    pub async fn job_status(&self, job_id: &str) -> Result<JobStatusResponse> {
        self.get(&format!("{OPENSOURCE}/status/{job_id}")).await
    }

    pub async fn job_results(&self, job_id: &str) -> Result<RecommendationSet> {
        self.get(&format!("{OPENSOURCE}/result/{job_id}")).await
    }

    pub async fn saved_recommendations(&self) -> Result<RecommendationSet> {
        self.get(&format!("{OPENSOURCE}/saved")).await
    }

    pub async fn delete_recommendations(&self) -> Result<()> {
        let _: Value = self
            .delete(&format!("{OPENSOURCE}/recommendations"))
            .await?;
        Ok(())
    }
}
