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

use crate::models::{ProfileCombination, ProfileCombinationRequest};
use crate::{ApiError, Client};
use anyhow::Result;
use reqwest::Method;
use serde_json::{json, Value};
use std::time::Duration;

const COMBINATIONS: &str = "/api/profile/combinations";
const ANALYZE: &str = "/api/profile/analyze";

/// Creating a combination runs the first analysis synchronously.
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(120);

impl Client {
    pub async fn profile_combinations(&self) -> Result<Vec<ProfileCombination>> {
        self.get(COMBINATIONS).await
    }

    pub async fn profile_combination(&self, combination_id: &str) -> Result<ProfileCombination> {
        self.get(&format!("{COMBINATIONS}/{combination_id}")).await
    }

    /// Creates a combination and runs its first analysis.
    ///
    /// # Errors
    ///
    /// This function will return an error variant when:
    /// - the request fails validation (name shorter than 3 characters, missing usernames).
    /// - the backend does not answer within 120 seconds ([`ApiError::AnalysisTimeout`]);
    ///   the analysis keeps running server side.
    /// - the backend rejects the request.
    pub async fn create_profile_combination(
        &self,
        request: &ProfileCombinationRequest,
    ) -> Result<ProfileCombination> {
        request.validate()?;
        let builder = self
            .request(Method::POST, ANALYZE)
            .json(request)
            .timeout(ANALYZE_TIMEOUT);
        match self.execute(builder).await {
            Ok(combination) => Ok(combination),
            Err(e) if e.is_timeout() => Err(ApiError::AnalysisTimeout.into()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn update_profile_combination(
        &self,
        combination_id: &str,
        request: &ProfileCombinationRequest,
    ) -> Result<ProfileCombination> {
        self.put(&format!("{COMBINATIONS}/{combination_id}"), request)
            .await
    }

    pub async fn delete_profile_combination(&self, combination_id: &str) -> Result<()> {
        let _: Value = self
            .delete(&format!("{COMBINATIONS}/{combination_id}"))
            .await?;
        Ok(())
    }

    pub async fn set_primary_combination(&self, combination_id: &str) -> Result<Value> {
        self.post(&format!("{COMBINATIONS}/{combination_id}/primary"), &json!({}))
            .await
    }
}
