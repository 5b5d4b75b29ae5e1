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

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

const MIN_PROFILE_NAME_LEN: usize = 3;

/// A saved pairing of a GitHub and a LeetCode account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCombination {
    #[serde(deserialize_with = "string_or_number")]
    pub combination_id: String,
    #[serde(default)]
    pub profile_name: Option<String>,
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub leetcode_username: Option<String>,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub analyzed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Body of `POST /api/profile/analyze` and `PUT /api/profile/combinations/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCombinationRequest {
    pub profile_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leetcode_username: Option<String>,
    pub make_primary: bool,
}

impl ProfileCombinationRequest {
    pub fn new(
        profile_name: impl Into<String>,
        github_username: impl Into<String>,
        leetcode_username: impl Into<String>,
    ) -> Self {
        Self {
            profile_name: profile_name.into(),
            github_username: Some(github_username.into()),
            leetcode_username: Some(leetcode_username.into()),
            make_primary: false,
        }
    }

    /// Checks a request that creates a new combination.
    pub fn validate(&self) -> Result<()> {
        if self.profile_name.trim().chars().count() < MIN_PROFILE_NAME_LEN {
            bail!("Profile name must be at least 3 characters.");
        }
        if self.github_username.as_deref().unwrap_or("").trim().is_empty() {
            bail!("GitHub username is required.");
        }
        if self.leetcode_username.as_deref().unwrap_or("").trim().is_empty() {
            bail!("LeetCode username is required.");
        }
        Ok(())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {other}"
        ))),
    }
}
