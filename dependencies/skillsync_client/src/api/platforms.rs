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

use crate::models::GithubStats;
use crate::Client;
use anyhow::Result;
use reqwest::Method;
use serde_json::Value;

impl Client {
    /// Raw GitHub statistics, including per-repository structure once the
    /// backend has analyzed it.
    pub async fn github_stats(&self, github_username: &str) -> Result<GithubStats> {
        let builder = self
            .request(Method::GET, "/api/github/raw-stats")
            .query(&[("githubUsername", github_username)]);
        Ok(self.execute(builder).await?)
    }

    /// Asks the backend to scrape a LeetCode profile.
    pub async fn fetch_leetcode_profile(&self, leetcode_username: &str) -> Result<Value> {
        let builder = self
            .request(Method::POST, "/api/leetcode/fetch")
            .query(&[("username", leetcode_username)]);
        Ok(self.execute(builder).await?)
    }

    pub async fn leetcode_profile(&self, leetcode_username: &str) -> Result<Value> {
        self.get(&format!("/api/leetcode/profile/{leetcode_username}"))
            .await
    }
}
