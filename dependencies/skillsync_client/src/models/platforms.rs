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
use serde_json::{Map, Value};

/// Response of `GET /api/github/raw-stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GithubStats {
    #[serde(default)]
    pub repos: Vec<GithubRepo>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl GithubStats {
    /// The backend attaches a repository structure once it has analyzed a repo.
    pub fn structure_analyzed(&self) -> bool {
        self.repos.iter().any(|r| r.repository_structure.is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GithubRepo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_structure: Option<Value>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}
