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

//! # skillsync_client
//!
//! This is a Rust client to interact with the SkillSync analysis backend using the API.
//!

mod api;
mod client;
pub mod models;

pub use client::{ApiError, Client, ClientBuilder, DEFAULT_BASE_URL};
pub use models::JobStatus;
pub use reqwest::Url;
