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

use crate::client::status_of;
use crate::models::{AuthStatus, LoginUrl, Me};
use crate::Client;
use anyhow::{Context, Result};
use log::{debug, error, warn};
use reqwest::{StatusCode, Url};
use serde_json::Value;

const AUTH_LOGIN: &str = "/api/auth/login";
const AUTH_ME: &str = "/api/auth/me";
const AUTH_LOGOUT: &str = "/api/auth/logout";
const AUTH_STATUS: &str = "/api/auth/status";

impl Client {
    /// Returns the OAuth login URL with a `redirect` parameter pointing back
    /// at `origin` + `redirect_path` (defaults to `/`).
    ///
    /// # Example
    ///
    /// ```no_run
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     use skillsync_api::ClientBuilder;
    ///
    ///     let client = ClientBuilder::new("http://localhost:8080").build()?;
    ///     let url = client.login_url("http://localhost:3000", Some("/analyzer")).await?;
    ///     println!("{url}");
    ///     Ok(())
    /// }
    /// ```
    pub async fn login_url(&self, origin: &str, redirect_path: Option<&str>) -> Result<String> {
        let login: LoginUrl = self
            .get(AUTH_LOGIN)
            .await
            .context("Failed to get login URL.")?;

        let base = Url::parse(&self.base_url)?;
        let mut url = base
            .join(&login.url)
            .with_context(|| format!("Invalid login URL '{}'", login.url))?;
        let redirect = format!(
            "{}{}",
            origin.trim_end_matches('/'),
            redirect_path.unwrap_or("/")
        );
        url.query_pairs_mut().append_pair("redirect", &redirect);
        debug!("Constructed full login URL: {}", url);
        Ok(url.to_string())
    }

    /// Returns the signed-in user, or `None` when the session is not
    /// authenticated.
    pub async fn me(&self) -> Result<Option<Me>> {
        match self.get::<Option<Me>>(AUTH_ME).await {
            Ok(me) => Ok(me.filter(|m| m.user_id.as_deref().is_some_and(|id| !id.is_empty()))),
            Err(e) if status_of(&e) == Some(StatusCode::UNAUTHORIZED) => {
                warn!("Received 401 Unauthorized. User is not authenticated.");
                Ok(None)
            }
            Err(e) => Err(e.context("Failed to fetch user data")),
        }
    }

    /// Ends the backend session. A rejected logout is only logged: the
    /// caller clears its local state either way.
    pub async fn logout(&self) -> Result<()> {
        match self.post::<Value, _>(AUTH_LOGOUT, &serde_json::json!({})).await {
            Ok(_) => debug!("Logout API call successful."),
            Err(e) if status_of(&e).is_some() => error!("Logout API call failed: {}", e),
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Checks whether the session is valid. Never fails: any error reads as
    /// an invalid session.
    pub async fn auth_status(&self) -> AuthStatus {
        match self.get::<AuthStatus>(AUTH_STATUS).await {
            Ok(status) => status,
            Err(e) => {
                error!("Auth status check failed: {}", e);
                AuthStatus::default()
            }
        }
    }
}
