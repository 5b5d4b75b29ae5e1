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


//! Who is signed in, held explicitly instead of as process-wide state.

use crate::backend::InsightBackend;
use crate::models::User;

use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use skillsync_api::models::Me;
use skillsync_api::Url;
use std::sync::Arc;

const AVATAR_SERVICE: &str = "https://ui-avatars.com/api/";
const DEFAULT_NAME: &str = "User";

fn avatar_url(label: &str) -> String {
    match Url::parse_with_params(AVATAR_SERVICE, &[("name", label)]) {
        Ok(url) => url.into(),
        Err(_) => AVATAR_SERVICE.to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<Me> for User {
    fn from(me: Me) -> Self {
        let name = non_empty(me.name);
        let email = non_empty(me.email);
        let label = name
            .clone()
            .or_else(|| email.clone())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());
        User {
            id: me.user_id.unwrap_or_default(),
            picture: non_empty(me.picture).unwrap_or_else(|| avatar_url(&label)),
            name: name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            email,
        }
    }
}

/// The backend plus the user it currently answers for.
pub struct SessionContext {
    backend: Arc<dyn InsightBackend>,
    user: Option<User>,
}

impl SessionContext {
    /// Starts signed out; call [`SessionContext::refresh`] to pick up an existing session.
    pub fn new(backend: Arc<dyn InsightBackend>) -> Self {
        Self {
            backend,
            user: None,
        }
    }

    pub fn backend(&self) -> Arc<dyn InsightBackend> {
        self.backend.clone()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn require_user(&self) -> Result<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| anyhow!("You need to sign in first."))
    }

    /// Re-reads the session from the backend. Any failure leaves nobody signed in.
    pub async fn refresh(&mut self) -> Option<&User> {
        self.user = None;
        if !self.backend.auth_status().await.valid {
            debug!("no valid session");
            return None;
        }
        match self.backend.me().await {
            Ok(Some(me)) => {
                let user = User::from(me);
                info!("signed in as {}", user.id);
                self.user = Some(user);
            }
            Ok(None) => debug!("session is valid but no user was returned"),
            Err(e) => warn!("could not load the current user: {:#}", e),
        }
        self.user.as_ref()
    }

    /// Ends the session. The local user is cleared even if the backend call fails.
    pub async fn logout(&mut self) {
        if let Err(e) = self.backend.logout().await {
            warn!("logout failed: {:#}", e);
        }
        self.user = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockBackend;

    fn me(name: Option<&str>, email: Option<&str>) -> Me {
        Me {
            user_id: Some("u-1".to_string()),
            email: email.map(str::to_string),
            name: name.map(str::to_string),
            picture: None,
        }
    }

    #[test]
    fn user_defaults_name_and_avatar() {
        let user = User::from(me(Some("Ada Lovelace"), Some("ada@example.com")));
        assert_eq!(user.name, "Ada Lovelace");
        assert_eq!(user.picture, "https://ui-avatars.com/api/?name=Ada+Lovelace");

        let user = User::from(me(None, Some("ada@example.com")));
        assert_eq!(user.name, "User");
        assert_eq!(user.picture, "https://ui-avatars.com/api/?name=ada%40example.com");

        let mut with_picture = me(Some("Ada"), None);
        with_picture.picture = Some("https://cdn.example.com/ada.png".to_string());
        assert_eq!(User::from(with_picture).picture, "https://cdn.example.com/ada.png");
    }

    #[tokio::test]
    async fn refresh_loads_user_only_with_valid_session() {
        let backend = Arc::new(MockBackend::new());
        let mut session = SessionContext::new(backend.clone());

        assert!(session.refresh().await.is_none());
        assert_eq!(backend.calls("me"), 0);
        assert!(session.require_user().is_err());

        backend.sign_in(me(Some("Ada"), None));
        let user = session.refresh().await.cloned().unwrap();
        assert_eq!(user.id, "u-1");
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_user_even_when_backend_fails() {
        let backend = Arc::new(MockBackend::new());
        backend.sign_in(me(Some("Ada"), None));
        backend.fail_logout("500 Internal Server Error");
        let mut session = SessionContext::new(backend.clone());
        session.refresh().await;
        assert!(session.is_authenticated());

        session.logout().await;
        assert!(!session.is_authenticated());
        assert_eq!(backend.calls("logout"), 1);
    }
}
