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


//! Runtime settings: environment first, then `~/.skillsync/config`, then defaults.

use crate::flows::TimeoutPolicy;
use anyhow::{bail, Context, Result};
use log::debug;
use skillsync_api::{ClientBuilder, DEFAULT_BASE_URL};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_BACKEND_URL: &str = "SKILLSYNC_BACKEND_URL";
pub const ENV_XSRF_TOKEN: &str = "SKILLSYNC_XSRF_TOKEN";
pub const ENV_SESSION_COOKIE: &str = "SKILLSYNC_SESSION_COOKIE";
pub const ENV_TIMEOUT_POLICY: &str = "SKILLSYNC_TIMEOUT_POLICY";
pub const ENV_REQUEST_TIMEOUT: &str = "SKILLSYNC_REQUEST_TIMEOUT_SECS";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct FileConfig {
    backend_url: Option<String>,
    xsrf_token: Option<String>,
    session_cookie: Option<String>,
    timeout_policy: Option<String>,
    request_timeout_secs: Option<String>,
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn parse_file_config(content: &str) -> FileConfig {
    let mut config = FileConfig::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let (k, v) = match line.split_once('=') {
            Some((k, v)) => (k.trim(), strip_quotes(v).to_string()),
            None => continue,
        };
        if v.is_empty() {
            continue;
        }
        match k {
            "backend_url" => config.backend_url = Some(v),
            "xsrf_token" => config.xsrf_token = Some(v),
            "session_cookie" => config.session_cookie = Some(v),
            "timeout_policy" => config.timeout_policy = Some(v),
            "request_timeout_secs" => config.request_timeout_secs = Some(v),
            other => debug!("ignoring unknown config key '{}'", other),
        }
    }
    config
}

fn read_file_config() -> FileConfig {
    let home = match env::var("HOME") {
        Ok(v) if !v.trim().is_empty() => v,
        _ => return FileConfig::default(),
    };
    let mut path = PathBuf::from(home);
    path.push(".skillsync");
    path.push("config");

    match fs::read_to_string(&path) {
        Ok(content) => parse_file_config(&content),
        Err(_) => FileConfig::default(),
    }
}

/// Where the backend lives and how to authenticate against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub backend_url: String,
    pub xsrf_token: Option<String>,
    /// `name=value` session cookie issued by the backend after sign-in.
    pub session_cookie: Option<String>,
    pub timeout_policy: TimeoutPolicy,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BASE_URL.to_string(),
            xsrf_token: None,
            session_cookie: None,
            timeout_policy: TimeoutPolicy::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment and `~/.skillsync/config`.
    pub fn load() -> Result<Self> {
        Self::resolve(read_file_config(), |key| env::var(key).ok())
    }

    fn resolve(file: FileConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let pick = |key: &str, fallback: Option<String>| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .or(fallback)
        };

        let mut settings = Settings::default();
        if let Some(url) = pick(ENV_BACKEND_URL, file.backend_url) {
            settings.backend_url = url;
        }
        settings.xsrf_token = pick(ENV_XSRF_TOKEN, file.xsrf_token);
        settings.session_cookie = pick(ENV_SESSION_COOKIE, file.session_cookie);
        if let Some(cookie) = &settings.session_cookie {
            if !cookie.contains('=') {
                bail!("{ENV_SESSION_COOKIE} must look like 'name=value', got '{cookie}'");
            }
        }
        if let Some(policy) = pick(ENV_TIMEOUT_POLICY, file.timeout_policy) {
            settings.timeout_policy = policy
                .parse()
                .with_context(|| format!("invalid {ENV_TIMEOUT_POLICY}"))?;
        }
        if let Some(secs) = pick(ENV_REQUEST_TIMEOUT, file.request_timeout_secs) {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("invalid {ENV_REQUEST_TIMEOUT} '{secs}'"))?;
            if secs == 0 {
                bail!("{ENV_REQUEST_TIMEOUT} must be at least one second");
            }
            settings.request_timeout = Duration::from_secs(secs);
        }
        Ok(settings)
    }

    /// A client builder pointed at the configured backend with the session attached.
    pub fn client_builder(&self) -> ClientBuilder {
        let mut builder = ClientBuilder::new(&self.backend_url);
        builder.with_timeout(self.request_timeout);
        if let Some(token) = &self.xsrf_token {
            builder.with_xsrf_token(token);
        }
        if let Some(cookie) = &self.session_cookie {
            builder.with_cookie(cookie);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn file_config_skips_comments_and_quotes() {
        let config = parse_file_config(
            "# local backend\nbackend_url = \"http://10.0.0.5:8080\"\n; note\nxsrf_token='abc'\nbogus\n",
        );
        assert_eq!(config.backend_url.as_deref(), Some("http://10.0.0.5:8080"));
        assert_eq!(config.xsrf_token.as_deref(), Some("abc"));
        assert_eq!(config.session_cookie, None);
    }

    #[test]
    fn environment_wins_over_file() {
        let file = FileConfig {
            backend_url: Some("http://from-file:8080".to_string()),
            timeout_policy: Some("strict".to_string()),
            ..Default::default()
        };
        let settings = Settings::resolve(
            file,
            env_of(&[(ENV_BACKEND_URL, "http://from-env:9090"), (ENV_TIMEOUT_POLICY, " ")]),
        )
        .unwrap();
        assert_eq!(settings.backend_url, "http://from-env:9090");
        assert_eq!(settings.timeout_policy, TimeoutPolicy::Strict);
    }

    #[test]
    fn defaults_apply_without_sources() {
        let settings = Settings::resolve(FileConfig::default(), env_of(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(Settings::resolve(
            FileConfig::default(),
            env_of(&[(ENV_SESSION_COOKIE, "no-equals-sign")])
        )
        .is_err());
        assert!(Settings::resolve(
            FileConfig::default(),
            env_of(&[(ENV_TIMEOUT_POLICY, "hopeful")])
        )
        .is_err());
    }

    #[test]
    fn request_timeout_from_env_or_file() {
        let file = FileConfig {
            request_timeout_secs: Some("45".to_string()),
            ..Default::default()
        };
        let settings = Settings::resolve(file.clone(), env_of(&[])).unwrap();
        assert_eq!(settings.request_timeout, Duration::from_secs(45));

        let settings = Settings::resolve(file, env_of(&[(ENV_REQUEST_TIMEOUT, "10")])).unwrap();
        assert_eq!(settings.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let file = FileConfig {
            request_timeout_secs: Some("0".to_string()),
            ..Default::default()
        };
        assert!(Settings::resolve(file, env_of(&[])).is_err());
        assert!(Settings::resolve(
            FileConfig::default(),
            env_of(&[(ENV_REQUEST_TIMEOUT, "0")])
        )
        .is_err());
        assert!(Settings::resolve(
            FileConfig::default(),
            env_of(&[(ENV_REQUEST_TIMEOUT, "soon")])
        )
        .is_err());
    }
}
