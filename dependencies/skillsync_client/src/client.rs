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

//! SkillSync backend API Client

use anyhow::{bail, Result};
use log::{debug, warn};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{self, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use reqwest_middleware::ClientBuilder as ReqwestClientBuilder;
use reqwest_middleware::RequestBuilder;
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Backend location used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

const XSRF_COOKIE: &str = "XSRF-TOKEN";
const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Errors raised while talking to the backend.
///
/// API methods return [`anyhow::Result`]; callers that need the HTTP status
/// can `downcast_ref::<ApiError>()` the error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status {
        status: StatusCode,
        message: String,
        body: Value,
    },

    /// `POST /api/profile/analyze` did not answer within its deadline.
    #[error("Analysis timeout. Processing continues in background.")]
    AnalysisTimeout,

    #[error("request failed: {0}")]
    Transport(#[from] reqwest_middleware::Error),

    #[error("failed to read response body: {0}")]
    Body(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status of the failed response, if the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn is_timeout(&self) -> bool {
        match self {
            ApiError::Transport(reqwest_middleware::Error::Reqwest(e)) => e.is_timeout(),
            ApiError::Body(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Returns the HTTP status carried by an API error, if any.
pub(crate) fn status_of(err: &anyhow::Error) -> Option<StatusCode> {
    err.downcast_ref::<ApiError>().and_then(ApiError::status)
}

/// An asynchronous `Client` to make Requests with.
#[derive(Debug, Clone)]
pub struct Client {
    /// The base URL this client sends requests to
    pub(crate) base_url: String,
    /// HTTP client to interact with the SkillSync backend
    pub(crate) client: reqwest_middleware::ClientWithMiddleware,
    /// Session cookies, shared with the underlying HTTP client
    pub(crate) cookies: Arc<Jar>,
    pub(crate) xsrf_token: Option<String>,
}

impl Client {
    /// The base URL this client sends requests to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// CSRF token for state-changing requests: the configured one, or the
    /// `XSRF-TOKEN` cookie the backend handed out.
    pub(crate) fn csrf_token(&self) -> Option<String> {
        if let Some(token) = &self.xsrf_token {
            return Some(token.clone());
        }
        let url = Url::parse(&self.base_url).ok()?;
        let cookies = self.cookies.cookies(&url)?;
        cookies
            .to_str()
            .ok()?
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == XSRF_COOKIE)
            .map(|(_, value)| value.to_string())
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let needs_csrf = [Method::POST, Method::PUT, Method::DELETE].contains(&method);
        let mut builder = self.client.request(method, self.url(path));
        if needs_csrf {
            match self.csrf_token() {
                Some(token) => builder = builder.header(XSRF_HEADER, token),
                None => warn!("CSRF token not found for a state-changing request to {}", path),
            }
        }
        builder
    }

    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> std::result::Result<T, ApiError> {
        let resp = builder.send().await?;
        handle_response(resp).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Ok(self.execute(self.request(Method::GET, path)).await?)
    }

    pub(crate) async fn post<T: DeserializeOwned, U: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &U,
    ) -> Result<T> {
        Ok(self
            .execute(self.request(Method::POST, path).json(body))
            .await?)
    }

    pub(crate) async fn put<T: DeserializeOwned, U: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &U,
    ) -> Result<T> {
        Ok(self
            .execute(self.request(Method::PUT, path).json(body))
            .await?)
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        Ok(self.execute(self.request(Method::DELETE, path)).await?)
    }
}

async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> std::result::Result<T, ApiError> {
    let status = resp.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(serde_json::from_value(Value::Null)?);
    }

    let is_json = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    let reason = status.canonical_reason().unwrap_or_default();
    let text = resp.text().await?;

    let data = if is_json {
        match serde_json::from_str::<Value>(&text) {
            Ok(v) => v,
            Err(e) => {
                warn!("JSON parse failed: {}", e);
                json!({ "message": reason })
            }
        }
    } else {
        let preview: String = text.chars().take(200).collect();
        warn!("Non-JSON response: {}", preview);
        json!({ "message": format!("Server error: {} {}", status.as_u16(), reason) })
    };
    debug!("{}", data);

    if !status.is_success() {
        let message = non_empty_str(&data, "message")
            .or_else(|| non_empty_str(&data, "error"))
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed: {}", status.as_u16()));
        return Err(ApiError::Status {
            status,
            message,
            body: data,
        });
    }

    Ok(serde_json::from_value(data)?)
}

fn non_empty_str<'a>(data: &'a Value, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// A [`ClientBuilder`] can be used to create a [`Client`] with custom configuration.
#[must_use]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    /// The base URL this client sends requests to
    base_url: String,
    xsrf_token: Option<String>,
    cookies: Vec<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    retry_policy: Option<ExponentialBackoff>,
}

impl ClientBuilder {
    /// Construct a new [`ClientBuilder`]
    ///
    /// # Example
    ///
    /// ```rust
    /// use skillsync_api::ClientBuilder;
    ///
    /// let _builder = ClientBuilder::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            xsrf_token: None,
            cookies: Vec::new(),
            timeout: None,
            connect_timeout: None,
            retry_policy: None,
        }
    }

    /// Sends `token` as `X-XSRF-TOKEN` on POST/PUT/DELETE instead of the
    /// token found in the cookie jar.
    pub fn with_xsrf_token(&mut self, token: impl Into<String>) -> &mut Self {
        self.xsrf_token = Some(token.into());
        self
    }

    /// Adds a `name=value` cookie (e.g. the backend session cookie).
    pub fn with_cookie(&mut self, cookie: impl Into<String>) -> &mut Self {
        self.cookies.push(cookie.into());
        self
    }

    pub fn with_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Retries transient failures of every request with `policy`.
    ///
    /// Leave unset for clients that feed a status poller, which already
    /// retries on its own schedule.
    pub fn with_retry_policy(&mut self, policy: ExponentialBackoff) -> &mut Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Returns a [`Client`] that uses this [`ClientBuilder`] configuration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use skillsync_api::ClientBuilder;
    ///
    /// let _client = ClientBuilder::new("http://localhost:8080")
    ///     .with_cookie("SESSION=abc")
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn build(&mut self) -> Result<Client> {
        let url = match Url::parse(&self.base_url) {
            Ok(url) => url,
            Err(e) => bail!("Invalid backend URL '{}': {}", self.base_url, e),
        };

        let jar = Arc::new(Jar::default());
        for cookie in &self.cookies {
            jar.add_cookie_str(cookie, &url);
        }

        let mut reqwest_client_builder = reqwest::Client::builder();
        reqwest_client_builder = reqwest_client_builder.connection_verbose(true);
        if let Some(v) = self.timeout {
            reqwest_client_builder = reqwest_client_builder.timeout(v);
        }
        if let Some(v) = self.connect_timeout {
            reqwest_client_builder = reqwest_client_builder.connect_timeout(v);
        }

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        reqwest_client_builder = reqwest_client_builder
            .default_headers(headers)
            .cookie_provider(jar.clone());

        let mut reqwest_builder = ReqwestClientBuilder::new(reqwest_client_builder.build()?);
        if let Some(policy) = self.retry_policy.clone() {
            reqwest_builder =
                reqwest_builder.with(RetryTransientMiddleware::new_with_policy(policy));
        }

        Ok(Client {
            base_url: self.base_url.clone(),
            client: reqwest_builder.build(),
            cookies: jar,
            xsrf_token: self.xsrf_token.clone(),
        })
    }
}
