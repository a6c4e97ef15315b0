//! Verifalia async client implementation.

use crate::{Data, Error, Response, Result, ValidationRequest};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, LOCATION, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const DEFAULT_BASE_URL: &str = "https://api.verifalia.com/v1.1/";
const USER_AGENT_VALUE: &str = concat!("verifalia-client-rs/", env!("CARGO_PKG_VERSION"));
const JOBS_PATH: &str = "email-validations";
const JSON: &str = "application/json";

const ACCOUNT_SID_VAR: &str = "VERIFALIA_ACCOUNT_SID";
const AUTH_TOKEN_VAR: &str = "VERIFALIA_AUTH_TOKEN";

/// Async client for the Verifalia email validation API.
///
/// Holds only immutable configuration, so a single instance can be shared
/// (or cloned) across tasks issuing independent calls.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    account_sid: String,
    auth_token: String,
    base_url: Url,
    user_agent: String,
    user_agent_header: HeaderValue,
}

impl Client {
    /// Create a client with the default endpoint and user agent.
    ///
    /// Authentication uses HTTP Basic Auth with the account (or sub-account) SID
    /// as username and the auth token as password. Both must be non-empty.
    ///
    /// # Examples
    /// ```
    /// # use verifalia_client::Client;
    /// let client = Client::new("account-sid", "auth-token")?;
    /// assert_eq!(client.base_url(), "https://api.verifalia.com/v1.1/");
    /// # Ok::<(), verifalia_client::Error>(())
    /// ```
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(account_sid, auth_token).build()
    }

    /// Create a builder for configuring the client.
    pub fn builder(account_sid: impl Into<String>, auth_token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(account_sid, auth_token)
    }

    /// Create a client from `VERIFALIA_ACCOUNT_SID` and `VERIFALIA_AUTH_TOKEN`.
    ///
    /// Missing variables are treated as empty credentials.
    pub fn from_env() -> Result<Self> {
        let account_sid = std::env::var(ACCOUNT_SID_VAR).unwrap_or_default();
        let auth_token = std::env::var(AUTH_TOKEN_VAR).unwrap_or_default();
        Self::new(account_sid, auth_token)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    /// Submit a batch of addresses, creating a new validation job.
    ///
    /// Every call creates a new job on the server. The returned [`Response`]
    /// usually carries a `202 Accepted` status, the job payload and a
    /// `location` to poll.
    ///
    /// # Errors
    /// [`Error::InvalidInput`] if `emails` is empty (nothing is sent),
    /// [`Error::Request`] on transport failure, [`Error::Decode`] if a 2xx body
    /// is not a job payload.
    ///
    /// # Examples
    /// ```no_run
    /// # use verifalia_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), verifalia_client::Error> {
    /// let client = Client::new("account-sid", "auth-token")?;
    /// let resp = client.submit(["john.smith@example.com", "foo@example.net"]).await?;
    /// println!("{} -> {:?}", resp.status, resp.unique_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn submit<I, S>(&self, emails: I) -> Result<Response>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let body = ValidationRequest::new(emails);
        if body.is_empty() {
            return Err(Error::InvalidInput("no addresses supplied"));
        }

        debug!(entries = body.len(), "submitting validation job");
        let request = self.build_request(Method::POST, JOBS_PATH, Some(&body))?;
        self.send(request, true).await
    }

    /// Fetch the current state of a job.
    ///
    /// Read-only and safe to repeat. Partial progress is returned as-is; an
    /// unknown or expired ID comes back as a non-2xx [`Response`], not an error.
    ///
    /// # Examples
    /// ```no_run
    /// # use verifalia_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), verifalia_client::Error> {
    /// let client = Client::new("account-sid", "auth-token")?;
    /// let resp = client.poll("0b5b8e2c-77a5-4fb1-a5b8-c0e7c24e6c8d").await?;
    /// if let Some(job) = &resp.data {
    ///     println!("{}/{}", job.progress.no_of_completed_entries, job.progress.no_of_total_entries);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn poll(&self, unique_id: &str) -> Result<Response> {
        let url = self.job_url(unique_id)?;
        debug!(unique_id, "polling validation job");
        let request = self.build_request::<()>(Method::GET, url.as_str(), None)?;
        self.send(request, true).await
    }

    /// Delete a completed job.
    ///
    /// The server rejects deletion of an unfinished job (typically with
    /// `406 Not Acceptable`). The returned [`Response`] never carries a payload.
    pub async fn delete(&self, unique_id: &str) -> Result<Response> {
        let url = self.job_url(unique_id)?;
        debug!(unique_id, "deleting validation job");
        let request = self.build_request::<()>(Method::DELETE, url.as_str(), None)?;
        self.send(request, false).await
    }

    /// Build an authenticated request for `path`.
    ///
    /// `path` is resolved against the base URL with URL-join semantics, so
    /// relative paths land beneath it and absolute URLs override it. A present
    /// `body` is encoded as JSON before anything is sent.
    pub fn build_request<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
    ) -> Result<reqwest::Request> {
        let url = self.base_url.join(path)?;

        let mut builder = self
            .http
            .request(method, url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .headers(self.headers());

        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(Error::Serialize)?;
            builder = builder.body(payload);
        }

        builder.build().map_err(Into::into)
    }

    /// Execute a prepared request and normalize the outcome.
    async fn send(&self, request: reqwest::Request, with_payload: bool) -> Result<Response> {
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self.http.execute(request).await?;
        let status = response.status();
        let location = Self::follow_up_location(&url, response.headers().get(LOCATION));

        debug!(%method, %url, status = status.as_u16(), "received response");
        if !status.is_success() {
            warn!(%method, %url, status = status.as_u16(), "API returned non-success status");
        }

        if !with_payload {
            return Ok(Response::new(status, location, None));
        }

        let body = response.bytes().await?;
        let data = Self::decode_payload(status, &body)?;
        Ok(Response::new(status, location, data))
    }

    /// `Location` resolved against the request URL, so relative values become absolute.
    fn follow_up_location(request_url: &Url, value: Option<&HeaderValue>) -> Option<String> {
        let raw = match value?.to_str() {
            Ok(raw) => raw,
            Err(err) => {
                debug!(error = %err, "ignoring non-ASCII Location header");
                return None;
            }
        };

        match request_url.join(raw) {
            Ok(resolved) => Some(resolved.into()),
            Err(err) => {
                debug!(location = raw, error = %err, "Location header is not a URL, keeping it verbatim");
                Some(raw.to_owned())
            }
        }
    }

    /// 2xx bodies must be job payloads; other bodies are attached only when they are.
    fn decode_payload(status: StatusCode, body: &[u8]) -> Result<Option<Data>> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        match serde_json::from_slice::<Data>(body) {
            Ok(data) => Ok(Some(data)),
            Err(err) if status.is_success() => Err(Error::Decode(err)),
            Err(err) => {
                debug!(status = status.as_u16(), error = %err, "error body is not a job payload");
                Ok(None)
            }
        }
    }

    /// URL of a single job, with the ID encoded as one path segment.
    fn job_url(&self, unique_id: &str) -> Result<Url> {
        if unique_id.is_empty() {
            return Err(Error::InvalidInput("empty job unique ID"));
        }

        let mut url = self.base_url.join(JOBS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(unique_id);
        Ok(url)
    }

    /// Build headers for API requests.
    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, self.user_agent_header.clone());
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        headers
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Builder for configuring a Verifalia client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Clone)]
pub struct ClientBuilder {
    account_sid: String,
    auth_token: String,
    base_url: String,
    user_agent: String,
    timeout: Option<Duration>,
    proxy: Option<String>,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - Base URL `https://api.verifalia.com/v1.1/`
    /// - User agent `verifalia-client-rs/<version>`
    /// - No proxy, no client-side timeout
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: USER_AGENT_VALUE.to_string(),
            timeout: None,
            proxy: None,
            http: None,
        }
    }

    /// Override the API base URL.
    ///
    /// Useful for testing or for pinning another API version. A trailing `/`
    /// is added when missing.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a total request timeout. Without it the transport default applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a proxy URL (e.g., "http://127.0.0.1:8080" or "socks5://127.0.0.1:1080").
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Use a preconfigured `reqwest` client. `timeout` and `proxy` are then ignored.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// No network request is made.
    pub fn build(self) -> Result<Client> {
        if self.account_sid.is_empty() || self.auth_token.is_empty() {
            return Err(Error::MissingCredentials);
        }

        let mut base_url = self.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let user_agent_header = HeaderValue::from_str(&self.user_agent)?;
        let base_url = Url::parse(&base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }

        let http = match self.http {
            Some(http) => http,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(proxy_url) = &self.proxy {
                    builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
                }
                builder.build()?
            }
        };

        Ok(Client {
            http,
            account_sid: self.account_sid,
            auth_token: self.auth_token,
            base_url,
            user_agent: self.user_agent,
            user_agent_header,
        })
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("proxy", &self.proxy)
            .finish()
    }
}
