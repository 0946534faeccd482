//! Session bootstrap: exchanging a long-lived token for session cookies.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tokio::time::sleep;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Cookie carrying the long-lived token.
pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// Cookie carrying the CSRF token.
pub const CSRF_COOKIE: &str = "ct0";

/// Cookies issued by the server for one long-lived token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookieSet {
    cookies: BTreeMap<String, String>,
}

impl SessionCookieSet {
    /// Build a cookie set from raw `Set-Cookie` header values.
    ///
    /// The input token is written last so it always replaces any
    /// `auth_token` the server echoed back.
    pub fn from_set_cookie_headers<I, S>(headers: I, token: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cookies = BTreeMap::new();
        for raw in headers {
            if let Some((name, value)) = parse_set_cookie(raw.as_ref()) {
                cookies.insert(name, value);
            }
        }
        cookies.insert(AUTH_TOKEN_COOKIE.to_string(), token.to_string());
        Self { cookies }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.get(AUTH_TOKEN_COOKIE)
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.get(CSRF_COOKIE)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cookies.keys().map(String::as_str)
    }

    /// Check the set carries both the CSRF cookie and the auth token.
    pub fn validate(&self) -> Result<()> {
        if self.csrf_token().map_or(true, str::is_empty) {
            return Err(Error::Session(format!(
                "server did not issue a '{}' cookie",
                CSRF_COOKIE
            )));
        }
        if self.auth_token().map_or(true, str::is_empty) {
            return Err(Error::Session(format!("missing '{}'", AUTH_TOKEN_COOKIE)));
        }
        Ok(())
    }

    /// Encode as a `Cookie` request header value.
    pub fn encode(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Take the leading `name=value` pair of a `Set-Cookie` header.
pub fn parse_set_cookie(raw: &str) -> Option<(String, String)> {
    let pair = raw.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name.to_string(), value.trim().to_string()))
}

/// Response of a single probe request.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub set_cookies: Vec<String>,
}

impl ProbeResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends the probe request that makes the server issue session cookies.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    async fn probe(&self, token: &str) -> Result<ProbeResponse>;
}

/// Probe transport over HTTPS.
pub struct HttpProbe {
    client: Client,
    url: String,
}

impl HttpProbe {
    pub fn new(url: impl Into<String>, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ProbeTransport for HttpProbe {
    async fn probe(&self, token: &str) -> Result<ProbeResponse> {
        tracing::debug!("GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .header(header::COOKIE, format!("{}={}", AUTH_TOKEN_COOKIE, token))
            .header(header::ACCEPT, "application/json, text/plain, */*")
            .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache")
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!("Probe response status: {}", status);

        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();

        Ok(ProbeResponse {
            status,
            set_cookies,
        })
    }
}

/// Converts a long-lived token into a [`SessionCookieSet`], retrying failed probes.
pub struct CredentialExchange<T> {
    transport: T,
    max_attempts: u32,
    retry_delay: Duration,
}

impl CredentialExchange<HttpProbe> {
    /// Exchange over HTTPS using the configured probe endpoint and user agent.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpProbe::new(config.probe_url.clone(), &config.user_agent)?;
        Ok(Self::new(
            transport,
            config.max_attempts,
            Duration::from_secs(config.retry_delay_seconds),
        ))
    }
}

impl<T: ProbeTransport> CredentialExchange<T> {
    pub fn new(transport: T, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            transport,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    /// Exchange `token` for session cookies.
    ///
    /// Retries block the caller. After `max_attempts` failures the last
    /// underlying error is returned inside [`Error::AuthExchange`].
    pub async fn exchange(&self, token: &str) -> Result<SessionCookieSet> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.attempt(token).await {
                Ok(cookies) => {
                    tracing::debug!(
                        "Session exchange succeeded on attempt {} ({} cookies)",
                        attempt,
                        cookies.len()
                    );
                    return Ok(cookies);
                }
                Err(e) if attempt >= self.max_attempts => {
                    return Err(Error::AuthExchange {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        "Session exchange attempt {}/{} failed: {}. Retrying in {:?}...",
                        attempt,
                        self.max_attempts,
                        e,
                        self.retry_delay
                    );
                    sleep(self.retry_delay).await;
                }
            }
        }
    }

    async fn attempt(&self, token: &str) -> Result<SessionCookieSet> {
        let response = self.transport.probe(token).await?;

        if !response.is_success() {
            return Err(Error::Fetch(format!(
                "probe returned HTTP {}",
                response.status
            )));
        }

        Ok(SessionCookieSet::from_set_cookie_headers(
            &response.set_cookies,
            token,
        ))
    }
}
