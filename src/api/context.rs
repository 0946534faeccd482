//! Request signing for authenticated upstream calls.

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};

use crate::api::session::SessionCookieSet;
use crate::error::{Error, Result};

/// Public bearer token used by the web client.
pub const WEB_BEARER_TOKEN: &str = "AAAAAAAAAAAAAAAAAAAAANRILgAAAAAAnNwIzUejRCOuH5E6I8xnZz4puTs%3D1Zv7ttfk8LF81IUq16cHjhLTvJu4FA33AGWWjCpTnA";

/// Auth-type marker for cookie-based sessions.
pub const AUTH_TYPE: &str = "OAuth2Session";

const CSRF_HEADER: &str = "x-csrf-token";
const AUTH_TYPE_HEADER: &str = "x-twitter-auth-type";

/// Authentication headers derived once from a session cookie set.
///
/// Headers are layered as `base < provider defaults < session overrides`:
/// whatever a call site passes in, the CSRF token, auth-type marker, bearer
/// token and cookie string of the session always win.
#[derive(Debug, Clone)]
pub struct RequestContext {
    defaults: HeaderMap,
    session: HeaderMap,
}

impl RequestContext {
    /// Build a context from a validated cookie set.
    pub fn new(cookies: SessionCookieSet, user_agent: &str) -> Result<Self> {
        cookies.validate()?;

        let mut defaults = HeaderMap::new();
        defaults.insert(header::USER_AGENT, HeaderValue::from_str(user_agent)?);
        defaults.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        defaults.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        defaults.insert(
            HeaderName::from_static("x-twitter-active-user"),
            HeaderValue::from_static("yes"),
        );
        defaults.insert(
            HeaderName::from_static("x-twitter-client-language"),
            HeaderValue::from_static("en"),
        );
        defaults.insert(
            HeaderName::from_static("x-client-uuid"),
            HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())?,
        );

        let csrf = cookies
            .csrf_token()
            .ok_or_else(|| Error::Session("missing CSRF cookie".into()))?;

        let mut session = HeaderMap::new();
        session.insert(
            HeaderName::from_static(CSRF_HEADER),
            HeaderValue::from_str(csrf)?,
        );
        session.insert(
            HeaderName::from_static(AUTH_TYPE_HEADER),
            HeaderValue::from_static(AUTH_TYPE),
        );
        session.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", WEB_BEARER_TOKEN))?,
        );
        let mut cookie = HeaderValue::from_str(&cookies.encode())?;
        cookie.set_sensitive(true);
        session.insert(header::COOKIE, cookie);

        Ok(Self {
            defaults,
            session,
        })
    }

    /// Layer the session headers over `base`.
    pub fn build_headers(&self, base: &HeaderMap) -> HeaderMap {
        let mut headers = base.clone();
        for layer in [&self.defaults, &self.session] {
            for (name, value) in layer {
                headers.insert(name.clone(), value.clone());
            }
        }
        headers
    }
}
