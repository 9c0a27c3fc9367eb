//! The browser-like header set sent with every MapMyRun request.

use crate::MapMyRunError;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderName, HeaderValue, REFERER, USER_AGENT,
};
use secrecy::{ExposeSecret, SecretString};

pub const USER_AGENT_VALUE: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:126.0) Gecko/20100101 Firefox/126.0";
pub const ACCEPT_VALUE: &str = "application/json, text/plain, */*";
pub const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.5";

/// Fixed headers plus the pre-captured session cookie.
///
/// The profile never refreshes or rotates the session; an expired cookie
/// surfaces as a failed listing or download request.
#[derive(Clone, Debug)]
pub struct RequestProfile {
    headers: HeaderMap,
}

impl RequestProfile {
    pub fn new(base_url: &str, cookies: &SecretString) -> Result<Self, MapMyRunError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-dest"),
            HeaderValue::from_static("empty"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-mode"),
            HeaderValue::from_static("cors"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-site"),
            HeaderValue::from_static("same-origin"),
        );

        let referrer = format!("{}/dashboard", base_url.trim_end_matches('/'));
        let referrer = HeaderValue::from_str(&referrer)
            .map_err(|e| MapMyRunError::Config(format!("invalid base url for referrer: {e}")))?;
        headers.insert(REFERER, referrer);

        // Never echo the cookie itself in the error.
        let mut cookie = HeaderValue::from_str(cookies.expose_secret())
            .map_err(|_| MapMyRunError::Config("cookie string is not a valid header value".into()))?;
        cookie.set_sensitive(true);
        headers.insert(COOKIE, cookie);

        Ok(Self { headers })
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Attach the profile to a request.
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.headers(self.headers.clone())
    }
}
