//! HTTP client implementation for the MapMyRun web endpoints.
//!
//! This module provides a reqwest-based implementation of the [`MapMyRunClient`](crate::MapMyRunClient) trait.
//! Both endpoints are the ones the MapMyRun website itself calls, authenticated
//! by the session cookie carried in [`RequestProfile`].

use crate::config::Config;
use crate::profile::RequestProfile;
use crate::utils::format_bound;
use crate::{ErrorDetails, MapMyRunClient, MapMyRunError, RequestFailure, Workout};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Which request produced a non-2xx response.
#[derive(Clone, Copy, Debug)]
enum RequestKind {
    Listing,
    Download,
}

/// Client for the MapMyRun website using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestMapMyRunClient {
    base_url: String,
    user_id: String,
    profile: RequestProfile,
    client: reqwest::Client,
}

impl ReqwestMapMyRunClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The site root (e.g., "https://www.mapmyrun.com")
    /// * `user_id` - The user whose workouts are listed
    /// * `cookies` - The pre-captured session cookie string
    pub fn new(
        base_url: &str,
        user_id: impl Into<String>,
        cookies: &SecretString,
    ) -> Result<Self, MapMyRunError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let profile = RequestProfile::new(&base_url, cookies)?;
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url,
            user_id: user_id.into(),
            profile,
            client,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, MapMyRunError> {
        Self::new(&cfg.base_url, cfg.user_id.clone(), &cfg.cookies)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a GET request carrying the session profile.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.profile.apply(self.client.get(url))
    }

    /// Extract error information from a failed response and log it.
    async fn error_from_response(resp: reqwest::Response, kind: RequestKind) -> MapMyRunError {
        let status = resp.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = resp.text().await.unwrap_or_default();
        let details = ErrorDetails::from_body(&body);

        tracing::error!(
            status = status.as_u16(),
            status_text = %status_text,
            error_details = %details,
            "Request failed"
        );

        let failure = RequestFailure {
            status: status.as_u16(),
            status_text,
            details,
        };
        match kind {
            RequestKind::Listing => MapMyRunError::ListingFailed(failure),
            RequestKind::Download => MapMyRunError::DownloadFailed(failure),
        }
    }

    /// Stream a successful response body into `output_path`.
    ///
    /// Bytes go to a sibling `.part` file which is renamed over the target
    /// only once fully written and synced, so an interrupted run never leaves
    /// a truncated file under the final name.
    async fn stream_to_file(
        resp: reqwest::Response,
        output_path: &Path,
    ) -> Result<u64, MapMyRunError> {
        let part_path = part_path(output_path);
        let result: Result<u64, MapMyRunError> = async {
            let written = Self::write_part(resp, &part_path).await?;
            tokio::fs::rename(&part_path, output_path).await?;
            Ok(written)
        }
        .await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(&part_path).await;
        }
        result
    }

    async fn write_part(resp: reqwest::Response, part_path: &Path) -> Result<u64, MapMyRunError> {
        let mut stream = resp.bytes_stream();
        let mut file = tokio::fs::File::create(part_path).await?;
        let mut written: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let bytes = chunk?;
            file.write_all(&bytes).await?;
            written = written.saturating_add(bytes.len() as u64);
        }
        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }
}

/// `<target>.part`
pub fn part_path(output_path: &Path) -> PathBuf {
    let mut name = output_path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

#[async_trait]
impl MapMyRunClient for ReqwestMapMyRunClient {
    async fn list_workouts(
        &self,
        started_after: DateTime<Utc>,
        started_before: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Workout>, MapMyRunError> {
        let url = format!("{}/internal/allWorkouts/", self.base_url);
        let qp = [
            ("user", self.user_id.clone()),
            ("started_after", format_bound(&started_after)),
            ("started_before", format_bound(&started_before)),
            ("limit", limit.to_string()),
        ];

        let resp = self.get_request(&url).query(&qp).send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp, RequestKind::Listing).await);
        }
        tracing::info!(url = %resp.url(), "Request succeeded");

        Ok(resp.json::<Vec<Workout>>().await?)
    }

    async fn export_workout_tcx(
        &self,
        workout_id: &str,
        output_path: &Path,
    ) -> Result<u64, MapMyRunError> {
        let url = format!("{}/workout/export/{}/tcx", self.base_url, workout_id);
        let resp = self.get_request(&url).send().await?;
        if !resp.status().is_success() {
            return Err(Self::error_from_response(resp, RequestKind::Download).await);
        }
        tracing::debug!(%url, "Request succeeded");

        Self::stream_to_file(resp, output_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_new_trims_trailing_slash() {
        let client = ReqwestMapMyRunClient::new(
            "http://localhost/",
            "42",
            &SecretString::new("session=abc".into()),
        )
        .expect("client");
        assert_eq!(client.base_url(), "http://localhost");
    }

    #[test]
    fn client_new_rejects_invalid_cookie() {
        let res = ReqwestMapMyRunClient::new(
            "http://localhost",
            "42",
            &SecretString::new("a\r\nb".into()),
        );
        assert!(res.is_err());
    }

    #[test]
    fn part_path_appends_suffix() {
        let p = part_path(Path::new("/tmp/dl/workout-2024-01-01T00:00:00Z-1.tcx"));
        assert_eq!(
            p,
            PathBuf::from("/tmp/dl/workout-2024-01-01T00:00:00Z-1.tcx.part")
        );
    }
}
