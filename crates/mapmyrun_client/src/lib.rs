//! `MapMyRunClient` trait, workout records and a reqwest-based implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod profile;
pub mod utils;

#[derive(Debug, Error)]
pub enum MapMyRunError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("listing request failed: {0}")]
    ListingFailed(RequestFailure),
    #[error("download request failed: {0}")]
    DownloadFailed(RequestFailure),
    #[error("malformed workout: {0}")]
    MalformedWorkout(String),
}

impl MapMyRunError {
    /// HTTP status of a rejected listing or download request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ListingFailed(f) | Self::DownloadFailed(f) => Some(f.status),
            _ => None,
        }
    }
}

/// Diagnostics captured from a non-2xx response.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestFailure {
    pub status: u16,
    pub status_text: String,
    pub details: ErrorDetails,
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status, self.status_text, self.details)
    }
}

/// Error body of a failed response: JSON when it parses, raw text otherwise.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    Json(serde_json::Value),
    Text(String),
}

impl ErrorDetails {
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).map_or_else(|_| Self::Text(body.to_string()), Self::Json)
    }
}

impl fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(v) => write!(f, "{v}"),
            Self::Text(s) => {
                let snippet: String = s.chars().take(256).collect();
                f.write_str(&snippet)
            }
        }
    }
}

/// A workout as returned by the `allWorkouts` listing.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Workout {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub name: String,
    /// Only required once the workout is selected for download.
    #[serde(default)]
    pub start_datetime: Option<String>,
    #[serde(rename = "_links", default, deserialize_with = "deserialize_null_default")]
    pub links: WorkoutLinks,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct WorkoutLinks {
    #[serde(rename = "self", default, deserialize_with = "deserialize_null_default")]
    pub self_links: Vec<Link>,
    /// Present only for workouts with a recorded route; may be absent or null.
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub route: Vec<Link>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Link {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub id: Option<String>,
    pub href: Option<String>,
}

impl Workout {
    /// Identifier taken from the first `self` link.
    pub fn id(&self) -> Option<&str> {
        self.links.self_links.first().and_then(|l| l.id.as_deref())
    }

    /// Workouts with route links are taken to carry GPS data.
    pub fn has_route(&self) -> bool {
        !self.links.route.is_empty()
    }
}

/// The reduced record needed to name and fetch an export.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTarget {
    pub id: String,
    pub name: String,
    pub start_datetime: String,
}

impl TryFrom<&Workout> for WorkoutTarget {
    type Error = MapMyRunError;

    fn try_from(w: &Workout) -> Result<Self, Self::Error> {
        let start_datetime = w.start_datetime.clone().ok_or_else(|| {
            MapMyRunError::MalformedWorkout(format!("workout '{}' has no start_datetime", w.name))
        })?;
        let id = w.id().ok_or_else(|| {
            MapMyRunError::MalformedWorkout(format!(
                "workout '{}' started {start_datetime} has no self link id",
                w.name
            ))
        })?;
        Ok(Self {
            id: id.to_string(),
            name: w.name.clone(),
            start_datetime,
        })
    }
}

/// Treat an explicit `null` the same as a missing field.
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string().into()),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[async_trait]
pub trait MapMyRunClient: Send + Sync + 'static {
    /// Fetch the workouts of the configured user started inside the given bounds.
    async fn list_workouts(
        &self,
        started_after: DateTime<Utc>,
        started_before: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Workout>, MapMyRunError>;

    /// Stream the TCX export of a workout to `output_path`, returning the
    /// number of bytes written.
    async fn export_workout_tcx(
        &self,
        workout_id: &str,
        output_path: &Path,
    ) -> Result<u64, MapMyRunError>;
}
