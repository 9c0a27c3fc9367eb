//! In-memory `MapMyRunClient` used by unit tests.
#![cfg(test)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mapmyrun_client::{
    ErrorDetails, MapMyRunClient, MapMyRunError, RequestFailure, Workout,
};
use serde_json::json;
use std::path::Path;
use std::sync::Mutex;

/// Serves a fixed listing and writes `tcx for <id>` for every export.
pub struct FakeClient {
    listing: Vec<Workout>,
    listing_status: Option<u16>,
    fail_export: Option<String>,
    exported: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new(listing: Vec<Workout>) -> Self {
        Self {
            listing,
            listing_status: None,
            fail_export: None,
            exported: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_listing(status: u16) -> Self {
        Self {
            listing_status: Some(status),
            ..Self::new(vec![])
        }
    }

    pub fn failing_export(mut self, workout_id: &str) -> Self {
        self.fail_export = Some(workout_id.to_string());
        self
    }

    /// Ids passed to `export_workout_tcx`, in call order.
    pub fn exported(&self) -> Vec<String> {
        self.exported.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

fn failure(status: u16) -> RequestFailure {
    RequestFailure {
        status,
        status_text: "Forbidden".into(),
        details: ErrorDetails::Json(json!({"error": "session expired"})),
    }
}

pub fn workout(id: &str, start: &str, gps: bool) -> Workout {
    let route = if gps {
        json!([{"id": format!("route-{id}")}])
    } else {
        json!([])
    };
    serde_json::from_value(json!({
        "name": format!("Workout {id}"),
        "start_datetime": start,
        "_links": {"self": [{"id": id}], "route": route}
    }))
    .expect("workout json")
}

#[async_trait]
impl MapMyRunClient for FakeClient {
    async fn list_workouts(
        &self,
        _started_after: DateTime<Utc>,
        _started_before: DateTime<Utc>,
        limit: u32,
    ) -> Result<Vec<Workout>, MapMyRunError> {
        if let Some(status) = self.listing_status {
            return Err(MapMyRunError::ListingFailed(failure(status)));
        }
        Ok(self.listing.iter().take(limit as usize).cloned().collect())
    }

    async fn export_workout_tcx(
        &self,
        workout_id: &str,
        output_path: &Path,
    ) -> Result<u64, MapMyRunError> {
        self.exported
            .lock()
            .expect("exported lock")
            .push(workout_id.to_string());
        if self.fail_export.as_deref() == Some(workout_id) {
            return Err(MapMyRunError::DownloadFailed(failure(403)));
        }
        let body = format!("tcx for {workout_id}");
        tokio::fs::write(output_path, &body).await?;
        Ok(body.len() as u64)
    }
}
