//! The export run: prepare the directory, list, select GPS workouts and
//! download them one after another.

use crate::downloader::{DownloadOutcome, download_workout};
use chrono::{DateTime, Utc};
use mapmyrun_client::config::Config;
use mapmyrun_client::utils::{format_bound, select_gps_workouts};
use mapmyrun_client::{MapMyRunClient, MapMyRunError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Inputs of a single export run.
#[derive(Clone, Debug)]
pub struct ExportOptions {
    pub download_dir: PathBuf,
    pub started_after: DateTime<Utc>,
    pub started_before: DateTime<Utc>,
    pub limit: u32,
}

impl From<&Config> for ExportOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            download_dir: cfg.download_dir.clone(),
            started_after: cfg.started_after,
            started_before: cfg.started_before,
            limit: cfg.fetch_limit,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub listed: usize,
    pub gps_workouts: usize,
    pub downloaded: usize,
    pub skipped: usize,
}

async fn ensure_download_dir(dir: &Path) -> Result<(), MapMyRunError> {
    if tokio::fs::try_exists(dir).await? {
        tracing::info!(download_dir = %dir.display(), "Download directory already exists");
    } else {
        tokio::fs::create_dir_all(dir).await?;
        tracing::info!(download_dir = %dir.display(), "Created download directory");
    }
    Ok(())
}

/// Run one export. The first failure aborts the run; files written before
/// it stay on disk and are skipped next time.
pub async fn run_export<C>(
    client: &C,
    options: &ExportOptions,
) -> Result<ExportSummary, MapMyRunError>
where
    C: MapMyRunClient + ?Sized,
{
    ensure_download_dir(&options.download_dir).await?;

    tracing::info!(
        started_after = %format_bound(&options.started_after),
        started_before = %format_bound(&options.started_before),
        limit = options.limit,
        "Fetching workouts from MapMyRun"
    );
    let workouts = client
        .list_workouts(options.started_after, options.started_before, options.limit)
        .await?;
    tracing::info!(count = workouts.len(), "Fetched workouts from MapMyRun");

    let targets = select_gps_workouts(&workouts)?;
    tracing::info!(
        count = targets.len(),
        "Found (presumably) GPS workouts. Starting downloads"
    );

    let mut summary = ExportSummary {
        listed: workouts.len(),
        gps_workouts: targets.len(),
        ..ExportSummary::default()
    };

    let total = targets.len();
    for (i, target) in targets.iter().enumerate() {
        tracing::info!(
            progress = %format!("{}/{total}", i + 1),
            id = %target.id,
            name = %target.name,
            start_datetime = %target.start_datetime,
            "Downloading workout"
        );
        match download_workout(client, &options.download_dir, target).await? {
            DownloadOutcome::Downloaded { .. } => summary.downloaded += 1,
            DownloadOutcome::Skipped { .. } => summary.skipped += 1,
        }
    }

    tracing::info!(count = total, "All workouts downloaded");
    Ok(summary)
}
