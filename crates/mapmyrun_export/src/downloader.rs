//! Per-workout TCX download with skip-if-present.

use mapmyrun_client::utils::target_filename;
use mapmyrun_client::{MapMyRunClient, MapMyRunError, WorkoutTarget};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DownloadOutcome {
    Skipped { path: PathBuf },
    Downloaded { path: PathBuf, bytes: u64 },
}

pub fn target_path(download_dir: &Path, target: &WorkoutTarget) -> PathBuf {
    download_dir.join(target_filename(target))
}

/// A non-empty file at the target path counts as already downloaded.
/// Empty files are left over from failed runs and get replaced.
async fn already_downloaded(path: &Path) -> Result<bool, MapMyRunError> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(meta.is_file() && meta.len() > 0),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub async fn download_workout<C>(
    client: &C,
    download_dir: &Path,
    target: &WorkoutTarget,
) -> Result<DownloadOutcome, MapMyRunError>
where
    C: MapMyRunClient + ?Sized,
{
    let path = target_path(download_dir, target);
    let filename = target_filename(target);

    if already_downloaded(&path).await? {
        tracing::info!(target_filename = %filename, "Workout already downloaded, skipping");
        return Ok(DownloadOutcome::Skipped { path });
    }

    let bytes = client.export_workout_tcx(&target.id, &path).await?;
    tracing::info!(target_filename = %filename, bytes, "Workout downloaded");
    Ok(DownloadOutcome::Downloaded { path, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeClient;

    fn target(id: &str) -> WorkoutTarget {
        WorkoutTarget {
            id: id.into(),
            name: format!("w{id}"),
            start_datetime: "2024-04-01T07:00:00+00:00".into(),
        }
    }

    #[test]
    fn target_path_joins_filename() {
        let p = target_path(Path::new("out"), &target("5"));
        assert_eq!(
            p,
            PathBuf::from("out/workout-2024-04-01T07:00:00+00:00-5.tcx")
        );
    }

    #[tokio::test]
    async fn downloads_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let client = FakeClient::new(vec![]);
        let outcome = download_workout(&client, dir.path(), &target("1"))
            .await
            .unwrap();
        let path = target_path(dir.path(), &target("1"));
        assert_eq!(
            outcome,
            DownloadOutcome::Downloaded {
                path: path.clone(),
                bytes: 9
            }
        );
        assert_eq!(std::fs::read_to_string(path).unwrap(), "tcx for 1");
        assert_eq!(client.exported(), vec!["1".to_string()]);
    }

    #[tokio::test]
    async fn skips_non_empty_file_without_request() {
        let dir = tempfile::tempdir().unwrap();
        let path = target_path(dir.path(), &target("1"));
        std::fs::write(&path, b"0123456789").unwrap();

        let client = FakeClient::new(vec![]);
        let outcome = download_workout(&client, dir.path(), &target("1"))
            .await
            .unwrap();

        assert_eq!(outcome, DownloadOutcome::Skipped { path: path.clone() });
        assert!(client.exported().is_empty());
        assert_eq!(std::fs::read(path).unwrap(), b"0123456789");
    }

    #[tokio::test]
    async fn replaces_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = target_path(dir.path(), &target("2"));
        std::fs::write(&path, b"").unwrap();

        let client = FakeClient::new(vec![]);
        let outcome = download_workout(&client, dir.path(), &target("2"))
            .await
            .unwrap();

        assert!(matches!(outcome, DownloadOutcome::Downloaded { .. }));
        assert_eq!(client.exported(), vec!["2".to_string()]);
        assert_eq!(std::fs::read_to_string(path).unwrap(), "tcx for 2");
    }
}
