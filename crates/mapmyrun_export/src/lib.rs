//! Export GPS workouts from MapMyRun as TCX files.
//!
//! [`export::run_export`] drives a single run against any
//! [`MapMyRunClient`](mapmyrun_client::MapMyRunClient): it makes sure the
//! download directory exists, lists the workouts in the configured window,
//! keeps those with a recorded route and downloads them one by one. Files
//! already present with a non-zero size are skipped, so a failed run can
//! simply be started again.

pub mod cli;
pub mod downloader;
pub mod export;
pub mod logging;
mod test_utils;

pub use downloader::{DownloadOutcome, download_workout};
pub use export::{ExportOptions, ExportSummary, run_export};
