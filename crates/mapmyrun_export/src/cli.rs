use clap::{ArgAction, Parser};
use mapmyrun_client::MapMyRunError;
use mapmyrun_client::config::Config;
use mapmyrun_client::utils::parse_bound;
use std::path::PathBuf;

/// Command line overrides layered over the `MAPMYRUN_*` environment.
#[derive(Parser, Debug, Default)]
#[command(
    name = "mapmyrun-export",
    about = "Download GPS workouts from MapMyRun as TCX files"
)]
pub struct Cli {
    /// Directory the TCX files are written to (env: MAPMYRUN_DOWNLOAD_DIR)
    #[arg(long, value_name = "DIR")]
    pub download_dir: Option<PathBuf>,

    /// Only workouts started after this instant; RFC 3339 or YYYY-MM-DD
    /// (env: MAPMYRUN_STARTED_AFTER)
    #[arg(long, value_name = "WHEN")]
    pub started_after: Option<String>,

    /// Only workouts started before this instant; RFC 3339 or YYYY-MM-DD
    /// (env: MAPMYRUN_STARTED_BEFORE)
    #[arg(long, value_name = "WHEN")]
    pub started_before: Option<String>,

    /// Maximum number of workouts to list (env: MAPMYRUN_FETCH_LIMIT)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Site root, mainly for testing (env: MAPMYRUN_BASE_URL)
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

impl Cli {
    /// Apply the flags that were given on top of `cfg`.
    pub fn apply(&self, mut cfg: Config) -> Result<Config, MapMyRunError> {
        if let Some(dir) = &self.download_dir {
            cfg.download_dir = dir.clone();
        }
        if let Some(s) = &self.started_after {
            cfg.started_after = parse_bound(s)
                .ok_or_else(|| MapMyRunError::Config(format!("invalid --started-after: {s}")))?;
        }
        if let Some(s) = &self.started_before {
            cfg.started_before = parse_bound(s)
                .ok_or_else(|| MapMyRunError::Config(format!("invalid --started-before: {s}")))?;
        }
        if let Some(limit) = self.limit {
            cfg.fetch_limit = limit;
        }
        if let Some(url) = &self.base_url {
            cfg.base_url = url.clone();
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
