use crate::MapMyRunError;
use crate::utils::parse_bound;
use chrono::{DateTime, TimeZone, Utc};
use secrecy::SecretString;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://www.mapmyrun.com";
pub const DEFAULT_DOWNLOAD_DIR: &str = "workouts";
pub const DEFAULT_FETCH_LIMIT: u32 = 1000;

#[derive(Clone, Debug)]
pub struct Config {
    pub cookies: SecretString,
    pub user_id: String,
    pub base_url: String,
    pub download_dir: PathBuf,
    pub started_after: DateTime<Utc>,
    pub started_before: DateTime<Utc>,
    pub fetch_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, MapMyRunError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Read and validate the configuration using the provided getter.
    pub fn from_env_with<F>(get: F) -> Result<Self, MapMyRunError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let cfg = Self::read_env_with(get)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse the environment without checking the date range or limit, for
    /// callers that layer further overrides before calling [`Config::validate`].
    pub fn read_env() -> Result<Self, MapMyRunError> {
        Self::read_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function, so tests never touch the process environment.
    pub fn read_env_with<F>(mut get: F) -> Result<Self, MapMyRunError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let cookies = get("MAPMYRUN_COOKIES")
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| MapMyRunError::Config("MAPMYRUN_COOKIES missing".into()))?;
        let user_id = get("MAPMYRUN_USER")
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| MapMyRunError::Config("MAPMYRUN_USER missing".into()))?;
        let base_url = get("MAPMYRUN_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let download_dir = get("MAPMYRUN_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR));

        let started_after = match get("MAPMYRUN_STARTED_AFTER") {
            Some(s) => parse_bound(&s).ok_or_else(|| {
                MapMyRunError::Config(format!("invalid MAPMYRUN_STARTED_AFTER: {s}"))
            })?,
            None => default_started_after(),
        };
        let started_before = match get("MAPMYRUN_STARTED_BEFORE") {
            Some(s) => parse_bound(&s).ok_or_else(|| {
                MapMyRunError::Config(format!("invalid MAPMYRUN_STARTED_BEFORE: {s}"))
            })?,
            None => Utc::now(),
        };
        let fetch_limit = match get("MAPMYRUN_FETCH_LIMIT") {
            Some(s) => s.trim().parse::<u32>().map_err(|_| {
                MapMyRunError::Config(format!("invalid MAPMYRUN_FETCH_LIMIT: {s}"))
            })?,
            None => DEFAULT_FETCH_LIMIT,
        };

        Ok(Self {
            cookies: SecretString::new(cookies.into()),
            user_id,
            base_url,
            download_dir,
            started_after,
            started_before,
            fetch_limit,
        })
    }

    /// Check the date range and limit; also used after CLI overrides.
    pub fn validate(&self) -> Result<(), MapMyRunError> {
        if self.started_after >= self.started_before {
            return Err(MapMyRunError::Config(format!(
                "started_after ({}) must be earlier than started_before ({})",
                self.started_after, self.started_before
            )));
        }
        if self.fetch_limit == 0 {
            return Err(MapMyRunError::Config("fetch limit must be positive".into()));
        }
        Ok(())
    }
}

fn default_started_after() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn base_env(k: &str) -> Option<String> {
        match k {
            "MAPMYRUN_COOKIES" => Some("session=abc; csrftoken=def".into()),
            "MAPMYRUN_USER" => Some("12345".into()),
            _ => None,
        }
    }

    #[test]
    fn from_env_missing_cookies() {
        let get = |k: &str| match k {
            "MAPMYRUN_COOKIES" => None,
            other => base_env(other),
        };
        let res = Config::from_env_with(get);
        assert!(matches!(res, Err(MapMyRunError::Config(_))));
    }

    #[test]
    fn from_env_missing_user() {
        let get = |k: &str| match k {
            "MAPMYRUN_USER" => Some("  ".into()),
            other => base_env(other),
        };
        assert!(Config::from_env_with(get).is_err());
    }

    #[test]
    fn from_env_applies_defaults() {
        let cfg = Config::from_env_with(base_env).expect("cfg");
        assert_eq!(cfg.user_id, "12345");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.download_dir, PathBuf::from("workouts"));
        assert_eq!(cfg.fetch_limit, 1000);
        assert_eq!(cfg.started_after.to_rfc3339(), "2000-01-01T00:00:00+00:00");
        assert_eq!(cfg.cookies.expose_secret(), "session=abc; csrftoken=def");
    }

    #[test]
    fn from_env_reads_values() {
        let get = |k: &str| match k {
            "MAPMYRUN_BASE_URL" => Some("http://localhost:9999".into()),
            "MAPMYRUN_DOWNLOAD_DIR" => Some("/tmp/tcx".into()),
            "MAPMYRUN_STARTED_AFTER" => Some("2023-01-01".into()),
            "MAPMYRUN_STARTED_BEFORE" => Some("2024-06-30T12:00:00Z".into()),
            "MAPMYRUN_FETCH_LIMIT" => Some("40".into()),
            other => base_env(other),
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.base_url, "http://localhost:9999");
        assert_eq!(cfg.download_dir, PathBuf::from("/tmp/tcx"));
        assert_eq!(cfg.started_after.to_rfc3339(), "2023-01-01T00:00:00+00:00");
        assert_eq!(cfg.started_before.to_rfc3339(), "2024-06-30T12:00:00+00:00");
        assert_eq!(cfg.fetch_limit, 40);
    }

    #[test]
    fn from_env_rejects_bad_limit() {
        let get = |k: &str| match k {
            "MAPMYRUN_FETCH_LIMIT" => Some("lots".into()),
            other => base_env(other),
        };
        assert!(Config::from_env_with(get).is_err());
    }

    #[test]
    fn from_env_rejects_inverted_range() {
        let get = |k: &str| match k {
            "MAPMYRUN_STARTED_AFTER" => Some("2024-01-02".into()),
            "MAPMYRUN_STARTED_BEFORE" => Some("2024-01-01".into()),
            other => base_env(other),
        };
        assert!(Config::from_env_with(get).is_err());
    }

    #[test]
    fn read_env_defers_range_check() {
        let get = |k: &str| match k {
            "MAPMYRUN_STARTED_AFTER" => Some("2030-01-01".into()),
            other => base_env(other),
        };
        let cfg = Config::read_env_with(get).expect("unvalidated cfg");
        assert_eq!(cfg.started_after.to_rfc3339(), "2030-01-01T00:00:00+00:00");
        assert!(cfg.validate().is_err());
    }
}
