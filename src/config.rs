//! Run configuration resolved from the environment.
//!
//! A `.env` file, if present, is loaded first so the same variables can be
//! kept next to the data.

use std::path::{Path, PathBuf};

/// Default dataset location when neither a flag nor `LOAN_DATA_PATH` is set.
pub const DEFAULT_DATA_PATH: &str = "loan_data.csv";

/// Default log file when `LOG_FILE_PATH` is unset.
pub const DEFAULT_LOG_FILE: &str = "logs/loan_tiers.log";

/// Where the rolling JSON log is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub file_name: String,
}

impl LogConfig {
    pub fn from_path(path: &str) -> Self {
        let path = Path::new(path);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("logs"))
            .to_path_buf();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("loan_tiers.log")
            .to_string();

        Self { dir, file_name }
    }
}

/// Everything one run reads from the environment.
///
/// `LOAN_DATA_PATH` picks the dataset, `LOG_FILE_PATH` the rolling log, and
/// `LOAN_JSON_OUT` / `LOAN_CSV_DIR` enable the report files. Empty values
/// count as unset. Command-line flags win over all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub data_path: PathBuf,
    pub json_out: Option<PathBuf>,
    pub csv_dir: Option<PathBuf>,
    pub log: LogConfig,
}

impl RunConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves the config through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            data_path: var("LOAN_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            json_out: var("LOAN_JSON_OUT").map(PathBuf::from),
            csv_dir: var("LOAN_CSV_DIR").map(PathBuf::from),
            log: LogConfig::from_path(
                &var("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            ),
        }
    }

    /// Applies command-line values on top of the environment.
    pub fn with_overrides(
        mut self,
        data_path: Option<PathBuf>,
        json_out: Option<PathBuf>,
        csv_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        self.json_out = json_out.or(self.json_out);
        self.csv_dir = csv_dir.or(self.csv_dir);
        self
    }
}

/// Loads `.env` into the process environment. A missing file is not an error.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}
