use std::env;
use std::path::PathBuf;

use crate::error::TodoError;

/// File used when neither `--file` nor the environment names one.
pub const DEFAULT_DATA_FILE: &str = "tasks.json";

/// Environment variable overriding the data file location.
pub const DATA_FILE_ENV: &str = "TODOMAN_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub json_output: bool,
}

impl Settings {
    /// Precedence: explicit flag, then `TODOMAN_FILE`, then `./tasks.json`.
    pub fn resolve(file_flag: Option<PathBuf>, json_output: bool) -> Result<Self, TodoError> {
        Self::resolve_with(file_flag, env::var_os(DATA_FILE_ENV).map(PathBuf::from), json_output)
    }

    fn resolve_with(
        file_flag: Option<PathBuf>,
        env_file: Option<PathBuf>,
        json_output: bool,
    ) -> Result<Self, TodoError> {
        let data_file = file_flag
            .or(env_file.filter(|p| !p.as_os_str().is_empty()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        if data_file.as_os_str().is_empty() {
            return Err(TodoError::validation("Data file path must not be empty"));
        }
        Ok(Self {
            data_file,
            json_output,
        })
    }
}
