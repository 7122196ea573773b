//! Store connection configuration.
//!
//! Built once at process start from an optional `patchwork.yml` and the
//! `PW_*` environment variables (environment wins), then passed explicitly to
//! whatever needs it.

use crate::error::{CoreError, CoreResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const ENV_PROJECT_ID: &str = "PW_PROJECT_ID";
pub const ENV_DATASET: &str = "PW_DATASET";
pub const ENV_API_VERSION: &str = "PW_API_VERSION";
pub const ENV_TOKEN: &str = "PW_TOKEN";
pub const ENV_USE_CDN: &str = "PW_USE_CDN";
pub const ENV_TIMEOUT_MS: &str = "PW_TIMEOUT_MS";

const DEFAULT_API_VERSION: &str = "v2024-01-01";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const MAX_DATASET_LEN: usize = 64;

/// Optional project file (`patchwork.yml`). The token never lives here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub dataset: Option<String>,

    #[serde(default)]
    pub api_version: Option<String>,

    #[serde(default)]
    pub use_cdn: Option<bool>,

    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Default DuckDB file for `--local` rehearsals
    #[serde(default)]
    pub local_store: Option<String>,
}

impl ConfigFile {
    /// Load a config file from an explicit path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        log::debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Look for patchwork.yml or patchwork.yaml in a directory.
    ///
    /// A missing file is not an error: every setting can come from the
    /// environment.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Option<Self>> {
        let yml_path = dir.join("patchwork.yml");
        let yaml_path = dir.join("patchwork.yaml");

        if yml_path.exists() {
            Self::load(&yml_path).map(Some)
        } else if yaml_path.exists() {
            Self::load(&yaml_path).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Connection parameters for the remote content store.
#[derive(Clone)]
pub struct StoreConfig {
    pub project_id: String,
    pub dataset: String,
    /// Normalized with a leading `v`, e.g. `v2024-01-01`
    pub api_version: String,
    pub token: Option<String>,
    pub use_cdn: bool,
    pub timeout_ms: u64,
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("use_cdn", &self.use_cdn)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl StoreConfig {
    /// Resolve from the process environment layered over an optional file.
    pub fn from_env(file: Option<&ConfigFile>) -> CoreResult<Self> {
        Self::resolve(file, |name| std::env::var(name).ok())
    }

    /// Resolve from an arbitrary variable lookup layered over an optional file.
    pub fn resolve<F>(file: Option<&ConfigFile>, lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let file = file.cloned().unwrap_or_default();

        let project_id = var(ENV_PROJECT_ID)
            .or(file.project_id)
            .ok_or_else(|| CoreError::ConfigMissing {
                name: ENV_PROJECT_ID.to_string(),
            })?;
        let dataset = var(ENV_DATASET)
            .or(file.dataset)
            .ok_or_else(|| CoreError::ConfigMissing {
                name: ENV_DATASET.to_string(),
            })?;
        let api_version = var(ENV_API_VERSION)
            .or(file.api_version)
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
        let use_cdn = match var(ENV_USE_CDN) {
            Some(raw) => parse_flag(ENV_USE_CDN, &raw)?,
            None => file.use_cdn.unwrap_or(false),
        };
        let timeout_ms = match var(ENV_TIMEOUT_MS) {
            Some(raw) => raw.parse::<u64>().map_err(|_| CoreError::ConfigInvalid {
                message: format!("{ENV_TIMEOUT_MS} must be a number of milliseconds, got '{raw}'"),
            })?,
            None => file.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
        };

        let config = Self {
            project_id,
            dataset,
            api_version: normalize_api_version(&api_version)?,
            token: var(ENV_TOKEN),
            use_cdn,
            timeout_ms,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CoreResult<()> {
        let project_ok = !self.project_id.is_empty()
            && self
                .project_id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !project_ok {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "project id '{}' may only contain a-z, 0-9 and '-'",
                    self.project_id
                ),
            });
        }

        let dataset_ok = !self.dataset.is_empty()
            && self.dataset.len() <= MAX_DATASET_LEN
            && self
                .dataset
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
        if !dataset_ok {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "dataset '{}' must be at most {MAX_DATASET_LEN} characters of a-z, 0-9, '_' and '-'",
                    self.dataset
                ),
            });
        }

        if self.timeout_ms == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "timeout must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// The auth token, required for any run that writes.
    pub fn require_token(&self) -> CoreResult<&str> {
        self.token.as_deref().ok_or_else(|| CoreError::ConfigMissing {
            name: ENV_TOKEN.to_string(),
        })
    }
}

/// Accept `2024-01-01`, `v2024-01-01`, `1`, `v1`, `X`, `vX`.
fn normalize_api_version(raw: &str) -> CoreResult<String> {
    let bare = raw.strip_prefix('v').unwrap_or(raw);
    let valid = matches!(bare, "1" | "X") || NaiveDate::parse_from_str(bare, "%Y-%m-%d").is_ok();
    if valid {
        Ok(format!("v{bare}"))
    } else {
        Err(CoreError::ConfigInvalid {
            message: format!("API version '{raw}' must be a date (YYYY-MM-DD), '1' or 'X'"),
        })
    }
}

fn parse_flag(name: &str, raw: &str) -> CoreResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(CoreError::ConfigInvalid {
            message: format!("{name} must be true or false, got '{raw}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
