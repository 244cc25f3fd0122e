//! Process configuration resolved from environment variables.
//!
//! | Variable                       | Meaning                               |
//! |--------------------------------|---------------------------------------|
//! | `FIELDLOG_DB_PATH`             | SQLite file holding the blobs         |
//! | `FIELDLOG_LOG_LEVEL`           | `trace|debug|info|warn|error`         |
//! | `FIELDLOG_LOG_DIR`             | absolute dir; unset disables file log |
//! | `FIELDLOG_RETURN_VISIT_OFFSET` | `placements|return_visit_offset`      |
//! | `FIELDLOG_DELETED_ORDER`       | `created_at|deleted_at`               |

use crate::logging::default_log_level;
use crate::report::{ReportPolicy, ReturnVisitOffsetSource};
use crate::service::SessionOptions;
use crate::store::DeletedOrder;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "FIELDLOG_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "FIELDLOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FIELDLOG_LOG_DIR";
pub const ENV_RETURN_VISIT_OFFSET: &str = "FIELDLOG_RETURN_VISIT_OFFSET";
pub const ENV_DELETED_ORDER: &str = "FIELDLOG_DELETED_ORDER";

const DEFAULT_DB_FILE_NAME: &str = "fieldlog.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        variable: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                variable,
                value,
                expected,
            } => write!(f, "{variable}=`{value}` is invalid; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
    pub session: SessionOptions,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            session: SessionOptions::default(),
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let return_visit_offset = match read(ENV_RETURN_VISIT_OFFSET) {
            None => ReturnVisitOffsetSource::default(),
            Some(value) => ReturnVisitOffsetSource::parse(&value).ok_or(
                ConfigError::InvalidValue {
                    variable: ENV_RETURN_VISIT_OFFSET,
                    value,
                    expected: "placements|return_visit_offset",
                },
            )?,
        };
        let deleted_order = match read(ENV_DELETED_ORDER) {
            None => DeletedOrder::default(),
            Some(value) => DeletedOrder::parse(&value).ok_or(ConfigError::InvalidValue {
                variable: ENV_DELETED_ORDER,
                value,
                expected: "created_at|deleted_at",
            })?,
        };

        Ok(Self {
            db_path: read(ENV_DB_PATH).map_or(defaults.db_path, PathBuf::from),
            log_level: read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
            session: SessionOptions {
                report_policy: ReportPolicy {
                    return_visit_offset,
                    ..ReportPolicy::default()
                },
                deleted_order,
            },
        })
    }
}
