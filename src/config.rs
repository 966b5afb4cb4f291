//! Resolved workbench configuration, built once and passed explicitly

use crate::core::axes::AxisParams;
use crate::core::pivot::DuplicatePolicy;
use crate::types::{CoherenceError, CoherenceResult};
use std::path::PathBuf;

/// Environment variable naming the root of the per-site data tree
pub const DATA_DIR_ENV: &str = "WORKBENCH_DATA_DIR";
/// Environment variable overriding the panel gap threshold
pub const GROUP_GAP_ENV: &str = "WORKBENCH_GROUP_GAP_DAYS";

/// Default gap (days) that splits the temporal-baseline axis into panels
pub const DEFAULT_GROUP_GAP_DAYS: i64 = 60;

/// Configuration for loading and building coherence views
#[derive(Debug, Clone)]
pub struct WorkbenchConfig {
    /// Root of the `<site>/<beam>/` data tree
    pub data_dir: PathBuf,
    /// Gap between consecutive temporal baselines that starts a new panel
    pub group_gap_days: i64,
    /// What to do when two observations land on the same matrix cell
    pub duplicate_policy: DuplicatePolicy,
    /// Plot axis extents
    pub axes: AxisParams,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("app/Data"),
            group_gap_days: DEFAULT_GROUP_GAP_DAYS,
            duplicate_policy: DuplicatePolicy::default(),
            axes: AxisParams::default(),
        }
    }
}

impl WorkbenchConfig {
    /// Create a configuration rooted at `data_dir` with default parameters
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Resolve the configuration from the process environment
    pub fn from_env() -> CoherenceResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> CoherenceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(gap) = lookup(GROUP_GAP_ENV) {
            config.group_gap_days = gap.trim().parse().map_err(|_| {
                CoherenceError::InvalidFormat(format!(
                    "{}='{}' is not a whole number of days",
                    GROUP_GAP_ENV, gap
                ))
            })?;
        }

        log::debug!(
            "Workbench config: data_dir={}, group_gap_days={}",
            config.data_dir.display(),
            config.group_gap_days
        );
        Ok(config)
    }
}
