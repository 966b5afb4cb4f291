use crate::types::{CoherenceError, CoherenceResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Target id the upstream API layer emits when it could not list sites
pub const API_ERROR_TARGET: &str = "API Response Error";

pub const COHERENCE_FILE: &str = "CoherenceMatrix.csv";
pub const INSAR_PAIR_FILE: &str = "InSAR_Pair_All.csv";
pub const BASELINE_FILE: &str = "bperp_all";

/// A monitored site and the radar beam mode it is imaged with
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SiteBeam {
    pub site: String,
    pub beam: String,
}

impl SiteBeam {
    /// Parse `"<site>_<beam>"`, splitting on the last underscore
    pub fn parse(target_id: &str) -> CoherenceResult<Self> {
        match target_id.rsplit_once('_') {
            Some((site, beam)) if !site.is_empty() && !beam.is_empty() => Ok(Self {
                site: site.to_string(),
                beam: beam.to_string(),
            }),
            _ => Err(CoherenceError::InvalidTarget(target_id.to_string())),
        }
    }

    pub fn directory(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.site).join(&self.beam)
    }
}

impl std::fmt::Display for SiteBeam {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.site, self.beam)
    }
}

/// Source tables for one site/beam; `None` means no table should be read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteSources {
    pub coherence: Option<PathBuf>,
    pub insar_pairs: Option<PathBuf>,
    pub baseline: Option<PathBuf>,
}

impl SiteSources {
    /// Resolve the source tables for a target id under `data_dir`
    pub fn resolve(data_dir: &Path, target_id: &str) -> CoherenceResult<Self> {
        if target_id == API_ERROR_TARGET {
            log::warn!("Target list unavailable, no sources resolved");
            return Ok(Self::default());
        }

        let site_beam = SiteBeam::parse(target_id)?;
        let dir = site_beam.directory(data_dir);
        log::debug!("Resolved {} to {}", site_beam, dir.display());

        Ok(Self {
            coherence: Some(dir.join(COHERENCE_FILE)),
            insar_pairs: Some(dir.join(INSAR_PAIR_FILE)),
            baseline: Some(dir.join(BASELINE_FILE)),
        })
    }
}
