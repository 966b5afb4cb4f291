//! insar-coherence: coherence and baseline matrices for volcano InSAR monitoring
//!
//! Turns sparse pairwise interferogram tables (date pair -> coherence) into
//! dense, chronologically ordered matrices for heatmap panels, and joins
//! processed pairs against perpendicular baselines to build the baseline
//! network graph. Everything here is a pure transform over loaded tables.

pub mod config;
pub mod core;
pub mod io;
pub mod types;

#[cfg(feature = "python")]
mod python;

// Re-export main types and functions for easier access
pub use config::WorkbenchConfig;
pub use types::{
    BaselineRecord, CoherenceError, CoherenceResult, DateGrid, DateLabelMatrix, GraphEdge,
    GraphPoint, Loaded, Observation, PivotMatrix,
};

pub use crate::core::{build_site_views, load_site_view, CoherenceView};
pub use io::{BaselineReader, ObservationReader, SiteSources};
