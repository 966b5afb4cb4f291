//! Readers for the on-disk tables produced by the upstream InSAR tooling

pub mod baseline;
pub mod observations;
pub mod paths;

pub use baseline::BaselineReader;
pub use observations::{valid_dates, validate_chronology, ObservationReader};
pub use paths::{SiteBeam, SiteSources};
