use super::axes::AxisExtents;
use super::baseline_graph::{build_baseline_graph, BaselineGraph};
use super::date_matrix::build_date_labels;
use super::grouping::{Grouping, TemporalGrouper};
use super::pivot::PivotBuilder;
use super::trim::{SparseTrimmer, TrimPolicy};
use crate::config::WorkbenchConfig;
use crate::io::{BaselineReader, ObservationReader, SiteSources};
use crate::types::{
    BaselineRecord, CoherenceResult, DateLabelMatrix, Loaded, Observation, PivotMatrix,
};
use serde::{Deserialize, Serialize};

/// A trimmed matrix and its aligned origin-date labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelledMatrix {
    pub values: PivotMatrix,
    pub labels: DateLabelMatrix,
}

impl LabelledMatrix {
    /// Pivot, trim and label one observation table
    pub fn build(
        observations: &[Observation],
        pivot: &PivotBuilder,
        trim: TrimPolicy,
    ) -> CoherenceResult<Self> {
        let values = SparseTrimmer::new(trim).trim(&pivot.pivot(observations)?);
        let labels = build_date_labels(observations, &values);
        Ok(Self { values, labels })
    }

    pub fn empty() -> Self {
        Self {
            values: PivotMatrix::empty(),
            labels: DateLabelMatrix::empty(),
        }
    }
}

/// Everything the rendering layer needs for one site/beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoherenceView {
    /// Scene-average coherence of processed pairs
    pub coherence: LabelledMatrix,
    /// Potential InSAR pairs, drawn underneath the coherence matrix
    pub insar_pairs: LabelledMatrix,
    /// Panels of the coherence temporal-baseline axis
    pub grouping: Grouping,
    pub axes: Vec<AxisExtents>,
    pub baseline_graph: BaselineGraph,
}

impl CoherenceView {
    /// Build a view from loaded tables.
    ///
    /// Without a coherence table there is nothing to draw and the result is
    /// `Absent`; a missing pair or baseline table only empties its own part.
    pub fn build(
        coherence: Loaded<&[Observation]>,
        insar_pairs: Loaded<&[Observation]>,
        baseline: Loaded<&[BaselineRecord]>,
        config: &WorkbenchConfig,
    ) -> CoherenceResult<Loaded<Self>> {
        let Loaded::Present(coherence) = coherence else {
            log::info!("No coherence data, nothing to build");
            return Ok(Loaded::Absent);
        };

        let pivot = PivotBuilder::with_policy(config.duplicate_policy);

        let coherence_matrix = LabelledMatrix::build(coherence, &pivot, TrimPolicy::AnchorZero)?;
        let pair_matrix = match insar_pairs {
            Loaded::Present(pairs) => LabelledMatrix::build(pairs, &pivot, TrimPolicy::ValidSpan)?,
            Loaded::Absent => LabelledMatrix::empty(),
        };

        let grouping =
            TemporalGrouper::new(config.group_gap_days).group(&coherence_matrix.values.delta_days);
        let axes = config.axes.extents(&coherence_matrix.values.second_dates);

        let baseline_graph = match baseline {
            Loaded::Present(records) => build_baseline_graph(coherence, records),
            Loaded::Absent => BaselineGraph::default(),
        };

        Ok(Loaded::Present(Self {
            coherence: coherence_matrix,
            insar_pairs: pair_matrix,
            grouping,
            axes,
            baseline_graph,
        }))
    }
}

/// Resolve, load and build the view for a `"<site>_<beam>"` target
pub fn load_site_view(
    target_id: &str,
    config: &WorkbenchConfig,
) -> CoherenceResult<Loaded<CoherenceView>> {
    log::info!("Building coherence view for {}", target_id);
    let sources = SiteSources::resolve(&config.data_dir, target_id)?;

    let coherence = ObservationReader::load(sources.coherence.as_deref())?;
    let insar_pairs = ObservationReader::load(sources.insar_pairs.as_deref())?;
    let baseline = BaselineReader::load(sources.baseline.as_deref())?;

    CoherenceView::build(
        coherence.as_loaded_ref().map(Vec::as_slice),
        insar_pairs.as_loaded_ref().map(Vec::as_slice),
        baseline.as_loaded_ref().map(Vec::as_slice),
        config,
    )
}

/// Build views for several targets; each build is independent of the others
pub fn build_site_views(
    target_ids: &[String],
    config: &WorkbenchConfig,
) -> Vec<(String, CoherenceResult<Loaded<CoherenceView>>)> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        target_ids
            .par_iter()
            .map(|id| (id.clone(), load_site_view(id, config)))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        target_ids
            .iter()
            .map(|id| (id.clone(), load_site_view(id, config)))
            .collect()
    }
}
