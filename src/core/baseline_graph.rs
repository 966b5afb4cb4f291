use crate::types::{AcquisitionDate, BaselineRecord, GraphEdge, GraphPoint, Observation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Connectivity of processed pairs plotted over the perpendicular baseline time series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaselineGraph {
    /// Every acquisition of the baseline table, `(second_date, bperp)`
    pub nodes: Vec<GraphPoint>,
    /// One segment per processed pair with both baselines resolved
    pub edges: Vec<GraphEdge>,
    /// Processed pairs left out because an endpoint had no baseline
    pub dropped: usize,
}

impl BaselineGraph {
    /// Endpoints of every edge, two points per edge, in edge order
    pub fn flattened_points(&self) -> Vec<GraphPoint> {
        self.edges.iter().flat_map(|e| [e.from, e.to]).collect()
    }
}

/// Index of perpendicular baseline by acquisition date
pub fn baseline_index(baselines: &[BaselineRecord]) -> BTreeMap<AcquisitionDate, f64> {
    let mut index = BTreeMap::new();
    for record in baselines {
        if index.contains_key(&record.second_date) {
            log::warn!(
                "Duplicate baseline for acquisition {}, keeping the first",
                record.second_date
            );
            continue;
        }
        index.insert(record.second_date, record.baseline);
    }
    index
}

/// Join processed pairs against the baseline table.
///
/// Pairs without a value were never processed and are skipped. A pair whose
/// first or second acquisition has no baseline is dropped, not reported.
pub fn build_baseline_graph(
    observations: &[Observation],
    baselines: &[BaselineRecord],
) -> BaselineGraph {
    let index = baseline_index(baselines);
    let lookup = |date: AcquisitionDate| {
        index
            .get(&date)
            .map(|&baseline| GraphPoint { date, baseline })
    };

    let mut edges = Vec::new();
    let mut dropped = 0usize;
    for obs in observations.iter().filter(|o| o.value.is_some()) {
        match (lookup(obs.first_date), lookup(obs.second_date)) {
            (Some(from), Some(to)) => edges.push(GraphEdge { from, to }),
            _ => dropped += 1,
        }
    }

    let nodes: Vec<GraphPoint> = baselines
        .iter()
        .map(|r| GraphPoint {
            date: r.second_date,
            baseline: r.baseline,
        })
        .collect();

    if dropped > 0 {
        log::debug!("{} processed pair(s) without a resolvable baseline", dropped);
    }
    log::info!(
        "Baseline graph: {} acquisitions, {} edges",
        nodes.len(),
        edges.len()
    );

    BaselineGraph { nodes, edges, dropped }
}
