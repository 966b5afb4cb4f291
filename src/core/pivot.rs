use crate::types::{
    AcquisitionDate, CoherenceError, CoherenceResult, DateGrid, Observation, PivotMatrix,
};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Key of one matrix cell: (delta_days, second_date)
pub type CellKey = (i64, AcquisitionDate);

/// Resolution for two observations sharing the same (delta_days, second_date) cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// Keep the observation that appears last in the table
    #[default]
    LastWins,
    /// Keep the larger present value
    KeepMax,
    /// Fail with `CoherenceError::DuplicateCell`
    Reject,
}

/// Long-to-wide pivot of pair observations
pub struct PivotBuilder {
    policy: DuplicatePolicy,
    decimals: i32,
}

impl PivotBuilder {
    /// Create a pivot builder with last-write-wins duplicates and 2-decimal rounding
    pub fn new() -> Self {
        Self {
            policy: DuplicatePolicy::default(),
            decimals: 2,
        }
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            ..Self::new()
        }
    }

    /// Pivot observations onto (delta_days, second_date).
    ///
    /// The output always holds an all-missing row at `delta_days = 0`; a value
    /// observed on a same-day pair is blanked by it. Rows and columns are sorted
    /// ascending and values are rounded.
    pub fn pivot(&self, observations: &[Observation]) -> CoherenceResult<PivotMatrix> {
        log::debug!(
            "Pivoting {} observations (duplicates: {:?})",
            observations.len(),
            self.policy
        );

        let mut cells: BTreeMap<CellKey, Option<f64>> = BTreeMap::new();
        for obs in observations {
            let key = (obs.delta_days(), obs.second_date);
            match cells.get_mut(&key) {
                None => {
                    cells.insert(key, obs.value);
                }
                Some(existing) => {
                    log::warn!(
                        "Duplicate observation at delta_days={}, second_date={}",
                        key.0,
                        key.1
                    );
                    match self.policy {
                        DuplicatePolicy::LastWins => *existing = obs.value,
                        DuplicatePolicy::KeepMax => {
                            *existing = match (*existing, obs.value) {
                                (Some(a), Some(b)) => Some(a.max(b)),
                                (a, b) => a.or(b),
                            }
                        }
                        DuplicatePolicy::Reject => {
                            return Err(CoherenceError::DuplicateCell {
                                delta_days: key.0,
                                second_date: key.1,
                            })
                        }
                    }
                }
            }
        }

        let blanked = cells
            .iter()
            .filter(|((delta, _), value)| *delta == 0 && value.is_some())
            .count();
        if blanked > 0 {
            log::warn!("{} same-day pair value(s) blanked by the zero-baseline row", blanked);
        }
        cells.retain(|(delta, _), _| *delta != 0);

        let mut matrix = grid_from_cells(cells, true);
        matrix.cells.mapv_inplace(|c| c.map(|v| round_to(v, self.decimals)));

        log::info!(
            "Pivot matrix: {} temporal baselines x {} dates, {} values",
            matrix.nrows(),
            matrix.ncols(),
            matrix.count_present()
        );
        Ok(matrix)
    }
}

impl Default for PivotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Pivot with the default policy
pub fn pivot_observations(observations: &[Observation]) -> CoherenceResult<PivotMatrix> {
    PivotBuilder::new().pivot(observations)
}

/// Lay out keyed cells as a sorted dense grid, optionally adding an empty zero row
pub(crate) fn grid_from_cells<T: Clone>(
    cells: BTreeMap<CellKey, Option<T>>,
    with_zero_row: bool,
) -> DateGrid<T> {
    let mut rows: BTreeSet<i64> = cells.keys().map(|(delta, _)| *delta).collect();
    if with_zero_row {
        rows.insert(0);
    }
    let cols: BTreeSet<AcquisitionDate> = cells.keys().map(|(_, date)| *date).collect();

    let delta_days: Vec<i64> = rows.into_iter().collect();
    let second_dates: Vec<AcquisitionDate> = cols.into_iter().collect();

    let mut grid = Array2::from_elem((delta_days.len(), second_dates.len()), None);
    for ((delta, date), value) in cells {
        // keys come from the same map, both searches succeed
        if let (Ok(r), Ok(c)) = (
            delta_days.binary_search(&delta),
            second_dates.binary_search(&date),
        ) {
            grid[[r, c]] = value;
        }
    }

    DateGrid {
        delta_days,
        second_dates,
        cells: grid,
    }
}

/// Round half to even at `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}
