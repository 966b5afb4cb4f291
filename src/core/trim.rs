use crate::types::DateGrid;
use serde::{Deserialize, Serialize};

/// Which rows survive trimming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrimPolicy {
    /// Keep rows with key in `[0, last row with a value]` (coherence matrices)
    #[default]
    AnchorZero,
    /// Keep rows from the first to the last row with a value (potential-pair matrices)
    ValidSpan,
}

/// Removes empty leading/trailing rows and columns from a pivoted grid.
///
/// Interior rows and columns are never removed, even when completely empty.
pub struct SparseTrimmer {
    policy: TrimPolicy,
}

impl SparseTrimmer {
    pub fn new(policy: TrimPolicy) -> Self {
        Self { policy }
    }

    /// Trim a grid; a grid without any value trims to an empty grid
    pub fn trim<T: Clone>(&self, grid: &DateGrid<T>) -> DateGrid<T> {
        let valid_rows: Vec<usize> =
            (0..grid.nrows()).filter(|&r| grid.row_has_value(r)).collect();

        let (Some(&first_valued), Some(&last_row)) = (valid_rows.first(), valid_rows.last()) else {
            log::debug!("No values to keep, trimming to an empty matrix");
            return DateGrid::empty();
        };

        let first_row = match self.policy {
            // first row with key >= 0; grid rows are sorted
            TrimPolicy::AnchorZero => grid.delta_days.partition_point(|&d| d < 0),
            TrimPolicy::ValidSpan => first_valued,
        };

        if first_row > last_row {
            // every valued row has a negative key
            log::debug!("All valued rows precede the zero baseline, trimming to an empty matrix");
            return DateGrid::empty();
        }

        // columns only count values in the kept rows
        let kept = grid.cells.slice(ndarray::s![first_row..last_row + 1, ..]);
        let valid_cols: Vec<usize> = (0..grid.ncols())
            .filter(|&c| kept.column(c).iter().any(Option::is_some))
            .collect();
        let (Some(&first_col), Some(&last_col)) = (valid_cols.first(), valid_cols.last()) else {
            return DateGrid::empty();
        };

        log::debug!(
            "Trimming {:?}: rows {}..={} ({}..={} days), columns {}..={}",
            self.policy,
            first_row,
            last_row,
            grid.delta_days[first_row],
            grid.delta_days[last_row],
            first_col,
            last_col
        );

        grid.slice(first_row..last_row + 1, first_col..last_col + 1)
    }
}

impl Default for SparseTrimmer {
    fn default() -> Self {
        Self::new(TrimPolicy::default())
    }
}
