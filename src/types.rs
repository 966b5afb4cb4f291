use chrono::NaiveDate;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar date of a satellite acquisition (no time of day)
pub type AcquisitionDate = NaiveDate;

/// Display format used for origin-date labels, e.g. "Jul 17, 2021"
pub const LABEL_DATE_FORMAT: &str = "%b %d, %Y";

/// One interferometric pair measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub first_date: AcquisitionDate,
    pub second_date: AcquisitionDate,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(
        first_date: AcquisitionDate,
        second_date: AcquisitionDate,
        value: Option<f64>,
    ) -> Self {
        Self {
            first_date,
            second_date,
            value,
        }
    }

    /// Temporal baseline in whole days (negative for reversed pairs)
    pub fn delta_days(&self) -> i64 {
        (self.second_date - self.first_date).num_days()
    }

    /// A present value on a pair whose second date precedes the first
    pub fn is_reversed(&self) -> bool {
        self.value.is_some() && self.second_date < self.first_date
    }
}

/// One inter-acquisition perpendicular baseline measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineRecord {
    pub first_date: AcquisitionDate,
    pub second_date: AcquisitionDate,
    /// Perpendicular baseline in meters
    pub baseline: f64,
}

/// Result of a loader: either the parsed table or an explicit "no data"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Loaded<T> {
    Present(T),
    Absent,
}

impl<T> Loaded<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Loaded::Present(_))
    }

    /// Borrow the payload, keeping the present/absent state (`Option::as_ref` style)
    pub fn as_loaded_ref(&self) -> Loaded<&T> {
        match self {
            Loaded::Present(data) => Loaded::Present(data),
            Loaded::Absent => Loaded::Absent,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Loaded<U> {
        match self {
            Loaded::Present(data) => Loaded::Present(f(data)),
            Loaded::Absent => Loaded::Absent,
        }
    }

    pub fn present(self) -> Option<T> {
        match self {
            Loaded::Present(data) => Some(data),
            Loaded::Absent => None,
        }
    }
}

/// Dense matrix indexed by temporal baseline (rows) and second acquisition date (columns).
///
/// Row keys and column keys are kept sorted ascending; `cells[[r, c]]` is the
/// value for `(delta_days[r], second_dates[c])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateGrid<T> {
    pub delta_days: Vec<i64>,
    pub second_dates: Vec<AcquisitionDate>,
    pub cells: Array2<Option<T>>,
}

/// Coherence (or pair availability) values rounded to 2 decimals
pub type PivotMatrix = DateGrid<f64>;

/// Origin first-date labels aligned to a `PivotMatrix`
pub type DateLabelMatrix = DateGrid<String>;

impl<T: Clone> DateGrid<T> {
    /// A grid with no rows and no columns
    pub fn empty() -> Self {
        Self {
            delta_days: Vec::new(),
            second_dates: Vec::new(),
            cells: Array2::from_elem((0, 0), None),
        }
    }

    pub fn nrows(&self) -> usize {
        self.delta_days.len()
    }

    pub fn ncols(&self) -> usize {
        self.second_dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nrows() == 0 || self.ncols() == 0
    }

    /// Cell lookup by keys
    pub fn get(&self, delta_days: i64, second_date: AcquisitionDate) -> Option<&T> {
        let row = self.delta_days.binary_search(&delta_days).ok()?;
        let col = self.second_dates.binary_search(&second_date).ok()?;
        self.cells[[row, col]].as_ref()
    }

    pub fn row_has_value(&self, row: usize) -> bool {
        self.cells.row(row).iter().any(Option::is_some)
    }

    pub fn col_has_value(&self, col: usize) -> bool {
        self.cells.column(col).iter().any(Option::is_some)
    }

    /// Number of present cells
    pub fn count_present(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Copy of the rows `rows` and columns `cols` (index ranges into this grid)
    pub fn slice(&self, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>) -> Self {
        Self {
            delta_days: self.delta_days[rows.clone()].to_vec(),
            second_dates: self.second_dates[cols.clone()].to_vec(),
            cells: self.cells.slice(ndarray::s![rows, cols]).to_owned(),
        }
    }
}

impl PivotMatrix {
    /// Cells as `f64` with `NaN` for missing values
    pub fn to_nan_array(&self) -> Array2<f64> {
        self.cells.mapv(|c| c.unwrap_or(f64::NAN))
    }
}

/// One plotted point of the baseline network: acquisition date vs perpendicular baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub date: AcquisitionDate,
    pub baseline: f64,
}

/// A processed pair drawn as a segment between its two acquisitions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: GraphPoint,
    pub to: GraphPoint,
}

/// One row of an observation table that violates chronological order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffendingRow {
    /// 0-based data row (header excluded)
    pub row: usize,
    pub first_date: AcquisitionDate,
    pub second_date: AcquisitionDate,
    pub value: f64,
}

impl fmt::Display for OffendingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {}: {} -> {} (value {})",
            self.row, self.first_date, self.second_date, self.value
        )
    }
}

fn format_rows(rows: &[OffendingRow]) -> String {
    rows.iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Error types for coherence matrix construction
#[derive(Debug, thiserror::Error)]
pub enum CoherenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Some interferogram dates not ordered as expected:\n{}", format_rows(.rows))]
    DataIntegrity { rows: Vec<OffendingRow> },

    #[error("Duplicate cell at delta_days={delta_days}, second_date={second_date}")]
    DuplicateCell {
        delta_days: i64,
        second_date: AcquisitionDate,
    },

    #[error("Invalid target id: {0}")]
    InvalidTarget(String),
}

/// Result type for coherence operations
pub type CoherenceResult<T> = Result<T, CoherenceError>;
