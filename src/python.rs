//! Python module for the Dash rendering layer

use crate::config::WorkbenchConfig;
use crate::core::view::{load_site_view as build_view, CoherenceView, LabelledMatrix};
use crate::types::{DateLabelMatrix, Loaded};
use numpy::{IntoPyArray, PyArray2};
use pyo3::prelude::*;
use std::path::PathBuf;

/// Python module definition
#[pymodule]
fn _core(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyCoherenceView>()?;
    m.add_function(wrap_pyfunction!(load_site_view, m)?)?;
    Ok(())
}

fn to_py_err(e: crate::types::CoherenceError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("{}", e))
}

/// Load and build the view for a site/beam target; `None` when there is no coherence data
#[pyfunction]
#[pyo3(signature = (target_id, data_dir = None))]
fn load_site_view(target_id: &str, data_dir: Option<String>) -> PyResult<Option<PyCoherenceView>> {
    let mut config = WorkbenchConfig::from_env().map_err(to_py_err)?;
    if let Some(dir) = data_dir {
        config.data_dir = PathBuf::from(dir);
    }

    match build_view(target_id, &config).map_err(to_py_err)? {
        Loaded::Present(view) => Ok(Some(PyCoherenceView { inner: view })),
        Loaded::Absent => Ok(None),
    }
}

fn date_strings(matrix: &LabelledMatrix) -> Vec<String> {
    matrix.values.second_dates.iter().map(|d| d.to_string()).collect()
}

fn label_rows(labels: &DateLabelMatrix) -> Vec<Vec<Option<String>>> {
    labels.cells.rows().into_iter().map(|row| row.to_vec()).collect()
}

/// Python wrapper for CoherenceView
#[pyclass(name = "CoherenceView")]
struct PyCoherenceView {
    inner: CoherenceView,
}

#[pymethods]
impl PyCoherenceView {
    /// Coherence values, NaN where missing
    #[getter]
    fn coherence<'py>(&self, py: Python<'py>) -> &'py PyArray2<f64> {
        self.inner.coherence.values.to_nan_array().into_pyarray(py)
    }

    #[getter]
    fn coherence_delta_days(&self) -> Vec<i64> {
        self.inner.coherence.values.delta_days.clone()
    }

    #[getter]
    fn coherence_dates(&self) -> Vec<String> {
        date_strings(&self.inner.coherence)
    }

    #[getter]
    fn coherence_labels(&self) -> Vec<Vec<Option<String>>> {
        label_rows(&self.inner.coherence.labels)
    }

    #[getter]
    fn insar_pairs<'py>(&self, py: Python<'py>) -> &'py PyArray2<f64> {
        self.inner.insar_pairs.values.to_nan_array().into_pyarray(py)
    }

    #[getter]
    fn insar_pair_delta_days(&self) -> Vec<i64> {
        self.inner.insar_pairs.values.delta_days.clone()
    }

    #[getter]
    fn insar_pair_dates(&self) -> Vec<String> {
        date_strings(&self.inner.insar_pairs)
    }

    #[getter]
    fn insar_pair_labels(&self) -> Vec<Vec<Option<String>>> {
        label_rows(&self.inner.insar_pairs.labels)
    }

    /// `(group_id, start_row, end_row)` per panel, top panel first, with height fraction
    #[getter]
    fn panels(&self) -> Vec<(usize, usize, usize, f64)> {
        self.inner
            .grouping
            .panels()
            .into_iter()
            .map(|p| (p.group_id, p.row_range.start, p.row_range.end, p.height_fraction))
            .collect()
    }

    /// Baseline time series as `(date, bperp)`
    #[getter]
    fn baseline_nodes(&self) -> Vec<(String, f64)> {
        self.inner
            .baseline_graph
            .nodes
            .iter()
            .map(|p| (p.date.to_string(), p.baseline))
            .collect()
    }

    /// Processed pairs as `(first_date, first_bperp, second_date, second_bperp)`
    #[getter]
    fn baseline_edges(&self) -> Vec<(String, f64, String, f64)> {
        self.inner
            .baseline_graph
            .edges
            .iter()
            .map(|e| {
                (
                    e.from.date.to_string(),
                    e.from.baseline,
                    e.to.date.to_string(),
                    e.to.baseline,
                )
            })
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "CoherenceView(coherence={}x{}, insar_pairs={}x{}, panels={}, edges={})",
            self.inner.coherence.values.nrows(),
            self.inner.coherence.values.ncols(),
            self.inner.insar_pairs.values.nrows(),
            self.inner.insar_pairs.values.ncols(),
            self.inner.grouping.groups.len(),
            self.inner.baseline_graph.edges.len()
        )
    }
}
