use super::pivot::{grid_from_cells, CellKey};
use crate::types::{DateGrid, DateLabelMatrix, Observation, LABEL_DATE_FORMAT};
use ndarray::Array2;
use std::collections::BTreeMap;

/// Build origin-date labels aligned cell for cell with a trimmed matrix.
///
/// Pairs whose second date precedes the first are skipped. The label grid takes
/// the row keys of `aligned_to` and the sorted intersection of both column sets,
/// so zipping labels with values never shifts a column.
pub fn build_date_labels<T: Clone>(
    observations: &[Observation],
    aligned_to: &DateGrid<T>,
) -> DateLabelMatrix {
    let mut cells: BTreeMap<CellKey, Option<String>> = BTreeMap::new();
    let mut skipped = 0usize;

    for obs in observations {
        if obs.second_date < obs.first_date {
            skipped += 1;
            continue;
        }
        let label = obs.first_date.format(LABEL_DATE_FORMAT).to_string();
        cells.insert((obs.delta_days(), obs.second_date), Some(label));
    }
    if skipped > 0 {
        log::debug!("Skipped {} reversed pair(s) while labelling", skipped);
    }

    let labels = grid_from_cells(cells, false);

    let second_dates: Vec<_> = aligned_to
        .second_dates
        .iter()
        .copied()
        .filter(|date| labels.second_dates.binary_search(date).is_ok())
        .collect();
    let delta_days = aligned_to.delta_days.clone();

    let mut aligned = Array2::from_elem((delta_days.len(), second_dates.len()), None);
    for (r, &delta) in delta_days.iter().enumerate() {
        let Ok(src_row) = labels.delta_days.binary_search(&delta) else {
            continue;
        };
        for (c, date) in second_dates.iter().enumerate() {
            if let Ok(src_col) = labels.second_dates.binary_search(date) {
                aligned[[r, c]] = labels.cells[[src_row, src_col]].clone();
            }
        }
    }

    log::debug!(
        "Date labels: {} x {} aligned to {} x {}",
        delta_days.len(),
        second_dates.len(),
        aligned_to.nrows(),
        aligned_to.ncols()
    );

    DateGrid {
        delta_days,
        second_dates,
        cells: aligned,
    }
}
