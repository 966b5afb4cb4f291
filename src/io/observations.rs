use crate::types::{
    AcquisitionDate, CoherenceError, CoherenceResult, Loaded, Observation, OffendingRow,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

/// Reader for pairwise observation tables (coherence matrix, potential InSAR pairs).
///
/// Both tables have a header row and three positional columns: reference date,
/// pair date, value. Header names differ between tables and are ignored.
pub struct ObservationReader;

impl ObservationReader {
    /// Load an observation table.
    ///
    /// `None` (no site selected) and a path that does not exist yet both give
    /// `Loaded::Absent`. A present value on a reversed pair fails the whole load.
    pub fn load(path: Option<&Path>) -> CoherenceResult<Loaded<Vec<Observation>>> {
        let Some(path) = path else {
            log::debug!("No observation table requested");
            return Ok(Loaded::Absent);
        };

        if !path.exists() {
            log::info!("Observation table not available: {}", path.display());
            return Ok(Loaded::Absent);
        }

        log::info!("Reading observation table: {}", path.display());
        let file = std::fs::File::open(path)?;
        let observations = Self::from_reader(file)?;
        log::info!("Loaded {} observations from {}", observations.len(), path.display());

        Ok(Loaded::Present(observations))
    }

    /// Parse and validate observations from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> CoherenceResult<Vec<Observation>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows: Vec<(usize, Observation)> = Vec::new();
        for (row, record) in csv_reader.records().enumerate() {
            let record = record?;
            if record.iter().all(str::is_empty) {
                continue;
            }
            if record.len() < 3 {
                return Err(CoherenceError::InvalidFormat(format!(
                    "Row {}: expected 3 columns, found {}",
                    row,
                    record.len()
                )));
            }

            let first_date = parse_date(&record[0], row)?;
            let second_date = parse_date(&record[1], row)?;
            let value = parse_value(&record[2], row)?;
            rows.push((row, Observation::new(first_date, second_date, value)));
        }

        check_rows(rows.iter().map(|(row, obs)| (*row, obs)))?;
        Ok(rows.into_iter().map(|(_, obs)| obs).collect())
    }
}

/// Reject the dataset if any present-value pair runs backwards in time.
///
/// Offending rows are numbered by their position in `observations`.
pub fn validate_chronology(observations: &[Observation]) -> CoherenceResult<()> {
    check_rows(observations.iter().enumerate())
}

/// Chronology check over `(data row, observation)` pairs
fn check_rows<'a, I>(rows: I) -> CoherenceResult<()>
where
    I: Iterator<Item = (usize, &'a Observation)>,
{
    let rows: Vec<OffendingRow> = rows
        .filter_map(|(row, obs)| match obs.value {
            Some(value) if obs.is_reversed() => Some(OffendingRow {
                row,
                first_date: obs.first_date,
                second_date: obs.second_date,
                value,
            }),
            _ => None,
        })
        .collect();

    if rows.is_empty() {
        Ok(())
    } else {
        log::warn!("{} interferogram(s) with reversed dates", rows.len());
        Err(CoherenceError::DataIntegrity { rows })
    }
}

/// Sorted unique reference dates
pub fn valid_dates(observations: &[Observation]) -> Vec<AcquisitionDate> {
    observations
        .iter()
        .map(|obs| obs.first_date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn parse_date(field: &str, row: usize) -> CoherenceResult<AcquisitionDate> {
    NaiveDate::parse_from_str(field, "%Y-%m-%d")
        .or_else(|_| {
            NaiveDateTime::parse_from_str(field, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
        })
        .map_err(|e| {
            CoherenceError::InvalidFormat(format!("Row {}: invalid date '{}': {}", row, field, e))
        })
}

fn parse_value(field: &str, row: usize) -> CoherenceResult<Option<f64>> {
    if field.is_empty() || field.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let value: f64 = field.parse().map_err(|e| {
        CoherenceError::InvalidFormat(format!("Row {}: invalid value '{}': {}", row, field, e))
    })?;
    Ok(if value.is_nan() { None } else { Some(value) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_coherence_table() {
        let csv = "Reference Date,Pair Date,Average Coherence\n\
                   2021-07-17,2021-09-03,0.30\n\
                   2021-07-17,2021-07-21,\n\
                   2021-07-21,2021-08-02,NaN\n";
        let obs = ObservationReader::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0], Observation::new(date("2021-07-17"), date("2021-09-03"), Some(0.30)));
        assert_eq!(obs[1].value, None);
        assert_eq!(obs[2].value, None);
    }

    #[test]
    fn test_reversed_present_value_is_rejected() {
        let csv = "Reference Date,Pair Date,Average Coherence\n\
                   2021-06-18,2021-06-30,0.42\n\
                   2021-07-03,2021-06-30,0.31\n";
        match ObservationReader::from_reader(csv.as_bytes()) {
            Err(CoherenceError::DataIntegrity { rows }) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].row, 1);
                assert_eq!(rows[0].first_date, date("2021-07-03"));
            }
            other => panic!("expected integrity error, got {:?}", other),
        }
    }

    #[test]
    fn test_offending_row_counts_blank_records() {
        let csv = "Reference Date,Pair Date,Average Coherence\n\
                   ,,\n\
                   2021-06-18,2021-06-30,0.42\n\
                   2021-07-03,2021-06-30,0.31\n";
        match ObservationReader::from_reader(csv.as_bytes()) {
            Err(CoherenceError::DataIntegrity { rows }) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].row, 2);
            }
            other => panic!("expected integrity error, got {:?}", other),
        }

        let bad = "a,b,c\n,,\n2021-06-18,2021-06-30,high\n";
        match ObservationReader::from_reader(bad.as_bytes()) {
            Err(CoherenceError::InvalidFormat(msg)) => assert!(msg.starts_with("Row 1:")),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_every_reversed_row_is_listed() {
        let csv = "Reference Date,Pair Date,Average Coherence\n\
                   2021-07-03,2021-06-30,0.31\n\
                   2021-06-18,2021-06-30,0.42\n\
                   2021-07-15,2021-07-03,0.27\n\
                   2021-07-15,2021-07-03,\n";
        match ObservationReader::from_reader(csv.as_bytes()) {
            Err(CoherenceError::DataIntegrity { rows }) => {
                let listed: Vec<usize> = rows.iter().map(|r| r.row).collect();
                assert_eq!(listed, vec![0, 2]);
                assert_eq!(rows[1].first_date, date("2021-07-15"));
                assert_eq!(rows[1].value, 0.27);
            }
            other => panic!("expected integrity error, got {:?}", other),
        }
    }

    #[test]
    fn test_reversed_missing_value_is_kept() {
        let csv = "Reference_Date,Pair_Date,insar_pair\n2021-07-03,2021-06-30,\n";
        let obs = ObservationReader::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].delta_days(), -3);
    }

    #[test]
    fn test_timestamp_dates_and_bad_values() {
        let csv = "a,b,c\n2021-07-17 00:00:00,2021-07-29 00:00:00,1\n";
        let obs = ObservationReader::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(obs[0].delta_days(), 12);

        let bad = "a,b,c\n2021-07-17,2021-07-29,high\n";
        assert!(matches!(
            ObservationReader::from_reader(bad.as_bytes()),
            Err(CoherenceError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_unspecified_and_missing_sources_are_absent() {
        assert_eq!(ObservationReader::load(None).unwrap(), Loaded::Absent);
        let missing = Path::new("/nonexistent/site/beam/CoherenceMatrix.csv");
        assert_eq!(ObservationReader::load(Some(missing)).unwrap(), Loaded::Absent);
    }

    #[test]
    fn test_valid_dates_are_unique_and_sorted() {
        let obs = vec![
            Observation::new(date("2021-08-02"), date("2021-08-14"), Some(0.2)),
            Observation::new(date("2021-07-17"), date("2021-08-14"), None),
            Observation::new(date("2021-08-02"), date("2021-08-26"), Some(0.3)),
        ];
        assert_eq!(valid_dates(&obs), vec![date("2021-07-17"), date("2021-08-02")]);
    }
}
