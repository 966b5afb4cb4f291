use crate::types::{AcquisitionDate, BaselineRecord, CoherenceError, CoherenceResult, Loaded};
use chrono::NaiveDate;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Number of whitespace-separated fields per `bperp_all` row:
/// index, reference date, pair date, bperp, btemp, bperp2, trailing field
const BASELINE_FIELDS: usize = 7;

/// Reader for perpendicular baseline tables (`bperp_all`)
pub struct BaselineReader;

impl BaselineReader {
    /// Load a baseline table; `None` or a path not on disk gives `Loaded::Absent`
    pub fn load(path: Option<&Path>) -> CoherenceResult<Loaded<Vec<BaselineRecord>>> {
        let Some(path) = path else {
            log::debug!("No baseline table requested");
            return Ok(Loaded::Absent);
        };

        if !path.exists() {
            log::info!("Baseline table not available: {}", path.display());
            return Ok(Loaded::Absent);
        }

        log::info!("Reading baseline table: {}", path.display());
        let file = std::fs::File::open(path)?;
        let records = Self::from_reader(file)?;
        log::info!("Loaded {} baseline records", records.len());

        Ok(Loaded::Present(records))
    }

    /// Parse headerless whitespace-delimited baseline rows
    pub fn from_reader<R: Read>(reader: R) -> CoherenceResult<Vec<BaselineRecord>> {
        let mut records = Vec::new();

        for (line_no, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() != BASELINE_FIELDS {
                return Err(CoherenceError::InvalidFormat(format!(
                    "Baseline line {}: expected {} fields, found {}",
                    line_no + 1,
                    BASELINE_FIELDS,
                    fields.len()
                )));
            }

            let first_date = parse_compact_date(fields[1], line_no)?;
            let second_date = parse_compact_date(fields[2], line_no)?;
            let baseline: f64 = fields[3].parse().map_err(|e| {
                CoherenceError::InvalidFormat(format!(
                    "Baseline line {}: invalid bperp '{}': {}",
                    line_no + 1,
                    fields[3],
                    e
                ))
            })?;

            records.push(BaselineRecord {
                first_date,
                second_date,
                baseline,
            });
        }

        Ok(records)
    }
}

fn parse_compact_date(field: &str, line_no: usize) -> CoherenceResult<AcquisitionDate> {
    NaiveDate::parse_from_str(field, "%Y%m%d").map_err(|e| {
        CoherenceError::InvalidFormat(format!(
            "Baseline line {}: invalid date '{}': {}",
            line_no + 1,
            field,
            e
        ))
    })
}
