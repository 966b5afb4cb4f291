use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A contiguous run of row keys separated from its neighbours by a large gap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: usize,
    /// Index range into the grouped row-key sequence
    pub row_range: Range<usize>,
    pub members: Vec<i64>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// One display panel: a group and its share of the total height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub group_id: usize,
    pub row_range: Range<usize>,
    pub height_fraction: f64,
}

/// Segmentation of a sorted row-key sequence into groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grouping {
    pub gap_days: i64,
    pub groups: Vec<Group>,
}

impl Grouping {
    /// Group id per row key, in input order
    pub fn assignments(&self) -> Vec<usize> {
        self.groups
            .iter()
            .flat_map(|g| std::iter::repeat(g.id).take(g.len()))
            .collect()
    }

    /// `(group_id, row_range)` pairs in ascending row order
    pub fn ranges(&self) -> Vec<(usize, Range<usize>)> {
        self.groups.iter().map(|g| (g.id, g.row_range.clone())).collect()
    }

    pub fn total_rows(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Panels from top to bottom: the group with the largest keys is drawn first,
    /// each panel's height proportional to its member count
    pub fn panels(&self) -> Vec<Panel> {
        let total = self.total_rows();
        self.groups
            .iter()
            .rev()
            .map(|g| Panel {
                group_id: g.id,
                row_range: g.row_range.clone(),
                height_fraction: if total == 0 { 0.0 } else { g.len() as f64 / total as f64 },
            })
            .collect()
    }
}

/// Splits a temporal-baseline axis wherever consecutive keys are more than `gap_days` apart
pub struct TemporalGrouper {
    gap_days: i64,
}

impl TemporalGrouper {
    pub fn new(gap_days: i64) -> Self {
        Self { gap_days }
    }

    /// Assign group ids to sorted row keys; the first key opens group 0
    pub fn group(&self, row_keys: &[i64]) -> Grouping {
        let mut groups: Vec<Group> = Vec::new();

        for (i, &key) in row_keys.iter().enumerate() {
            let starts_new = match i.checked_sub(1).map(|p| row_keys[p]) {
                None => true,
                Some(prev) => key - prev > self.gap_days,
            };

            if starts_new {
                groups.push(Group {
                    id: groups.len(),
                    row_range: i..i + 1,
                    members: vec![key],
                });
            } else if let Some(current) = groups.last_mut() {
                current.row_range.end = i + 1;
                current.members.push(key);
            }
        }

        log::debug!(
            "Grouped {} temporal baselines into {} panel(s) (gap > {} days)",
            row_keys.len(),
            groups.len(),
            self.gap_days
        );

        Grouping {
            gap_days: self.gap_days,
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gap_splits_groups() {
        let keys = [0, 12, 24, 36, 180, 192, 400];
        let grouping = TemporalGrouper::new(60).group(&keys);

        assert_eq!(grouping.groups.len(), 3);
        assert_eq!(grouping.assignments(), vec![0, 0, 0, 0, 1, 1, 2]);
        assert_eq!(grouping.ranges(), vec![(0, 0..4), (1, 4..6), (2, 6..7)]);
    }

    #[test]
    fn test_gap_equal_to_threshold_does_not_split() {
        let grouping = TemporalGrouper::new(12).group(&[0, 12, 24, 37]);
        assert_eq!(grouping.assignments(), vec![0, 0, 0, 1]);
    }

    #[test]
    fn test_coverage_exactly_once() {
        let keys: Vec<i64> = vec![0, 6, 12, 100, 106, 300, 301, 302, 900];
        for gap in [0, 1, 6, 50, 1000] {
            let grouping = TemporalGrouper::new(gap).group(&keys);
            let members: Vec<i64> =
                grouping.groups.iter().flat_map(|g| g.members.clone()).collect();
            assert_eq!(members, keys);
            assert_eq!(grouping.total_rows(), keys.len());
        }
    }

    #[test]
    fn test_panels_top_to_bottom() {
        let grouping = TemporalGrouper::new(60).group(&[0, 12, 24, 200]);
        let panels = grouping.panels();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].group_id, 1);
        assert_relative_eq!(panels[0].height_fraction, 0.25);
        assert_relative_eq!(panels[1].height_fraction, 0.75);
    }

    #[test]
    fn test_empty_keys() {
        let grouping = TemporalGrouper::new(60).group(&[]);
        assert!(grouping.groups.is_empty());
        assert!(grouping.panels().is_empty());
    }
}
