//! Core matrix construction: pivot, trim, label, group, join

pub mod axes;
pub mod baseline_graph;
pub mod date_matrix;
pub mod grouping;
pub mod pivot;
pub mod trim;
pub mod view;

// Re-export main types
pub use axes::{AxisExtents, AxisParams};
pub use baseline_graph::{baseline_index, build_baseline_graph, BaselineGraph};
pub use date_matrix::build_date_labels;
pub use grouping::{Group, Grouping, Panel, TemporalGrouper};
pub use pivot::{pivot_observations, round_to, DuplicatePolicy, PivotBuilder};
pub use trim::{SparseTrimmer, TrimPolicy};
pub use view::{build_site_views, load_site_view, CoherenceView, LabelledMatrix};
