use chrono::NaiveDate;
use insar_coherence::core::trim::{SparseTrimmer, TrimPolicy};
use insar_coherence::io::paths::{
    API_ERROR_TARGET, BASELINE_FILE, COHERENCE_FILE, INSAR_PAIR_FILE,
};
use insar_coherence::{load_site_view, CoherenceError, Loaded, WorkbenchConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn write_site(root: &Path, site: &str, beam: &str, files: &[(&str, &str)]) {
    let dir = root.join(site).join(beam);
    fs::create_dir_all(&dir).expect("Failed to create site directory");
    for (name, content) in files {
        fs::write(dir.join(name), content).expect("Failed to write fixture");
    }
}

const COHERENCE_CSV: &str = "Reference Date,Pair Date,Average Coherence\n\
2021-07-17,2021-09-03,0.30\n\
2021-07-17,2021-07-21,\n";

const BASELINE_TXT: &str = " 0 20210717 20210717   10.0  0.0   10.0 0\n\
 1 20210717 20210903   -5.0 48.0   -5.1 0\n\
 2 20210717 20210721    2.0  4.0    2.1 0\n";

#[test]
fn test_end_to_end_example() {
    init_logging();

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    write_site(
        temp_dir.path(),
        "Meager",
        "5M3",
        &[(COHERENCE_FILE, COHERENCE_CSV), (BASELINE_FILE, BASELINE_TXT)],
    );

    let config = WorkbenchConfig::with_data_dir(temp_dir.path());
    let view = match load_site_view("Meager_5M3", &config).expect("Failed to build view") {
        Loaded::Present(view) => view,
        Loaded::Absent => panic!("coherence table should be present"),
    };

    // untrimmed pivot rows are {0, 4, 48}; the empty 4-day row sits inside the kept span
    assert_eq!(view.coherence.values.delta_days, vec![0, 4, 48]);
    assert_eq!(view.coherence.values.second_dates, vec![date("2021-09-03")]);
    assert_eq!(view.coherence.values.get(48, date("2021-09-03")), Some(&0.30));
    assert!(!view.coherence.values.row_has_value(0));

    assert_eq!(view.coherence.labels.second_dates, view.coherence.values.second_dates);
    assert_eq!(
        view.coherence.labels.get(48, date("2021-09-03")).map(String::as_str),
        Some("Jul 17, 2021")
    );

    let graph = &view.baseline_graph;
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].from.date, date("2021-07-17"));
    assert_eq!(graph.edges[0].from.baseline, 10.0);
    assert_eq!(graph.edges[0].to.date, date("2021-09-03"));
    assert_eq!(graph.edges[0].to.baseline, -5.0);
    assert_eq!(graph.flattened_points().len(), 2);
    assert_eq!(graph.nodes.len(), 3);

    // no potential-pair table for this site
    assert!(view.insar_pairs.values.is_empty());
}

#[test]
fn test_potential_pairs_are_trimmed_to_valid_span() {
    init_logging();

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let pairs = "Reference_Date,Pair_Date,insar_pair\n\
                 2021-07-17,2021-07-29,1\n\
                 2021-07-17,2021-08-10,1\n\
                 2021-07-29,2021-08-10,1\n";
    write_site(
        temp_dir.path(),
        "Meager",
        "5M3",
        &[(COHERENCE_FILE, COHERENCE_CSV), (INSAR_PAIR_FILE, pairs)],
    );

    let config = WorkbenchConfig::with_data_dir(temp_dir.path());
    let view = load_site_view("Meager_5M3", &config)
        .expect("Failed to build view")
        .present()
        .expect("coherence table should be present");

    assert_eq!(view.insar_pairs.values.delta_days, vec![12, 24]);
    assert_eq!(view.insar_pairs.labels.second_dates, view.insar_pairs.values.second_dates);
    assert!(view.baseline_graph.edges.is_empty());

    let retrimmed = SparseTrimmer::new(TrimPolicy::ValidSpan).trim(&view.insar_pairs.values);
    assert_eq!(retrimmed, view.insar_pairs.values);
}

#[test]
fn test_site_without_data_is_absent() {
    init_logging();

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config = WorkbenchConfig::with_data_dir(temp_dir.path());

    assert!(matches!(load_site_view("Tseax_3M18", &config), Ok(Loaded::Absent)));
    assert!(matches!(load_site_view(API_ERROR_TARGET, &config), Ok(Loaded::Absent)));
    assert!(matches!(
        load_site_view("Tseax", &config),
        Err(CoherenceError::InvalidTarget(_))
    ));
}

#[test]
fn test_reversed_pair_fails_the_request() {
    init_logging();

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let coherence = "Reference Date,Pair Date,Average Coherence\n\
                     2021-06-18,2021-06-30,0.42\n\
                     2021-07-03,2021-06-30,0.31\n";
    write_site(temp_dir.path(), "Edgecumbe", "3M36D", &[(COHERENCE_FILE, coherence)]);

    let config = WorkbenchConfig::with_data_dir(temp_dir.path());
    match load_site_view("Edgecumbe_3M36D", &config) {
        Err(CoherenceError::DataIntegrity { rows }) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].row, 1);
            assert_eq!(rows[0].first_date, date("2021-07-03"));
            assert_eq!(rows[0].second_date, date("2021-06-30"));
        }
        other => panic!("expected DataIntegrity, got {:?}", other),
    }
}

#[test]
fn test_batch_views_are_independent() {
    init_logging();

    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    write_site(temp_dir.path(), "Meager", "5M3", &[(COHERENCE_FILE, COHERENCE_CSV)]);

    let config = WorkbenchConfig::with_data_dir(temp_dir.path());
    let targets = vec!["Meager_5M3".to_string(), "Tseax_3M18".to_string(), "bad".to_string()];
    let results = insar_coherence::build_site_views(&targets, &config);

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].0, "Meager_5M3");
    assert!(matches!(results[0].1, Ok(Loaded::Present(_))));
    assert!(matches!(results[1].1, Ok(Loaded::Absent)));
    assert!(results[2].1.is_err());
}
