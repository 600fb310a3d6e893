//! Behavioural tests for the ingest, simplify and export pipeline.

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::{cell::RefCell, fs, path::PathBuf};
use tempfile::TempDir;
use waygraph_core::{NetworkError, NetworkGraph, WayId};
use waygraph_data::{
    GexfSummary, IngestOptions, MissingNodePolicy, OsmIngestError, OsmIngestSummary,
    ingest_osm_xml, write_gexf_file,
};

mod support;

#[fixture]
fn source() -> RefCell<Option<Utf8PathBuf>> {
    RefCell::new(None)
}

#[fixture]
fn network() -> RefCell<NetworkGraph> {
    RefCell::new(NetworkGraph::new())
}

#[fixture]
fn ingestion() -> RefCell<Option<Result<OsmIngestSummary, OsmIngestError>>> {
    RefCell::new(None)
}

#[fixture]
fn output() -> RefCell<Option<(TempDir, Utf8PathBuf, GexfSummary)>> {
    RefCell::new(None)
}

fn ingest_with(
    source: &RefCell<Option<Utf8PathBuf>>,
    network: &RefCell<NetworkGraph>,
    ingestion: &RefCell<Option<Result<OsmIngestSummary, OsmIngestError>>>,
    options: &IngestOptions,
) {
    let path = source.borrow().clone().expect("source prepared");
    let outcome = ingest_osm_xml(&path, &mut network.borrow_mut(), options);
    *ingestion.borrow_mut() = Some(outcome);
}

#[given("the sample OSM document")]
fn sample_document(#[from(source)] source: &RefCell<Option<Utf8PathBuf>>) {
    *source.borrow_mut() = Some(support::fixtures_dir().join("sample.osm"));
}

#[given("a path to a missing OSM document")]
fn missing_document(#[from(source)] source: &RefCell<Option<Utf8PathBuf>>) {
    *source.borrow_mut() = Some(support::fixtures_dir().join("missing.osm"));
}

#[when("I ingest it with the default road filter")]
fn ingest_default(
    #[from(source)] source: &RefCell<Option<Utf8PathBuf>>,
    #[from(network)] network: &RefCell<NetworkGraph>,
    #[from(ingestion)] ingestion: &RefCell<Option<Result<OsmIngestSummary, OsmIngestError>>>,
) {
    ingest_with(source, network, ingestion, &IngestOptions::default());
}

#[when("I ingest it aborting on broken ways")]
fn ingest_strict(
    #[from(source)] source: &RefCell<Option<Utf8PathBuf>>,
    #[from(network)] network: &RefCell<NetworkGraph>,
    #[from(ingestion)] ingestion: &RefCell<Option<Result<OsmIngestSummary, OsmIngestError>>>,
) {
    let options = IngestOptions::default().with_missing_nodes(MissingNodePolicy::Abort);
    ingest_with(source, network, ingestion, &options);
}

#[when("I simplify the network")]
fn simplify(#[from(network)] network: &RefCell<NetworkGraph>) {
    let report = network.borrow_mut().simplify();
    assert_eq!(report.removed, 1, "node 2 is a pass-through node");
}

#[when("I export the network as GEXF")]
fn export(
    #[from(network)] network: &RefCell<NetworkGraph>,
    #[from(output)] output: &RefCell<Option<(TempDir, Utf8PathBuf, GexfSummary)>>,
) {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    let target = root.join("out/town.gexf");
    let summary = write_gexf_file(&network.borrow(), &target).expect("export succeeds");
    *output.borrow_mut() = Some((dir, target, summary));
}

#[then("the GEXF file lists 4 nodes and 4 edges")]
fn gexf_contents(#[from(output)] output: &RefCell<Option<(TempDir, Utf8PathBuf, GexfSummary)>>) {
    let borrowed = output.borrow();
    let (_, path, summary) = borrowed.as_ref().expect("export ran");
    assert_eq!(*summary, GexfSummary { nodes: 4, edges: 4 });
    let contents = fs::read_to_string(path).expect("read gexf");
    assert_eq!(contents.matches("<node ").count(), 4);
    assert_eq!(contents.matches("<edge ").count(), 4);
    assert!(contents.contains(r#"source="1" target="3""#));
    assert!(!contents.contains(r#"<node id="2""#));
}

#[then("ingestion fails for way 12")]
fn fails_for_way(
    #[from(ingestion)] ingestion: &RefCell<Option<Result<OsmIngestSummary, OsmIngestError>>>,
) {
    let borrowed = ingestion.borrow();
    match borrowed.as_ref().expect("ingestion was attempted") {
        Err(OsmIngestError::Network {
            source: NetworkError::MissingNode { way, .. },
        }) => assert_eq!(*way, WayId(12)),
        other => panic!("expected a network error, got {other:?}"),
    }
}

#[then("an open error is returned")]
fn open_error(
    #[from(ingestion)] ingestion: &RefCell<Option<Result<OsmIngestSummary, OsmIngestError>>>,
) {
    let borrowed = ingestion.borrow();
    match borrowed.as_ref().expect("ingestion was attempted") {
        Err(OsmIngestError::Open { path, .. }) => {
            assert!(path.ends_with("missing.osm"), "unexpected path {path}");
        }
        other => panic!("expected an open error, got {other:?}"),
    }
}

#[test]
fn scenario_indices_follow_feature_order() {
    let feature =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/features/osm_to_gexf.feature");
    let contents = fs::read_to_string(&feature).unwrap_or_else(|err| {
        panic!("failed to read feature file {feature:?}: {err}");
    });
    let titles: Vec<String> = contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Scenario: "))
        .map(|title| title.to_owned())
        .collect();
    let expected = [
        "converting a small town",
        "aborting on a broken way",
        "reporting a missing file",
    ];
    assert_eq!(
        titles.len(),
        expected.len(),
        "scenario count changed in feature file: {titles:?}"
    );
    for (index, expected_title) in expected.iter().enumerate() {
        let actual = titles.get(index).map(String::as_str);
        assert_eq!(
            actual,
            Some(*expected_title),
            "scenario at index {index} does not match feature order"
        );
    }
}

#[scenario(path = "tests/features/osm_to_gexf.feature", index = 0)]
fn converting_small_town(
    source: RefCell<Option<Utf8PathBuf>>,
    network: RefCell<NetworkGraph>,
    ingestion: RefCell<Option<Result<OsmIngestSummary, OsmIngestError>>>,
    output: RefCell<Option<(TempDir, Utf8PathBuf, GexfSummary)>>,
) {
    let _ = (source, network, ingestion, output);
}

#[scenario(path = "tests/features/osm_to_gexf.feature", index = 1)]
fn aborting_on_broken_way(
    source: RefCell<Option<Utf8PathBuf>>,
    network: RefCell<NetworkGraph>,
    ingestion: RefCell<Option<Result<OsmIngestSummary, OsmIngestError>>>,
    output: RefCell<Option<(TempDir, Utf8PathBuf, GexfSummary)>>,
) {
    let _ = (source, network, ingestion, output);
}

#[scenario(path = "tests/features/osm_to_gexf.feature", index = 2)]
fn reporting_missing_file(
    source: RefCell<Option<Utf8PathBuf>>,
    network: RefCell<NetworkGraph>,
    ingestion: RefCell<Option<Result<OsmIngestSummary, OsmIngestError>>>,
    output: RefCell<Option<(TempDir, Utf8PathBuf, GexfSummary)>>,
) {
    let _ = (source, network, ingestion, output);
}
