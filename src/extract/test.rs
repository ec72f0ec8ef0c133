#![cfg(test)]

use approx::assert_relative_eq;
use tempfile::NamedTempFile;

use crate::extract::Extractor;
use crate::osm::model::relation::MemberType;
use crate::osm::test::{BlockBuilder, write_extract};
use crate::poi::document::{DocumentMapper, PoiDocument};
use crate::poi::filter::{FilterTag, PoiFilter, PoiFilters};

fn filters() -> PoiFilters {
    PoiFilters::new(vec![
        PoiFilter::new(
            "amenity",
            vec![
                FilterTag {
                    name: "cinema".into(),
                    priority: 2,
                },
                FilterTag {
                    name: "theatre".into(),
                    priority: 5,
                },
            ],
        ),
        PoiFilter::single("leisure", "park", 1),
    ])
}

fn extractor(popularity: i64) -> Extractor {
    Extractor::new(DocumentMapper::new(filters(), popularity, Vec::new()))
}

/// A small but complete extract: one node POI, one closed-way POI, one
/// multipolygon relation POI assembled from two open way fragments,
/// and one way with a reference outside the extract.
fn fixture() -> NamedTempFile {
    let nodes = BlockBuilder::new()
        .dense_nodes(&[
            (1, 59.91, 10.75, &[("name", "Roxy"), ("amenity", "cinema")]),
            (10, 0.0, 0.0, &[]),
            (11, 0.0, 0.001, &[]),
            (12, 0.001, 0.001, &[]),
            (13, 0.001, 0.0, &[]),
            (20, 0.1, 0.1, &[]),
            (21, 0.1, 0.101, &[]),
            (22, 0.101, 0.101, &[]),
            (23, 0.101, 0.1, &[]),
        ])
        .build();

    let ways = BlockBuilder::new()
        .way(
            100,
            &[10, 11, 12, 13, 10],
            &[("name", "Old Market"), ("amenity", "theatre")],
        )
        .way(301, &[20, 21, 22], &[])
        .way(302, &[22, 23, 20], &[])
        .way(400, &[10, 999], &[("name", "Ghost Path"), ("amenity", "cinema")])
        .build();

    let relations = BlockBuilder::new()
        .relation(
            200,
            &[
                ("outer", 301, MemberType::Way),
                ("outer", 302, MemberType::Way),
            ],
            &[
                ("type", "multipolygon"),
                ("name", "Green Park"),
                ("leisure", "park"),
            ],
        )
        .build();

    write_extract(vec![nodes, ways, relations], false)
}

fn document<'a>(documents: &'a [PoiDocument], id: &str) -> &'a PoiDocument {
    documents
        .iter()
        .find(|doc| doc.id == id)
        .unwrap_or_else(|| panic!("missing document {id}"))
}

#[test_log::test]
fn pipeline_emits_node_way_and_relation_documents() {
    let file = fixture();
    let documents = extractor(10).extract(file.path()).expect("extraction");

    assert_eq!(documents.len(), 3);

    let node = document(&documents, "osm:PlaceOfInterest:1");
    assert_eq!(node.default_name, "Roxy");
    assert_eq!(node.popularity, 20);
    assert_eq!(node.categories, vec!["poi", "cinema"]);
    assert_relative_eq!(node.center.lat, 59.91, epsilon = 1e-6);
    assert_relative_eq!(node.center.lon, 10.75, epsilon = 1e-6);

    let way = document(&documents, "osm:PlaceOfInterest:100");
    assert_eq!(way.default_name, "Old Market");
    assert_eq!(way.popularity, 50);
    assert_eq!(way.categories, vec!["poi", "theatre"]);
    assert_relative_eq!(way.center.lat, 0.0005, epsilon = 1e-6);
    assert_relative_eq!(way.center.lon, 0.0005, epsilon = 1e-6);

    let relation = document(&documents, "osm:PlaceOfInterest:200");
    assert_eq!(relation.default_name, "Green Park");
    assert_eq!(relation.popularity, 10);
    assert_eq!(relation.categories, vec!["poi", "park"]);
    assert!(relation.center.lat > 0.1 && relation.center.lat < 0.101);
    assert!(relation.center.lon > 0.1 && relation.center.lon < 0.101);
}

#[test_log::test]
fn way_with_missing_node_is_skipped_without_failing() {
    let file = fixture();
    let documents = extractor(10).extract(file.path()).expect("extraction");

    assert!(!documents.iter().any(|doc| doc.id.contains("400")));
}

#[test_log::test]
fn reruns_produce_an_identical_document_set() {
    let file = fixture();
    let extractor = extractor(10);

    let sorted = |mut documents: Vec<PoiDocument>| {
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        documents
    };

    let first = sorted(extractor.extract(file.path()).expect("first run"));
    let second = sorted(extractor.extract(file.path()).expect("second run"));

    assert_eq!(first, second);
}

#[test_log::test]
fn empty_filter_set_produces_no_documents() {
    let file = fixture();
    let extractor = Extractor::with_filters(PoiFilters::default());

    assert!(extractor.extract(file.path()).expect("extraction").is_empty());
}

#[test_log::test]
fn relation_member_ways_are_not_emitted_standalone() {
    let nodes = BlockBuilder::new()
        .dense_nodes(&[
            (20, 0.1, 0.1, &[]),
            (21, 0.1, 0.101, &[]),
            (22, 0.101, 0.101, &[]),
            (23, 0.101, 0.1, &[]),
        ])
        .build();

    // The member way itself qualifies as a POI, but belongs to a
    // recorded multipolygon.
    let ways = BlockBuilder::new()
        .way(
            300,
            &[20, 21, 22, 23, 20],
            &[("name", "Park Edge"), ("amenity", "theatre")],
        )
        .build();

    let relations = BlockBuilder::new()
        .relation(
            201,
            &[("outer", 300, MemberType::Way)],
            &[
                ("type", "multipolygon"),
                ("name", "Inner Green"),
                ("leisure", "park"),
            ],
        )
        .build();

    let file = write_extract(vec![nodes, ways, relations], false);
    let documents = extractor(1).extract(file.path()).expect("extraction");

    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].id, "osm:PlaceOfInterest:201");
}

#[test_log::test]
fn multilingual_names_emit_one_document_each() {
    let nodes = BlockBuilder::new()
        .dense_nodes(&[(
            7,
            59.9,
            10.7,
            &[
                ("name", "Torget"),
                ("name:en", "The Square"),
                ("amenity", "cinema"),
            ],
        )])
        .build();

    let file = write_extract(vec![nodes], false);
    let documents = extractor(1).extract(file.path()).expect("extraction");

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].id, "osm:PlaceOfInterest:7");
    assert_eq!(documents[0].default_name, "Torget");
    assert_eq!(documents[1].id, "osm:PlaceOfInterest:7-1");
    assert_eq!(documents[1].default_name, "The Square");
}

#[test_log::test]
fn non_multipolygon_relations_are_ignored() {
    let relations = BlockBuilder::new()
        .relation(
            900,
            &[("outer", 1, MemberType::Way)],
            &[("type", "route"), ("name", "Bus 21"), ("leisure", "park")],
        )
        .build();

    let file = write_extract(vec![relations], false);
    let documents = extractor(1).extract(file.path()).expect("extraction");

    assert!(documents.is_empty());
}

#[test_log::test]
fn unresolvable_relation_boundaries_are_skipped_without_failing() {
    let nodes = BlockBuilder::new()
        .dense_nodes(&[(20, 0.1, 0.1, &[]), (21, 0.1, 0.101, &[])])
        .build();

    // A single open fragment: endpoint degrees are 1, not 2.
    let ways = BlockBuilder::new().way(310, &[20, 21], &[]).build();

    let relations = BlockBuilder::new()
        .relation(
            202,
            &[("outer", 310, MemberType::Way)],
            &[
                ("type", "multipolygon"),
                ("name", "Broken Green"),
                ("leisure", "park"),
            ],
        )
        .build();

    let file = write_extract(vec![nodes, ways, relations], false);
    let documents = extractor(1).extract(file.path()).expect("extraction");

    assert!(documents.is_empty());
}
