//! Property tests for record collections built from search responses.

use findcore::{
    DriverContext, RecordCollection, RecordCollectionFactory, RecordDriver, RecordDriverFactory,
    RecordRef,
};
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::Arc;

fn drivers() -> Arc<RecordDriverFactory> {
    Arc::new(RecordDriverFactory::new(Arc::new(DriverContext::default())))
}

fn response(num_found: u64, start: u64, docs: usize) -> Value {
    let docs: Vec<Value> = (0..docs)
        .map(|i| json!({"id": format!("r{i}"), "title_short": format!("Title {i}")}))
        .collect();
    json!({
        "responseHeader": {"QTime": 3},
        "response": {"numFound": num_found, "start": start, "docs": docs}
    })
}

proptest! {
    #[test]
    fn total_and_offset_come_from_response(
        num_found in 0u64..100_000,
        start in 0u64..5_000,
        docs in 0usize..25,
    ) {
        let factory = RecordCollectionFactory::with_drivers(drivers());
        let collection = factory.build(response(num_found, start, docs)).unwrap();

        prop_assert_eq!(collection.total(), num_found);
        prop_assert_eq!(collection.offset() as u64, start);
        prop_assert_eq!(collection.count(), docs);
        prop_assert_eq!(collection.first().is_some(), docs > 0);
    }

    #[test]
    fn iteration_follows_document_order(start in 0u64..1_000, docs in 0usize..25) {
        let factory = RecordCollectionFactory::with_drivers(drivers());
        let collection = factory.build(response(docs as u64, start, docs)).unwrap();

        let seen: Vec<(usize, String)> = collection
            .iter()
            .map(|(position, record)| (position, record.unique_id().unwrap()))
            .collect();
        let expected: Vec<(usize, String)> = (0..docs)
            .map(|i| (start as usize + i, format!("r{i}")))
            .collect();
        prop_assert_eq!(seen, expected);
    }

    #[test]
    fn cursor_walk_matches_iter(start in 0u64..1_000, docs in 0usize..25) {
        let factory = RecordCollectionFactory::with_drivers(drivers());
        let mut collection = factory.build(response(docs as u64, start, docs)).unwrap();

        let mut keys = Vec::new();
        collection.rewind();
        while collection.valid() {
            prop_assert!(collection.current().is_some());
            keys.push(collection.key());
            collection.next();
        }
        let iterated: Vec<usize> = collection.iter().map(|(position, _)| position).collect();
        prop_assert_eq!(keys, iterated);
        prop_assert!(collection.current().is_none());
    }
}

#[test]
fn test_same_instance_is_added_once() {
    let record: RecordRef = Arc::from(drivers().default_record(json!({"id": "dup"})));
    let twin: RecordRef = Arc::from(drivers().default_record(json!({"id": "dup"})));

    let mut collection = RecordCollection::new(json!({"response": {"numFound": 3, "start": 20}}));
    collection.add(Arc::clone(&record));
    collection.add(Arc::clone(&record));
    assert_eq!(collection.count(), 1);
    assert_eq!(collection.key(), 21);

    collection.add(twin);
    assert_eq!(collection.count(), 2);
    assert_eq!(
        collection.records().keys().copied().collect::<Vec<_>>(),
        vec![20, 21]
    );
}

#[test]
fn test_defaults_for_sparse_response() {
    let collection = RecordCollection::new(json!({}));
    assert_eq!(collection.total(), 0);
    assert_eq!(collection.offset(), 0);
    assert!((collection.query_time() - 0.0).abs() < f64::EPSILON);
    assert!(collection.facets().is_empty());
    assert!(!collection.valid());
}

#[test]
fn test_facets_are_cached() {
    let collection = RecordCollection::new(json!({
        "facet_counts": {
            "facet_fields": {"format": ["Book", 12, "Journal", "3"]},
            "facet_queries": {"publishDate:[2000 TO *]": 4}
        }
    }));
    let first = collection.facets();
    let second = collection.facets();
    assert!(std::ptr::eq(first, second));

    let formats = first.field("format").unwrap();
    assert_eq!(formats[0].value, "Book");
    assert_eq!(formats[1].count, 3);
    assert_eq!(first.query_facets()["publishDate:[2000 TO *]"], 4);
}

#[test]
fn test_non_list_docs_rejected() {
    let factory = RecordCollectionFactory::with_drivers(drivers());
    assert!(factory
        .build(json!({"response": {"docs": {"id": "x"}}}))
        .is_err());
}
