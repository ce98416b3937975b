#![allow(dead_code)]

use std::collections::BTreeSet;

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use serde_json::{json, Map, Value};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// One generated region: shape attributes and region attributes.
#[derive(Clone, Debug)]
pub struct GenRegion {
    pub shape: Map<String, Value>,
    pub labels: Map<String, Value>,
}

/// A generated document: image keys in order, each with its regions.
#[derive(Clone, Debug)]
pub struct GenDocument {
    pub images: Vec<(String, Vec<GenRegion>)>,
}

impl GenDocument {
    pub fn to_value(&self) -> Value {
        let mut metadata = Map::new();
        for (key, regions) in &self.images {
            let regions: Vec<Value> = regions
                .iter()
                .map(|region| {
                    json!({
                        "shape_attributes": Value::Object(region.shape.clone()),
                        "region_attributes": Value::Object(region.labels.clone()),
                    })
                })
                .collect();
            metadata.insert(
                key.clone(),
                json!({"filename": key, "size": 0, "regions": regions, "file_attributes": {}}),
            );
        }

        let mut root = Map::new();
        root.insert("_via_img_metadata".to_string(), Value::Object(metadata));
        Value::Object(root)
    }

    pub fn region_count(&self) -> usize {
        self.images.iter().map(|(_, regions)| regions.len()).sum()
    }
}

/// Attribute keys drawn from a small pool so that shape and region
/// attributes collide often. Never `path` or `region_id`.
fn attribute_key_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "name", "x", "y", "width", "height", "cx", "cy", "r", "label", "type", "occluded",
    ])
    .prop_map(str::to_string)
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z]{0,6}".prop_map(Value::from),
        (-1000i64..1000).prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
        prop::collection::vec(0u32..500, 0..4).prop_map(Value::from),
    ]
}

fn attributes_strategy() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::vec((attribute_key_strategy(), scalar_strategy()), 0..5)
        .prop_map(|pairs| pairs.into_iter().collect())
}

fn region_strategy() -> impl Strategy<Value = GenRegion> {
    (attributes_strategy(), attributes_strategy())
        .prop_map(|(shape, labels)| GenRegion { shape, labels })
}

pub fn arb_document(max_images: usize, max_regions: usize) -> BoxedStrategy<GenDocument> {
    prop::collection::vec(
        prop::collection::vec(region_strategy(), 0..=max_regions),
        0..=max_images,
    )
    .prop_map(|images| GenDocument {
        images: images
            .into_iter()
            .enumerate()
            .map(|(i, regions)| (format!("img_{i:03}.jpg"), regions))
            .collect(),
    })
    .boxed()
}

/// The keys a region's row is expected to carry, in merge order.
pub fn expected_keys(region: &GenRegion) -> BTreeSet<String> {
    ["path", "region_id"]
        .into_iter()
        .map(str::to_string)
        .chain(region.shape.keys().cloned())
        .chain(region.labels.keys().cloned())
        .collect()
}
