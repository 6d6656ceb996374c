use chart_prep::data::loader::parse_json;
use chart_prep::{prepare_hierarchy, Dataset, Extent, HierarchyConfig, PrepError, Row};

fn leaf(name: &str, group: &str, value: f64) -> Row {
    Row::new()
        .with("name", name)
        .with("group", group)
        .with("value", value)
}

#[test]
fn two_orphans_sum_into_root() {
    let ds = Dataset::from_rows(vec![leaf("a", "", 1.0), leaf("b", "", 2.0)]);
    let out = prepare_hierarchy(&ds, &HierarchyConfig::default().with_root_name("root")).unwrap();
    assert_eq!(out.plot_data.id, "root");
    assert_eq!(out.plot_data.aggregate_value, 3.0);
    let kids: Vec<&str> = out.plot_data.children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(kids, vec!["a", "b"]);
}

#[test]
fn root_total_equals_sum_of_leaves() {
    let text = r#"[
        {"name": "UK", "group": "Europe", "population": 67},
        {"name": "France", "group": "Europe", "population": 68},
        {"name": "Japan", "group": "Asia", "population": 125},
        {"name": "India", "group": "Asia", "population": 1400},
        {"name": "Nauru", "group": "", "population": 0.012}
    ]"#;
    let ds = parse_json(text).unwrap();
    let config = HierarchyConfig::default()
        .with_root_name("World")
        .with_attr_to_show("population");
    let out = prepare_hierarchy(&ds, &config).unwrap();

    let expected: f64 = 67.0 + 68.0 + 125.0 + 1400.0 + 0.012;
    assert!((out.plot_data.aggregate_value - expected).abs() < 1e-9);
    assert_eq!(out.value_extent, Some(Extent { min: 0.012, max: 1400.0 }));

    // Input rows + World + Europe + Asia.
    assert_eq!(out.data.len(), 8);
    assert_eq!(out.plot_data.leaves().len(), 5);

    for node in out.plot_data.descendants() {
        if !node.is_leaf() {
            let sum: f64 = node.children.iter().map(|c| c.aggregate_value).sum();
            assert!((node.aggregate_value - sum).abs() < 1e-9);
            let values: Vec<f64> = node.children.iter().map(|c| c.aggregate_value).collect();
            assert!(values.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}

#[test]
fn input_dataset_is_not_modified() {
    let ds = Dataset::from_rows(vec![leaf("a", "", 1.0), leaf("b", "g", 2.0)]);
    let snapshot = ds.clone();
    prepare_hierarchy(&ds, &HierarchyConfig::default()).unwrap();
    assert_eq!(ds, snapshot);
}

#[test]
fn duplicate_leaf_names_fail() {
    let ds = Dataset::from_rows(vec![leaf("a", "g", 1.0), leaf("a", "h", 2.0)]);
    assert_eq!(
        prepare_hierarchy(&ds, &HierarchyConfig::default()).unwrap_err(),
        PrepError::DuplicateId { id: "a".to_string() }
    );
}

#[test]
fn missing_name_column_fails() {
    let ds = Dataset::from_rows(vec![Row::new().with("group", "g").with("value", 1.0)]);
    assert!(matches!(
        prepare_hierarchy(&ds, &HierarchyConfig::default()),
        Err(PrepError::InputShape { .. })
    ));
}

#[test]
fn output_uses_renderer_field_names() {
    let ds = Dataset::from_rows(vec![leaf("a", "", 1.0)]);
    let out = prepare_hierarchy(&ds, &HierarchyConfig::default()).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert!(json.get("data").is_some());
    assert_eq!(json["plotData"]["id"], "root");
    assert_eq!(json["plotData"]["aggregateValue"], 1.0);
    assert_eq!(json["plotData"]["children"][0]["parentId"], "root");
    assert_eq!(json["valueExtent"]["min"], 1.0);
}

#[test]
fn numeric_and_text_group_labels_merge() {
    let text = r#"[
        {"name": "a", "group": 1, "value": 1},
        {"name": "b", "group": "1", "value": 2}
    ]"#;
    let ds = parse_json(text).unwrap();
    let out = prepare_hierarchy(&ds, &HierarchyConfig::default()).unwrap();

    // a, b, root, "1".
    assert_eq!(out.data.len(), 4);
    let kids: Vec<&str> = out.plot_data.children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(kids, vec!["1"]);
    assert_eq!(out.plot_data.children[0].aggregate_value, 3.0);
    assert_eq!(out.plot_data.aggregate_value, 3.0);
}

#[test]
fn reserved_column_cannot_be_summed() {
    let ds = Dataset::from_rows(vec![leaf("a", "g", 1.0)]);
    let config = HierarchyConfig::default().with_attr_to_show("group");
    assert_eq!(
        prepare_hierarchy(&ds, &config).unwrap_err(),
        PrepError::InputShape { column: "group".to_string() }
    );
}
