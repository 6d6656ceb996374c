//! Circle-packing hierarchy: synthesize the root and group nodes, stratify
//! the flat rows into a tree and sum values bottom-up.
//!
//! The layout is fixed at two levels below the root:
//! `root → group → leaf`. A group cannot itself belong to another group.

use std::collections::{BTreeSet, HashMap};

use log::debug;
use serde::Serialize;

use super::extent::Extent;
use crate::config::HierarchyConfig;
use crate::data::model::{Dataset, Row, GROUP, NAME};
use crate::error::{PrepError, Result};

// ---------------------------------------------------------------------------
// Tree model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyNode {
    pub id: String,
    pub parent_id: Option<String>,
    /// Leaf: its own value. Internal node: sum over its children.
    pub aggregate_value: f64,
    /// Distance from the root.
    pub depth: usize,
    /// Distance to the deepest leaf below.
    pub height: usize,
    pub data: Row,
    /// Ascending by `aggregate_value`; ties keep input order.
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order walk starting with `self`.
    pub fn descendants(&self) -> Vec<&HierarchyNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub fn leaves(&self) -> Vec<&HierarchyNode> {
        self.descendants()
            .into_iter()
            .filter(|n| n.is_leaf())
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&HierarchyNode> {
        self.descendants().into_iter().find(|n| n.id == id)
    }
}

/// Input to [`stratify`]: one flat record with its identity and value.
#[derive(Debug, Clone)]
pub struct NodeSpec<'a> {
    pub id: String,
    pub parent_id: Option<String>,
    /// Used only when the node ends up a leaf.
    pub value: f64,
    pub row: &'a Row,
}

/// Build a validated tree from flat id/parent-id records.
///
/// Fails on duplicate ids, parents that do not resolve, anything but
/// exactly one root, and nodes unreachable from the root.
pub fn stratify(specs: &[NodeSpec<'_>]) -> Result<HierarchyNode> {
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(specs.len());
    for (i, spec) in specs.iter().enumerate() {
        if index.insert(spec.id.as_str(), i).is_some() {
            return Err(PrepError::DuplicateId {
                id: spec.id.clone(),
            });
        }
    }

    let mut roots = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); specs.len()];
    for (i, spec) in specs.iter().enumerate() {
        match &spec.parent_id {
            None => roots.push(i),
            Some(parent) => match index.get(parent.as_str()) {
                Some(&p) => children[p].push(i),
                None => {
                    return Err(PrepError::DanglingParent {
                        id: spec.id.clone(),
                        parent: parent.clone(),
                    })
                }
            },
        }
    }

    let &[root] = roots.as_slice() else {
        return Err(PrepError::RootCount { found: roots.len() });
    };

    let mut visited = vec![false; specs.len()];
    let tree = build_node(specs, &children, root, 0, &mut visited);

    // Every node has one parent, so anything the walk missed hangs off a cycle.
    if let Some(i) = visited.iter().position(|seen| !seen) {
        return Err(PrepError::Cycle {
            id: specs[i].id.clone(),
        });
    }
    Ok(tree)
}

fn build_node(
    specs: &[NodeSpec<'_>],
    children: &[Vec<usize>],
    idx: usize,
    depth: usize,
    visited: &mut [bool],
) -> HierarchyNode {
    visited[idx] = true;
    let spec = &specs[idx];

    let mut kids: Vec<HierarchyNode> = children[idx]
        .iter()
        .map(|&c| build_node(specs, children, c, depth + 1, visited))
        .collect();
    kids.sort_by(|a, b| a.aggregate_value.total_cmp(&b.aggregate_value));

    let (aggregate_value, height) = if kids.is_empty() {
        (spec.value, 0)
    } else {
        (
            kids.iter().map(|k| k.aggregate_value).sum(),
            1 + kids.iter().map(|k| k.height).max().unwrap_or(0),
        )
    };

    HierarchyNode {
        id: spec.id.clone(),
        parent_id: spec.parent_id.clone(),
        aggregate_value,
        depth,
        height,
        data: spec.row.clone(),
        children: kids,
    }
}

// ---------------------------------------------------------------------------
// Root / group synthesis
// ---------------------------------------------------------------------------

/// The enriched rows, the tree and the extent of the original leaf values.
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    pub rows: Vec<Row>,
    pub root: HierarchyNode,
    pub value_extent: Option<Extent>,
}

/// Distinct non-blank `group` labels, sorted, excluding the root itself.
///
/// Compared as text, the same way leaves name their parent, so `1` and
/// `"1"` are one group.
fn group_names(dataset: &Dataset, root_name: &str) -> Vec<String> {
    let labels: BTreeSet<String> = dataset
        .rows
        .iter()
        .filter(|row| !row.is_missing(GROUP))
        .map(Row::group)
        .collect();
    labels.into_iter().filter(|g| g != root_name).collect()
}

/// Turn flat `name`/`group` rows into a circle-packing tree.
///
/// Rows without a group (blank or `*`) are adopted by the root; every distinct group
/// becomes a synthesized child of the root. The input is left untouched:
/// the returned rows are the originals (with adoption applied) followed by
/// the root and the group nodes.
pub fn build_hierarchy(dataset: &Dataset, config: &HierarchyConfig) -> Result<Hierarchy> {
    let root_name = config.root_name.as_str();
    let attr = config.attr_to_show.as_str();
    for column in [NAME, GROUP, attr] {
        dataset.require_column(column)?;
    }

    let groups = group_names(dataset, root_name);

    let mut rows: Vec<Row> = dataset
        .rows
        .iter()
        .map(|row| {
            if row.name() != root_name && row.is_missing(GROUP) {
                row.clone().with(GROUP, root_name)
            } else {
                row.clone()
            }
        })
        .collect();
    let n_original = rows.len();

    rows.push(Row::new().with(NAME, root_name).with(GROUP, ""));
    rows.extend(
        groups
            .iter()
            .map(|g| Row::new().with(NAME, g.as_str()).with(GROUP, root_name)),
    );

    let mut leaf_values = Vec::with_capacity(n_original);
    let mut specs = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let value = if i < n_original {
            let v = row.number_or(i, attr, 0.0)?;
            if !row.is_missing(attr) {
                leaf_values.push(v);
            }
            v
        } else {
            0.0
        };
        specs.push(NodeSpec {
            id: row.name(),
            parent_id: (!row.is_missing(GROUP)).then(|| row.group()),
            value,
            row,
        });
    }

    let root = stratify(&specs)?;
    debug!(
        "hierarchy '{root_name}': {} rows, {} groups, total {}",
        n_original,
        groups.len(),
        root.aggregate_value
    );

    Ok(Hierarchy {
        value_extent: Extent::of(leaf_values),
        root,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, group: &str, value: &str) -> Row {
        Row::new()
            .with("name", name)
            .with("group", group)
            .with("value", value)
    }

    fn config() -> HierarchyConfig {
        HierarchyConfig::default()
    }

    #[test]
    fn orphans_become_children_of_root() {
        let ds = Dataset::from_rows(vec![leaf("a", "", "1"), leaf("b", "", "2")]);
        let h = build_hierarchy(&ds, &config()).unwrap();
        assert_eq!(h.root.id, "root");
        assert_eq!(h.root.aggregate_value, 3.0);
        let ids: Vec<&str> = h.root.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(h.root.children.iter().all(|c| c.parent_id.as_deref() == Some("root")));
    }

    #[test]
    fn groups_are_synthesized_under_root() {
        let ds = Dataset::from_rows(vec![
            leaf("apple", "fruit", "5"),
            leaf("kale", "veg", "1"),
            leaf("pear", "fruit", "2"),
            leaf("salt", "", "4"),
        ]);
        let h = build_hierarchy(&ds, &config()).unwrap();

        // Sorted ascending: veg (1), salt (4), fruit (7).
        let ids: Vec<&str> = h.root.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["veg", "salt", "fruit"]);

        let fruit = h.root.find("fruit").unwrap();
        assert_eq!(fruit.aggregate_value, 7.0);
        assert_eq!(fruit.depth, 1);
        assert_eq!(fruit.height, 1);
        let fruit_kids: Vec<&str> = fruit.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(fruit_kids, vec!["pear", "apple"]);

        assert_eq!(h.root.aggregate_value, 12.0);
        assert_eq!(h.root.height, 2);
        assert_eq!(h.value_extent, Some(Extent { min: 1.0, max: 5.0 }));
    }

    #[test]
    fn enriched_rows_do_not_touch_input() {
        let ds = Dataset::from_rows(vec![leaf("a", "", "1"), leaf("b", "g", "2")]);
        let before = ds.clone();
        let h = build_hierarchy(&ds, &config()).unwrap();
        assert_eq!(ds, before);

        assert_eq!(h.rows.len(), 4);
        assert_eq!(h.rows[0].group(), "root");
        assert_eq!(h.rows[2].name(), "root");
        assert_eq!(h.rows[3].name(), "g");
        assert_eq!(h.rows[3].group(), "root");
    }

    #[test]
    fn existing_root_row_collides() {
        let ds = Dataset::from_rows(vec![leaf("root", "", "1"), leaf("a", "", "2")]);
        assert_eq!(
            build_hierarchy(&ds, &config()).unwrap_err(),
            PrepError::DuplicateId { id: "root".to_string() }
        );
    }

    #[test]
    fn leaf_named_like_a_group_collides() {
        let ds = Dataset::from_rows(vec![leaf("fruit", "", "1"), leaf("apple", "fruit", "2")]);
        assert!(matches!(
            build_hierarchy(&ds, &config()),
            Err(PrepError::DuplicateId { .. })
        ));
    }

    #[test]
    fn group_named_after_root_is_not_duplicated() {
        let ds = Dataset::from_rows(vec![leaf("a", "root", "1"), leaf("b", "", "2")]);
        let h = build_hierarchy(&ds, &config()).unwrap();
        assert_eq!(h.rows.len(), 3);
        assert_eq!(h.root.children.len(), 2);
    }

    #[test]
    fn typed_group_labels_share_one_node() {
        let ds = Dataset::from_rows(vec![
            Row::new().with("name", "a").with("group", 1_i64).with("value", 1.0),
            Row::new().with("name", "b").with("group", "1").with("value", 2.0),
            Row::new().with("name", "c").with("group", 2020.0).with("value", 4.0),
            Row::new().with("name", "d").with("group", 2020_i64).with("value", 8.0),
        ]);
        let h = build_hierarchy(&ds, &config()).unwrap();
        assert_eq!(h.rows.len(), 7);
        assert_eq!(h.root.find("1").unwrap().aggregate_value, 3.0);
        assert_eq!(h.root.find("2020").unwrap().aggregate_value, 12.0);
    }

    #[test]
    fn missing_required_column_is_input_shape_error() {
        let ds = Dataset::from_rows(vec![Row::new().with("name", "a").with("group", "")]);
        assert_eq!(
            build_hierarchy(&ds, &config()).unwrap_err(),
            PrepError::InputShape { column: "value".to_string() }
        );
    }

    #[test]
    fn blank_leaf_value_counts_as_zero_but_not_in_extent() {
        let ds = Dataset::from_rows(vec![leaf("a", "", ""), leaf("b", "", "2")]);
        let h = build_hierarchy(&ds, &config()).unwrap();
        assert_eq!(h.root.find("a").unwrap().aggregate_value, 0.0);
        assert_eq!(h.value_extent, Some(Extent { min: 2.0, max: 2.0 }));
    }

    #[test]
    fn non_numeric_leaf_value_fails() {
        let ds = Dataset::from_rows(vec![leaf("a", "", "big")]);
        assert!(matches!(
            build_hierarchy(&ds, &config()),
            Err(PrepError::NumericCoercion { row: 0, .. })
        ));
    }

    fn spec<'a>(id: &str, parent: Option<&str>, row: &'a Row) -> NodeSpec<'a> {
        NodeSpec {
            id: id.to_string(),
            parent_id: parent.map(str::to_string),
            value: 1.0,
            row,
        }
    }

    #[test]
    fn stratify_rejects_dangling_parent() {
        let row = Row::new();
        let specs = vec![spec("r", None, &row), spec("a", Some("ghost"), &row)];
        assert_eq!(
            stratify(&specs).unwrap_err(),
            PrepError::DanglingParent {
                id: "a".to_string(),
                parent: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn stratify_rejects_two_roots() {
        let row = Row::new();
        let specs = vec![spec("r", None, &row), spec("s", None, &row)];
        assert_eq!(stratify(&specs).unwrap_err(), PrepError::RootCount { found: 2 });
    }

    #[test]
    fn stratify_rejects_cycles() {
        let row = Row::new();
        let specs = vec![
            spec("r", None, &row),
            spec("a", Some("b"), &row),
            spec("b", Some("a"), &row),
        ];
        assert!(matches!(stratify(&specs), Err(PrepError::Cycle { .. })));
    }

    #[test]
    fn every_node_reachable_and_unique() {
        let ds = Dataset::from_rows(vec![
            leaf("x", "g1", "1"),
            leaf("y", "g2", "2"),
            leaf("z", "", "3"),
        ]);
        let h = build_hierarchy(&ds, &config()).unwrap();
        let nodes = h.root.descendants();
        assert_eq!(nodes.len(), h.rows.len());
        let mut ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), nodes.len());
        assert_eq!(h.root.leaves().len(), 3);
    }
}
