use crate::task::TaskRecord;
use std::collections::BTreeMap;

/// Ephemeral grouping of task records by path segment. Rebuilt from the
/// flat, sorted record list on every render pass and discarded; only the
/// grouping itself is the contract, never the enumeration order.
#[derive(Debug, Clone, PartialEq)]
pub enum HierarchyNode {
    Folder(BTreeMap<String, HierarchyNode>),
    Leaf(TaskRecord),
}

impl HierarchyNode {
    fn folder() -> Self {
        HierarchyNode::Folder(BTreeMap::new())
    }
}

/// Group records into a nested tree: every path segment except the last
/// becomes (or reuses) a folder node, the last binds the record itself.
/// Exact-path collisions resolve last-write-wins, silently.
pub fn build(records: &[TaskRecord]) -> HierarchyNode {
    let mut root: BTreeMap<String, HierarchyNode> = BTreeMap::new();

    for record in records {
        let segments: Vec<&str> = record.full_path.split('/').collect();
        let Some((leaf_name, folders)) = segments.split_last() else {
            continue;
        };

        let mut current = &mut root;
        for segment in folders {
            let entry = current
                .entry(segment.to_string())
                .or_insert_with(HierarchyNode::folder);
            // Unique full paths mean a leaf never sits where a folder is
            // needed; if a foreign source hands us one anyway, fold it away.
            if matches!(entry, HierarchyNode::Leaf(_)) {
                *entry = HierarchyNode::folder();
            }
            let HierarchyNode::Folder(children) = entry else {
                unreachable!("entry was just normalized to a folder");
            };
            current = children;
        }

        current.insert(leaf_name.to_string(), HierarchyNode::Leaf(record.clone()));
    }

    HierarchyNode::Folder(root)
}

/// One renderable line of the hierarchy panel.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeRow {
    Folder {
        depth: usize,
        name: String,
    },
    Leaf {
        depth: usize,
        name: String,
        record: TaskRecord,
    },
}

/// Depth-first expansion into display rows, folders always expanded.
pub fn flatten(root: &HierarchyNode) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    if let HierarchyNode::Folder(children) = root {
        flatten_into(children, 0, &mut rows);
    }
    rows
}

fn flatten_into(
    children: &BTreeMap<String, HierarchyNode>,
    depth: usize,
    rows: &mut Vec<TreeRow>,
) {
    for (name, node) in children {
        match node {
            HierarchyNode::Folder(grandchildren) => {
                rows.push(TreeRow::Folder {
                    depth,
                    name: name.clone(),
                });
                flatten_into(grandchildren, depth + 1, rows);
            }
            HierarchyNode::Leaf(record) => {
                rows.push(TreeRow::Leaf {
                    depth,
                    name: name.clone(),
                    record: record.clone(),
                });
            }
        }
    }
}

/// Number of selectable (leaf) rows.
pub fn leaf_count(rows: &[TreeRow]) -> usize {
    rows.iter()
        .filter(|r| matches!(r, TreeRow::Leaf { .. }))
        .count()
}

/// Record of the `ordinal`-th leaf row, counting leaves only.
pub fn leaf_record_at(rows: &[TreeRow], ordinal: usize) -> Option<&TaskRecord> {
    rows.iter()
        .filter_map(|r| match r {
            TreeRow::Leaf { record, .. } => Some(record),
            TreeRow::Folder { .. } => None,
        })
        .nth(ordinal)
}

/// Leaf ordinal of the row holding `full_path`, if present.
pub fn leaf_ordinal_of(rows: &[TreeRow], full_path: &str) -> Option<usize> {
    rows.iter()
        .filter_map(|r| match r {
            TreeRow::Leaf { record, .. } => Some(record),
            TreeRow::Folder { .. } => None,
        })
        .position(|record| record.full_path == full_path)
}
