//! Category tree

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::ids::CategoryId;

/// A category as stored: flat, pointing at its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Category identifier
    pub id: CategoryId,

    /// Parent category, `None` for top level categories
    #[serde(default)]
    pub parent: Option<CategoryId>,

    /// Display name
    pub name: String,
}

/// A category with its subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category identifier
    #[serde(rename = "id_category")]
    pub id: CategoryId,

    /// Display name
    pub name: String,

    /// Child categories, in input order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subcategories: Vec<Category>,
}

impl Category {
    /// This category's id followed by the ids of every descendant.
    pub fn descendant_ids(&self) -> FxHashSet<CategoryId> {
        let mut ids = FxHashSet::default();
        let mut stack = vec![self];

        while let Some(category) = stack.pop() {
            ids.insert(category.id.clone());
            stack.extend(category.subcategories.iter());
        }

        ids
    }

    /// Find `id` in this category or below.
    pub fn find(&self, id: &CategoryId) -> Option<&Category> {
        if &self.id == id {
            return Some(self);
        }

        self.subcategories.iter().find_map(|child| child.find(id))
    }
}

/// Find `id` anywhere in a category forest.
pub fn find_category<'c>(forest: &'c [Category], id: &CategoryId) -> Option<&'c Category> {
    forest.iter().find_map(|root| root.find(id))
}

/// Assemble flat records into a forest.
///
/// Records are grouped by parent in one pass and the tree is assembled from
/// the roots in a second. A record whose parent is unknown becomes a root.
/// Records only reachable through a parent cycle are dropped. Siblings keep
/// their input order.
pub fn build_category_tree(records: &[CategoryRecord]) -> Vec<Category> {
    let known: FxHashSet<&CategoryId> = records.iter().map(|record| &record.id).collect();

    let mut roots: Vec<&CategoryRecord> = Vec::new();
    let mut children: FxHashMap<&CategoryId, Vec<&CategoryRecord>> = FxHashMap::default();

    for record in records {
        match &record.parent {
            Some(parent) if parent != &record.id && known.contains(parent) => {
                children.entry(parent).or_default().push(record);
            }
            _ => roots.push(record),
        }
    }

    let mut visited = FxHashSet::default();

    roots
        .into_iter()
        .filter_map(|root| assemble(root, &children, &mut visited))
        .collect()
}

fn assemble<'r>(
    record: &'r CategoryRecord,
    children: &FxHashMap<&CategoryId, Vec<&'r CategoryRecord>>,
    visited: &mut FxHashSet<&'r CategoryId>,
) -> Option<Category> {
    // Duplicate ids are only expanded once.
    if !visited.insert(&record.id) {
        return None;
    }

    let subcategories = children
        .get(&record.id)
        .into_iter()
        .flatten()
        .copied()
        .filter_map(|child| assemble(child, children, visited))
        .collect();

    Some(Category {
        id: record.id.clone(),
        name: record.name.clone(),
        subcategories,
    })
}
