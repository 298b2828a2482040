//! Hierarchy derivation: turns a general node/edge graph into a tree of
//! parent/children/depth entries for the tree and radial layouts.
//!
//! The derivation is a plain BFS with a first-reach-wins rule: the first
//! edge that reaches a node fixes its parent and depth, later edges into the
//! same node are ignored. This guarantees a tree even when the source edges
//! contain cycles or multiple parents, at the cost of an arbitrary (but
//! deterministic) parent choice for diamond-shaped input.

use crate::model::{GraphModel, NodeKind};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct HierarchyEntry {
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub depth: u32,
}

/// Derived tree over a [`GraphModel`]. Entries iterate in BFS discovery
/// order (root first), which downstream layouts rely on for determinism.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    root: String,
    entries: IndexMap<String, HierarchyEntry>,
    orphans: Vec<String>,
}

impl Hierarchy {
    /// Builds the hierarchy, or `None` for an empty model.
    ///
    /// Root policy: a node explicitly tagged `root` wins; else the unique
    /// in-degree-0 node; else the first node in source order. Ambiguous
    /// graphs therefore always produce a usable, deterministic layout.
    pub fn build(model: &GraphModel) -> Option<Self> {
        if model.is_empty() {
            return None;
        }
        let root = select_root(model);

        let mut adjacency: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
        for edge in model.edges() {
            adjacency
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }

        let mut entries: IndexMap<String, HierarchyEntry> = IndexMap::new();
        entries.insert(
            root.clone(),
            HierarchyEntry {
                parent: None,
                children: Vec::new(),
                depth: 0,
            },
        );

        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(root.clone());

        while let Some(id) = queue.pop_front() {
            let depth = match entries.get(&id) {
                Some(entry) => entry.depth,
                None => continue,
            };
            let Some(targets) = adjacency.get(id.as_str()) else {
                continue;
            };
            for &target in targets {
                // First reach wins; this also drops cycle-closing edges.
                if entries.contains_key(target) {
                    continue;
                }
                entries.insert(
                    target.to_string(),
                    HierarchyEntry {
                        parent: Some(id.clone()),
                        children: Vec::new(),
                        depth: depth + 1,
                    },
                );
                if let Some(parent) = entries.get_mut(&id) {
                    parent.children.push(target.to_string());
                }
                queue.push_back(target.to_string());
            }
        }

        let orphans: Vec<String> = model
            .nodes()
            .iter()
            .filter(|n| !entries.contains_key(&n.id))
            .map(|n| n.id.clone())
            .collect();

        Some(Self {
            root,
            entries,
            orphans,
        })
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.entries.get(id)?.parent.as_deref()
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.entries
            .get(id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn depth(&self, id: &str) -> Option<u32> {
        self.entries.get(id).map(|e| e.depth)
    }

    pub fn max_depth(&self) -> u32 {
        self.entries.values().map(|e| e.depth).max().unwrap_or(0)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Reachable node count (the root included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(id, entry)` in BFS discovery order, root first.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HierarchyEntry)> {
        self.entries.iter().map(|(id, e)| (id.as_str(), e))
    }

    /// Nodes unreachable from the root. They carry no position; callers
    /// decide whether to render them outside the main layout region.
    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    /// True when every node in the model is reachable from the root. The
    /// facade uses this to pick the tree layout over the force fallback.
    pub fn is_spanning(&self) -> bool {
        self.orphans.is_empty()
    }
}

fn select_root(model: &GraphModel) -> String {
    if let Some(tagged) = model.nodes().iter().find(|n| n.kind == NodeKind::Root) {
        return tagged.id.clone();
    }

    let mut in_degree: FxHashMap<&str, usize> = FxHashMap::default();
    for node in model.nodes() {
        in_degree.insert(node.id.as_str(), 0);
    }
    for edge in model.edges() {
        if let Some(count) = in_degree.get_mut(edge.target.as_str()) {
            *count += 1;
        }
    }
    let mut sources = model
        .nodes()
        .iter()
        .filter(|n| in_degree.get(n.id.as_str()).copied() == Some(0));
    if let (Some(only), None) = (sources.next(), sources.next()) {
        return only.id.clone();
    }

    // Zero or multiple candidates: fall back to source order.
    model.nodes()[0].id.clone()
}
