use serde::{Deserialize, Serialize};

/// One path segment of the coverage treemap.
///
/// Directories and files share this type: a node without children is a
/// file (or an empty directory). `size` and `heat` are `None` until a
/// profile provides them or an imputer fills them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreemapNode {
    /// Full slash-separated path; unique within a tree.
    pub path: String,
    /// Display label. Empty until names are set from paths.
    pub name: String,
    /// Ordered by path.
    pub children: Vec<TreemapNode>,
    pub size: Option<f64>,
    /// Coverage ratio in `0.0..=1.0`.
    pub heat: Option<f64>,
}

impl TreemapNode {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: String::new(),
            children: Vec::new(),
            size: None,
            heat: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn size_or_zero(&self) -> f64 {
        self.size.unwrap_or(0.0)
    }

    /// Total number of nodes, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// All leaves in depth-first order.
    pub fn leaves(&self) -> Vec<&TreemapNode> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a TreemapNode>) {
        if self.is_leaf() {
            out.push(self);
        }
        for child in &self.children {
            child.collect_leaves(out);
        }
    }

    /// Pre-order visit of every node.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a TreemapNode)) {
        f(self);
        for child in &self.children {
            child.walk(f);
        }
    }

    pub fn find(&self, path: &str) -> Option<&TreemapNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }
}
