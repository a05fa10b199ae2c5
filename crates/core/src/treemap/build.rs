use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::config::SizeMetric;
use crate::model::{CoverageProfile, TreemapNode};

/// Path of the node that parents several top-level segments.
pub const MULTI_ROOT_PATH: &str = ".";

/// Appended to a file's path for the leaf that holds its own statements
/// when the same path is also a directory.
pub const OWN_STATEMENTS_SUFFIX: &str = "/";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeBuildError {
    #[error("no profiles passed")]
    NoProfiles,
    #[error("duplicate node({0})")]
    DuplicateFile(String),
    #[error("no roots, possible cycle in graph")]
    NoRoots,
}

#[derive(Default)]
struct Entry {
    size: Option<f64>,
    heat: Option<f64>,
    children: BTreeSet<String>,
}

/// Builds a path-keyed treemap from per-file coverage profiles.
///
/// Every file becomes a leaf carrying its size (per [`SizeMetric`]) and its
/// covered-statement ratio as heat. Every slash-separated prefix becomes a
/// directory node without size or heat, left for the imputers.
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder {
    metric: SizeMetric,
}

impl TreeBuilder {
    pub fn new(metric: SizeMetric) -> Self {
        Self { metric }
    }

    pub fn build(&self, profiles: &[CoverageProfile]) -> Result<TreemapNode, TreeBuildError> {
        if profiles.is_empty() {
            return Err(TreeBuildError::NoProfiles);
        }

        let mut nodes: BTreeMap<String, Entry> = BTreeMap::new();
        let mut has_parent: BTreeMap<String, bool> = BTreeMap::new();
        let mut files: BTreeSet<&str> = BTreeSet::new();

        for profile in profiles {
            if !files.insert(&profile.file_name) {
                return Err(TreeBuildError::DuplicateFile(profile.file_name.clone()));
            }

            let size = match self.metric {
                SizeMetric::Statements => profile.num_statements(),
                SizeMetric::Lines => profile.num_lines(),
            };
            let leaf = nodes.entry(profile.file_name.clone()).or_default();
            leaf.size = Some(size as f64);
            leaf.heat = Some(profile.percent_covered());

            let mut parts = profile.file_name.split('/');
            let mut parent = parts.next().unwrap_or_default().to_string();
            has_parent.entry(parent.clone()).or_insert(false);
            for part in parts {
                let child = format!("{parent}/{part}");
                nodes
                    .entry(parent.clone())
                    .or_default()
                    .children
                    .insert(child.clone());
                has_parent.insert(child.clone(), true);
                parent = child;
            }
        }

        let roots: Vec<String> = has_parent
            .into_iter()
            .filter_map(|(path, has)| (!has).then_some(path))
            .collect();

        let root = match roots.len() {
            0 => return Err(TreeBuildError::NoRoots),
            1 => assemble(&roots[0], &mut nodes),
            _ => {
                let mut root = TreemapNode::new(MULTI_ROOT_PATH);
                root.children = roots.iter().map(|r| assemble(r, &mut nodes)).collect();
                root
            }
        };

        tracing::debug!(nodes = root.node_count(), root = %root.path, "built coverage tree");
        Ok(root)
    }
}

/// Turn the entry at `path` and everything below it into nodes.
///
/// A file whose path is also a directory prefix (Go allows a directory
/// named `x.go`) keeps its own statements in a leaf at `path/`, so they
/// still count toward the directory's size.
fn assemble(path: &str, nodes: &mut BTreeMap<String, Entry>) -> TreemapNode {
    let entry = nodes.remove(path).unwrap_or_default();
    let mut node = TreemapNode::new(path);
    node.children = entry
        .children
        .iter()
        .map(|child| assemble(child, nodes))
        .collect();
    if node.children.is_empty() {
        node.size = entry.size;
        node.heat = entry.heat;
    } else if entry.size.is_some() || entry.heat.is_some() {
        let mut own = TreemapNode::new(format!("{path}{OWN_STATEMENTS_SUFFIX}"));
        own.size = entry.size;
        own.heat = entry.heat;
        node.children.insert(0, own);
    }
    node
}
