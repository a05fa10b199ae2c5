use crate::model::TreemapNode;

/// Label every node with the last segment of its path. A trailing slash
/// (a file's own-statements leaf) is ignored, so that leaf shares the
/// file's name.
pub fn set_names_from_paths(node: &mut TreemapNode) {
    node.name = node
        .path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(node.path.as_str())
        .to_string();
    for child in &mut node.children {
        set_names_from_paths(child);
    }
}

/// Merge chains of single-child nodes into one node.
///
/// The surviving node takes the joined label (`a/b/c`), and the innermost
/// node's path, size, heat and children. After this pass no node has
/// exactly one child, so running it again changes nothing.
pub fn collapse_long_paths(node: &mut TreemapNode) {
    while node.children.len() == 1 {
        let Some(child) = node.children.pop() else {
            break;
        };
        node.name = if node.name.is_empty() {
            child.name
        } else {
            format!("{}/{}", node.name, child.name)
        };
        node.path = child.path;
        node.size = child.size.or(node.size);
        node.heat = child.heat.or(node.heat);
        node.children = child.children;
    }
    for child in &mut node.children {
        collapse_long_paths(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> TreemapNode {
        // github.com -> github.com/x -> github.com/x/y -> {a.go, z -> z/b.go}
        let mut b = TreemapNode::new("github.com/x/y/z/b.go");
        b.size = Some(2.0);
        b.heat = Some(1.0);
        let mut z = TreemapNode::new("github.com/x/y/z");
        z.children.push(b);
        let mut a = TreemapNode::new("github.com/x/y/a.go");
        a.size = Some(1.0);
        let mut y = TreemapNode::new("github.com/x/y");
        y.children = vec![a, z];
        let mut x = TreemapNode::new("github.com/x");
        x.children.push(y);
        let mut root = TreemapNode::new("github.com");
        root.children.push(x);
        set_names_from_paths(&mut root);
        root
    }

    #[test]
    fn names_are_last_segments() {
        let root = chain();
        assert_eq!(root.name, "github.com");
        assert_eq!(root.find("github.com/x/y/z/b.go").unwrap().name, "b.go");
    }

    #[test]
    fn collapses_single_child_chains() {
        let mut root = chain();
        collapse_long_paths(&mut root);

        assert_eq!(root.name, "github.com/x/y");
        assert_eq!(root.path, "github.com/x/y");
        assert_eq!(root.children.len(), 2);

        let leaf = &root.children[1];
        assert_eq!(leaf.name, "z/b.go");
        assert_eq!(leaf.path, "github.com/x/y/z/b.go");
        assert_eq!(leaf.size, Some(2.0));
        assert_eq!(leaf.heat, Some(1.0));
        assert!(leaf.is_leaf());
    }

    #[test]
    fn collapse_is_idempotent() {
        let mut once = chain();
        collapse_long_paths(&mut once);
        let mut twice = once.clone();
        collapse_long_paths(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn own_statements_leaf_takes_the_file_name() {
        let mut dir = TreemapNode::new("m/x.go");
        dir.children.push(TreemapNode::new("m/x.go/"));
        dir.children.push(TreemapNode::new("m/x.go/y.go"));
        set_names_from_paths(&mut dir);
        assert_eq!(dir.name, "x.go");
        assert_eq!(dir.children[0].name, "x.go");
        assert_eq!(dir.children[1].name, "y.go");
    }

    #[test]
    fn lone_leaf_is_untouched() {
        let mut leaf = TreemapNode::new("main.go");
        set_names_from_paths(&mut leaf);
        collapse_long_paths(&mut leaf);
        assert_eq!(leaf.name, "main.go");
    }
}
