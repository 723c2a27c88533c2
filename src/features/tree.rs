//! Helpers for the nested trees returned by `/departments/tree/` and
//! `/permissions/tree/`.

/// A node with an id, a display label and nested children.
pub trait TreeNode: Sized {
    fn node_id(&self) -> u64;
    fn label(&self) -> String;
    fn children(&self) -> &[Self];
}

/// Depth-first, pre-order walk yielding `(depth, node)`.
pub fn flatten<T: TreeNode>(roots: &[T]) -> Vec<(usize, &T)> {
    fn walk<'a, T: TreeNode>(nodes: &'a [T], depth: usize, out: &mut Vec<(usize, &'a T)>) {
        for node in nodes {
            out.push((depth, node));
            walk(node.children(), depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(roots, 0, &mut out);
    out
}

/// Finds a node anywhere in the tree.
pub fn find<T: TreeNode>(roots: &[T], id: u64) -> Option<&T> {
    roots.iter().find_map(|node| {
        if node.node_id() == id {
            Some(node)
        } else {
            find(node.children(), id)
        }
    })
}

/// Ids of a node and all of its descendants, in pre-order.
pub fn subtree_ids<T: TreeNode>(roots: &[T], id: u64) -> Vec<u64> {
    find(roots, id)
        .map(|node| {
            let mut ids = vec![node.node_id()];
            ids.extend(flatten(node.children()).into_iter().map(|(_, n)| n.node_id()));
            ids
        })
        .unwrap_or_default()
}

/// Renders the tree as indented lines.
pub fn render<T: TreeNode>(roots: &[T]) -> String {
    flatten(roots)
        .into_iter()
        .map(|(depth, node)| format!("{}{}", "  ".repeat(depth), node.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Node {
        id: u64,
        children: Vec<Node>,
    }

    impl TreeNode for Node {
        fn node_id(&self) -> u64 {
            self.id
        }

        fn label(&self) -> String {
            format!("node-{}", self.id)
        }

        fn children(&self) -> &[Self] {
            &self.children
        }
    }

    fn leaf(id: u64) -> Node {
        Node {
            id,
            children: Vec::new(),
        }
    }

    fn sample() -> Vec<Node> {
        vec![
            Node {
                id: 1,
                children: vec![
                    leaf(2),
                    Node {
                        id: 3,
                        children: vec![leaf(4)],
                    },
                ],
            },
            leaf(5),
        ]
    }

    #[test]
    fn flatten_is_pre_order_with_depth() {
        let roots = sample();
        let flat: Vec<(usize, u64)> = flatten(&roots)
            .into_iter()
            .map(|(depth, node)| (depth, node.id))
            .collect();
        assert_eq!(flat, vec![(0, 1), (1, 2), (1, 3), (2, 4), (0, 5)]);
    }

    #[test]
    fn find_searches_nested_levels() {
        let roots = sample();
        assert_eq!(find(&roots, 4).map(|n| n.id), Some(4));
        assert!(find(&roots, 9).is_none());
    }

    #[test]
    fn subtree_ids_include_descendants() {
        let roots = sample();
        assert_eq!(subtree_ids(&roots, 1), vec![1, 2, 3, 4]);
        assert_eq!(subtree_ids(&roots, 5), vec![5]);
        assert!(subtree_ids(&roots, 42).is_empty());
    }

    #[test]
    fn render_indents_by_depth() {
        let roots = sample();
        assert_eq!(
            render(&roots),
            "node-1\n  node-2\n  node-3\n    node-4\nnode-5"
        );
    }
}
