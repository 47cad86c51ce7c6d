//! Conversion of taxonomy trees into `termtree` trees for terminal display

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{Hierarchy, TreeNode};

pub trait TreeNodeConvert {
    /// Build a display tree, labelling every node with `label(name, depth)`.
    fn to_tree_with<F>(&self, label: &F) -> Tree<String>
    where
        F: Fn(&str, usize) -> String;

    fn to_tree_string(&self) -> Tree<String> {
        self.to_tree_with(&|name: &str, _| name.to_string())
    }
}

impl TreeNodeConvert for TreeNode {
    #[instrument(level = "trace", skip_all)]
    fn to_tree_with<F>(&self, label: &F) -> Tree<String>
    where
        F: Fn(&str, usize) -> String,
    {
        fn build<F: Fn(&str, usize) -> String>(node: &TreeNode, depth: usize, label: &F) -> Tree<String> {
            let leaves: Vec<_> = node
                .children
                .iter()
                .map(|c| build(c, depth + 1, label))
                .collect();
            Tree::new(label(&node.name, depth)).with_leaves(leaves)
        }
        build(self, 0, label)
    }
}

impl TreeNodeConvert for Hierarchy {
    #[instrument(level = "trace", skip_all)]
    fn to_tree_with<F>(&self, label: &F) -> Tree<String>
    where
        F: Fn(&str, usize) -> String,
    {
        fn build_tree<F: Fn(&str, usize) -> String>(
            hierarchy: &Hierarchy,
            node_idx: Index,
            parent_tree: &mut Tree<String>,
            label: &F,
        ) {
            if let Some(node) = hierarchy.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = hierarchy.get_node(child_idx) {
                        let mut child_tree = Tree::new(label(&child.data.name, child.data.depth));
                        build_tree(hierarchy, child_idx, &mut child_tree, label);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self.root().and_then(|idx| self.get_node(idx).map(|n| (idx, n))) {
            Some((root_idx, root)) => {
                let mut tree = Tree::new(label(&root.data.name, root.data.depth));
                build_tree(self, root_idx, &mut tree, label);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_tree_and_hierarchy_when_converting_then_same_rendering() {
        let tree = TreeNode::leaf("hub").with_children(vec![
            TreeNode::leaf("A").with_children(vec![TreeNode::leaf("A1")]),
            TreeNode::leaf("B"),
        ]);
        let hierarchy = Hierarchy::from_tree(&tree);

        let from_tree = tree.to_tree_string().to_string();
        let from_hierarchy = hierarchy.to_tree_string().to_string();

        assert_eq!(from_tree, from_hierarchy);
        assert!(from_tree.starts_with("hub\n"));
        assert!(from_tree.contains("A1"));
    }

    #[test]
    fn given_label_fn_when_converting_then_depth_passed() {
        let tree = TreeNode::leaf("hub").with_children(vec![TreeNode::leaf("A")]);

        let rendered = tree
            .to_tree_with(&|name: &str, depth| format!("{depth}:{name}"))
            .to_string();

        assert!(rendered.contains("0:hub"));
        assert!(rendered.contains("1:A"));
    }
}
