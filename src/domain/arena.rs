use std::f64::consts::TAU;
use std::fmt;

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::geometry::{Arc, FocusWindow};
use crate::domain::taxonomy::TreeNode;

/// Fallback tooltip text for nodes without details.
pub const DEFAULT_DETAILS: &str = "System Node";

/// Data payload for hierarchy nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    pub name: String,
    pub details: Option<String>,
    /// Distance from the hub, which sits at depth 0
    pub depth: usize,
    /// Levels in the subtree rooted here; a leaf has one level
    pub levels: usize,
    /// Leaf count of the subtree; drives the angular share
    pub value: usize,
    /// Partition arc under the hub focus
    pub arc: Arc,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Node in the arena-based hierarchy.
#[derive(Debug)]
pub struct HierarchyNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the hub
    pub parent: Option<Index>,
    /// Indices of child nodes in document order
    pub children: Vec<Index>,
}

impl HierarchyNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed hierarchy with partition arcs.
///
/// Built once from a normalized [`TreeNode`]. The hub spans the full circle
/// and depth `[0, 1]`; every child gets a share of its parent's angle
/// proportional to its leaf count and occupies depth `[d, d + 1]`.
#[derive(Debug)]
pub struct Hierarchy {
    arena: Arena<HierarchyNode>,
    root: Option<Index>,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl Hierarchy {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    #[instrument(level = "debug", skip(tree), fields(root = %tree.name))]
    pub fn from_tree(tree: &TreeNode) -> Self {
        let mut hierarchy = Self::new();
        hierarchy.insert_subtree(tree, None, 0);
        hierarchy.partition();
        debug!(
            "hierarchy: {} nodes, {} levels",
            hierarchy.len(),
            hierarchy.depth()
        );
        hierarchy
    }

    /// Inserts `tree` below `parent` and returns its index.
    fn insert_subtree(&mut self, tree: &TreeNode, parent: Option<Index>, depth: usize) -> Index {
        let data = NodeData {
            name: tree.name.clone(),
            details: tree.details.clone(),
            depth,
            levels: 1,
            value: 1,
            arc: Arc::default(),
        };
        let idx = self.insert_node(data, parent);

        let mut value = 0;
        let mut levels = 0;
        for child in &tree.children {
            let child_idx = self.insert_subtree(child, Some(idx), depth + 1);
            if let Some(c) = self.get_node(child_idx) {
                value += c.data.value;
                levels = levels.max(c.data.levels);
            }
        }

        if let Some(node) = self.arena.get_mut(idx) {
            if !tree.children.is_empty() {
                node.data.value = value;
                node.data.levels = 1 + levels;
            }
        }
        idx
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = HierarchyNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    fn partition(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        if let Some(node) = self.arena.get_mut(root) {
            node.data.arc = Arc::new(0.0, TAU, 0.0, 1.0);
        }

        let mut stack = vec![root];
        while let Some(idx) = stack.pop() {
            let Some(node) = self.arena.get(idx) else {
                continue;
            };
            let arc = node.data.arc;
            let step = if node.data.value > 0 {
                arc.angle_span() / node.data.value as f64
            } else {
                0.0
            };
            let children = node.children.clone();

            let mut x = arc.x0;
            for child in children {
                if let Some(c) = self.arena.get_mut(child) {
                    let x1 = x + c.data.value as f64 * step;
                    let d = c.data.depth as f64;
                    c.data.arc = Arc::new(x, x1, d, d + 1.0);
                    x = x1;
                    stack.push(child);
                }
            }
        }
    }

    pub fn get_node(&self, idx: Index) -> Option<&HierarchyNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of levels of the whole tree; the hub alone counts as one.
    pub fn depth(&self) -> usize {
        self.root
            .and_then(|r| self.get_node(r))
            .map(|n| n.data.levels)
            .unwrap_or(0)
    }

    /// Names of all leaves in document order.
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, n)| n.is_leaf())
            .map(|(_, n)| n.data.name.clone())
            .collect()
    }

    fn node(&self, idx: Index) -> DomainResult<&HierarchyNode> {
        self.arena.get(idx).ok_or(DomainError::UnknownNode)
    }

    pub fn parent(&self, idx: Index) -> DomainResult<Option<Index>> {
        Ok(self.node(idx)?.parent)
    }

    /// Chain from the hub down to `target`, both included.
    pub fn ancestor_chain(&self, target: Index) -> DomainResult<Vec<Index>> {
        let mut chain = vec![target];
        let mut current = self.node(target)?.parent;
        while let Some(idx) = current {
            chain.push(idx);
            current = self.node(idx)?.parent;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Resolve a `/`-separated path of names below the hub.
    ///
    /// `\/` stands for a `/` inside a name and `\\` for a backslash. A
    /// leading segment equal to the hub name is dropped only when the path
    /// does not resolve with it. An empty path resolves to the hub.
    pub fn find_path(&self, path: &str) -> DomainResult<Index> {
        let segments = split_path(path);
        let root_name = self
            .root
            .and_then(|r| self.get_node(r))
            .map(|n| n.data.name.as_str());
        self.resolve(&segments)
            .or_else(|| match segments.split_first() {
                Some((first, rest)) if Some(first.as_str()) == root_name => self.resolve(rest),
                _ => None,
            })
            .ok_or_else(|| DomainError::NodeNotFound(path.to_string()))
    }

    /// Resolve names below the hub, one per level.
    pub fn find_segments<S: AsRef<str>>(&self, segments: &[S]) -> DomainResult<Index> {
        self.resolve(segments).ok_or_else(|| {
            DomainError::NodeNotFound(segments.iter().map(|s| escape_segment(s.as_ref())).join("/"))
        })
    }

    fn resolve<S: AsRef<str>>(&self, segments: &[S]) -> Option<Index> {
        segments.iter().try_fold(self.root?, |idx, segment| {
            let segment: &str = segment.as_ref();
            self.get_node(idx)?
                .children
                .iter()
                .copied()
                .find(|c| self.get_node(*c).is_some_and(|n| n.data.name == segment))
        })
    }

    /// Window shown when `target` is focused.
    pub fn focus(&self, target: Index) -> DomainResult<FocusWindow> {
        Ok(FocusWindow::full(self.node(target)?.data.levels))
    }

    /// Arc of `node` as seen with `focus` filling the display.
    pub fn remap(&self, node: Index, focus: Index) -> DomainResult<Arc> {
        let f = &self.node(focus)?.data;
        Ok(self.node(node)?.data.arc.remap(&f.arc, f.depth as f64))
    }

    /// Names below the hub joined by `/`, with `/` and `\` inside names
    /// escaped; empty for the hub itself.
    ///
    /// The result resolves back to `idx` through [`Hierarchy::find_path`].
    pub fn path_of(&self, idx: Index) -> DomainResult<String> {
        Ok(self
            .ancestor_chain(idx)?
            .into_iter()
            .skip(1)
            .filter_map(|i| self.get_node(i))
            .map(|n| escape_segment(&n.data.name))
            .join("/"))
    }

    /// `hub/…/name` breadcrumb followed by the leaf count, e.g. `"A/B\n1,204"`.
    pub fn title(&self, idx: Index) -> DomainResult<String> {
        let names = self
            .ancestor_chain(idx)?
            .into_iter()
            .filter_map(|i| self.get_node(i))
            .map(|n| n.data.name.as_str())
            .join("/");
        Ok(format!("{}\n{}", names, group_thousands(self.node(idx)?.data.value)))
    }

    /// Tooltip heading and body for a node.
    pub fn tooltip(&self, idx: Index) -> DomainResult<(String, String)> {
        let data = &self.node(idx)?.data;
        Ok((
            data.name.clone(),
            data.details
                .clone()
                .unwrap_or_else(|| DEFAULT_DETAILS.to_string()),
        ))
    }

    /// Position of the node's top-level category among the hub's children.
    ///
    /// Used to cycle through a colour palette; None for the hub itself.
    pub fn palette_slot(&self, idx: Index) -> DomainResult<Option<usize>> {
        let chain = self.ancestor_chain(idx)?;
        let (Some(&root), Some(&top)) = (chain.first(), chain.get(1)) else {
            return Ok(None);
        };
        Ok(self.node(root)?.children.iter().position(|c| *c == top))
    }
}

fn escape_segment(name: &str) -> String {
    name.replace('\\', "\\\\").replace('/', "\\/")
}

/// Split on unescaped `/`; segments are trimmed and empty ones dropped.
fn split_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(next @ ('/' | '\\')) => current.push(next),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            '/' => segments.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    segments.push(current);
    segments
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Pre-order traversal in document order.
pub struct TreeIterator<'a> {
    hierarchy: &'a Hierarchy,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(hierarchy: &'a Hierarchy) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = hierarchy.root() {
            stack.push(root);
        }
        Self { hierarchy, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a HierarchyNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.hierarchy.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current_idx, node))
    }
}
