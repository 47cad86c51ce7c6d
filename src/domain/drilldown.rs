//! Drill-down state for the sunburst
//!
//! The presentation layer owns a [`DrillDown`] per diagram. Every focus change
//! returns a [`Transition`] describing where each arc starts and ends, and
//! whether it has to be animated at all.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::Hierarchy;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::geometry::{Arc, FocusWindow, VisibilityRules};

/// Start and end state of one arc across a focus change.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTransition {
    pub node: Index,
    pub from: Arc,
    pub to: Arc,
    /// Arc is drawn once the transition completes
    pub visible: bool,
    /// Label is drawn once the transition completes
    pub label_visible: bool,
    /// Arc was or will be visible, so it takes part in the animation
    pub animate: bool,
    pub animate_label: bool,
}

/// Result of a focus change.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: Index,
    pub to: Index,
    pub window: FocusWindow,
    /// One entry per node except the hub, in pre-order
    pub nodes: Vec<NodeTransition>,
}

impl Transition {
    pub fn visible(&self) -> impl Iterator<Item = &NodeTransition> {
        self.nodes.iter().filter(|n| n.visible)
    }

    pub fn animated(&self) -> impl Iterator<Item = &NodeTransition> {
        self.nodes.iter().filter(|n| n.animate)
    }
}

/// Current focus and the arc every node is currently drawn with.
#[derive(Debug, Clone)]
pub struct DrillDown {
    focus: Index,
    current: HashMap<Index, Arc>,
    rules: VisibilityRules,
}

impl DrillDown {
    /// Start focused on the hub with every node at its partition arc.
    pub fn new(hierarchy: &Hierarchy, rules: VisibilityRules) -> DomainResult<Self> {
        let focus = hierarchy.root().ok_or(DomainError::UnknownNode)?;
        let current = hierarchy
            .iter()
            .map(|(idx, node)| (idx, node.data.arc))
            .collect();
        Ok(Self {
            focus,
            current,
            rules,
        })
    }

    pub fn focus(&self) -> Index {
        self.focus
    }

    pub fn rules(&self) -> &VisibilityRules {
        &self.rules
    }

    /// Arc the node is currently drawn with.
    pub fn current(&self, node: Index) -> Option<Arc> {
        self.current.get(&node).copied()
    }

    pub fn window(&self, hierarchy: &Hierarchy) -> DomainResult<FocusWindow> {
        hierarchy.focus(self.focus)
    }

    /// Hub-to-focus chain for breadcrumbs.
    pub fn breadcrumb(&self, hierarchy: &Hierarchy) -> DomainResult<Vec<Index>> {
        hierarchy.ancestor_chain(self.focus)
    }

    /// Focus on `target`, stretching its span to the full circle.
    #[instrument(level = "debug", skip(self, hierarchy))]
    pub fn zoom_in(&mut self, hierarchy: &Hierarchy, target: Index) -> DomainResult<Transition> {
        self.transition_to(hierarchy, target)
    }

    /// Step back to the enclosing ancestor; stays on the hub once there.
    #[instrument(level = "debug", skip(self, hierarchy))]
    pub fn zoom_out(&mut self, hierarchy: &Hierarchy) -> DomainResult<Transition> {
        let target = match hierarchy.parent(self.focus)? {
            Some(parent) => parent,
            None => self.focus,
        };
        self.transition_to(hierarchy, target)
    }

    pub fn reset(&mut self, hierarchy: &Hierarchy) -> DomainResult<Transition> {
        let root = hierarchy.root().ok_or(DomainError::UnknownNode)?;
        self.transition_to(hierarchy, root)
    }

    fn transition_to(&mut self, hierarchy: &Hierarchy, target: Index) -> DomainResult<Transition> {
        let window = hierarchy.focus(target)?;
        let focus = &hierarchy
            .get_node(target)
            .ok_or(DomainError::UnknownNode)?
            .data;
        let root = hierarchy.root();

        let mut nodes = Vec::with_capacity(hierarchy.len());
        for (idx, node) in hierarchy.iter() {
            let to = node.data.arc.remap(&focus.arc, focus.depth as f64);
            let from = self.current.insert(idx, to).unwrap_or(node.data.arc);
            if Some(idx) == root {
                continue;
            }

            let visible = self.rules.arc_visible(&to);
            let label_visible = self.rules.label_visible(&to);
            nodes.push(NodeTransition {
                node: idx,
                from,
                to,
                visible,
                label_visible,
                animate: visible || self.rules.arc_visible(&from),
                animate_label: label_visible || self.rules.label_visible(&from),
            });
        }

        let from = std::mem::replace(&mut self.focus, target);
        debug!(
            "focus change: {} arcs visible, {} animated",
            nodes.iter().filter(|n| n.visible).count(),
            nodes.iter().filter(|n| n.animate).count()
        );
        Ok(Transition {
            from,
            to: target,
            window,
            nodes,
        })
    }
}
