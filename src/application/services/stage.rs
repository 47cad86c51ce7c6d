//! Render surface holding one panel per named container
//!
//! The three render entry points are fire-and-forget: they never return an
//! error. Failures are logged and, for the tree diagrams, replaced by a
//! fixed error panel.

use std::collections::BTreeMap;
use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, error, instrument};

use crate::application::services::document::{DocumentService, Taxonomy};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    wrap_label, Arc as Span, CardRecord, CardState, DataSource, DrillDown, LabelPlacement,
    Transition, Viewport,
};
use crate::tree_traits::TreeNodeConvert;

/// Literal shown in place of a diagram whose data could not be loaded.
pub const DATA_CORRUPT_MESSAGE: &str = "SYSTEM ERROR: DATA CORRUPT";

/// Content of one container.
#[derive(Debug, Default)]
pub enum Panel {
    #[default]
    Empty,
    Orbit(OrbitPanel),
    Sunburst(Box<SunburstPanel>),
    Card(CardPanel),
    Error(String),
}

impl Panel {
    pub fn is_empty(&self) -> bool {
        matches!(self, Panel::Empty)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Panel::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

/// Text rendition of the radial tree: hub first, wrapped labels below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrbitPanel {
    pub rendered: String,
    pub nodes: usize,
    pub leaves: usize,
}

impl OrbitPanel {
    pub fn new(taxonomy: &Taxonomy, limit: usize) -> Self {
        let tree = taxonomy
            .hierarchy
            .to_tree_with(&|name: &str, depth| wrap_label(name, limit, depth == 0).lines().join(" / "));
        Self {
            rendered: tree.to_string(),
            nodes: taxonomy.hierarchy.len(),
            leaves: taxonomy.hierarchy.leaf_nodes().len(),
        }
    }
}

/// One visible ring segment of the sunburst.
#[derive(Debug, Clone, PartialEq)]
pub struct SunburstLine {
    pub node: Index,
    pub name: String,
    /// Escaped names below the hub joined by `/`, usable with [`SunburstPanel::click`]
    pub path: String,
    /// Ring counted from the centre; the first visible ring is 1
    pub ring: usize,
    pub arc: Span,
    pub label: Option<LabelPlacement>,
    pub colour: Option<String>,
    pub details: String,
    pub is_leaf: bool,
}

impl SunburstLine {
    pub fn start_deg(&self) -> f64 {
        self.arc.x0.to_degrees()
    }

    pub fn end_deg(&self) -> f64 {
        self.arc.x1.to_degrees()
    }
}

/// Interactive sunburst: drill-down focus plus spin and zoom.
#[derive(Debug)]
pub struct SunburstPanel {
    taxonomy: Taxonomy,
    drilldown: DrillDown,
    viewport: Viewport,
    settings: Arc<Settings>,
}

impl SunburstPanel {
    pub fn new(taxonomy: Taxonomy, settings: Arc<Settings>) -> ApplicationResult<Self> {
        let drilldown = DrillDown::new(&taxonomy.hierarchy, settings.visibility)?;
        let viewport = Viewport::new(settings.viewport);
        Ok(Self {
            taxonomy,
            drilldown,
            viewport,
            settings,
        })
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn drilldown(&self) -> &DrillDown {
        &self.drilldown
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Focus the node at `path` (names below the hub, `/`-separated).
    #[instrument(level = "debug", skip(self))]
    pub fn click(&mut self, path: &str) -> ApplicationResult<Transition> {
        let target = self.taxonomy.hierarchy.find_path(path)?;
        Ok(self.drilldown.zoom_in(&self.taxonomy.hierarchy, target)?)
    }

    /// Clicking the centre moves the focus one level up.
    #[instrument(level = "debug", skip(self))]
    pub fn click_center(&mut self) -> ApplicationResult<Transition> {
        Ok(self.drilldown.zoom_out(&self.taxonomy.hierarchy)?)
    }

    pub fn reset(&mut self) -> ApplicationResult<Transition> {
        self.viewport.reset_rotation();
        self.viewport.reset_zoom();
        Ok(self.drilldown.reset(&self.taxonomy.hierarchy)?)
    }

    /// Name shown in the centre circle: the focused node.
    pub fn center_text(&self) -> String {
        self.taxonomy
            .hierarchy
            .get_node(self.drilldown.focus())
            .map(|n| n.data.name.clone())
            .unwrap_or_else(|| self.settings.root_name.clone())
    }

    /// Breadcrumb title of the focused node, e.g. `"hub/A\n12"`.
    pub fn focus_title(&self) -> ApplicationResult<String> {
        Ok(self.taxonomy.hierarchy.title(self.drilldown.focus())?)
    }

    /// Segments drawn under the current focus, in pre-order.
    pub fn lines(&self) -> Vec<SunburstLine> {
        let hierarchy = &self.taxonomy.hierarchy;
        let rules = self.drilldown.rules();
        hierarchy
            .iter()
            .filter(|(_, node)| node.parent.is_some())
            .filter_map(|(idx, node)| {
                let arc = self.drilldown.current(idx)?;
                if !rules.arc_visible(&arc) {
                    return None;
                }
                let label = rules
                    .label_visible(&arc)
                    .then(|| self.viewport.label_placement(&arc, self.settings.sunburst.radius));
                let colour = hierarchy
                    .palette_slot(idx)
                    .ok()
                    .flatten()
                    .and_then(|slot| self.settings.sunburst.colour(slot))
                    .map(str::to_string);
                let (name, details) = hierarchy.tooltip(idx).ok()?;
                Some(SunburstLine {
                    node: idx,
                    name,
                    path: hierarchy.path_of(idx).ok()?,
                    ring: arc.y0.floor() as usize,
                    arc,
                    label,
                    colour,
                    details,
                    is_leaf: node.is_leaf(),
                })
            })
            .collect()
    }
}

/// Flip card with its interaction state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPanel {
    pub record: CardRecord,
    pub state: CardState,
}

impl CardPanel {
    pub fn new(record: CardRecord) -> Self {
        Self {
            record,
            state: CardState::default(),
        }
    }
}

/// Named containers, each holding at most one panel.
pub struct Stage {
    documents: DocumentService,
    settings: Arc<Settings>,
    containers: BTreeMap<String, Panel>,
}

impl Stage {
    pub fn new(documents: DocumentService, settings: Arc<Settings>) -> Self {
        Self {
            documents,
            settings,
            containers: BTreeMap::new(),
        }
    }

    /// Register an empty container; an existing one is cleared.
    pub fn add_container(&mut self, id: impl Into<String>) {
        self.containers.insert(id.into(), Panel::Empty);
    }

    pub fn has_container(&self, id: &str) -> bool {
        self.containers.contains_key(id)
    }

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.containers.get(id)
    }

    pub fn sunburst_mut(&mut self, id: &str) -> Option<&mut SunburstPanel> {
        match self.containers.get_mut(id) {
            Some(Panel::Sunburst(panel)) => Some(panel.as_mut()),
            _ => None,
        }
    }

    pub fn card_mut(&mut self, id: &str) -> Option<&mut CardPanel> {
        match self.containers.get_mut(id) {
            Some(Panel::Card(panel)) => Some(panel),
            _ => None,
        }
    }

    #[instrument(level = "debug", skip(self, source), fields(source = %source))]
    pub fn render_card(&mut self, source: &DataSource, container_id: &str) {
        self.render_with(container_id, "card", false, |documents, _| {
            Ok(Panel::Card(CardPanel::new(documents.load_card(source)?)))
        });
    }

    #[instrument(level = "debug", skip(self, source), fields(source = %source))]
    pub fn render_radar(&mut self, source: &DataSource, container_id: &str) {
        self.render_with(container_id, "orbit", true, |documents, settings| {
            let taxonomy = documents.load_taxonomy(source, &settings.root_name)?;
            Ok(Panel::Orbit(OrbitPanel::new(&taxonomy, settings.labels.limit)))
        });
    }

    #[instrument(level = "debug", skip(self, source), fields(source = %source))]
    pub fn render_sunburst(&mut self, source: &DataSource, container_id: &str) {
        self.render_with(container_id, "sunburst", true, |documents, settings| {
            let taxonomy = documents.load_taxonomy(source, &settings.root_name)?;
            let panel = SunburstPanel::new(taxonomy, Arc::clone(settings))?;
            Ok(Panel::Sunburst(Box::new(panel)))
        });
    }

    fn render_with<F>(&mut self, container_id: &str, kind: &str, show_error: bool, build: F)
    where
        F: FnOnce(&DocumentService, &Arc<Settings>) -> ApplicationResult<Panel>,
    {
        let Some(slot) = self.containers.get_mut(container_id) else {
            debug!("no container '{}', skipping {} render", container_id, kind);
            return;
        };
        *slot = Panel::Empty;

        match build(&self.documents, &self.settings) {
            Ok(panel) => {
                debug!("rendered {} into '{}'", kind, container_id);
                *slot = panel;
            }
            Err(e) => {
                error!("Error loading {} data: {}", kind, e);
                if show_error {
                    *slot = Panel::Error(DATA_CORRUPT_MESSAGE.to_string());
                }
            }
        }
    }
}
