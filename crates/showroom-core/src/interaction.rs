//! Interaction engine - hover, selection and hotspot state for one viewer
//!
//! Pointer handlers are the only mutators of [`InteractionState`]. Frame
//! callbacks read the engine but never change it. Host-visible events are
//! queued as [`Notice`]s and drained by the rendering adapter.

use std::collections::HashSet;
use std::hash::Hash;

use crate::explode::ExplodeRig;
use crate::geometry::Point3;
use crate::hotspot::{Hotspot, HotspotCatalog};
use crate::material::{MaterialLayers, SurfaceLook, SurfaceRules};
use crate::part::{anonymous_node_name, CarPart, PartTable};
use crate::registry::{PartRegistry, SceneTraversal};
use crate::view::{clamp_explode, ColorSelection, QualityTier, ViewContext, ViewMode};

/// Currently selected part and the nodes carrying its highlight
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedPart<N: Eq + Hash> {
    pub part: CarPart,
    pub meshes: HashSet<N>,
}

/// Interaction state for the current view session
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState<N: Eq + Hash> {
    pub hovered_part_key: Option<String>,
    pub active_hotspot: Option<usize>,
    pub selected_part: Option<SelectedPart<N>>,
}

impl<N: Eq + Hash> Default for InteractionState<N> {
    fn default() -> Self {
        Self {
            hovered_part_key: None,
            active_hotspot: None,
            selected_part: None,
        }
    }
}

impl<N: Eq + Hash> InteractionState<N> {
    /// Nothing hovered, selected or active
    pub fn is_idle(&self) -> bool {
        self.hovered_part_key.is_none()
            && self.active_hotspot.is_none()
            && self.selected_part.is_none()
    }
}

/// Something under the pointer when a click lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit<N> {
    /// Hotspot marker by index into the current sequence
    Marker(usize),
    /// Mesh node of the car model
    Mesh(N),
}

/// What a click ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickResolution {
    Hotspot(usize),
    Part,
    Nothing,
}

/// Direction of an in-scene view change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStep {
    Previous,
    Next,
}

/// Host-visible events
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// A click on geometry resolved to a part
    PartInteraction {
        key: String,
        name: String,
        snippet: String,
        /// Resolved from a raw node name rather than the part table
        anonymous: bool,
    },
    HotspotToggled {
        index: usize,
        active: bool,
    },
    /// The viewer's own navigation asks the host for another view
    ViewModeRequested(ViewMode),
}

struct BoundScene<N> {
    registry: PartRegistry<N>,
    materials: MaterialLayers<N>,
    explode: ExplodeRig<N>,
}

/// Mediates pointer input into state transitions and notices
pub struct InteractionEngine<N: Eq + Hash> {
    context: ViewContext,
    catalog: HotspotCatalog,
    table: PartTable,
    rules: SurfaceRules,
    hotspots: Vec<Hotspot>,
    scene: Option<BoundScene<N>>,
    state: InteractionState<N>,
    notices: Vec<Notice>,
}

impl<N: Copy + Eq + Hash> InteractionEngine<N> {
    pub fn new(catalog: HotspotCatalog, table: PartTable, context: ViewContext) -> Self {
        let hotspots = catalog.get_hotspots(context.view).to_vec();
        Self {
            context,
            catalog,
            table,
            rules: SurfaceRules::default(),
            hotspots,
            scene: None,
            state: InteractionState::default(),
            notices: Vec::new(),
        }
    }

    pub fn with_surface_rules(mut self, rules: SurfaceRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn context(&self) -> &ViewContext {
        &self.context
    }

    pub fn state(&self) -> &InteractionState<N> {
        &self.state
    }

    pub fn part_table(&self) -> &PartTable {
        &self.table
    }

    /// Hotspots derived for the active view
    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    /// Hotspots to render; empty while hotspots are hidden
    pub fn visible_hotspots(&self) -> &[Hotspot] {
        if self.context.show_hotspots {
            &self.hotspots
        } else {
            &[]
        }
    }

    pub fn active_hotspot(&self) -> Option<(usize, &Hotspot)> {
        let index = self.state.active_hotspot?;
        self.hotspots.get(index).map(|h| (index, h))
    }

    pub fn registry(&self) -> Option<&PartRegistry<N>> {
        self.scene.as_ref().map(|s| &s.registry)
    }

    pub fn is_bound(&self) -> bool {
        self.scene.is_some()
    }

    /// Display name of the hovered part, if highlighting is on
    pub fn hover_label(&self) -> Option<String> {
        if !self.context.highlight_parts {
            return None;
        }
        let key = self.state.hovered_part_key.as_ref()?;
        match anonymous_node_name(key) {
            Some(node_name) => Some(node_name.to_string()),
            None => self.table.get(key).map(|p| p.name.clone()),
        }
    }

    // ---- scene lifecycle ----

    /// Bind a freshly loaded asset instance.
    ///
    /// Builds the part registry, captures authored looks and positions,
    /// and applies the current paint, quality and explode amount.
    pub fn bind_scene<S>(&mut self, scene: &S)
    where
        S: SceneTraversal<N> + ?Sized,
    {
        self.clear_pointer_state();

        let registry = PartRegistry::build_with_rules(scene, &self.table, &self.rules);
        let mut materials = MaterialLayers::new(self.context.color.color(), self.context.quality);
        let mut positions = Vec::new();

        scene.traverse(&mut |node| {
            materials.insert(node.id, registry.surface_kind(node.id), node.look);
            positions.push((node.id, node.translation));
        });

        let mut explode = ExplodeRig::capture(positions);
        explode.set_amount(self.context.explode_amount);

        tracing::info!(
            "Bound scene: {} mesh nodes, {} parts mapped",
            registry.node_count(),
            registry.mesh_map().len()
        );

        self.scene = Some(BoundScene {
            registry,
            materials,
            explode,
        });
    }

    /// Forget the bound asset (model switched or viewer torn down)
    pub fn unbind_scene(&mut self) {
        self.clear_pointer_state();
        self.scene = None;
    }

    // ---- host configuration ----

    /// Apply a full context from the host, changing only what differs
    pub fn apply_context(&mut self, context: &ViewContext) {
        self.set_view(context.view);
        self.set_color(context.color.clone());
        self.set_quality(context.quality);
        self.set_explode(context.explode_amount);
        self.set_show_hotspots(context.show_hotspots);
        self.set_highlight_parts(context.highlight_parts);
    }

    /// Switch view mode; resets the session to idle
    pub fn set_view(&mut self, view: ViewMode) {
        if self.context.view == view {
            return;
        }
        tracing::info!("View mode: {} -> {}", self.context.view, view);
        self.context.view = view;
        self.hotspots = self.catalog.get_hotspots(view).to_vec();
        self.clear_pointer_state();
        self.state.active_hotspot = None;
    }

    pub fn set_color(&mut self, color: ColorSelection) {
        if self.context.color == color {
            return;
        }
        tracing::debug!("Paint: {} ({})", color.name, color.value);
        if let Some(scene) = self.scene.as_mut() {
            scene.materials.set_paint(color.color());
        }
        self.context.color = color;
    }

    pub fn set_quality(&mut self, quality: QualityTier) {
        if self.context.quality == quality {
            return;
        }
        tracing::debug!("Quality: {} -> {}", self.context.quality, quality);
        self.context.quality = quality;
        if let Some(scene) = self.scene.as_mut() {
            scene.materials.set_quality(quality);
        }
    }

    pub fn set_explode(&mut self, amount: f32) {
        let amount = clamp_explode(amount);
        self.context.explode_amount = amount;
        if let Some(scene) = self.scene.as_mut() {
            scene.explode.set_amount(amount);
        }
    }

    /// Hiding hotspots also closes the active one
    pub fn set_show_hotspots(&mut self, show: bool) {
        if self.context.show_hotspots == show {
            return;
        }
        self.context.show_hotspots = show;
        if !show {
            if let Some(index) = self.state.active_hotspot.take() {
                self.notices.push(Notice::HotspotToggled {
                    index,
                    active: false,
                });
            }
        }
    }

    /// Hover is still tracked while off; only its highlight is hidden
    pub fn set_highlight_parts(&mut self, highlight: bool) {
        if self.context.highlight_parts == highlight {
            return;
        }
        self.context.highlight_parts = highlight;
        if let Some(key) = self.state.hovered_part_key.clone() {
            self.paint_hover(&key, highlight);
        }
    }

    // ---- pointer input ----

    /// Pointer entered a mesh node
    pub fn pointer_over(&mut self, node: N) {
        let Some(key) = self.registry().and_then(|r| r.hover_key(node)) else {
            return;
        };
        if self.state.hovered_part_key.as_deref() == Some(key.as_str()) {
            return;
        }
        if let Some(previous) = self.state.hovered_part_key.take() {
            self.paint_hover(&previous, false);
        }
        if self.context.highlight_parts {
            self.paint_hover(&key, true);
        }
        self.state.hovered_part_key = Some(key);
    }

    /// Pointer left a mesh node; ignored unless it owns the current hover
    pub fn pointer_out(&mut self, node: N) {
        let Some(key) = self.registry().and_then(|r| r.hover_key(node)) else {
            return;
        };
        if self.state.hovered_part_key.as_deref() != Some(key.as_str()) {
            return;
        }
        self.paint_hover(&key, false);
        self.state.hovered_part_key = None;
    }

    /// Click on mesh geometry of the bound scene; always yields a selection.
    ///
    /// Returns false when no scene is bound, since the node cannot be
    /// named against any registry.
    pub fn click_mesh(&mut self, node: N) -> bool {
        let Some(resolved) = self.registry().map(|registry| registry.resolve(node)) else {
            tracing::debug!("Ignoring mesh click with no bound scene");
            return false;
        };

        if let Some(previous) = self.state.selected_part.take() {
            if let Some(scene) = self.scene.as_mut() {
                scene.materials.set_selected(&previous.meshes, false);
            }
        }
        if let Some(scene) = self.scene.as_mut() {
            scene.materials.set_selected(&resolved.meshes, true);
        }

        tracing::debug!(
            "Selected part '{}' ({} meshes)",
            resolved.part.name,
            resolved.meshes.len()
        );

        self.notices.push(Notice::PartInteraction {
            key: resolved.part.key.clone(),
            name: resolved.part.name.clone(),
            snippet: resolved.part.snippet(),
            anonymous: resolved.part.is_anonymous(),
        });
        self.state.selected_part = Some(SelectedPart {
            part: resolved.part,
            meshes: resolved.meshes,
        });
        true
    }

    /// Click on a hotspot marker: toggle or replace the active index
    pub fn toggle_hotspot(&mut self, index: usize) {
        if !self.context.show_hotspots || index >= self.hotspots.len() {
            tracing::debug!("Ignoring click on unavailable hotspot {}", index);
            return;
        }

        match self.state.active_hotspot {
            Some(active) if active == index => {
                self.state.active_hotspot = None;
                self.notices.push(Notice::HotspotToggled {
                    index,
                    active: false,
                });
            }
            previous => {
                if let Some(previous) = previous {
                    self.notices.push(Notice::HotspotToggled {
                        index: previous,
                        active: false,
                    });
                }
                self.state.active_hotspot = Some(index);
                self.notices.push(Notice::HotspotToggled {
                    index,
                    active: true,
                });
            }
        }
    }

    /// Resolve every hit under the pointer for one click.
    ///
    /// A marker anywhere in the hit list wins over meshes, so a marker
    /// click never selects the part behind it. Hits are nearest first.
    pub fn resolve_click(&mut self, hits: &[Hit<N>]) -> ClickResolution {
        let marker = hits.iter().find_map(|hit| match hit {
            Hit::Marker(index) => Some(*index),
            Hit::Mesh(_) => None,
        });
        if let Some(index) = marker {
            self.toggle_hotspot(index);
            return ClickResolution::Hotspot(index);
        }

        let mesh = hits.iter().find_map(|hit| match hit {
            Hit::Mesh(node) => Some(*node),
            Hit::Marker(_) => None,
        });
        match mesh {
            Some(node) if self.click_mesh(node) => ClickResolution::Part,
            _ => ClickResolution::Nothing,
        }
    }

    /// Close the part detail panel
    pub fn close_part(&mut self) {
        if let Some(previous) = self.state.selected_part.take() {
            if let Some(scene) = self.scene.as_mut() {
                scene.materials.set_selected(&previous.meshes, false);
            }
        }
    }

    /// Ask the host for the previous/next view. State is left alone; the
    /// host applies the change back through [`Self::set_view`].
    pub fn request_view(&mut self, step: ViewStep) -> ViewMode {
        let next = match step {
            ViewStep::Previous => self.context.view.prev(),
            ViewStep::Next => self.context.view.next(),
        };
        self.notices.push(Notice::ViewModeRequested(next));
        next
    }

    // ---- outputs ----

    pub fn has_notices(&self) -> bool {
        !self.notices.is_empty()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Effective looks of nodes changed since the last call
    pub fn take_dirty_looks(&mut self) -> Vec<(N, SurfaceLook)> {
        self.scene
            .as_mut()
            .map(|s| s.materials.take_dirty())
            .unwrap_or_default()
    }

    /// Positions of nodes moved since the last call
    pub fn take_dirty_positions(&mut self) -> Vec<(N, Point3)> {
        self.scene
            .as_mut()
            .map(|s| s.explode.take_dirty())
            .unwrap_or_default()
    }

    pub fn effective_look(&self, node: N) -> Option<SurfaceLook> {
        self.scene.as_ref().and_then(|s| s.materials.effective(node))
    }

    pub fn node_position(&self, node: N) -> Option<Point3> {
        self.scene.as_ref().and_then(|s| s.explode.position(node))
    }

    fn paint_hover(&mut self, key: &str, on: bool) {
        if let Some(scene) = self.scene.as_mut() {
            let nodes = scene.registry.nodes_for_key(key);
            scene.materials.set_hovered(&nodes, on);
        }
    }

    fn clear_pointer_state(&mut self) {
        self.state.hovered_part_key = None;
        self.state.selected_part = None;
        if let Some(scene) = self.scene.as_mut() {
            scene.materials.clear_transient();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{SurfaceKind, HOVER_EMISSIVE, SELECTION_EMISSIVE};
    use crate::registry::MeshNode;
    use crate::view::Rgba;

    const BODY: u32 = 0;
    const WHEEL_FL: u32 = 1;
    const WHEEL_FR: u32 = 2;
    const ENGINE: u32 = 3;

    fn scene() -> Vec<MeshNode<u32>> {
        vec![
            MeshNode::new(BODY, "body_main").at(Point3::new(0.0, 0.5, 0.0)),
            MeshNode::new(WHEEL_FL, "wheel_fl").at(Point3::new(0.8, 0.3, 1.2)),
            MeshNode::new(WHEEL_FR, "wheel_fr").at(Point3::new(-0.8, 0.3, 1.2)),
            MeshNode::new(ENGINE, "engine_block").at(Point3::new(0.0, 0.4, 1.4)),
        ]
    }

    fn table() -> PartTable {
        PartTable::new(vec![
            CarPart::new("wheels", "Wheels", "Lightweight 19-inch alloy wheels")
                .with_identifiers(["wheel"])
                .with_spec("Size", "19 inch"),
            CarPart::new("engine", "Engine", "2.0L turbocharged engine")
                .with_identifiers(["engine"]),
        ])
    }

    fn engine() -> InteractionEngine<u32> {
        let mut engine =
            InteractionEngine::new(HotspotCatalog::builtin(), table(), ViewContext::default());
        engine.bind_scene(&scene());
        engine
    }

    fn hotspot_notices(notices: &[Notice]) -> Vec<(usize, bool)> {
        notices
            .iter()
            .filter_map(|n| match n {
                Notice::HotspotToggled { index, active } => Some((*index, *active)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_starts_idle() {
        let engine = engine();
        assert!(engine.state().is_idle());
        assert_eq!(engine.hotspots().len(), 6);
    }

    #[test]
    fn test_hotspot_exclusivity_and_toggle() {
        let mut engine = engine();

        engine.toggle_hotspot(1);
        engine.toggle_hotspot(3);
        assert_eq!(engine.state().active_hotspot, Some(3));
        assert_eq!(
            hotspot_notices(&engine.take_notices()),
            vec![(1, true), (1, false), (3, true)]
        );

        engine.toggle_hotspot(3);
        assert_eq!(engine.state().active_hotspot, None);

        engine.toggle_hotspot(0);
        engine.toggle_hotspot(0);
        assert_eq!(engine.state().active_hotspot, None);
    }

    #[test]
    fn test_out_of_range_hotspot_ignored() {
        let mut engine = engine();
        engine.toggle_hotspot(42);
        assert!(engine.state().active_hotspot.is_none());
        assert!(engine.take_notices().is_empty());
    }

    #[test]
    fn test_selection_replacement_clears_old_highlight() {
        let mut engine = engine();

        engine.click_mesh(WHEEL_FL);
        assert_eq!(engine.effective_look(WHEEL_FR).unwrap().emissive, SELECTION_EMISSIVE);

        engine.click_mesh(ENGINE);
        let selected = engine.state().selected_part.as_ref().unwrap();
        assert_eq!(selected.part.key, "engine");
        assert_eq!(selected.meshes, HashSet::from([ENGINE]));

        for node in [WHEEL_FL, WHEEL_FR] {
            assert_ne!(engine.effective_look(node).unwrap().emissive, SELECTION_EMISSIVE);
        }
        assert_eq!(engine.effective_look(ENGINE).unwrap().emissive, SELECTION_EMISSIVE);
    }

    #[test]
    fn test_hover_does_not_touch_selection() {
        let mut engine = engine();
        engine.click_mesh(ENGINE);
        engine.pointer_over(WHEEL_FL);

        assert_eq!(engine.state().hovered_part_key.as_deref(), Some("wheels"));
        assert_eq!(
            engine.state().selected_part.as_ref().unwrap().part.key,
            "engine"
        );
        // Whole part lights up, not only the node under the pointer
        assert_eq!(engine.effective_look(WHEEL_FR).unwrap().emissive, HOVER_EMISSIVE);

        engine.pointer_out(WHEEL_FL);
        assert!(engine.state().hovered_part_key.is_none());
        assert_eq!(
            engine.state().selected_part.as_ref().unwrap().part.key,
            "engine"
        );
    }

    #[test]
    fn test_stale_pointer_out_ignored() {
        let mut engine = engine();
        engine.pointer_over(ENGINE);
        engine.pointer_out(BODY);
        assert_eq!(engine.state().hovered_part_key.as_deref(), Some("engine"));
    }

    #[test]
    fn test_view_change_resets_everything() {
        let mut engine = engine();
        engine.click_mesh(WHEEL_FL);
        engine.pointer_over(ENGINE);
        engine.toggle_hotspot(2);
        assert!(!engine.state().is_idle());

        engine.set_view(ViewMode::Interior);
        assert!(engine.state().is_idle());
        assert_eq!(engine.hotspots(), HotspotCatalog::builtin().get_hotspots(ViewMode::Interior));
        for node in [WHEEL_FL, WHEEL_FR, ENGINE] {
            let look = engine.effective_look(node).unwrap();
            assert_ne!(look.emissive, SELECTION_EMISSIVE);
            assert_ne!(look.emissive, HOVER_EMISSIVE);
        }
    }

    #[test]
    fn test_same_view_keeps_state() {
        let mut engine = engine();
        engine.toggle_hotspot(2);
        engine.set_view(ViewMode::Exterior);
        assert_eq!(engine.state().active_hotspot, Some(2));
    }

    #[test]
    fn test_explode_round_trip() {
        let mut engine = engine();
        engine.take_dirty_positions();

        engine.set_explode(2.5);
        let moved = engine.take_dirty_positions();
        assert_eq!(moved.len(), 4);
        assert!(!engine.node_position(WHEEL_FL).unwrap().approx_eq(Point3::new(0.8, 0.3, 1.2)));

        engine.set_explode(0.0);
        for node in scene() {
            assert!(engine.node_position(node.id).unwrap().approx_eq(node.translation));
        }
    }

    #[test]
    fn test_color_then_hover_restores_color() {
        let mut engine = engine();
        let blue = ColorSelection::new("Ocean Blue", "#2a5298");
        engine.set_color(blue.clone());
        engine.pointer_over(BODY);
        engine.pointer_out(BODY);

        let look = engine.effective_look(BODY).unwrap();
        assert_eq!(look.base_color, Rgba::from_hex("#2a5298").unwrap());
        assert_eq!(engine.registry().unwrap().surface_kind(BODY), SurfaceKind::Body);
    }

    #[test]
    fn test_unmapped_click_reports_raw_name() {
        let mut engine = engine();
        engine.click_mesh(BODY);

        let notices = engine.take_notices();
        let Some(Notice::PartInteraction {
            name, anonymous, ..
        }) = notices.first()
        else {
            panic!("expected a part notice, got {:?}", notices);
        };
        assert_eq!(name, "body_main");
        assert!(*anonymous);

        let selected = engine.state().selected_part.as_ref().unwrap();
        assert_eq!(selected.part.name, "body_main");
        assert!(selected.part.specs.is_empty());
    }

    #[test]
    fn test_marker_beats_mesh() {
        let mut engine = engine();
        let result = engine.resolve_click(&[Hit::Mesh(ENGINE), Hit::Marker(4)]);

        assert_eq!(result, ClickResolution::Hotspot(4));
        assert_eq!(engine.state().active_hotspot, Some(4));
        assert!(engine.state().selected_part.is_none());
        assert!(engine
            .take_notices()
            .iter()
            .all(|n| !matches!(n, Notice::PartInteraction { .. })));

        assert_eq!(engine.resolve_click(&[Hit::Mesh(ENGINE)]), ClickResolution::Part);
        assert_eq!(engine.resolve_click(&[]), ClickResolution::Nothing);
    }

    #[test]
    fn test_hiding_hotspots_closes_active() {
        let mut engine = engine();
        engine.toggle_hotspot(0);
        engine.take_notices();

        engine.set_show_hotspots(false);
        assert!(engine.state().active_hotspot.is_none());
        assert!(engine.visible_hotspots().is_empty());
        assert_eq!(hotspot_notices(&engine.take_notices()), vec![(0, false)]);

        engine.toggle_hotspot(0);
        assert!(engine.state().active_hotspot.is_none());
    }

    #[test]
    fn test_request_view_leaves_state_to_host() {
        let mut engine = engine();
        engine.click_mesh(ENGINE);
        engine.take_notices();

        let next = engine.request_view(ViewStep::Next);
        assert_eq!(next, ViewMode::Interior);
        assert_eq!(engine.context().view, ViewMode::Exterior);
        assert!(engine.state().selected_part.is_some());
        assert_eq!(engine.take_notices(), vec![Notice::ViewModeRequested(ViewMode::Interior)]);

        assert_eq!(engine.request_view(ViewStep::Previous), ViewMode::Engine);
    }

    #[test]
    fn test_highlight_toggle_hides_hover_only() {
        let mut engine = engine();
        engine.set_highlight_parts(false);
        engine.pointer_over(ENGINE);

        assert_eq!(engine.state().hovered_part_key.as_deref(), Some("engine"));
        assert_ne!(engine.effective_look(ENGINE).unwrap().emissive, HOVER_EMISSIVE);
        assert!(engine.hover_label().is_none());

        engine.set_highlight_parts(true);
        assert_eq!(engine.effective_look(ENGINE).unwrap().emissive, HOVER_EMISSIVE);
        assert_eq!(engine.hover_label().as_deref(), Some("Engine"));
    }

    #[test]
    fn test_unowned_hover_label_is_node_name() {
        let mut engine = engine();
        engine.pointer_over(BODY);
        assert_eq!(engine.hover_label().as_deref(), Some("body_main"));
        assert!(engine.effective_look(BODY).unwrap().emissive_intensity > 0.0);

        engine.pointer_out(BODY);
        assert!(engine.hover_label().is_none());
    }

    #[test]
    fn test_close_part() {
        let mut engine = engine();
        engine.click_mesh(WHEEL_FR);
        engine.close_part();
        assert!(engine.state().selected_part.is_none());
        assert_ne!(engine.effective_look(WHEEL_FL).unwrap().emissive, SELECTION_EMISSIVE);
    }

    #[test]
    fn test_rebind_clears_selection() {
        let mut engine = engine();
        engine.click_mesh(ENGINE);
        engine.toggle_hotspot(1);

        engine.bind_scene(&scene());
        assert!(engine.state().selected_part.is_none());
        assert_eq!(engine.state().active_hotspot, Some(1));

        engine.unbind_scene();
        assert!(!engine.is_bound());
        engine.pointer_over(ENGINE);
        assert!(engine.state().hovered_part_key.is_none());
    }

    #[test]
    fn test_click_with_no_bound_scene_is_ignored() {
        let mut engine =
            InteractionEngine::new(HotspotCatalog::builtin(), table(), ViewContext::default());
        assert!(!engine.click_mesh(WHEEL_FL));
        assert_eq!(engine.resolve_click(&[Hit::Mesh(ENGINE)]), ClickResolution::Nothing);
        assert!(engine.state().selected_part.is_none());
        assert!(engine.take_notices().is_empty());

        // Still resolves once the new asset is bound
        engine.bind_scene(&scene());
        assert_eq!(engine.resolve_click(&[Hit::Mesh(WHEEL_FL)]), ClickResolution::Part);
        assert_eq!(engine.state().selected_part.as_ref().unwrap().part.key, "wheels");
    }

    #[test]
    fn test_snippet_in_notice() {
        let mut engine = InteractionEngine::new(
            HotspotCatalog::builtin(),
            PartTable::builtin(),
            ViewContext::default(),
        );
        engine.bind_scene(&vec![MeshNode::new(9u32, "Interior_Seats")]);
        engine.click_mesh(9);

        let notices = engine.take_notices();
        let Some(Notice::PartInteraction { snippet, name, .. }) = notices.first() else {
            panic!("expected a part notice");
        };
        assert_eq!(name, "Interior");
        assert!(snippet.ends_with("..."));
        assert_eq!(snippet.chars().count(), 63);
    }
}
