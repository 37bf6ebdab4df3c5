//! Layered surface looks for mesh nodes.
//!
//! Every node keeps the look it was loaded with plus a committed look
//! (paint and surface finish). Selection and hover are transient layers
//! evaluated on top of the committed look, so dropping either one always
//! lands back on the committed state instead of the authored one.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::view::{QualityTier, Rgba};

/// Emissive tint applied while the pointer is over a part
pub const HOVER_EMISSIVE: Rgba = Rgba::rgb(0.2, 0.2, 0.2);
pub const HOVER_EMISSIVE_INTENSITY: f32 = 0.5;
/// Emissive tint applied to every mesh of the selected part
pub const SELECTION_EMISSIVE: Rgba = Rgba::rgb(0.937, 0.267, 0.267);
pub const SELECTION_EMISSIVE_INTENSITY: f32 = 0.6;
/// Warm glow given to lamp surfaces
pub const LAMP_EMISSIVE: Rgba = Rgba::rgb(1.0, 1.0, 0.933);
pub const LAMP_EMISSIVE_INTENSITY: f32 = 2.0;
/// Opacity of glass surfaces
pub const GLASS_OPACITY: f32 = 0.3;

/// Surface class derived from a node name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Painted bodywork; takes the selected color
    Body,
    Lamp,
    Wheel,
    Glass,
    #[default]
    Other,
}

/// Name fragments used to classify surfaces (case-insensitive, first match wins)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceRules {
    #[serde(default = "default_body")]
    pub body: Vec<String>,
    #[serde(default = "default_lamp")]
    pub lamp: Vec<String>,
    #[serde(default = "default_wheel")]
    pub wheel: Vec<String>,
    #[serde(default = "default_glass")]
    pub glass: Vec<String>,
}

fn default_body() -> Vec<String> {
    vec!["body".to_string(), "exterior".to_string()]
}

fn default_lamp() -> Vec<String> {
    vec!["light".to_string(), "lamp".to_string()]
}

fn default_wheel() -> Vec<String> {
    vec!["wheel".to_string(), "rim".to_string()]
}

fn default_glass() -> Vec<String> {
    vec!["glass".to_string(), "window".to_string()]
}

impl Default for SurfaceRules {
    fn default() -> Self {
        Self {
            body: default_body(),
            lamp: default_lamp(),
            wheel: default_wheel(),
            glass: default_glass(),
        }
    }
}

impl SurfaceRules {
    pub fn classify(&self, node_name: &str) -> SurfaceKind {
        let lower = node_name.to_lowercase();
        let hit = |fragments: &[String]| {
            fragments
                .iter()
                .any(|f| !f.is_empty() && lower.contains(&f.to_lowercase()))
        };

        if hit(&self.body) {
            SurfaceKind::Body
        } else if hit(&self.lamp) {
            SurfaceKind::Lamp
        } else if hit(&self.wheel) {
            SurfaceKind::Wheel
        } else if hit(&self.glass) {
            SurfaceKind::Glass
        } else {
            SurfaceKind::Other
        }
    }
}

/// Engine-agnostic material parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLook {
    pub base_color: Rgba,
    pub emissive: Rgba,
    pub emissive_intensity: f32,
    pub metallic: f32,
    pub roughness: f32,
    /// Rendered with alpha blending
    pub transparent: bool,
}

impl Default for SurfaceLook {
    fn default() -> Self {
        Self {
            base_color: Rgba::WHITE,
            emissive: Rgba::BLACK,
            emissive_intensity: 0.0,
            metallic: 0.0,
            roughness: 0.5,
            transparent: false,
        }
    }
}

impl SurfaceLook {
    /// Committed look for a surface class under the current paint and quality
    pub fn finished(&self, kind: SurfaceKind, paint: Rgba, quality: QualityTier) -> Self {
        let mut look = *self;
        match kind {
            SurfaceKind::Body => {
                look.base_color = paint.with_alpha(self.base_color.a);
                if quality.glossy_paint() {
                    look.metallic = 0.8;
                    look.roughness = 0.2;
                }
            }
            SurfaceKind::Lamp => {
                look.emissive = LAMP_EMISSIVE;
                look.emissive_intensity = LAMP_EMISSIVE_INTENSITY;
            }
            SurfaceKind::Wheel => {
                look.metallic = 0.9;
                look.roughness = 0.1;
            }
            SurfaceKind::Glass => {
                look.base_color = look.base_color.with_alpha(GLASS_OPACITY);
                look.transparent = true;
                look.metallic = 0.9;
                look.roughness = 0.0;
            }
            SurfaceKind::Other => {}
        }
        look
    }

    fn with_emissive(&self, color: Rgba, intensity: f32) -> Self {
        Self {
            emissive: color,
            emissive_intensity: intensity,
            ..*self
        }
    }
}

#[derive(Debug, Clone)]
struct NodeLook {
    kind: SurfaceKind,
    authored: SurfaceLook,
    committed: SurfaceLook,
    selected: bool,
    hovered: bool,
}

impl NodeLook {
    fn effective(&self) -> SurfaceLook {
        let mut look = self.committed;
        if self.selected {
            look = look.with_emissive(SELECTION_EMISSIVE, SELECTION_EMISSIVE_INTENSITY);
        }
        if self.hovered {
            look = look.with_emissive(HOVER_EMISSIVE, HOVER_EMISSIVE_INTENSITY);
        }
        look
    }
}

/// Per-node material state for one loaded asset
#[derive(Debug, Clone)]
pub struct MaterialLayers<N> {
    nodes: HashMap<N, NodeLook>,
    dirty: HashSet<N>,
    paint: Rgba,
    quality: QualityTier,
}

impl<N: Copy + Eq + Hash> MaterialLayers<N> {
    pub fn new(paint: Rgba, quality: QualityTier) -> Self {
        Self {
            nodes: HashMap::new(),
            dirty: HashSet::new(),
            paint,
            quality,
        }
    }

    /// Register a node with the look it was loaded with
    pub fn insert(&mut self, node: N, kind: SurfaceKind, authored: SurfaceLook) {
        let committed = authored.finished(kind, self.paint, self.quality);
        self.nodes.insert(
            node,
            NodeLook {
                kind,
                authored,
                committed,
                selected: false,
                hovered: false,
            },
        );
        self.dirty.insert(node);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn kind(&self, node: N) -> Option<SurfaceKind> {
        self.nodes.get(&node).map(|n| n.kind)
    }

    /// Look the node was loaded with
    pub fn authored(&self, node: N) -> Option<SurfaceLook> {
        self.nodes.get(&node).map(|n| n.authored)
    }

    /// Look without transient layers
    pub fn committed(&self, node: N) -> Option<SurfaceLook> {
        self.nodes.get(&node).map(|n| n.committed)
    }

    /// Look that should be on screen right now
    pub fn effective(&self, node: N) -> Option<SurfaceLook> {
        self.nodes.get(&node).map(NodeLook::effective)
    }

    pub fn paint(&self) -> Rgba {
        self.paint
    }

    /// Commit a new paint color; only body surfaces change
    pub fn set_paint(&mut self, paint: Rgba) {
        if self.paint == paint {
            return;
        }
        self.paint = paint;
        self.recommit(|kind| kind == SurfaceKind::Body);
    }

    /// Commit a new quality tier; affects body finish
    pub fn set_quality(&mut self, quality: QualityTier) {
        if self.quality == quality {
            return;
        }
        self.quality = quality;
        self.recommit(|kind| kind == SurfaceKind::Body);
    }

    fn recommit(&mut self, affected: impl Fn(SurfaceKind) -> bool) {
        for (node, look) in self.nodes.iter_mut() {
            if affected(look.kind) {
                look.committed = look.authored.finished(look.kind, self.paint, self.quality);
                self.dirty.insert(*node);
            }
        }
    }

    /// Toggle the selection layer on a set of nodes
    pub fn set_selected<'a>(&mut self, nodes: impl IntoIterator<Item = &'a N>, selected: bool)
    where
        N: 'a,
    {
        for node in nodes {
            if let Some(look) = self.nodes.get_mut(node) {
                if look.selected != selected {
                    look.selected = selected;
                    self.dirty.insert(*node);
                }
            }
        }
    }

    /// Toggle the hover layer on a set of nodes
    pub fn set_hovered<'a>(&mut self, nodes: impl IntoIterator<Item = &'a N>, hovered: bool)
    where
        N: 'a,
    {
        for node in nodes {
            if let Some(look) = self.nodes.get_mut(node) {
                if look.hovered != hovered {
                    look.hovered = hovered;
                    self.dirty.insert(*node);
                }
            }
        }
    }

    /// Drop every transient layer
    pub fn clear_transient(&mut self) {
        for (node, look) in self.nodes.iter_mut() {
            if look.selected || look.hovered {
                look.selected = false;
                look.hovered = false;
                self.dirty.insert(*node);
            }
        }
    }

    pub fn is_selected(&self, node: N) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.selected)
    }

    pub fn is_hovered(&self, node: N) -> bool {
        self.nodes.get(&node).is_some_and(|n| n.hovered)
    }

    /// Effective looks of nodes changed since the last call
    pub fn take_dirty(&mut self) -> Vec<(N, SurfaceLook)> {
        let dirty = std::mem::take(&mut self.dirty);
        dirty
            .into_iter()
            .filter_map(|node| self.effective(node).map(|look| (node, look)))
            .collect()
    }
}
