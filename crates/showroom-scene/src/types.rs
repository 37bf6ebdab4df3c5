//! Shared resources: host configuration, the interaction engine and layout

use bevy::prelude::*;
use showroom_core::{
    ColorSelection, HotspotCatalog, InteractionEngine, LoadTracker, PartTable, QualityTier,
    SurfaceRules, ViewContext, ViewMode,
};
use std::ops::{Deref, DerefMut};

/// The car sits this far below the world origin so hotspots line up
pub const MODEL_OFFSET: Vec3 = Vec3::new(0.0, -0.5, 0.0);

/// Render layer for hotspot markers (drawn and picked by the overlay camera)
pub const MARKER_LAYER: usize = 1;

/// Configuration pushed down by the host page.
///
/// The host owns these values; the viewer only reads them and applies
/// changes when the resource changes.
#[derive(Debug, Clone, Resource)]
pub struct ViewerSettings {
    pub model_path: String,
    pub placeholder_path: String,
    pub active_view: ViewMode,
    pub color: ColorSelection,
    pub show_hotspots: bool,
    pub highlight_parts: bool,
    pub explode_amount: f32,
    pub quality: QualityTier,
    /// Lower quality automatically when the frame rate drops
    pub auto_quality: bool,
    /// Show the frame rate readout
    pub show_stats: bool,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            model_path: showroom_core::catalog::DEFAULT_PLACEHOLDER.to_string(),
            placeholder_path: showroom_core::catalog::DEFAULT_PLACEHOLDER.to_string(),
            active_view: ViewMode::Exterior,
            color: ColorSelection::default(),
            show_hotspots: true,
            highlight_parts: true,
            explode_amount: 0.0,
            quality: QualityTier::Medium,
            auto_quality: true,
            show_stats: false,
        }
    }
}

impl ViewerSettings {
    pub fn view_context(&self) -> ViewContext {
        ViewContext {
            view: self.active_view,
            color: self.color.clone(),
            show_hotspots: self.show_hotspots,
            highlight_parts: self.highlight_parts,
            explode_amount: self.explode_amount,
            quality: self.quality,
        }
    }
}

/// Authored data the engine is built from
#[derive(Debug, Clone, Resource)]
pub struct ViewerContent {
    pub hotspots: HotspotCatalog,
    pub parts: PartTable,
    pub surfaces: SurfaceRules,
}

impl Default for ViewerContent {
    fn default() -> Self {
        Self {
            hotspots: HotspotCatalog::builtin(),
            parts: PartTable::builtin(),
            surfaces: SurfaceRules::default(),
        }
    }
}

/// Interaction engine keyed by mesh entity
#[derive(Resource)]
pub struct ViewerEngine(pub InteractionEngine<Entity>);

impl ViewerEngine {
    pub fn new(content: &ViewerContent, settings: &ViewerSettings) -> Self {
        Self(
            InteractionEngine::new(
                content.hotspots.clone(),
                content.parts.clone(),
                settings.view_context(),
            )
            .with_surface_rules(content.surfaces.clone()),
        )
    }
}

impl Deref for ViewerEngine {
    type Target = InteractionEngine<Entity>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ViewerEngine {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Model load bookkeeping
#[derive(Resource)]
pub struct ModelLoad {
    pub tracker: LoadTracker,
}

/// UI layout state for responsive design
#[derive(Debug, Clone, Resource)]
pub struct UiLayout {
    pub is_mobile: bool,
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Default for UiLayout {
    fn default() -> Self {
        Self {
            is_mobile: false,
            screen_width: 1920.0,
            screen_height: 1080.0,
        }
    }
}

impl UiLayout {
    pub fn update_for_screen(&mut self, width: f32, height: f32) {
        self.screen_width = width;
        self.screen_height = height;
        // Consider mobile if width < 800 or in portrait orientation
        self.is_mobile = width < 800.0 || (height > width * 1.2);
    }

    /// Width of the part detail panel
    pub fn detail_panel_width(&self) -> f32 {
        if self.is_mobile {
            self.screen_width * 0.85
        } else {
            320.0
        }
    }

    pub fn ui_scale(&self) -> f32 {
        if self.is_mobile { 1.2 } else { 1.0 }
    }
}

pub fn to_vec3(p: showroom_core::Point3) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

pub fn to_point3(v: Vec3) -> showroom_core::Point3 {
    showroom_core::Point3::new(v.x, v.y, v.z)
}

pub fn to_color(c: showroom_core::Rgba) -> Color {
    Color::srgba(c.r, c.g, c.b, c.a)
}

pub fn from_color(c: Color) -> showroom_core::Rgba {
    let s = c.to_srgba();
    showroom_core::Rgba::rgba(s.red, s.green, s.blue, s.alpha)
}
