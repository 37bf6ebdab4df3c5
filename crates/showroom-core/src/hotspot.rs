//! Hotspot catalog - per-view points of interest on the car model
//!
//! Each view mode has an ordered, authored list of hotspots. Lookups are pure:
//! the same view always yields the same slice in the same order, which is what
//! lets an index identify the active hotspot.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Point3;
use crate::view::ViewMode;

/// Vertical offset of the expanded detail panel above the marker
pub const DETAIL_PANEL_OFFSET: f32 = 0.15;
/// Vertical offset of the compact title chip above the marker
pub const TITLE_CHIP_OFFSET: f32 = 0.1;

/// Radius of the clickable marker sphere
pub const MARKER_RADIUS: f32 = 0.05;
/// Radius of the pulsing glow around the marker
pub const GLOW_RADIUS: f32 = 0.08;
/// Radius of the dot drawn at the surface anchor
pub const ANCHOR_RADIUS: f32 = 0.015;

/// Per-frame marker animation values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPulse {
    /// Uniform scale of the glow
    pub scale: f32,
    /// Glow opacity
    pub opacity: f32,
}

/// Pulse at `elapsed` seconds. Purely visual; never feeds interaction state.
pub fn marker_pulse(elapsed: f32) -> MarkerPulse {
    MarkerPulse {
        scale: 1.0 + (elapsed * 2.0).sin() * 0.1,
        opacity: 0.3 + (elapsed * 5.0).sin() * 0.2,
    }
}

/// Badge classification for a hotspot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotspotCategory {
    Lighting,
    Design,
    Wheels,
    Performance,
    Technology,
    Comfort,
}

impl HotspotCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            HotspotCategory::Lighting => "lighting",
            HotspotCategory::Design => "design",
            HotspotCategory::Wheels => "wheels",
            HotspotCategory::Performance => "performance",
            HotspotCategory::Technology => "technology",
            HotspotCategory::Comfort => "comfort",
        }
    }
}

impl fmt::Display for HotspotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One annotated point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    /// Where the marker floats
    pub position: Point3,
    /// Point on the model surface the connecting line reaches
    pub surface_anchor: Point3,
    pub title: String,
    pub description: String,
    pub category: HotspotCategory,
    /// Optional close-up image shown in the detail panel
    #[serde(default)]
    pub detail_image: Option<String>,
}

impl Hotspot {
    /// Length of the line from marker to surface anchor
    pub fn connector_length(&self) -> f32 {
        self.position.distance(self.surface_anchor)
    }

    /// Midpoint of the connecting line
    pub fn connector_midpoint(&self) -> Point3 {
        self.position.add(self.surface_anchor).scale(0.5)
    }
}

/// Which overlay a hotspot shows given the current active index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotspotOverlay {
    /// Expanded panel with description and category badge
    Detail,
    /// Compact title label
    TitleChip,
}

impl HotspotOverlay {
    /// Only the active hotspot expands; everything else stays a chip
    pub fn for_index(index: usize, active: Option<usize>) -> Self {
        if active == Some(index) {
            HotspotOverlay::Detail
        } else {
            HotspotOverlay::TitleChip
        }
    }

    /// Vertical offset above the marker position
    pub fn offset(&self) -> f32 {
        match self {
            HotspotOverlay::Detail => DETAIL_PANEL_OFFSET,
            HotspotOverlay::TitleChip => TITLE_CHIP_OFFSET,
        }
    }
}

/// Per-view hotspot tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotspotCatalog {
    #[serde(default)]
    pub exterior: Vec<Hotspot>,
    #[serde(default)]
    pub interior: Vec<Hotspot>,
    #[serde(default)]
    pub engine: Vec<Hotspot>,
}

impl HotspotCatalog {
    /// Ordered hotspots for a view mode; empty when none are authored
    pub fn get_hotspots(&self, view: ViewMode) -> &[Hotspot] {
        match view {
            ViewMode::Exterior => &self.exterior,
            ViewMode::Interior => &self.interior,
            ViewMode::Engine => &self.engine,
        }
    }

    /// Lookup by raw view name; unknown names yield an empty slice
    pub fn get_hotspots_by_name(&self, view: &str) -> &[Hotspot] {
        match ViewMode::parse(view) {
            Some(mode) => self.get_hotspots(mode),
            None => {
                tracing::warn!("Unknown view mode '{}', no hotspots", view);
                &[]
            }
        }
    }

    /// Total number of hotspots across all views
    pub fn len(&self) -> usize {
        self.exterior.len() + self.interior.len() + self.engine.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Authored hotspots shipped with the viewer
    pub fn builtin() -> Self {
        use HotspotCategory::*;

        Self {
            exterior: vec![
                hotspot(
                    [0.8, 0.52, 1.8],
                    [0.8, 0.5, 1.8],
                    "Matrix LED Headlights",
                    "Adaptive matrix LED headlights that reshape the beam automatically, extend night visibility and dim for oncoming traffic.",
                    Lighting,
                    Some("/images/headlight-detail.png"),
                ),
                hotspot(
                    [-0.8, 0.52, 1.8],
                    [-0.8, 0.5, 1.8],
                    "Signature Grille",
                    "The signature V-shaped grille gives the car its brand identity and channels air for better aerodynamics.",
                    Design,
                    Some("/images/grille-detail.png"),
                ),
                hotspot(
                    [1.2, 0.32, 0.0],
                    [1.2, 0.3, 0.0],
                    "19\" Alloy Wheels",
                    "Lightweight 19-inch aluminium alloy wheels with a sporty double five-spoke design that also improves brake cooling.",
                    Wheels,
                    Some("/images/wheel-detail.png"),
                ),
                hotspot(
                    [0.0, 0.72, -1.8],
                    [0.0, 0.7, -1.8],
                    "3D LED Taillights",
                    "LED taillight clusters with a 3D effect that make the car easier to recognise and warn following traffic earlier.",
                    Lighting,
                    Some("/images/taillight-detail.png"),
                ),
                hotspot(
                    [0.0, 1.02, 0.0],
                    [0.0, 1.0, 0.0],
                    "Panoramic Sunroof",
                    "A UV-filtering panoramic sunroof that floods the cabin with natural light.",
                    Design,
                    Some("/images/sunroof-detail.png"),
                ),
                hotspot(
                    [0.0, 0.32, 0.0],
                    [0.0, 0.3, 0.0],
                    "Adaptive Suspension",
                    "Adaptive suspension that adjusts damping to road conditions and drive mode, from a soft ride to a sporty feel.",
                    Performance,
                    Some("/images/suspension-detail.png"),
                ),
            ],
            interior: vec![
                hotspot(
                    [0.0, 0.82, 0.3],
                    [0.0, 0.8, 0.3],
                    "Central Touchscreen",
                    "A high-resolution 10.4-inch touchscreen with Apple CarPlay, Android Auto, voice and gesture control.",
                    Technology,
                    Some("/images/screen-detail.png"),
                ),
                hotspot(
                    [0.3, 0.62, 0.2],
                    [0.3, 0.6, 0.2],
                    "Multifunction Steering Wheel",
                    "A leather-wrapped steering wheel with integrated controls for media, calls and cruise control.",
                    Comfort,
                    Some("/images/steering-detail.png"),
                ),
                hotspot(
                    [-0.3, 0.42, 0.0],
                    [-0.3, 0.4, 0.0],
                    "Nappa Leather Seats",
                    "Nappa leather seats with 12-way power adjustment, memory, heating and ventilation.",
                    Comfort,
                    Some("/images/seat-detail.png"),
                ),
                hotspot(
                    [0.0, 1.02, -0.3],
                    [0.0, 1.0, -0.3],
                    "Panoramic Sunroof",
                    "A panoramic sunroof with an automatic shade that makes the cabin feel open and airy.",
                    Design,
                    Some("/images/sunroof-detail.png"),
                ),
                hotspot(
                    [0.0, 0.52, -1.0],
                    [0.0, 0.5, -1.0],
                    "Premium Audio",
                    "A 13-speaker premium surround sound system tuned for the cabin.",
                    Technology,
                    Some("/images/audio-detail.png"),
                ),
            ],
            engine: vec![
                hotspot(
                    [0.0, 0.42, 0.5],
                    [0.0, 0.4, 0.5],
                    "2.0L Turbo Engine",
                    "A 2.0L turbocharged engine producing 228 hp and 350 Nm with direct injection for strong, efficient performance.",
                    Performance,
                    Some("/images/engine-detail.png"),
                ),
                hotspot(
                    [0.5, 0.42, 0.3],
                    [0.5, 0.4, 0.3],
                    "High-Performance Cooling",
                    "A twin-radiator cooling system with electronically controlled fans that keeps the engine at its ideal temperature.",
                    Performance,
                    Some("/images/cooling-detail.png"),
                ),
                hotspot(
                    [-0.5, 0.42, 0.3],
                    [-0.5, 0.4, 0.3],
                    "Smart Battery",
                    "A high-capacity lithium-ion battery with fast charging and intelligent thermal management.",
                    Technology,
                    Some("/images/battery-detail.png"),
                ),
                hotspot(
                    [0.0, 0.42, -0.3],
                    [0.0, 0.4, -0.3],
                    "8-Speed Automatic",
                    "A smooth, quick-shifting 8-speed automatic gearbox with sport and eco modes.",
                    Performance,
                    Some("/images/transmission-detail.png"),
                ),
                hotspot(
                    [0.5, 0.02, 0.0],
                    [0.5, 0.0, 0.0],
                    "Exhaust Treatment",
                    "Euro 6 compliant exhaust after-treatment that cuts CO2 emissions.",
                    Technology,
                    Some("/images/exhaust-detail.png"),
                ),
            ],
        }
    }
}

fn hotspot(
    position: [f32; 3],
    surface_anchor: [f32; 3],
    title: &str,
    description: &str,
    category: HotspotCategory,
    detail_image: Option<&str>,
) -> Hotspot {
    Hotspot {
        position: position.into(),
        surface_anchor: surface_anchor.into(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        detail_image: detail_image.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_deterministic() {
        let catalog = HotspotCatalog::builtin();
        for mode in ViewMode::ALL {
            let first = catalog.get_hotspots(mode).to_vec();
            let second = catalog.get_hotspots(mode).to_vec();
            assert_eq!(first, second);
            assert!(!first.is_empty());
        }

        // Independent builds agree too
        assert_eq!(HotspotCatalog::builtin(), HotspotCatalog::builtin());
    }

    #[test]
    fn test_unknown_view_is_empty() {
        let catalog = HotspotCatalog::builtin();
        assert!(catalog.get_hotspots_by_name("trunk").is_empty());
        assert_eq!(
            catalog.get_hotspots_by_name("Engine"),
            catalog.get_hotspots(ViewMode::Engine)
        );
    }

    #[test]
    fn test_empty_view_table() {
        let catalog = HotspotCatalog {
            exterior: HotspotCatalog::builtin().exterior,
            ..Default::default()
        };
        assert!(catalog.get_hotspots(ViewMode::Interior).is_empty());
        assert_eq!(catalog.get_hotspots(ViewMode::Exterior).len(), 6);
    }

    #[test]
    fn test_markers_float_above_anchor() {
        let catalog = HotspotCatalog::builtin();
        for mode in ViewMode::ALL {
            for h in catalog.get_hotspots(mode) {
                assert!(h.position.y >= h.surface_anchor.y, "{}", h.title);
                assert!(h.connector_length() < 0.1, "{}", h.title);
            }
        }
    }

    #[test]
    fn test_overlay_policy() {
        assert_eq!(HotspotOverlay::for_index(2, Some(2)), HotspotOverlay::Detail);
        assert_eq!(HotspotOverlay::for_index(1, Some(2)), HotspotOverlay::TitleChip);
        assert_eq!(HotspotOverlay::for_index(0, None), HotspotOverlay::TitleChip);
        assert!(HotspotOverlay::Detail.offset() > HotspotOverlay::TitleChip.offset());
    }

    #[test]
    fn test_marker_pulse_bounds() {
        for step in 0..200 {
            let pulse = marker_pulse(step as f32 * 0.05);
            assert!((0.9..=1.1).contains(&pulse.scale));
            assert!((0.1..=0.5).contains(&pulse.opacity));
        }
        assert_eq!(marker_pulse(0.0).scale, 1.0);
    }

    #[test]
    fn test_catalog_from_toml() {
        let toml = r#"
[[interior]]
position = [0.0, 0.9, 0.1]
surface_anchor = [0.0, 0.85, 0.1]
title = "Head-up display"
description = "Projects speed onto the windscreen"
category = "technology"
"#;
        let catalog: HotspotCatalog = toml::from_str(toml).unwrap();
        assert!(catalog.exterior.is_empty());
        let interior = catalog.get_hotspots(ViewMode::Interior);
        assert_eq!(interior.len(), 1);
        assert_eq!(interior[0].category, HotspotCategory::Technology);
        assert_eq!(interior[0].position, Point3::new(0.0, 0.9, 0.1));
        assert!(interior[0].detail_image.is_none());
    }
}
