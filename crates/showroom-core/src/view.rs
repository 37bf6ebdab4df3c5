//! View context: view mode, paint selection, explode amount and quality tier.
//!
//! The host page owns these values and pushes them down into the viewer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Point3;

/// Lowest explode amount; restores authored positions
pub const EXPLODE_MIN: f32 = 0.0;
/// Highest explode amount exposed by the host slider
pub const EXPLODE_MAX: f32 = 3.0;
/// Slider granularity
pub const EXPLODE_STEP: f32 = 0.1;

/// Which part of the car the viewer is framing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Exterior,
    Interior,
    Engine,
}

impl ViewMode {
    /// All modes in navigation order
    pub const ALL: [ViewMode; 3] = [ViewMode::Exterior, ViewMode::Interior, ViewMode::Engine];

    /// Parse a host-supplied view name (case-insensitive).
    ///
    /// Returns `None` for anything outside the enum so callers can decide
    /// how to degrade instead of failing.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exterior" => Some(ViewMode::Exterior),
            "interior" => Some(ViewMode::Interior),
            "engine" => Some(ViewMode::Engine),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Exterior => "exterior",
            ViewMode::Interior => "interior",
            ViewMode::Engine => "engine",
        }
    }

    /// Human-readable label for buttons
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Exterior => "Exterior",
            ViewMode::Interior => "Interior",
            ViewMode::Engine => "Engine",
        }
    }

    fn index(&self) -> usize {
        match self {
            ViewMode::Exterior => 0,
            ViewMode::Interior => 1,
            ViewMode::Engine => 2,
        }
    }

    /// Next mode, wrapping around
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous mode, wrapping around
    pub fn prev(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Camera framing used when this mode becomes active
    pub fn camera_preset(&self) -> CameraPreset {
        match self {
            ViewMode::Exterior => CameraPreset {
                position: Point3::new(5.0, 2.0, 5.0),
                target: Point3::ZERO,
            },
            ViewMode::Interior => CameraPreset {
                position: Point3::new(0.0, 1.0, 0.0),
                target: Point3::new(0.0, 1.0, 1.0),
            },
            ViewMode::Engine => CameraPreset {
                position: Point3::new(0.0, 1.0, 3.0),
                target: Point3::ZERO,
            },
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Camera eye and look-at point for a view mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPreset {
    pub position: Point3,
    pub target: Point3,
}

impl CameraPreset {
    /// Distance from eye to target
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }
}

/// Rendering quality tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityTier {
    pub const ALL: [QualityTier; 3] = [QualityTier::Low, QualityTier::Medium, QualityTier::High];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(QualityTier::Low),
            "medium" => Some(QualityTier::Medium),
            "high" => Some(QualityTier::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityTier::Low => "Low",
            QualityTier::Medium => "Medium",
            QualityTier::High => "High",
        }
    }

    /// One step down, or `None` when already at the bottom
    pub fn downgrade(&self) -> Option<Self> {
        match self {
            QualityTier::High => Some(QualityTier::Medium),
            QualityTier::Medium => Some(QualityTier::Low),
            QualityTier::Low => None,
        }
    }

    /// Whether body paint gets the glossy clear-coat finish
    pub fn glossy_paint(&self) -> bool {
        *self != QualityTier::Low
    }

    /// Whether lights cast shadows
    pub fn shadows(&self) -> bool {
        *self != QualityTier::Low
    }

    /// Whether the extra shadow-casting spotlights are spawned
    pub fn extra_lights(&self) -> bool {
        *self == QualityTier::High
    }

    /// MSAA sample count; WebGPU only accepts 1 or 4
    pub fn msaa_samples(&self) -> u32 {
        match self {
            QualityTier::Low => 1,
            QualityTier::Medium | QualityTier::High => 4,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Linear-ish RGBA color in 0..1 (sRGB components, as authored)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "default_alpha")]
    pub a: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

        match digits.len() {
            3 => {
                let mut out = [0.0f32; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16)? as f32;
                    out[i] = (v * 17.0) / 255.0;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb(
                channel(digits.get(0..2)?)?,
                channel(digits.get(2..4)?)?,
                channel(digits.get(4..6)?)?,
            )),
            8 => Some(Self::rgba(
                channel(digits.get(0..2)?)?,
                channel(digits.get(2..4)?)?,
                channel(digits.get(4..6)?)?,
                channel(digits.get(6..8)?)?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`
    pub fn to_hex(&self) -> String {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }

    pub fn with_alpha(&self, a: f32) -> Self {
        Self { a, ..*self }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Active paint choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSelection {
    pub name: String,
    /// Hex string as authored (e.g. "#a51d2d")
    pub value: String,
}

impl ColorSelection {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parsed paint color; falls back to white for malformed hex
    pub fn color(&self) -> Rgba {
        Rgba::from_hex(&self.value).unwrap_or_else(|| {
            tracing::warn!("Invalid color value '{}' for '{}', using white", self.value, self.name);
            Rgba::WHITE
        })
    }
}

impl Default for ColorSelection {
    fn default() -> Self {
        Self::new("Crimson Red", "#a51d2d")
    }
}

/// Everything the host page pushes into the viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewContext {
    pub view: ViewMode,
    pub color: ColorSelection,
    pub show_hotspots: bool,
    pub highlight_parts: bool,
    pub explode_amount: f32,
    pub quality: QualityTier,
}

impl Default for ViewContext {
    fn default() -> Self {
        Self {
            view: ViewMode::default(),
            color: ColorSelection::default(),
            show_hotspots: true,
            highlight_parts: true,
            explode_amount: EXPLODE_MIN,
            quality: QualityTier::default(),
        }
    }
}

/// Clamp an explode amount into the supported range, mapping NaN to zero
pub fn clamp_explode(amount: f32) -> f32 {
    if amount.is_nan() {
        return EXPLODE_MIN;
    }
    amount.clamp(EXPLODE_MIN, EXPLODE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_mode_parse() {
        assert_eq!(ViewMode::parse("exterior"), Some(ViewMode::Exterior));
        assert_eq!(ViewMode::parse(" Interior "), Some(ViewMode::Interior));
        assert_eq!(ViewMode::parse("ENGINE"), Some(ViewMode::Engine));
        assert_eq!(ViewMode::parse("trunk"), None);
        assert_eq!(ViewMode::parse(""), None);
    }

    #[test]
    fn test_view_mode_cycle() {
        assert_eq!(ViewMode::Exterior.next(), ViewMode::Interior);
        assert_eq!(ViewMode::Engine.next(), ViewMode::Exterior);
        assert_eq!(ViewMode::Exterior.prev(), ViewMode::Engine);
        for mode in ViewMode::ALL {
            assert_eq!(mode.next().prev(), mode);
        }
    }

    #[test]
    fn test_quality_downgrade_chain() {
        assert_eq!(QualityTier::High.downgrade(), Some(QualityTier::Medium));
        assert_eq!(QualityTier::Medium.downgrade(), Some(QualityTier::Low));
        assert_eq!(QualityTier::Low.downgrade(), None);
        assert!(!QualityTier::Low.glossy_paint());
        assert!(QualityTier::Medium.glossy_paint());
    }

    #[test]
    fn test_msaa_samples_are_webgpu_compatible() {
        for tier in QualityTier::ALL {
            assert!(matches!(tier.msaa_samples(), 1 | 4), "{} uses {}", tier, tier.msaa_samples());
        }
        assert_eq!(QualityTier::Low.msaa_samples(), 1);
        assert!(QualityTier::High.extra_lights());
        assert!(!QualityTier::Medium.extra_lights());
    }

    #[test]
    fn test_hex_colors() {
        let red = Rgba::from_hex("#a51d2d").unwrap();
        assert!((red.r - 165.0 / 255.0).abs() < 1e-6);
        assert_eq!(red.to_hex(), "#a51d2d");

        let short = Rgba::from_hex("fff").unwrap();
        assert_eq!(short, Rgba::WHITE);

        let with_alpha = Rgba::from_hex("#00000080").unwrap();
        assert!((with_alpha.a - 128.0 / 255.0).abs() < 1e-6);

        assert!(Rgba::from_hex("#12345").is_none());
        assert!(Rgba::from_hex("#gggggg").is_none());
    }

    #[test]
    fn test_color_selection_fallback() {
        let bad = ColorSelection::new("Mystery", "not-a-color");
        assert_eq!(bad.color(), Rgba::WHITE);
    }

    #[test]
    fn test_clamp_explode() {
        assert_eq!(clamp_explode(-1.0), 0.0);
        assert_eq!(clamp_explode(1.5), 1.5);
        assert_eq!(clamp_explode(10.0), EXPLODE_MAX);
        assert_eq!(clamp_explode(f32::NAN), 0.0);
    }

    #[test]
    fn test_camera_presets() {
        let exterior = ViewMode::Exterior.camera_preset();
        assert_eq!(exterior.target, Point3::ZERO);
        assert!((exterior.distance() - (54.0f32).sqrt()).abs() < 1e-5);

        let interior = ViewMode::Interior.camera_preset();
        assert!((interior.distance() - 1.0).abs() < 1e-5);
    }
}
