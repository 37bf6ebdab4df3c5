//! Showroom catalog - car models, paint options and authored overrides
//!
//! The catalog is a TOML (or JSON) document. Everything is optional: a
//! catalog that only lists models keeps the built-in hotspots and parts.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::hotspot::HotspotCatalog;
use crate::material::SurfaceRules;
use crate::part::{anonymous_node_name, CarPart, PartTable};
use crate::view::{ColorSelection, Rgba};

/// Asset shown when the requested model cannot be loaded
pub const DEFAULT_PLACEHOLDER: &str = "/assets/3d/duck.glb";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize catalog: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Failed to parse catalog JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Invalid catalog: {0}")]
    ValidationError(String),
    #[error("Unknown car model: {0}")]
    UnknownModel(String),
}

/// One car model on offer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarModel {
    /// URL slug (e.g. "vf8")
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    /// glTF/GLB asset path
    pub model_path: String,
    /// Paint options, first is the default
    #[serde(default)]
    pub colors: Vec<ColorSelection>,
}

impl CarModel {
    pub fn default_color(&self) -> ColorSelection {
        self.colors.first().cloned().unwrap_or_default()
    }

    /// Paint option by name (case-insensitive) or hex value
    pub fn find_color(&self, name_or_value: &str) -> Option<&ColorSelection> {
        self.colors.iter().find(|c| {
            c.name.eq_ignore_ascii_case(name_or_value) || c.value.eq_ignore_ascii_case(name_or_value)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowroomCatalog {
    #[serde(default = "default_version")]
    pub version: String,
    /// Fallback asset for failed loads
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default)]
    pub model: Vec<CarModel>,
    /// Replaces the built-in hotspot tables when present
    #[serde(default)]
    pub hotspots: Option<HotspotCatalog>,
    /// Replaces the built-in part table when present
    #[serde(default)]
    pub part: Option<Vec<CarPart>>,
    #[serde(default)]
    pub surfaces: SurfaceRules,
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

impl Default for ShowroomCatalog {
    fn default() -> Self {
        Self {
            version: default_version(),
            placeholder: default_placeholder(),
            model: Vec::new(),
            hotspots: None,
            part: None,
            surfaces: SurfaceRules::default(),
        }
    }
}

impl ShowroomCatalog {
    /// Load catalog from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load catalog from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let catalog: ShowroomCatalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load catalog from a JSON string (fetched catalogs on the web)
    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let catalog: ShowroomCatalog = serde_json::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check ids are unique and colors parse
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut ids = HashSet::new();
        for model in &self.model {
            if model.id.is_empty() {
                return Err(CatalogError::ValidationError("model with empty id".into()));
            }
            if !ids.insert(model.id.as_str()) {
                return Err(CatalogError::ValidationError(format!(
                    "duplicate model id '{}'",
                    model.id
                )));
            }
            if model.model_path.is_empty() {
                return Err(CatalogError::ValidationError(format!(
                    "model '{}' has no model_path",
                    model.id
                )));
            }
            for color in &model.colors {
                if Rgba::from_hex(&color.value).is_none() {
                    return Err(CatalogError::ValidationError(format!(
                        "model '{}' color '{}' has invalid value '{}'",
                        model.id, color.name, color.value
                    )));
                }
            }
        }

        if let Some(parts) = &self.part {
            let mut keys = HashSet::new();
            for part in parts {
                if anonymous_node_name(&part.key).is_some() {
                    return Err(CatalogError::ValidationError(format!(
                        "part key '{}' uses a reserved prefix",
                        part.key
                    )));
                }
                if !keys.insert(part.key.as_str()) {
                    return Err(CatalogError::ValidationError(format!(
                        "duplicate part key '{}'",
                        part.key
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn find_model(&self, id: &str) -> Result<&CarModel, CatalogError> {
        self.model
            .iter()
            .find(|m| m.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| CatalogError::UnknownModel(id.to_string()))
    }

    pub fn default_model(&self) -> Option<&CarModel> {
        self.model.first()
    }

    /// Hotspot tables in effect
    pub fn hotspot_catalog(&self) -> HotspotCatalog {
        self.hotspots.clone().unwrap_or_else(HotspotCatalog::builtin)
    }

    /// Part table in effect
    pub fn part_table(&self) -> PartTable {
        match &self.part {
            Some(parts) => PartTable::new(parts.clone()),
            None => PartTable::builtin(),
        }
    }

    /// Save the catalog to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), CatalogError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Catalog shipped with the viewer
    pub fn builtin() -> Self {
        Self {
            model: vec![
                car(
                    "lux-2-0",
                    "Lux 2.0",
                    "Premium sedan",
                    "/models/lux-2-0.glb",
                    &[
                        ("Mystique Red", "#a51d2d"),
                        ("Brahminy Black", "#1a1a1a"),
                        ("Neptune Silver", "#c0c0c0"),
                    ],
                ),
                car(
                    "vf8",
                    "VF8",
                    "Electric mid-size SUV",
                    "/models/vf8.glb",
                    &[
                        ("Desat Blue", "#2a5298"),
                        ("Maybach Black", "#1a1a1a"),
                        ("Brahminy White", "#f5f5f5"),
                    ],
                ),
                car(
                    "vf9",
                    "VF9",
                    "Electric full-size SUV",
                    "/models/vf9.glb",
                    &[
                        ("Neptune Green", "#175d4b"),
                        ("Stellar Black", "#1a1a1a"),
                        ("Arctic White", "#f5f5f5"),
                    ],
                ),
                car(
                    "vf6",
                    "VF6",
                    "Electric compact SUV",
                    "/models/vf6.glb",
                    &[
                        ("Crimson Red", "#a51d2d"),
                        ("Cyan Blue", "#2a5298"),
                        ("Pearl White", "#f5f5f5"),
                    ],
                ),
                car(
                    "president",
                    "President",
                    "Flagship V8 SUV",
                    "/models/president.glb",
                    &[
                        ("Midnight Black", "#1a1a1a"),
                        ("Burgundy Red", "#800020"),
                        ("Titanium Grey", "#5a5a5a"),
                    ],
                ),
            ],
            ..Default::default()
        }
    }
}

fn car(id: &str, name: &str, tagline: &str, model_path: &str, colors: &[(&str, &str)]) -> CarModel {
    CarModel {
        id: id.to_string(),
        name: name.to_string(),
        tagline: Some(tagline.to_string()),
        model_path: model_path.to_string(),
        colors: colors
            .iter()
            .map(|(name, value)| ColorSelection::new(*name, *value))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewMode;
    use std::io::Write;

    const CATALOG: &str = r##"
version = "1.0"
placeholder = "/assets/3d/placeholder.glb"

[[model]]
id = "vf8"
name = "VF8"
model_path = "/models/vf8.glb"
colors = [
    { name = "Desat Blue", value = "#2a5298" },
    { name = "Brahminy White", value = "#f5f5f5" },
]

[[model]]
id = "vf9"
name = "VF9"
model_path = "/models/vf9.glb"

[[part]]
key = "wheels"
name = "Wheels"
description = "Alloy wheels"
mesh_identifiers = ["wheel", "rim"]
specs = [{ label = "Size", value = "20 inch" }]

[surfaces]
body = ["paint"]
"##;

    #[test]
    fn test_parse_catalog() {
        let catalog = ShowroomCatalog::from_toml(CATALOG).unwrap();
        assert_eq!(catalog.placeholder, "/assets/3d/placeholder.glb");
        assert_eq!(catalog.model.len(), 2);

        let vf8 = catalog.find_model("VF8").unwrap();
        assert_eq!(vf8.default_color().name, "Desat Blue");
        assert_eq!(vf8.find_color("#f5f5f5").unwrap().name, "Brahminy White");

        // Models without colors fall back to the default paint
        let vf9 = catalog.find_model("vf9").unwrap();
        assert_eq!(vf9.default_color(), ColorSelection::default());

        let table = catalog.part_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("wheels").unwrap().specs[0].value, "20 inch");

        // Unspecified surface groups keep their defaults
        assert_eq!(catalog.surfaces.body, vec!["paint".to_string()]);
        assert_eq!(catalog.surfaces.glass, SurfaceRules::default().glass);

        // No hotspot override means built-in hotspots
        assert_eq!(catalog.hotspot_catalog(), HotspotCatalog::builtin());
    }

    #[test]
    fn test_unknown_model() {
        let catalog = ShowroomCatalog::builtin();
        assert!(matches!(
            catalog.find_model("roadster"),
            Err(CatalogError::UnknownModel(id)) if id == "roadster"
        ));
    }

    #[test]
    fn test_validation_errors() {
        let duplicate = r#"
[[model]]
id = "a"
name = "A"
model_path = "/a.glb"

[[model]]
id = "a"
name = "A again"
model_path = "/a2.glb"
"#;
        assert!(matches!(
            ShowroomCatalog::from_toml(duplicate),
            Err(CatalogError::ValidationError(_))
        ));

        let bad_color = r#"
[[model]]
id = "a"
name = "A"
model_path = "/a.glb"
colors = [{ name = "Oops", value = "blue" }]
"#;
        assert!(matches!(
            ShowroomCatalog::from_toml(bad_color),
            Err(CatalogError::ValidationError(_))
        ));

        assert!(matches!(
            ShowroomCatalog::from_toml("model = 5"),
            Err(CatalogError::ParseError(_))
        ));

        let reserved_key = r##"
[[part]]
key = "#node:hood"
name = "Hood"
description = "Aluminium hood"
"##;
        assert!(matches!(
            ShowroomCatalog::from_toml(reserved_key),
            Err(CatalogError::ValidationError(_))
        ));
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = ShowroomCatalog::builtin();
        catalog.validate().unwrap();
        assert_eq!(catalog.model.len(), 5);
        assert_eq!(catalog.placeholder, DEFAULT_PLACEHOLDER);
        for model in &catalog.model {
            assert_eq!(model.colors.len(), 3);
        }
    }

    #[test]
    fn test_from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("showroom.toml");

        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        drop(file);

        let loaded = ShowroomCatalog::from_file(&path).unwrap();
        assert_eq!(loaded.model[0].id, "vf8");

        let saved = dir.path().join("saved.toml");
        loaded.to_file(&saved).unwrap();
        assert_eq!(ShowroomCatalog::from_file(&saved).unwrap(), loaded);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ShowroomCatalog::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(CatalogError::IoError(_))));
    }

    #[test]
    fn test_json_catalog_with_hotspots() {
        let json = r#"{
            "model": [{ "id": "vf6", "name": "VF6", "model_path": "/models/vf6.glb" }],
            "hotspots": {
                "engine": [{
                    "position": [0.0, 0.5, 0.2],
                    "surface_anchor": [0.0, 0.45, 0.2],
                    "title": "Inverter",
                    "description": "Silicon carbide inverter",
                    "category": "technology"
                }]
            }
        }"#;
        let catalog = ShowroomCatalog::from_json(json).unwrap();
        let hotspots = catalog.hotspot_catalog();
        assert_eq!(hotspots.get_hotspots(ViewMode::Engine).len(), 1);
        assert!(hotspots.get_hotspots(ViewMode::Exterior).is_empty());
        assert_eq!(catalog.part_table(), PartTable::builtin());
    }
}
