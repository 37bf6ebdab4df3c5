//! URL parameter configuration
//!
//! `?model=` `?view=` `?color=` `?quality=` `?hotspots=` `?highlight=`
//! `?explode=` `?stats=` `?catalog=` `?debug`

use showroom_core::{ColorSelection, QualityTier, Rgba, ShowroomCatalog, ViewMode};
use showroom_scene::ViewerSettings;

/// Overrides read from the page URL
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlParams {
    pub model: Option<String>,
    pub view: Option<ViewMode>,
    pub color: Option<String>,
    pub quality: Option<QualityTier>,
    pub show_hotspots: Option<bool>,
    pub highlight_parts: Option<bool>,
    pub explode: Option<f32>,
    pub show_stats: Option<bool>,
    pub catalog_url: Option<String>,
    pub debug: bool,
}

impl UrlParams {
    /// Parse from decoded key/value pairs; unknown keys and bad values are skipped
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key {
                "model" if !value.is_empty() => params.model = Some(value.to_string()),
                "view" => {
                    params.view = ViewMode::parse(value);
                    if params.view.is_none() {
                        tracing::warn!("Ignoring unknown view '{}'", value);
                    }
                }
                "color" if !value.is_empty() => params.color = Some(value.to_string()),
                "quality" => {
                    params.quality = QualityTier::parse(value);
                    if params.quality.is_none() {
                        tracing::warn!("Ignoring unknown quality '{}'", value);
                    }
                }
                "hotspots" => params.show_hotspots = parse_flag(value),
                "highlight" => params.highlight_parts = parse_flag(value),
                "explode" => params.explode = value.parse::<f32>().ok().filter(|v| v.is_finite()),
                "stats" => params.show_stats = parse_flag(value),
                "catalog" if !value.is_empty() => params.catalog_url = Some(value.to_string()),
                "debug" => params.debug = parse_flag(value).unwrap_or(true),
                _ => {}
            }
        }
        params
    }

    /// Read the current page's query string
    #[cfg(target_arch = "wasm32")]
    pub fn from_location() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let Ok(href) = window.location().href() else {
            return Self::default();
        };
        let Ok(url) = web_sys::Url::new(&href) else {
            return Self::default();
        };
        let search = url.search_params();
        let keys = [
            "model", "view", "color", "quality", "hotspots", "highlight", "explode", "stats", "catalog", "debug",
        ];
        let values: Vec<(&str, String)> = keys
            .iter()
            .filter_map(|key| search.get(key).map(|value| (*key, value)))
            .collect();
        Self::from_pairs(values.iter().map(|(k, v)| (*k, v.as_str())))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_location() -> Self {
        Self::default()
    }

    /// Apply overrides on top of `settings`; returns the chosen catalog model id
    pub fn apply(&self, catalog: &ShowroomCatalog, settings: &mut ViewerSettings) -> Option<String> {
        let mut model_id = catalog.default_model().map(|m| m.id.clone());

        if let Some(model) = &self.model {
            match catalog.find_model(model) {
                Ok(found) => {
                    settings.model_path = found.model_path.clone();
                    settings.color = found.default_color();
                    model_id = Some(found.id.clone());
                }
                Err(_) if is_model_path(model) => {
                    settings.model_path = model.clone();
                    model_id = None;
                }
                Err(err) => tracing::warn!("{}", err),
            }
        }

        if let Some(color) = &self.color {
            let from_model = model_id
                .as_deref()
                .and_then(|id| catalog.find_model(id).ok())
                .and_then(|m| m.find_color(color).cloned());
            match from_model {
                Some(selection) => settings.color = selection,
                None => match Rgba::from_hex(color) {
                    Some(rgba) => settings.color = ColorSelection::new("Custom", rgba.to_hex()),
                    None => tracing::warn!("Ignoring unknown color '{}'", color),
                },
            }
        }

        if let Some(view) = self.view {
            settings.active_view = view;
        }
        if let Some(quality) = self.quality {
            settings.quality = quality;
        }
        if let Some(show) = self.show_hotspots {
            settings.show_hotspots = show;
        }
        if let Some(highlight) = self.highlight_parts {
            settings.highlight_parts = highlight;
        }
        if let Some(explode) = self.explode {
            settings.explode_amount = showroom_core::view::clamp_explode(explode);
        }
        if let Some(show) = self.show_stats {
            settings.show_stats = show;
        }
        model_id
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn is_model_path(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.ends_with(".glb") || lower.ends_with(".gltf")
}

/// Settings for the catalog's default model before any overrides
pub fn settings_for_catalog(catalog: &ShowroomCatalog) -> ViewerSettings {
    let mut settings = ViewerSettings {
        placeholder_path: catalog.placeholder.clone(),
        ..Default::default()
    };
    if let Some(model) = catalog.default_model() {
        settings.model_path = model.model_path.clone();
        settings.color = model.default_color();
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let params = UrlParams::from_pairs([
            ("model", "vf8"),
            ("view", "Engine"),
            ("quality", "ultra"),
            ("hotspots", "off"),
            ("explode", "1.5"),
            ("debug", ""),
            ("unrelated", "x"),
        ]);
        assert_eq!(params.model.as_deref(), Some("vf8"));
        assert_eq!(params.view, Some(ViewMode::Engine));
        assert_eq!(params.quality, None);
        assert_eq!(params.show_hotspots, Some(false));
        assert_eq!(params.explode, Some(1.5));
        assert!(params.debug);
    }

    #[test]
    fn test_apply_catalog_model_and_color() {
        let catalog = ShowroomCatalog::builtin();
        let model = &catalog.model[1];
        let color = &model.colors[2];

        let mut settings = settings_for_catalog(&catalog);
        let params = UrlParams::from_pairs([("model", model.id.as_str()), ("color", color.name.as_str())]);
        let id = params.apply(&catalog, &mut settings);

        assert_eq!(id.as_deref(), Some(model.id.as_str()));
        assert_eq!(settings.model_path, model.model_path);
        assert_eq!(settings.color, *color);
    }

    #[test]
    fn test_apply_raw_path_and_hex_color() {
        let catalog = ShowroomCatalog::builtin();
        let mut settings = settings_for_catalog(&catalog);
        let params = UrlParams::from_pairs([("model", "/models/custom.glb"), ("color", "#00ff00")]);
        let id = params.apply(&catalog, &mut settings);

        assert_eq!(id, None);
        assert_eq!(settings.model_path, "/models/custom.glb");
        assert_eq!(settings.color.name, "Custom");
        assert_eq!(settings.color.color(), Rgba::rgb(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_unknown_model_keeps_default() {
        let catalog = ShowroomCatalog::builtin();
        let mut settings = settings_for_catalog(&catalog);
        let before = settings.model_path.clone();
        let params = UrlParams::from_pairs([("model", "no-such-car"), ("explode", "99")]);
        params.apply(&catalog, &mut settings);

        assert_eq!(settings.model_path, before);
        assert_eq!(settings.explode_amount, showroom_core::view::EXPLODE_MAX);
    }

    #[test]
    fn test_stats_flag() {
        let catalog = ShowroomCatalog::builtin();
        let mut settings = settings_for_catalog(&catalog);
        assert!(!settings.show_stats);

        UrlParams::from_pairs([("stats", "")]).apply(&catalog, &mut settings);
        assert!(settings.show_stats);

        UrlParams::from_pairs([("stats", "off")]).apply(&catalog, &mut settings);
        assert!(!settings.show_stats);
    }
}
