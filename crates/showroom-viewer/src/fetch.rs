//! Remote catalog fetching

use bevy::prelude::*;
use showroom_core::{CatalogError, ShowroomCatalog};
use std::sync::{Arc, Mutex};

pub type FetchSlot = Arc<Mutex<Option<Result<String, String>>>>;

/// Catalog download in progress, if any
#[derive(Resource, Default)]
pub struct CatalogFetch {
    pub url: Option<String>,
    pub pending_result: FetchSlot,
    pub error: Option<String>,
}

impl CatalogFetch {
    pub fn start(&mut self, url: &str) {
        tracing::info!("Fetching catalog from {}", url);
        self.url = Some(url.to_string());
        self.error = None;
        fetch_text(url, self.pending_result.clone());
    }

    /// Take a finished download, releasing the lock immediately
    pub fn take_result(&mut self) -> Option<Result<String, String>> {
        match self.pending_result.try_lock() {
            Ok(mut result) => result.take(),
            Err(_) => None,
        }
    }
}

/// Parse a downloaded catalog, JSON or TOML by extension
pub fn parse_catalog(url: &str, body: &str) -> Result<ShowroomCatalog, CatalogError> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let catalog = if path.to_ascii_lowercase().ends_with(".json") {
        ShowroomCatalog::from_json(body)?
    } else {
        ShowroomCatalog::from_toml(body)?
    };
    catalog.validate()?;
    Ok(catalog)
}

#[cfg(target_arch = "wasm32")]
pub fn fetch_text(url: &str, pending_result: FetchSlot) {
    use wasm_bindgen::JsCast;

    let url = url.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        let result = async {
            let window = web_sys::window().ok_or("No window")?;

            let resp = wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(&url))
                .await
                .map_err(|e| format!("Fetch failed: {:?}", e))?;

            let resp: web_sys::Response = resp.dyn_into().map_err(|_| "Response cast failed")?;

            if !resp.ok() {
                return Err(format!("HTTP {}: {}", resp.status(), resp.status_text()));
            }

            let text = wasm_bindgen_futures::JsFuture::from(
                resp.text().map_err(|_| "Failed to get text")?,
            )
            .await
            .map_err(|e| format!("Text extraction failed: {:?}", e))?;

            text.as_string().ok_or_else(|| "Not a string".to_string())
        }
        .await;

        if let Ok(mut pending) = pending_result.lock() {
            *pending = Some(result);
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
pub fn fetch_text(_url: &str, pending_result: FetchSlot) {
    // Native: not supported yet
    if let Ok(mut pending) = pending_result.lock() {
        *pending = Some(Err("URL fetch not supported on native".to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_by_extension() {
        let toml = r#"
[[model]]
id = "demo"
name = "Demo"
model_path = "/models/demo.glb"
"#;
        let catalog = parse_catalog("/catalog.toml?v=2", toml).unwrap();
        assert_eq!(catalog.model[0].id, "demo");

        let json = r#"{"model": [{"id": "demo", "name": "Demo", "model_path": "/models/demo.glb"}]}"#;
        let catalog = parse_catalog("https://cdn.example.com/catalog.JSON", json).unwrap();
        assert_eq!(catalog.model[0].model_path, "/models/demo.glb");
    }

    #[test]
    fn test_parse_catalog_rejects_garbage() {
        assert!(parse_catalog("/catalog.toml", "model = [").is_err());
        assert!(parse_catalog("/catalog.json", "{").is_err());
    }

    #[test]
    fn test_native_fetch_reports_error() {
        let mut fetch = CatalogFetch::default();
        fetch.start("/catalog.toml");
        assert!(matches!(fetch.take_result(), Some(Err(_))));
        assert!(fetch.take_result().is_none());
    }
}
