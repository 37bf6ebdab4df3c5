//! Browser capability gate

/// Best graphics API the browser offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererSupport {
    WebGpu,
    WebGl2,
    Unsupported,
}

impl RendererSupport {
    /// Pick what the build can run on given what the browser exposes
    pub fn decide(has_webgpu: bool, has_webgl2: bool) -> Self {
        if cfg!(feature = "webgpu") && has_webgpu {
            RendererSupport::WebGpu
        } else if cfg!(feature = "webgl2") && has_webgl2 {
            RendererSupport::WebGl2
        } else {
            RendererSupport::Unsupported
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, RendererSupport::Unsupported)
    }
}

pub const UNSUPPORTED_MESSAGE: &str =
    "Your browser cannot display the 3D viewer. Please try a recent version of Chrome, Edge, Firefox or Safari with hardware acceleration enabled.";

/// Ask the browser for WebGPU and WebGL2
#[cfg(target_arch = "wasm32")]
pub fn detect() -> RendererSupport {
    use wasm_bindgen::JsCast;

    let Some(window) = web_sys::window() else {
        return RendererSupport::Unsupported;
    };
    let has_webgpu = js_sys::Reflect::has(&window.navigator(), &"gpu".into()).unwrap_or(false);
    let has_webgl2 = window
        .document()
        .and_then(|doc| doc.create_element("canvas").ok())
        .and_then(|el| el.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        .and_then(|canvas| canvas.get_context("webgl2").ok().flatten())
        .is_some();
    RendererSupport::decide(has_webgpu, has_webgl2)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn detect() -> RendererSupport {
    RendererSupport::decide(true, true)
}

/// Replace the canvas with a static explanation
#[cfg(target_arch = "wasm32")]
pub fn show_unsupported_message() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let Some(canvas) = document.get_element_by_id("viewer-canvas") {
        let _ = canvas.set_attribute("style", "display: none");
    }
    let Ok(notice) = document.create_element("div") else {
        return;
    };
    notice.set_class_name("viewer-unsupported");
    notice.set_text_content(Some(UNSUPPORTED_MESSAGE));
    if let Some(body) = document.body() {
        let _ = body.append_child(&notice);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn show_unsupported_message() {
    tracing::error!("{}", UNSUPPORTED_MESSAGE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "webgl2")]
    #[test]
    fn test_webgl2_is_enough() {
        assert_eq!(RendererSupport::decide(false, true), RendererSupport::WebGl2);
        assert!(RendererSupport::decide(false, true).is_supported());
    }

    #[cfg(not(feature = "webgl2"))]
    #[test]
    fn test_webgl2_only_browser_rejected_without_webgl2_build() {
        assert_eq!(RendererSupport::decide(false, true), RendererSupport::Unsupported);
        assert!(!RendererSupport::decide(false, true).is_supported());
    }

    #[test]
    fn test_nothing_available() {
        assert_eq!(RendererSupport::decide(false, false), RendererSupport::Unsupported);
    }

    #[cfg(feature = "webgpu")]
    #[test]
    fn test_webgpu_preferred() {
        assert_eq!(RendererSupport::decide(true, true), RendererSupport::WebGpu);
        assert_eq!(RendererSupport::decide(true, false), RendererSupport::WebGpu);
    }
}
