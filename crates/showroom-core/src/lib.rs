//! Showroom Core - interaction logic for the 3D car viewer
//!
//! This crate holds everything that does not need a renderer:
//! - View context (view mode, paint, explode amount, quality tier)
//! - Per-view hotspot catalog
//! - Part table and the part registry built from a loaded scene
//! - Layered material state and the exploded-view rig
//! - The interaction engine driving hover, selection and hotspots
//! - Model load tracking and the showroom catalog file

pub mod catalog;
pub mod explode;
pub mod geometry;
pub mod hotspot;
pub mod interaction;
pub mod loading;
pub mod material;
pub mod part;
pub mod registry;
pub mod view;

pub use catalog::{CarModel, CatalogError, ShowroomCatalog};
pub use explode::ExplodeRig;
pub use geometry::Point3;
pub use hotspot::{Hotspot, HotspotCatalog, HotspotCategory, HotspotOverlay};
pub use interaction::{
    ClickResolution, Hit, InteractionEngine, InteractionState, Notice, SelectedPart, ViewStep,
};
pub use loading::{LoadOutcome, LoadStatus, LoadTicket, LoadTracker};
pub use material::{MaterialLayers, SurfaceKind, SurfaceLook, SurfaceRules};
pub use part::{CarPart, PartSpec, PartTable};
pub use registry::{MeshNode, PartRegistry, ResolvedPart, SceneTraversal};
pub use view::{ColorSelection, QualityTier, Rgba, ViewContext, ViewMode};
