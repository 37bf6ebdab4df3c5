//! Showroom Scene - Bevy rendering, picking and overlays for the car viewer
//!
//! The host inserts [`ViewerSettings`] (and optionally [`ViewerContent`])
//! before adding [`ShowroomScenePlugin`], then drives the viewer by mutating
//! the settings resource and listening to the messages in [`messages`].

pub mod camera;
pub mod hotspots;
pub mod messages;
pub mod models;
pub mod picking;
pub mod quality;
pub mod scene;
pub mod types;
pub mod ui;

use bevy::prelude::*;
use showroom_core::LoadTracker;

/// Plugin that sets up the car viewer scene
pub struct ShowroomScenePlugin;

impl Plugin for ShowroomScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewerSettings>()
            .init_resource::<ViewerContent>()
            .init_resource::<UiLayout>();

        let settings = app.world().resource::<ViewerSettings>().clone();
        let content = app.world().resource::<ViewerContent>().clone();
        app.insert_resource(ViewerEngine::new(&content, &settings))
            .insert_resource(ModelLoad {
                tracker: LoadTracker::new(settings.placeholder_path.clone()),
            });

        app.add_plugins(messages::MessagesPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(hotspots::HotspotsPlugin)
            .add_plugins(picking::PickingRoutePlugin)
            .add_plugins(quality::QualityPlugin)
            .add_plugins(ui::OverlayPlugin);
    }
}

// Re-export commonly used types
pub use camera::CameraSettings;
pub use messages::*;
pub use types::*;
