//! Bevy application assembly

use bevy::prelude::*;
use bevy::winit::WinitSettings;
use bevy_egui::EguiPlugin;
use bevy_picking::{DefaultPickingPlugins, prelude::MeshPickingPlugin};
use showroom_core::ShowroomCatalog;
use showroom_scene::{ShowroomScenePlugin, UiLayout, ViewerContent};
use std::time::Duration;

use crate::fetch::CatalogFetch;
use crate::params::{settings_for_catalog, UrlParams};
use crate::ui::{HostState, UiPlugin};

/// Run the Bevy application
pub fn run(params: UrlParams) {
    let catalog = ShowroomCatalog::builtin();
    let mut settings = settings_for_catalog(&catalog);
    let model_id = params.apply(&catalog, &mut settings);
    let content = ViewerContent {
        hotspots: catalog.hotspot_catalog(),
        parts: catalog.part_table(),
        surfaces: catalog.surfaces.clone(),
    };

    let mut catalog_fetch = CatalogFetch::default();
    if let Some(url) = &params.catalog_url {
        catalog_fetch.start(url);
    }

    App::new()
        .insert_resource(ClearColor(Color::srgb(0.07, 0.08, 0.1)))
        // Start with default continuous rendering - mobile will switch to power-saving mode
        .insert_resource(WinitSettings::default())
        .add_plugins(DefaultPlugins
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: "Showroom".to_string(),
                    canvas: Some("#viewer-canvas".to_string()),
                    fit_canvas_to_parent: true,
                    prevent_default_event_handling: false,
                    ..default()
                }),
                ..default()
            })
            .set(AssetPlugin {
                // Model paths are absolute URLs on the hosting site
                file_path: "".to_string(),
                // Don't look for .meta files - server doesn't have them
                meta_check: bevy::asset::AssetMetaCheck::Never,
                ..default()
            })
        )
        // Must come before EguiPlugin so it can detect PickingPlugin
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .insert_resource(settings)
        .insert_resource(content)
        .insert_resource(catalog_fetch)
        .insert_resource(HostState::new(catalog, model_id))
        .add_plugins(ShowroomScenePlugin)
        .add_plugins(UiPlugin)
        .add_systems(Update, adjust_power_settings_for_mobile)
        .run();
}

/// Adjust power settings based on mobile detection
/// On mobile, use power saving mode. On desktop, use continuous rendering for smooth 3D.
fn adjust_power_settings_for_mobile(
    layout: Res<UiLayout>,
    mut winit_settings: ResMut<WinitSettings>,
) {
    // Only update if mobile status changed
    if !layout.is_changed() {
        return;
    }

    if layout.is_mobile {
        use bevy::winit::UpdateMode;
        winit_settings.focused_mode = UpdateMode::reactive_low_power(Duration::from_millis(33));
        winit_settings.unfocused_mode = UpdateMode::reactive_low_power(Duration::from_millis(500));
    } else {
        *winit_settings = WinitSettings::default();
    }
}
