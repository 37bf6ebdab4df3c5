//! Cameras and lighting

use bevy::camera::visibility::RenderLayers;
use bevy::prelude::*;

use crate::camera::MainCamera;
use crate::types::MARKER_LAYER;

/// Camera that draws hotspot markers over the model
#[derive(Component)]
pub struct OverlayCamera;

/// Key light whose shadows follow the quality tier
#[derive(Component)]
pub struct KeyLight;

pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene);
    }
}

fn setup_scene(mut commands: Commands) {
    commands
        .spawn((
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: 50.0_f32.to_radians(),
                near: 0.05,
                far: 200.0,
                ..default()
            }),
            Transform::from_xyz(5.0, 2.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
            Msaa::Sample4,
            MainCamera,
        ))
        .with_children(|parent| {
            // Higher order: drawn last and picked first
            parent.spawn((
                Camera3d::default(),
                Camera {
                    order: 1,
                    clear_color: ClearColorConfig::None,
                    ..default()
                },
                Projection::Perspective(PerspectiveProjection {
                    fov: 50.0_f32.to_radians(),
                    near: 0.05,
                    far: 200.0,
                    ..default()
                }),
                Transform::default(),
                Msaa::Sample4,
                RenderLayers::layer(MARKER_LAYER),
                OverlayCamera,
            ));
        });

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 400.0,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(10.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
        KeyLight,
    ));

    // Warm fill from the opposite side
    commands.spawn((
        PointLight {
            intensity: 400_000.0,
            shadows_enabled: false,
            color: Color::srgb(1.0, 0.95, 0.9),
            range: 40.0,
            ..default()
        },
        Transform::from_xyz(-6.0, 4.0, -4.0),
    ));

    // Markers are unlit, but keep a light on their layer for the glow
    commands.spawn((
        DirectionalLight {
            illuminance: 2000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_xyz(0.0, 10.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
        RenderLayers::layer(MARKER_LAYER),
    ));
}
