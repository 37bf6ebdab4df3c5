//! Hotspot markers: clickable spheres, pulsing glow, connector and anchor dot

use bevy::camera::visibility::RenderLayers;
use bevy::prelude::*;
use bevy_picking::prelude::Pickable;
use showroom_core::hotspot::{marker_pulse, ANCHOR_RADIUS, GLOW_RADIUS, MARKER_RADIUS};
use showroom_core::{Hotspot, ViewMode};

use crate::types::{to_vec3, ViewerContent, ViewerEngine, MARKER_LAYER};

const CONNECTOR_RADIUS: f32 = 0.004;

/// Clickable marker for the hotspot at `index` in the current sequence
#[derive(Component, Debug, Clone, Copy)]
pub struct HotspotMarker {
    pub index: usize,
}

#[derive(Component)]
pub struct HotspotGlow;

/// Anything spawned for the current hotspot sequence
#[derive(Component)]
pub struct HotspotVisual;

#[derive(Resource)]
pub struct HotspotAssets {
    pub marker_mesh: Handle<Mesh>,
    pub glow_mesh: Handle<Mesh>,
    pub anchor_mesh: Handle<Mesh>,
    pub idle_material: Handle<StandardMaterial>,
    pub active_material: Handle<StandardMaterial>,
    pub connector_material: Handle<StandardMaterial>,
}

pub struct HotspotsPlugin;

impl Plugin for HotspotsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hotspot_assets).add_systems(
            Update,
            (sync_hotspot_markers, update_marker_materials, animate_marker_glow).chain(),
        );
    }
}

fn setup_hotspot_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(HotspotAssets {
        marker_mesh: meshes.add(Sphere::new(MARKER_RADIUS).mesh().uv(24, 16)),
        glow_mesh: meshes.add(Sphere::new(GLOW_RADIUS).mesh().uv(24, 16)),
        anchor_mesh: meshes.add(Sphere::new(ANCHOR_RADIUS).mesh().uv(12, 8)),
        idle_material: materials.add(StandardMaterial {
            base_color: Color::WHITE,
            unlit: true,
            ..default()
        }),
        active_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.937, 0.267, 0.267),
            unlit: true,
            ..default()
        }),
        connector_material: materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.6),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        }),
    });
}

/// Respawn markers whenever the visible sequence changes
fn sync_hotspot_markers(
    mut commands: Commands,
    engine: Res<ViewerEngine>,
    content: Res<ViewerContent>,
    assets: Option<Res<HotspotAssets>>,
    existing: Query<Entity, With<HotspotVisual>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut shown: Local<Option<(ViewMode, bool)>>,
) {
    let Some(assets) = assets else { return };
    let context = engine.context();
    let key = (context.view, context.show_hotspots);
    if *shown == Some(key) && !content.is_changed() {
        return;
    }

    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }

    let visible = engine.visible_hotspots();
    tracing::debug!("Spawning {} hotspot markers for {}", visible.len(), context.view);
    for (index, hotspot) in visible.iter().enumerate() {
        spawn_hotspot(&mut commands, &assets, &mut meshes, &mut materials, index, hotspot);
    }
    *shown = Some(key);
}

fn spawn_hotspot(
    commands: &mut Commands,
    assets: &HotspotAssets,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    index: usize,
    hotspot: &Hotspot,
) {
    let position = to_vec3(hotspot.position);
    let anchor = to_vec3(hotspot.surface_anchor);

    // Each glow fades on its own
    let glow_material = materials.add(StandardMaterial {
        base_color: Color::srgba(0.23, 0.51, 0.96, 0.3),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    });

    commands
        .spawn((
            Mesh3d(assets.marker_mesh.clone()),
            MeshMaterial3d(assets.idle_material.clone()),
            Transform::from_translation(position),
            RenderLayers::layer(MARKER_LAYER),
            HotspotMarker { index },
            HotspotVisual,
            Name::new(format!("hotspot:{}", hotspot.title)),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(assets.glow_mesh.clone()),
                MeshMaterial3d(glow_material),
                Transform::default(),
                RenderLayers::layer(MARKER_LAYER),
                Pickable::IGNORE,
                HotspotGlow,
            ));
        });

    let (length, midpoint, rotation) = connector_geometry(position, anchor);
    if length > f32::EPSILON {
        commands.spawn((
            Mesh3d(meshes.add(Cylinder::new(CONNECTOR_RADIUS, length))),
            MeshMaterial3d(assets.connector_material.clone()),
            Transform::from_translation(midpoint).with_rotation(rotation),
            Pickable::IGNORE,
            HotspotVisual,
        ));
    }

    commands.spawn((
        Mesh3d(assets.anchor_mesh.clone()),
        MeshMaterial3d(assets.idle_material.clone()),
        Transform::from_translation(anchor),
        Pickable::IGNORE,
        HotspotVisual,
    ));
}

/// Length, midpoint and orientation of a Y-aligned cylinder joining two points
pub fn connector_geometry(from: Vec3, to: Vec3) -> (f32, Vec3, Quat) {
    let delta = to - from;
    let length = delta.length();
    let rotation = if length > f32::EPSILON {
        Quat::from_rotation_arc(Vec3::Y, delta / length)
    } else {
        Quat::IDENTITY
    };
    (length, (from + to) * 0.5, rotation)
}

fn update_marker_materials(
    engine: Res<ViewerEngine>,
    assets: Option<Res<HotspotAssets>>,
    mut markers: Query<(&HotspotMarker, &mut MeshMaterial3d<StandardMaterial>)>,
) {
    let Some(assets) = assets else { return };
    let active = engine.state().active_hotspot;
    for (marker, mut material) in markers.iter_mut() {
        let wanted = if active == Some(marker.index) {
            &assets.active_material
        } else {
            &assets.idle_material
        };
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}

/// Pulse is frame-driven decoration only
fn animate_marker_glow(
    time: Res<Time>,
    mut glows: Query<(&mut Transform, &MeshMaterial3d<StandardMaterial>), With<HotspotGlow>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let pulse = marker_pulse(time.elapsed_secs());
    for (mut transform, material) in glows.iter_mut() {
        transform.scale = Vec3::splat(pulse.scale);
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color.set_alpha(pulse.opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_spans_marker_to_anchor() {
        let from = Vec3::new(0.0, 0.8, 1.8);
        let to = Vec3::new(0.0, 0.6, 1.9);
        let (length, midpoint, rotation) = connector_geometry(from, to);

        assert!((length - from.distance(to)).abs() < 1e-5);
        assert!(midpoint.distance(Vec3::new(0.0, 0.7, 1.85)) < 1e-5);
        // Cylinder ends land on the two points
        let half = rotation * Vec3::Y * (length / 2.0);
        assert!((midpoint + half).distance(to) < 1e-4);
        assert!((midpoint - half).distance(from) < 1e-4);
    }

    #[test]
    fn test_degenerate_connector() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let (length, midpoint, rotation) = connector_geometry(p, p);
        assert_eq!(length, 0.0);
        assert_eq!(midpoint, p);
        assert_eq!(rotation, Quat::IDENTITY);
    }
}
