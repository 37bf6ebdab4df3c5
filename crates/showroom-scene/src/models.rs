//! Car model loading, binding and per-mesh material/transform sync

use bevy::gltf::Gltf;
use bevy::math::Affine3A;
use bevy::prelude::*;
use bevy::asset::LoadState;
use showroom_core::{LoadOutcome, LoadTicket, MeshNode, SurfaceLook};

use crate::messages::{ModelStatusChanged, ReloadModel};
use crate::types::{
    from_color, to_color, to_point3, to_vec3, ModelLoad, ViewerEngine, ViewerSettings, MODEL_OFFSET,
};

/// Root of the spawned car scene
#[derive(Component)]
pub struct CarModelRoot {
    pub ticket: LoadTicket,
}

/// Set on the root once its meshes are handed to the engine
#[derive(Component)]
pub struct ModelBound;

/// Mesh entity owned by the bound car model
#[derive(Component, Debug, Clone)]
pub struct CarMesh {
    /// Node name the part registry saw
    pub node_name: String,
    /// Local translation as loaded
    pub authored_translation: Vec3,
    /// Position in model space at bind time
    pub model_origin: Vec3,
    /// Maps a model-space offset into the parent's space
    pub to_local: Affine3A,
}

/// In-flight glTF loads, oldest first
#[derive(Resource, Default)]
pub struct PendingLoads {
    pub loads: Vec<(LoadTicket, Handle<Gltf>)>,
}

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingLoads>()
            .add_systems(
                Update,
                (
                    request_model,
                    poll_model_loads,
                    bind_loaded_model,
                    sync_view_context,
                    apply_surface_looks,
                    apply_explode_offsets,
                )
                    .chain(),
            );
    }
}

/// Start a load whenever the host points at a different model
fn request_model(
    settings: Res<ViewerSettings>,
    mut reloads: MessageReader<ReloadModel>,
    mut load: ResMut<ModelLoad>,
    mut pending: ResMut<PendingLoads>,
    asset_server: Res<AssetServer>,
    mut status: MessageWriter<ModelStatusChanged>,
) {
    let reload = reloads.read().count() > 0;
    if !reload {
        if !settings.is_changed() {
            return;
        }
        if load.tracker.requested_path() == Some(settings.model_path.as_str()) {
            return;
        }
    }

    if load.tracker.placeholder() != settings.placeholder_path {
        load.tracker.set_placeholder(settings.placeholder_path.clone());
    }
    let ticket = load.tracker.request(settings.model_path.clone());
    tracing::info!("Loading model #{}: {}", ticket.generation, ticket.path);
    let handle = asset_server.load::<Gltf>(ticket.path.clone());
    pending.loads.push((ticket, handle));
    status.write(ModelStatusChanged(load.tracker.status().clone()));
}

/// Check loading state and swap in the newest finished model
fn poll_model_loads(
    mut commands: Commands,
    mut load: ResMut<ModelLoad>,
    mut pending: ResMut<PendingLoads>,
    mut engine: ResMut<ViewerEngine>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    roots: Query<Entity, With<CarModelRoot>>,
    mut status: MessageWriter<ModelStatusChanged>,
) {
    let mut still_loading = Vec::new();

    for (ticket, handle) in std::mem::take(&mut pending.loads) {
        let result = match asset_server.get_load_state(handle.id()) {
            Some(LoadState::Loaded) => match gltf_assets.get(&handle).and_then(pick_scene) {
                Some(scene) => Ok(scene),
                None => Err("asset contains no scenes".to_string()),
            },
            Some(LoadState::Failed(err)) => Err(err.to_string()),
            _ => {
                // Still loading
                still_loading.push((ticket, handle));
                continue;
            }
        };

        let scene = result.as_ref().ok().cloned();
        match load.tracker.complete(&ticket, result.map(|_| ())) {
            LoadOutcome::Apply => {
                let Some(scene) = scene else { continue };
                for root in roots.iter() {
                    commands.entity(root).despawn();
                }
                engine.unbind_scene();
                commands.spawn((
                    SceneRoot(scene),
                    Transform::from_translation(MODEL_OFFSET),
                    CarModelRoot { ticket: ticket.clone() },
                ));
                tracing::info!("Model loaded: {}", ticket.path);
            }
            LoadOutcome::RetryWithPlaceholder(retry) => {
                let handle = asset_server.load::<Gltf>(retry.path.clone());
                still_loading.push((retry, handle));
            }
            LoadOutcome::Stale | LoadOutcome::GiveUp => {}
        }
        status.write(ModelStatusChanged(load.tracker.status().clone()));
    }

    pending.loads.extend(still_loading);
}

fn pick_scene(gltf: &Gltf) -> Option<Handle<Scene>> {
    gltf.default_scene
        .clone()
        .or_else(|| gltf.scenes.first().cloned())
}

/// Hand the spawned meshes to the engine once the scene has propagated
fn bind_loaded_model(
    mut commands: Commands,
    mut engine: ResMut<ViewerEngine>,
    roots: Query<(Entity, &GlobalTransform), (With<CarModelRoot>, Without<ModelBound>)>,
    children: Query<&Children>,
    parents: Query<&ChildOf>,
    names: Query<&Name>,
    meshes: Query<(&Transform, &GlobalTransform, &MeshMaterial3d<StandardMaterial>), With<Mesh3d>>,
    globals: Query<&GlobalTransform>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (root, root_global) in roots.iter() {
        let mut mesh_entities = Vec::new();
        collect_mesh_descendants(root, &children, &meshes, &mut mesh_entities);
        if mesh_entities.is_empty() {
            // Scene not spawned yet
            continue;
        }

        let root_affine = root_global.affine();
        let to_model = root_affine.inverse();
        let mut nodes = Vec::with_capacity(mesh_entities.len());

        for (index, entity) in mesh_entities.into_iter().enumerate() {
            let Ok((transform, global, material)) = meshes.get(entity) else {
                continue;
            };
            let node_name = mesh_node_name(entity, root, &names, &parents)
                .unwrap_or_else(|| format!("mesh_{}", index));

            // Each mesh gets its own material so part highlights don't bleed
            let look = match materials.get(&material.0).cloned() {
                Some(original) => {
                    let look = look_from_material(&original);
                    let handle = materials.add(original);
                    commands.entity(entity).insert(MeshMaterial3d(handle));
                    look
                }
                None => SurfaceLook::default(),
            };

            let parent_affine = parents
                .get(entity)
                .ok()
                .and_then(|p| globals.get(p.parent()).ok())
                .map(|g| g.affine())
                .unwrap_or(Affine3A::IDENTITY);
            let model_origin = to_model.transform_point3(global.translation());

            commands.entity(entity).insert(CarMesh {
                node_name: node_name.clone(),
                authored_translation: transform.translation,
                model_origin,
                to_local: parent_affine.inverse() * root_affine,
            });

            let mut node = MeshNode::new(entity, node_name).at(to_point3(model_origin));
            node.look = look;
            nodes.push(node);
        }

        engine.bind_scene(&nodes);
        commands.entity(root).insert(ModelBound);
    }
}

/// Find every mesh entity under `parent`
fn collect_mesh_descendants(
    parent: Entity,
    children_query: &Query<&Children>,
    mesh_query: &Query<(&Transform, &GlobalTransform, &MeshMaterial3d<StandardMaterial>), With<Mesh3d>>,
    out: &mut Vec<Entity>,
) {
    if let Ok(children) = children_query.get(parent) {
        for child in children.iter() {
            if mesh_query.contains(child) {
                out.push(child);
            }
            collect_mesh_descendants(child, children_query, mesh_query, out);
        }
    }
}

/// Name of the glTF node a mesh belongs to.
///
/// Primitives are spawned as children of their node, so the closest named
/// ancestor wins; the mesh's own name is the last resort.
fn mesh_node_name(
    entity: Entity,
    root: Entity,
    names: &Query<&Name>,
    parents: &Query<&ChildOf>,
) -> Option<String> {
    let mut current = entity;
    while let Ok(parent) = parents.get(current) {
        current = parent.parent();
        if current == root {
            break;
        }
        if let Ok(name) = names.get(current) {
            return Some(name.to_string());
        }
    }
    names.get(entity).ok().map(|name| name.to_string())
}

fn look_from_material(material: &StandardMaterial) -> SurfaceLook {
    let emissive = material.emissive;
    let intensity = emissive.red.max(emissive.green).max(emissive.blue);
    let emissive_color = if intensity > 0.0 {
        Color::linear_rgb(
            emissive.red / intensity,
            emissive.green / intensity,
            emissive.blue / intensity,
        )
    } else {
        Color::BLACK
    };
    SurfaceLook {
        base_color: from_color(material.base_color),
        emissive: from_color(emissive_color),
        emissive_intensity: intensity,
        metallic: material.metallic,
        roughness: material.perceptual_roughness,
        transparent: matches!(material.alpha_mode, AlphaMode::Blend),
    }
}

pub(crate) fn write_look(material: &mut StandardMaterial, look: &SurfaceLook) {
    material.base_color = to_color(look.base_color);
    let emissive = to_color(look.emissive).to_linear();
    material.emissive = LinearRgba::rgb(
        emissive.red * look.emissive_intensity,
        emissive.green * look.emissive_intensity,
        emissive.blue * look.emissive_intensity,
    );
    material.metallic = look.metallic;
    material.perceptual_roughness = look.roughness;
    if look.transparent {
        material.alpha_mode = AlphaMode::Blend;
    } else if matches!(material.alpha_mode, AlphaMode::Blend) {
        material.alpha_mode = AlphaMode::Opaque;
    }
}

/// Push host configuration into the engine
fn sync_view_context(settings: Res<ViewerSettings>, mut engine: ResMut<ViewerEngine>) {
    if settings.is_changed() {
        engine.apply_context(&settings.view_context());
    }
}

/// Write changed surface looks to the mesh materials
fn apply_surface_looks(
    mut engine: ResMut<ViewerEngine>,
    meshes: Query<&MeshMaterial3d<StandardMaterial>, With<CarMesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, look) in engine.take_dirty_looks() {
        let Ok(handle) = meshes.get(entity) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&handle.0) {
            write_look(material, &look);
        }
    }
}

/// Move meshes to their exploded positions
fn apply_explode_offsets(
    mut engine: ResMut<ViewerEngine>,
    mut meshes: Query<(&mut Transform, &CarMesh)>,
) {
    for (entity, position) in engine.take_dirty_positions() {
        let Ok((mut transform, mesh)) = meshes.get_mut(entity) else {
            continue;
        };
        let offset = to_vec3(position) - mesh.model_origin;
        transform.translation = mesh.authored_translation + mesh.to_local.transform_vector3(offset);
    }
}
