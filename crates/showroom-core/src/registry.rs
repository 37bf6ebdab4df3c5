//! Part registry - binds part metadata to the mesh nodes of a loaded asset
//!
//! Ownership is computed in a single pass over the scene: every mesh node is
//! tested against the part table in order and handed to the first match.
//! Highlighting, painting and click resolution all read this one mapping.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::geometry::Point3;
use crate::material::{SurfaceKind, SurfaceLook, SurfaceRules};
use crate::part::{anonymous_key, anonymous_node_name, CarPart, PartTable};

/// Mesh node as reported by the scene traversal
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode<N> {
    /// Stable per-instance handle
    pub id: N,
    /// Node name from the asset
    pub name: String,
    /// Translation relative to the model root
    pub translation: Point3,
    /// Material parameters the node was loaded with
    pub look: SurfaceLook,
}

impl<N> MeshNode<N> {
    pub fn new(id: N, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            translation: Point3::ZERO,
            look: SurfaceLook::default(),
        }
    }

    pub fn at(mut self, translation: Point3) -> Self {
        self.translation = translation;
        self
    }
}

/// Walks the mesh nodes of a loaded scene
pub trait SceneTraversal<N> {
    fn traverse(&self, visit: &mut dyn FnMut(&MeshNode<N>));
}

impl<N> SceneTraversal<N> for [MeshNode<N>] {
    fn traverse(&self, visit: &mut dyn FnMut(&MeshNode<N>)) {
        for node in self {
            visit(node);
        }
    }
}

impl<N> SceneTraversal<N> for Vec<MeshNode<N>> {
    fn traverse(&self, visit: &mut dyn FnMut(&MeshNode<N>)) {
        self.as_slice().traverse(visit);
    }
}

/// A part together with every mesh node it owns
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPart<N: Eq + Hash> {
    pub part: CarPart,
    pub meshes: HashSet<N>,
}

/// Mapping from part key to owned mesh nodes for one asset instance
#[derive(Debug, Clone)]
pub struct PartRegistry<N> {
    table: PartTable,
    mesh_map: HashMap<String, HashSet<N>>,
    owner: HashMap<N, String>,
    names: HashMap<N, String>,
    surfaces: HashMap<N, SurfaceKind>,
}

impl<N: Copy + Eq + Hash> PartRegistry<N> {
    /// Registry with no nodes bound
    pub fn empty(table: PartTable) -> Self {
        Self {
            table,
            mesh_map: HashMap::new(),
            owner: HashMap::new(),
            names: HashMap::new(),
            surfaces: HashMap::new(),
        }
    }

    /// Build the mesh map with the default surface rules
    pub fn build_mesh_map<S>(scene: &S, table: &PartTable) -> Self
    where
        S: SceneTraversal<N> + ?Sized,
    {
        Self::build_with_rules(scene, table, &SurfaceRules::default())
    }

    /// Single traversal: part ownership and surface class per node
    pub fn build_with_rules<S>(scene: &S, table: &PartTable, rules: &SurfaceRules) -> Self
    where
        S: SceneTraversal<N> + ?Sized,
    {
        let mut registry = Self::empty(table.clone());

        scene.traverse(&mut |node| {
            registry.names.insert(node.id, node.name.clone());
            registry.surfaces.insert(node.id, rules.classify(&node.name));

            if let Some(part) = table.first_match(&node.name) {
                registry
                    .mesh_map
                    .entry(part.key.clone())
                    .or_default()
                    .insert(node.id);
                registry.owner.insert(node.id, part.key.clone());
            }
        });

        tracing::debug!(
            "Part registry: {} nodes, {} owned by {} parts",
            registry.names.len(),
            registry.owner.len(),
            registry.mesh_map.len()
        );

        registry
    }

    pub fn table(&self) -> &PartTable {
        &self.table
    }

    /// Part key -> owned mesh nodes
    pub fn mesh_map(&self) -> &HashMap<String, HashSet<N>> {
        &self.mesh_map
    }

    /// Mesh nodes owned by a part
    pub fn meshes_of(&self, key: &str) -> Option<&HashSet<N>> {
        self.mesh_map.get(key)
    }

    /// Key of the part owning a node
    pub fn owner_of(&self, node: N) -> Option<&str> {
        self.owner.get(&node).map(String::as_str)
    }

    pub fn node_name(&self, node: N) -> Option<&str> {
        self.names.get(&node).map(String::as_str)
    }

    pub fn surface_kind(&self, node: N) -> SurfaceKind {
        self.surfaces.get(&node).copied().unwrap_or_default()
    }

    pub fn contains(&self, node: N) -> bool {
        self.names.contains_key(&node)
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Key used for hover tracking: owning part, else an anonymous node key
    pub fn hover_key(&self, node: N) -> Option<String> {
        match self.owner.get(&node) {
            Some(key) => Some(key.clone()),
            None => self.names.get(&node).map(|name| anonymous_key(name)),
        }
    }

    /// Nodes affected by a hover key
    pub fn nodes_for_key(&self, key: &str) -> HashSet<N> {
        let Some(node_name) = anonymous_node_name(key) else {
            return self.mesh_map.get(key).cloned().unwrap_or_default();
        };
        // Only unowned nodes answer to an anonymous key
        self.names
            .iter()
            .filter(|(node, name)| name.as_str() == node_name && !self.owner.contains_key(*node))
            .map(|(node, _)| *node)
            .collect()
    }

    /// Resolve a hit node to its part and full mesh set.
    ///
    /// Unowned nodes resolve to an anonymous part named after the node, so a
    /// click on geometry never goes unanswered.
    pub fn resolve(&self, node: N) -> ResolvedPart<N> {
        if let Some(key) = self.owner.get(&node) {
            if let Some(part) = self.table.get(key) {
                let meshes = self.mesh_map.get(key).cloned().unwrap_or_default();
                return ResolvedPart {
                    part: part.clone(),
                    meshes,
                };
            }
        }

        let name = self.names.get(&node).map(String::as_str).unwrap_or_default();
        ResolvedPart {
            part: CarPart::anonymous(name),
            meshes: HashSet::from([node]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Vec<MeshNode<u32>> {
        vec![
            MeshNode::new(0, "body_main"),
            MeshNode::new(1, "wheel_fl"),
            MeshNode::new(2, "wheel_fr"),
            MeshNode::new(3, "engine_block"),
        ]
    }

    fn table() -> PartTable {
        PartTable::new(vec![
            CarPart::new("wheels", "Wheels", "Alloy wheels").with_identifiers(["wheel"]),
            CarPart::new("engine", "Engine", "Turbo engine").with_identifiers(["engine"]),
        ])
    }

    #[test]
    fn test_end_to_end_mesh_map() {
        let registry = PartRegistry::build_mesh_map(&scene(), &table());

        assert_eq!(registry.meshes_of("wheels"), Some(&HashSet::from([1, 2])));
        assert_eq!(registry.meshes_of("engine"), Some(&HashSet::from([3])));
        assert_eq!(registry.mesh_map().len(), 2);
        assert!(registry.owner_of(0).is_none());

        let resolved = registry.resolve(0);
        assert_eq!(resolved.part.name, "body_main");
        assert!(resolved.part.specs.is_empty());
        assert_eq!(resolved.meshes, HashSet::from([0]));
    }

    #[test]
    fn test_first_match_ownership() {
        let scene = vec![MeshNode::new(7u32, "wheel_engine_mount")];
        let registry = PartRegistry::build_mesh_map(&scene, &table());

        assert_eq!(registry.owner_of(7), Some("wheels"));
        assert!(registry.meshes_of("engine").is_none());
        let total: usize = registry.mesh_map().values().map(HashSet::len).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_resolve_returns_full_mesh_set() {
        let registry = PartRegistry::build_mesh_map(&scene(), &table());
        let resolved = registry.resolve(1);
        assert_eq!(resolved.part.key, "wheels");
        assert_eq!(resolved.meshes, HashSet::from([1, 2]));
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        let scene = vec![MeshNode::new(0u32, "mesh_0"), MeshNode::new(1, "mesh_1")];
        let registry = PartRegistry::build_mesh_map(&scene, &table());
        assert!(registry.mesh_map().is_empty());
        assert_eq!(registry.node_count(), 2);
    }

    #[test]
    fn test_idempotent_build() {
        let scene = scene();
        let a = PartRegistry::build_mesh_map(&scene, &table());
        let b = PartRegistry::build_mesh_map(&scene, &table());
        assert_eq!(a.mesh_map(), b.mesh_map());
    }

    #[test]
    fn test_hover_keys() {
        let registry = PartRegistry::build_mesh_map(&scene(), &table());
        assert_eq!(registry.hover_key(2).as_deref(), Some("wheels"));
        assert_eq!(registry.hover_key(0).as_deref(), Some("#node:body_main"));
        assert_eq!(registry.nodes_for_key("#node:body_main"), HashSet::from([0]));
        assert!(registry.nodes_for_key("body_main").is_empty());
        assert_eq!(registry.nodes_for_key("wheels"), HashSet::from([1, 2]));
        assert!(registry.hover_key(99).is_none());
    }

    #[test]
    fn test_anonymous_key_never_collides_with_part_key() {
        // A catalog part whose key equals an unowned node's name
        let table = PartTable::new(vec![
            CarPart::new("body_main", "Chassis", "Steel frame").with_identifiers(["frame"]),
        ]);
        let scene = vec![MeshNode::new(0u32, "body_main"), MeshNode::new(1, "frame_rail")];
        let registry = PartRegistry::build_mesh_map(&scene, &table);

        let unowned = registry.hover_key(0).unwrap();
        assert_ne!(unowned, "body_main");
        assert_eq!(registry.nodes_for_key(&unowned), HashSet::from([0]));
        assert_eq!(registry.nodes_for_key("body_main"), HashSet::from([1]));
        assert_eq!(registry.resolve(0).part.name, "body_main");
        assert!(registry.resolve(0).part.is_anonymous());
        assert_eq!(registry.resolve(1).part.name, "Chassis");
    }

    #[test]
    fn test_surface_classification() {
        let registry = PartRegistry::build_mesh_map(&scene(), &table());
        assert_eq!(registry.surface_kind(0), SurfaceKind::Body);
        assert_eq!(registry.surface_kind(1), SurfaceKind::Wheel);
        assert_eq!(registry.surface_kind(3), SurfaceKind::Other);
    }
}
