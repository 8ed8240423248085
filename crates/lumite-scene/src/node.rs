//! Node registry backed by a hecs world.

use crate::transform::Transform;
use hecs::World;

/// Stable handle to a scene node.
///
/// Generational: the id of a despawned node never aliases a live one.
pub type NodeId = hecs::Entity;

/// Name component attached to every node.
#[derive(Debug, Clone)]
struct Name(String);

/// Registry of scene nodes and their transforms.
#[derive(Default)]
pub struct Scene {
    world: World,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a node with an identity transform.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        self.world.spawn((Name(name.into()), Transform::default()))
    }

    /// Remove a node. Stale [`NodeId`]s held elsewhere resolve to `None`
    /// afterwards.
    pub fn remove_node(&mut self, node: NodeId) -> bool {
        self.world.despawn(node).is_ok()
    }

    /// Whether the node is still alive.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.world.contains(node)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    /// Whether the scene has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    /// Read a node's transform by value.
    #[must_use]
    pub fn transform(&self, node: NodeId) -> Option<Transform> {
        self.world.get::<&Transform>(node).ok().map(|t| *t)
    }

    /// Borrow a node's transform mutably. `None` if the node is gone.
    pub fn transform_mut(&mut self, node: NodeId) -> Option<&mut Transform> {
        self.world.query_one_mut::<&mut Transform>(node).ok()
    }

    /// The node's name, if it is still alive.
    #[must_use]
    pub fn node_name(&self, node: NodeId) -> Option<String> {
        self.world.get::<&Name>(node).ok().map(|n| n.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn spawned_node_has_identity_transform() {
        let mut scene = Scene::new();
        let node = scene.add_node("root");
        assert_eq!(scene.transform(node), Some(Transform::default()));
        assert_eq!(scene.node_name(node).as_deref(), Some("root"));
    }

    #[test]
    fn transform_mut_writes_through() {
        let mut scene = Scene::new();
        let node = scene.add_node("arm");
        if let Some(transform) = scene.transform_mut(node) {
            transform.set_translation(Vec3::new(1.0, 2.0, 3.0));
        }
        assert_eq!(
            scene.transform(node).map(|t| t.translation),
            Some(Vec3::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn dead_node_resolves_to_none() {
        let mut scene = Scene::new();
        let node = scene.add_node("temp");
        assert!(scene.remove_node(node));
        assert!(!scene.contains(node));
        assert!(scene.transform(node).is_none());
        assert!(scene.transform_mut(node).is_none());
    }
}
