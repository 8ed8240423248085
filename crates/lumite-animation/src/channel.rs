//! Animation channels.

use lumite_scene::NodeId;

/// Transform property a channel animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    Translation,
    Rotation,
    Scale,
}

impl PathType {
    /// Components per keyframe value: 3 for translation/scale, 4 for
    /// rotation (quaternion).
    #[must_use]
    pub const fn stride(self) -> usize {
        match self {
            Self::Translation | Self::Scale => 3,
            Self::Rotation => 4,
        }
    }
}

/// Binds a sampler's output to one transform path of one node.
///
/// The node reference is non-owning; a channel whose node has been
/// despawned is skipped during playback.
#[derive(Debug, Clone, Copy)]
pub struct AnimationChannel {
    /// Which transform property to write.
    pub path: PathType,
    /// Index into the owning animation's sampler list.
    pub sampler_index: usize,
    /// Target node in the scene's registry.
    pub node: NodeId,
}
