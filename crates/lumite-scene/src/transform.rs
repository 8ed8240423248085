//! Local transform component.

use glam::{Mat4, Quat, Vec3};

/// Local transform of a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent.
    pub translation: Vec3,
    /// Rotation relative to the parent.
    pub rotation: Quat,
    /// Per-axis scale relative to the parent.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Overwrite the translation.
    pub fn set_translation(&mut self, translation: Vec3) {
        self.translation = translation;
    }

    /// Overwrite the rotation.
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    /// Overwrite the scale.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Compose the local transform matrix (translation * rotation * scale).
    #[must_use]
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_is_identity() {
        let transform = Transform::default();
        assert_eq!(transform.local_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn setters_overwrite() {
        let mut transform = Transform::default();
        transform.set_translation(Vec3::new(1.0, 2.0, 3.0));
        transform.set_translation(Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(transform.translation, Vec3::new(4.0, 5.0, 6.0));

        transform.set_scale(Vec3::splat(2.0));
        assert_eq!(transform.scale, Vec3::splat(2.0));

        let rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
        transform.set_rotation(rotation);
        assert_eq!(transform.rotation, rotation);
    }

    #[test]
    fn local_matrix_applies_translation() {
        let mut transform = Transform::default();
        transform.set_translation(Vec3::new(1.0, 0.0, 0.0));
        let point = transform.local_matrix().transform_point3(Vec3::ZERO);
        assert_relative_eq!(point.x, 1.0);
    }
}
