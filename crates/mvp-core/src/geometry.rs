#![forbid(unsafe_code)]

//! Minimal spatial types exposed by view handles.

/// Position and rotation of a view in its host scene.
///
/// Rotation is a quaternion in `[x, y, z, w]` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 4],
}

impl Transform {
    /// Identity rotation quaternion.
    pub const IDENTITY_ROTATION: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    /// Transform at the origin with no rotation.
    pub const IDENTITY: Self = Self {
        position: [0.0; 3],
        rotation: Self::IDENTITY_ROTATION,
    };

    /// Transform at `position` with no rotation.
    #[must_use]
    pub const fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            rotation: Self::IDENTITY_ROTATION,
        }
    }

    /// Whether the rotation component is the identity.
    #[must_use]
    pub fn has_identity_rotation(&self) -> bool {
        self.rotation == Self::IDENTITY_ROTATION
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
