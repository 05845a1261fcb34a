//! Transform channels and their matrix form.

use glam::{DMat4, DVec3};

/// The translate/rotate/scale channels of a transform node.
///
/// Rotation is stored as Euler angles in degrees, applied X then Y then Z,
/// which is the host's default rotate order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformChannels {
    /// Translation component.
    pub translate: DVec3,
    /// Euler rotation in degrees.
    pub rotate_degrees: DVec3,
    /// Scale component.
    pub scale: DVec3,
}

impl Default for TransformChannels {
    fn default() -> Self {
        Self {
            translate: DVec3::ZERO,
            rotate_degrees: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

impl TransformChannels {
    /// Creates a new identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Whether all channels are at their identity values.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Local matrix, `T * Rz * Ry * Rx * S`.
    #[must_use]
    pub fn to_matrix(&self) -> DMat4 {
        let r = self.rotate_degrees;
        DMat4::from_translation(self.translate)
            * DMat4::from_rotation_z(r.z.to_radians())
            * DMat4::from_rotation_y(r.y.to_radians())
            * DMat4::from_rotation_x(r.x.to_radians())
            * DMat4::from_scale(self.scale)
    }
}
