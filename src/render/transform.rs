//! The triangle's rotation transform.

use glam::{Mat4, Vec4};

/// Rotation by `angle` radians in the XY plane, identity along Z and W.
///
/// As rows: `[cos -sin 0 0] [sin cos 0 0] [0 0 1 0] [0 0 0 1]`.
pub fn rotation_matrix(angle: f32) -> Mat4 {
    let (sin, cos) = angle.sin_cos();
    Mat4::from_cols(
        Vec4::new(cos, sin, 0.0, 0.0),
        Vec4::new(-sin, cos, 0.0, 0.0),
        Vec4::Z,
        Vec4::W,
    )
}
