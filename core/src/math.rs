//! Math type aliases and helper functions.
//!
//! Export math is double precision throughout: positions are written as
//! `f64`, so transforms are composed and applied in `f64` as well.

pub use nalgebra;

/// 3D vector (f64).
pub type Vec3 = nalgebra::Vector3<f64>;

/// 4x4 matrix (f64).
pub type Mat4 = nalgebra::Matrix4<f64>;

/// Quaternion (f64). Stored as `[x, y, z, w]` in memory.
/// Use [`quat_from_xyzw`] or `Quaternion::new(w, x, y, z)` to construct.
pub type Quat = nalgebra::Quaternion<f64>;

/// A signed coordinate axis, used to describe forward/up conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// +X
    X,
    /// +Y
    Y,
    /// +Z
    Z,
    /// -X
    NegX,
    /// -Y
    NegY,
    /// -Z
    NegZ,
}

impl Axis {
    /// Unit vector pointing along this axis.
    pub fn vector(self) -> Vec3 {
        match self {
            Self::X => Vec3::x(),
            Self::Y => Vec3::y(),
            Self::Z => Vec3::z(),
            Self::NegX => -Vec3::x(),
            Self::NegY => -Vec3::y(),
            Self::NegZ => -Vec3::z(),
        }
    }

    /// Index of the underlying coordinate (0 = X, 1 = Y, 2 = Z).
    pub fn index(self) -> usize {
        match self {
            Self::X | Self::NegX => 0,
            Self::Y | Self::NegY => 1,
            Self::Z | Self::NegZ => 2,
        }
    }

    /// Parse the usual short notation (`X`, `-Z`, ...), case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" | "+X" => Some(Self::X),
            "Y" | "+Y" => Some(Self::Y),
            "Z" | "+Z" => Some(Self::Z),
            "-X" => Some(Self::NegX),
            "-Y" => Some(Self::NegY),
            "-Z" => Some(Self::NegZ),
            _ => None,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::NegX => "-X",
            Self::NegY => "-Y",
            Self::NegZ => "-Z",
        })
    }
}

/// Source scene convention: forward is +Y, up is +Z.
pub const SOURCE_FORWARD: Axis = Axis::Y;
/// Source scene convention: forward is +Y, up is +Z.
pub const SOURCE_UP: Axis = Axis::Z;

/// Rotation taking the source convention (forward +Y, up +Z) to the given
/// target forward/up pair.
///
/// Returns `None` when `forward` and `up` share a coordinate axis.
pub fn axis_conversion(to_forward: Axis, to_up: Axis) -> Option<Mat4> {
    if to_forward.index() == to_up.index() {
        return None;
    }

    let src_f = SOURCE_FORWARD.vector();
    let src_u = SOURCE_UP.vector();
    let src_r = src_f.cross(&src_u);

    let dst_f = to_forward.vector();
    let dst_u = to_up.vector();
    let dst_r = dst_f.cross(&dst_u);

    let src = nalgebra::Matrix3::from_columns(&[src_f, src_u, src_r]);
    let dst = nalgebra::Matrix3::from_columns(&[dst_f, dst_u, dst_r]);

    // Both bases are orthonormal, so the inverse is the transpose.
    Some((dst * src.transpose()).to_homogeneous())
}

/// Build a 4x4 TRS matrix from scale, rotation (quaternion), and translation.
pub fn mat4_from_scale_rotation_translation(
    scale: Vec3,
    rotation: Quat,
    translation: Vec3,
) -> Mat4 {
    let r = nalgebra::UnitQuaternion::new_normalize(rotation);
    let m = r.to_rotation_matrix();
    let rm = m.matrix();
    #[rustfmt::skip]
    let result = Mat4::new(
        rm[(0, 0)] * scale.x, rm[(0, 1)] * scale.y, rm[(0, 2)] * scale.z, translation.x,
        rm[(1, 0)] * scale.x, rm[(1, 1)] * scale.y, rm[(1, 2)] * scale.z, translation.y,
        rm[(2, 0)] * scale.x, rm[(2, 1)] * scale.y, rm[(2, 2)] * scale.z, translation.z,
        0.0,                  0.0,                  0.0,                  1.0,
    );
    result
}

/// Build a translation-only 4x4 matrix.
pub fn mat4_from_translation(t: Vec3) -> Mat4 {
    Mat4::new_translation(&t)
}

/// Build a (possibly non-uniform) scale matrix.
pub fn mat4_from_scale(s: Vec3) -> Mat4 {
    Mat4::new_nonuniform_scaling(&s)
}

/// Build a uniform scale matrix.
pub fn mat4_from_uniform_scale(s: f64) -> Mat4 {
    Mat4::new_scaling(s)
}

/// Create a quaternion from x, y, z, w components.
pub fn quat_from_xyzw(x: f64, y: f64, z: f64, w: f64) -> Quat {
    nalgebra::Quaternion::new(w, x, y, z)
}

/// Create a quaternion from a `[x, y, z, w]` array.
pub fn quat_from_array(a: [f64; 4]) -> Quat {
    nalgebra::Quaternion::new(a[3], a[0], a[1], a[2])
}

/// Create a quaternion from rotation around the Z axis.
pub fn quat_from_rotation_z(angle: f64) -> Quat {
    nalgebra::UnitQuaternion::from_axis_angle(&nalgebra::Vector3::z_axis(), angle).into_inner()
}

/// Apply an affine transform to a point.
pub fn transform_point(m: &Mat4, p: [f64; 3]) -> [f64; 3] {
    let out = m.transform_point(&nalgebra::Point3::new(p[0], p[1], p[2]));
    [out.x, out.y, out.z]
}
