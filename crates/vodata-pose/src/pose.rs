use std::{ops::Sub, str::FromStr};

use crate::{euler, PoseError};

/// A flattened `[R | t]` pose as stored on one line of a pose file.
///
/// The 12 values are the row-major 3x4 matrix mapping the camera at that frame to the
/// world frame: indices `{0, 1, 2, 4, 5, 6, 8, 9, 10}` hold the rotation and
/// `{3, 7, 11}` the translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPose(pub [f64; 12]);

impl RawPose {
    /// The identity rotation with the given translation.
    pub fn from_translation(translation: [f64; 3]) -> Self {
        Self::from_rotation_translation(
            &[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            &translation,
        )
    }

    /// Build a pose from a rotation matrix and a translation vector.
    pub fn from_rotation_translation(rotation: &[[f64; 3]; 3], translation: &[f64; 3]) -> Self {
        let mut values = [0.0; 12];
        for (row, (r, t)) in rotation.iter().zip(translation.iter()).enumerate() {
            values[row * 4..row * 4 + 3].copy_from_slice(r);
            values[row * 4 + 3] = *t;
        }
        Self(values)
    }

    /// The 3x3 rotation block.
    pub fn rotation(&self) -> [[f64; 3]; 3] {
        let p = &self.0;
        [[p[0], p[1], p[2]], [p[4], p[5], p[6]], [p[8], p[9], p[10]]]
    }

    /// The translation column.
    pub fn translation(&self) -> [f64; 3] {
        let p = &self.0;
        [p[3], p[7], p[11]]
    }

    /// The flattened values.
    pub fn as_array(&self) -> &[f64; 12] {
        &self.0
    }

    /// Whether the rotation block passes [`euler::is_rotation_matrix`].
    pub fn has_valid_rotation(&self) -> bool {
        euler::is_rotation_matrix(&self.rotation())
    }
}

impl FromStr for RawPose {
    type Err = PoseError;

    /// Parse 12 whitespace separated finite floats.
    ///
    /// The reported line number is 1; use [`crate::io::parse_pose_line`] to attach the
    /// actual position in a file.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::io::parse_pose_line(s, 1)
    }
}

/// A pose as Euler angles `[rx, ry, rz]` (radians) plus translation `[tx, ty, tz]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose6DoF {
    /// Euler angles from [`euler::decompose_rotation`].
    pub rotation: [f64; 3],
    /// Translation, unchanged from the raw pose.
    pub translation: [f64; 3],
}

impl Pose6DoF {
    /// The pose in `[rx, ry, rz, tx, ty, tz]` layout.
    pub fn to_array(&self) -> [f64; 6] {
        let [rx, ry, rz] = self.rotation;
        let [tx, ty, tz] = self.translation;
        [rx, ry, rz, tx, ty, tz]
    }
}

impl Sub for Pose6DoF {
    type Output = OdometryDelta;

    /// `self - rhs`, i.e. the motion from `rhs` to `self`.
    fn sub(self, rhs: Pose6DoF) -> OdometryDelta {
        delta(&rhs, &self)
    }
}

/// Componentwise difference of two consecutive [`Pose6DoF`] in
/// `[drx, dry, drz, dtx, dty, dtz]` layout.
///
/// The angle components are plain differences and are not wrapped into `(-π, π]`, so
/// they are meaningful only for the small rotations between consecutive frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OdometryDelta(pub [f64; 6]);

impl OdometryDelta {
    /// The rotation part `[drx, dry, drz]`.
    pub fn rotation(&self) -> [f64; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// The translation part `[dtx, dty, dtz]`.
    pub fn translation(&self) -> [f64; 3] {
        [self.0[3], self.0[4], self.0[5]]
    }

    /// The delta as an array.
    pub fn as_array(&self) -> &[f64; 6] {
        &self.0
    }

    /// The delta narrowed to single precision, as consumed by training code.
    pub fn to_f32(&self) -> [f32; 6] {
        self.0.map(|v| v as f32)
    }
}

/// Turn a flattened `[R | t]` pose into a [`Pose6DoF`].
///
/// The rotation block is decomposed with [`euler::decompose_rotation`]; the translation
/// is copied as is.
///
/// Example:
///
/// ```
/// use vodata_pose::{assemble_pose, RawPose};
///
/// let raw = RawPose::from_translation([1.0, 2.0, 3.0]);
/// let pose = assemble_pose(&raw);
/// assert_eq!(pose.to_array(), [0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
/// ```
pub fn assemble_pose(raw: &RawPose) -> Pose6DoF {
    Pose6DoF {
        rotation: euler::decompose_rotation(&raw.rotation()),
        translation: raw.translation(),
    }
}

/// Relative motion `pose_b - pose_a`, componentwise, without angle wrapping.
pub fn delta(pose_a: &Pose6DoF, pose_b: &Pose6DoF) -> OdometryDelta {
    let a = pose_a.to_array();
    let b = pose_b.to_array();
    let mut out = [0.0; 6];
    for (o, (va, vb)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = vb - va;
    }
    OdometryDelta(out)
}
