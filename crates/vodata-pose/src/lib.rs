#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the pose module.
pub mod error;

/// Euler angle decomposition of rotation matrices.
pub mod euler;

/// Reading and writing pose files.
pub mod io;

/// Flattened `[R | t]` poses, 6DoF poses and odometry deltas.
pub mod pose;

pub use crate::error::PoseError;
pub use crate::euler::{decompose_rotation, euler_to_rotation_matrix, is_rotation_matrix};
pub use crate::pose::{assemble_pose, delta, OdometryDelta, Pose6DoF, RawPose};
