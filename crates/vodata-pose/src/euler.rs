/// Threshold between the regular and the gimbal lock branch of [`decompose_rotation`].
///
/// Four times the machine epsilon of `f64`. Decompositions of borderline matrices only
/// agree with reference outputs when this exact value is used.
pub const EULER_EPSILON: f64 = f64::EPSILON * 4.0;

/// Maximum Frobenius norm of `I - RᵀR` accepted by [`is_rotation_matrix`].
pub const ROTATION_TOLERANCE: f64 = 1e-6;

/// Decompose a rotation matrix into Euler angles `[rx, ry, rz]` in radians.
///
/// The axis convention is fixed: first axis `z`, then `x`, then `y`, without axis
/// repetition or parity, in the rotating frame. With `i = 2`, `j = 0`, `k = 1`:
///
/// ```text
/// cy = sqrt(R[i][i]² + R[j][i]²)
/// cy > EPS:  a = atan2(R[k][j], R[k][k]), b = atan2(-R[k][i], cy), c = atan2(R[j][i], R[i][i])
/// else:      a = atan2(-R[j][k], R[j][j]), b = atan2(-R[k][i], cy), c = 0
/// result = [c, b, a]
/// ```
///
/// When the matrix is at the gimbal lock singularity (`cy <= EPS`) the first returned
/// angle is exactly zero and the whole residual rotation is carried by the last one.
/// Composing the result with [`euler_to_rotation_matrix`] still gives back `R`.
///
/// PRECONDITION: `rotation` is a rotation matrix. It is not validated here, use
/// [`is_rotation_matrix`] for diagnostics.
///
/// Example:
///
/// ```
/// use vodata_pose::euler::decompose_rotation;
///
/// let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
/// assert_eq!(decompose_rotation(&identity), [0.0, 0.0, 0.0]);
/// ```
pub fn decompose_rotation(rotation: &[[f64; 3]; 3]) -> [f64; 3] {
    const I: usize = 2;
    const J: usize = 0;
    const K: usize = 1;

    let m = rotation;
    let cy = (m[I][I] * m[I][I] + m[J][I] * m[J][I]).sqrt();

    let (ax, ay, az) = if cy > EULER_EPSILON {
        (
            m[K][J].atan2(m[K][K]),
            (-m[K][I]).atan2(cy),
            m[J][I].atan2(m[I][I]),
        )
    } else {
        (
            (-m[J][K]).atan2(m[J][J]),
            (-m[K][I]).atan2(cy),
            0.0,
        )
    };

    // rotating frame: first and last angles trade places
    [az, ay, ax]
}

/// Compose a rotation matrix from Euler angles `[rx, ry, rz]`.
///
/// Inverse of [`decompose_rotation`] under the same axis convention.
///
/// Example:
///
/// ```
/// use vodata_pose::euler::{decompose_rotation, euler_to_rotation_matrix};
///
/// let angles = [0.1, 0.2, 0.3];
/// let rotation = euler_to_rotation_matrix(&angles);
/// let back = decompose_rotation(&rotation);
/// assert!((back[1] - 0.2).abs() < 1e-12);
/// ```
pub fn euler_to_rotation_matrix(angles: &[f64; 3]) -> [[f64; 3]; 3] {
    const I: usize = 2;
    const J: usize = 0;
    const K: usize = 1;

    // undo the frame swap
    let (ai, aj, ak) = (angles[2], angles[1], angles[0]);

    let (si, ci) = ai.sin_cos();
    let (sj, cj) = aj.sin_cos();
    let (sk, ck) = ak.sin_cos();

    let cc = ci * ck;
    let cs = ci * sk;
    let sc = si * ck;
    let ss = si * sk;

    let mut m = [[0.0; 3]; 3];
    m[I][I] = cj * ck;
    m[I][J] = sj * sc - cs;
    m[I][K] = sj * cc + ss;
    m[J][I] = cj * sk;
    m[J][J] = sj * ss + cc;
    m[J][K] = sj * cs - sc;
    m[K][I] = -sj;
    m[K][J] = cj * si;
    m[K][K] = cj * ci;
    m
}

/// Check whether a matrix is a rotation, i.e. `RᵀR ≈ I`.
///
/// The Frobenius norm of `I - RᵀR` must stay below [`ROTATION_TOLERANCE`].
pub fn is_rotation_matrix(rotation: &[[f64; 3]; 3]) -> bool {
    let mut norm_sq = 0.0;
    for i in 0..3 {
        for j in 0..3 {
            // (RᵀR)[i][j] is the dot product of columns i and j
            let rtr = (0..3).map(|k| rotation[k][i] * rotation[k][j]).sum::<f64>();
            let identity = if i == j { 1.0 } else { 0.0 };
            norm_sq += (identity - rtr).powi(2);
        }
    }
    norm_sq.sqrt() < ROTATION_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::FRAC_PI_2;

    const IDENTITY: [[f64; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

    fn assert_matrix_eq(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3], epsilon: f64) {
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(a[i][j], b[i][j], epsilon = epsilon);
            }
        }
    }

    #[test]
    fn test_decompose_identity() {
        assert_eq!(decompose_rotation(&IDENTITY), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_decompose_single_axis() {
        let (s, c) = 0.5f64.sin_cos();

        // rotation about z lands in the last angle
        let rot_z = [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]];
        let angles = decompose_rotation(&rot_z);
        assert_abs_diff_eq!(angles[0], 0.0);
        assert_abs_diff_eq!(angles[1], 0.0);
        assert_relative_eq!(angles[2], 0.5, epsilon = 1e-12);

        // rotation about x lands in the middle angle
        let rot_x = [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]];
        let angles = decompose_rotation(&rot_x);
        assert_abs_diff_eq!(angles[0], 0.0);
        assert_relative_eq!(angles[1], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(angles[2], 0.0);

        // rotation about y lands in the first angle
        let rot_y = [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]];
        let angles = decompose_rotation(&rot_y);
        assert_relative_eq!(angles[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(angles[1], 0.0);
        assert_abs_diff_eq!(angles[2], 0.0);
    }

    #[test]
    fn test_compose_decompose_roundtrip() {
        let samples = [-3.0, -1.7, -0.4, 0.0, 0.25, 1.3, 2.9];
        let pitches = [-1.5, -0.7, 0.0, 0.1, 0.9, 1.5];
        for &rx in &samples {
            for &ry in &pitches {
                for &rz in &samples {
                    let rotation = euler_to_rotation_matrix(&[rx, ry, rz]);
                    assert!(is_rotation_matrix(&rotation));

                    let angles = decompose_rotation(&rotation);
                    let rotation_back = euler_to_rotation_matrix(&angles);
                    assert_matrix_eq(&rotation, &rotation_back, 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_decompose_recovers_angles_away_from_singularity() {
        let angles = [0.1, -0.2, 0.3];
        let back = decompose_rotation(&euler_to_rotation_matrix(&angles));
        for (a, b) in angles.iter().zip(back.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gimbal_lock() {
        // middle axis at +90 degrees
        let rotation = [[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]];
        let angles = decompose_rotation(&rotation);
        assert_eq!(angles[0], 0.0);
        assert_relative_eq!(angles[1], FRAC_PI_2);
        assert_abs_diff_eq!(angles[2], 0.0);

        // the fallback keeps the matrix but folds the first angle into the last
        let rotation = euler_to_rotation_matrix(&[0.3, FRAC_PI_2, 0.5]);
        let angles = decompose_rotation(&rotation);
        assert_eq!(angles[0], 0.0);
        assert_relative_eq!(angles[1], FRAC_PI_2);
        assert_relative_eq!(angles[2], 0.2, epsilon = 1e-12);
        assert_matrix_eq(&rotation, &euler_to_rotation_matrix(&angles), 1e-12);
    }

    #[test]
    fn test_gimbal_lock_threshold() {
        // cy == EPS exactly takes the singular branch and pins the first angle to zero
        let at_threshold = [[1.0, 0.0, EULER_EPSILON], [0.0, 1.0, -1.0], [0.0, 0.0, 0.0]];
        let angles = decompose_rotation(&at_threshold);
        assert_eq!(angles[0], 0.0);

        // just above it the regular branch reads the first angle off R[0][2] and R[2][2]
        let above = [
            [1.0, 0.0, 2.0 * EULER_EPSILON],
            [0.0, 1.0, -1.0],
            [0.0, 0.0, 0.0],
        ];
        let angles = decompose_rotation(&above);
        assert_relative_eq!(angles[0], FRAC_PI_2);
    }

    #[test]
    fn test_is_rotation_matrix() {
        assert!(is_rotation_matrix(&IDENTITY));

        let mut scaled = IDENTITY;
        scaled[1] = [0.0, 2.0, 0.0];
        assert!(!is_rotation_matrix(&scaled));

        let rotation = euler_to_rotation_matrix(&[0.4, -1.1, 2.0]);
        assert!(is_rotation_matrix(&rotation));
    }
}
