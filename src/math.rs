//! Constant builders for transform uniforms.
//!
//! Pure and stateless; used to seed model/view/projection uniforms
//! before the caller installs real matrices.

/// A flat 4×4 identity matrix, row-major.
pub fn identity_matrix() -> [f32; 16] {
    let mut matrix = [0.0; 16];
    matrix[0] = 1.0;
    matrix[5] = 1.0;
    matrix[10] = 1.0;
    matrix[15] = 1.0;
    matrix
}

/// The homogeneous-point constant `(0, 0, 0, 1)`.
pub fn homogeneous_origin() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_has_ones_on_diagonal_only() {
        let m = identity_matrix();
        for row in 0..4 {
            for col in 0..4 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert!((m[row * 4 + col] - expected).abs() < f32::EPSILON);
            }
        }
    }

    #[test]
    fn homogeneous_origin_is_0001() {
        assert_eq!(homogeneous_origin(), [0.0, 0.0, 0.0, 1.0]);
    }
}
