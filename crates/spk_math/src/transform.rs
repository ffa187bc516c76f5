// Transform conversion for interchange matrices
//
// Commit objects store a 4x4 affine transform as 16 numbers in row-major
// order with the translation in the last column. The host (and glam) takes
// the same matrix column-major, so the flat array is transposed by a fixed
// permutation. Only the translation entries carry a length unit.

use glam::DMat4;
use thiserror::Error;

use crate::units::{length_to_native, Units};

/// Errors that can occur during transform conversion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("Transform must have 16 elements, got {0}")]
    WrongLength(usize),
}

/// Indices of the translation column in the row-major input.
pub const TRANSLATION_INDICES: [usize; 3] = [3, 7, 11];

/// Column-major position `i` of the output takes row-major element `ROW_TO_COL[i]`.
const ROW_TO_COL: [usize; 16] = [0, 4, 8, 12, 1, 5, 9, 13, 2, 6, 10, 14, 3, 7, 11, 15];

/// Convert a row-major interchange transform into a native matrix.
///
/// Rotation/scale entries and the bottom row pass through unchanged; the
/// translation entries are rescaled from `units` into native lengths.
pub fn transform_to_native(t_arr: &[f64], units: Units) -> Result<DMat4, TransformError> {
    if t_arr.len() != 16 {
        return Err(TransformError::WrongLength(t_arr.len()));
    }

    let mut cols = [0.0; 16];
    for (i, &src) in ROW_TO_COL.iter().enumerate() {
        cols[i] = if TRANSLATION_INDICES.contains(&src) {
            length_to_native(t_arr[src], units)
        } else {
            t_arr[src]
        };
    }

    Ok(DMat4::from_cols_array(&cols))
}
