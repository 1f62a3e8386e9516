//! Brain mask, voxel extraction and reprojection.
//!
//! Voxel order is the row-major traversal of the mask's true positions
//! (last axis fastest). Extraction and reprojection both go through
//! [`Mask::indices`], so a score vector computed from extracted columns lands
//! back on the voxel it came from.

use ndarray::{Array2, Array3, Array4, ArrayView3, ArrayView4};

use crate::error::DenoiseError;

#[derive(Debug, Clone)]
pub struct Mask {
    data: Array3<bool>,
    indices: Vec<[usize; 3]>,
}

impl Mask {
    pub fn new(data: Array3<bool>) -> Self {
        let indices = data
            .indexed_iter()
            .filter(|(_, inside)| **inside)
            .map(|((x, y, z), _)| [x, y, z])
            .collect();
        Self { data, indices }
    }

    /// Non-zero, non-NaN voxels are inside the mask.
    pub fn from_values(values: ArrayView3<'_, f64>) -> Self {
        Self::new(values.mapv(|v| v != 0.0 && !v.is_nan()))
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn count(&self) -> usize {
        self.indices.len()
    }

    pub fn indices(&self) -> &[[usize; 3]] {
        &self.indices
    }

    pub fn data(&self) -> &Array3<bool> {
        &self.data
    }
}

/// 4-D series `[x, y, z, t]` -> VoxelMatrix `[t, voxel]` in mask order.
pub fn apply_mask(series: ArrayView4<'_, f64>, mask: &Mask) -> Result<Array2<f64>, DenoiseError> {
    let (nx, ny, nz, nt) = series.dim();
    if (nx, ny, nz) != mask.shape() {
        return Err(DenoiseError::shape(
            "series spatial dims vs mask",
            mask.shape(),
            (nx, ny, nz),
        ));
    }
    let mut out = Array2::zeros((nt, mask.count()));
    for (j, &[x, y, z]) in mask.indices().iter().enumerate() {
        for t in 0..nt {
            out[[t, j]] = series[[x, y, z, t]];
        }
    }
    Ok(out)
}

/// Values of a 3-D volume at the mask's true positions, in mask order.
pub fn extract(volume: ArrayView3<'_, f64>, mask: &Mask) -> Result<Vec<f64>, DenoiseError> {
    if volume.dim() != mask.shape() {
        return Err(DenoiseError::shape("volume vs mask", mask.shape(), volume.dim()));
    }
    Ok(mask
        .indices()
        .iter()
        .map(|&[x, y, z]| volume[[x, y, z]])
        .collect())
}

/// Scatter a per-voxel vector back into a volume shaped like the mask; zero outside.
pub fn unmask(values: &[f64], mask: &Mask) -> Result<Array3<f64>, DenoiseError> {
    if values.len() != mask.count() {
        return Err(DenoiseError::shape(
            "vector length vs mask voxel count",
            mask.count(),
            values.len(),
        ));
    }
    let mut out = Array3::zeros(mask.shape());
    for (&v, &[x, y, z]) in values.iter().zip(mask.indices()) {
        out[[x, y, z]] = v;
    }
    Ok(out)
}

/// Inverse of [`apply_mask`]: VoxelMatrix `[t, voxel]` -> 4-D series, zero outside the mask.
pub fn unmask_series(matrix: &Array2<f64>, mask: &Mask) -> Result<Array4<f64>, DenoiseError> {
    if matrix.ncols() != mask.count() {
        return Err(DenoiseError::shape(
            "matrix columns vs mask voxel count",
            mask.count(),
            matrix.ncols(),
        ));
    }
    let (nx, ny, nz) = mask.shape();
    let nt = matrix.nrows();
    let mut out = Array4::zeros((nx, ny, nz, nt));
    for (j, &[x, y, z]) in mask.indices().iter().enumerate() {
        for t in 0..nt {
            out[[x, y, z, t]] = matrix[[t, j]];
        }
    }
    Ok(out)
}
