//! Voxel-wise goodness-of-fit between two time series per voxel.
//!
//! Per voxel the Pearson `r` between the reference and the transformed series
//! is computed over the full time axis, and the score is `1 - r^2`
//! (unexplained variance). A voxel whose series has zero variance has no
//! defined `r`; [`ZeroVariancePolicy`] decides its score.

use ndarray::{ArrayView1, ArrayView2};

#[cfg(feature = "mt")]
use rayon::prelude::*;

use crate::error::DenoiseError;
use crate::math::stats::{pearson, pearson_p_value};

pub const DEFAULT_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroVariancePolicy {
    /// Score is NaN and never counts as exceeding the threshold.
    #[default]
    Nan,
    /// Score is 0, i.e. treated as unchanged.
    Zero,
}

#[derive(Debug, Clone)]
pub struct FitOptions {
    pub threshold: f64,
    pub zero_variance: ZeroVariancePolicy,
    /// Worker threads for the voxel loop (0 = rayon default). Ignored without `mt`.
    pub threads: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            zero_variance: ZeroVariancePolicy::Nan,
            threads: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FitResult {
    pub r: Vec<f64>,
    pub score: Vec<f64>,
    pub p_value: Vec<f64>,
    pub threshold: f64,
    pub fraction_above: f64,
    pub n_degenerate: usize,
}

impl FitResult {
    pub fn n_voxels(&self) -> usize {
        self.score.len()
    }
}

/// Matrix mode: column `j` of `reference` against column `j` of `transformed`.
pub fn fit_matrices(
    reference: ArrayView2<'_, f64>,
    transformed: ArrayView2<'_, f64>,
    opts: &FitOptions,
) -> Result<FitResult, DenoiseError> {
    if reference.dim() != transformed.dim() {
        return Err(DenoiseError::shape(
            "voxel matrices",
            reference.dim(),
            transformed.dim(),
        ));
    }
    let n_frames = reference.nrows();
    let r = per_voxel(reference.ncols(), opts.threads, |j| {
        pearson(reference.column(j).iter(), transformed.column(j).iter())
    });
    Ok(finish(r, n_frames, opts))
}

/// Vector mode: every column of `matrix` against one shared series.
pub fn fit_vector(
    matrix: ArrayView2<'_, f64>,
    reference: ArrayView1<'_, f64>,
    opts: &FitOptions,
) -> Result<FitResult, DenoiseError> {
    if matrix.nrows() != reference.len() {
        return Err(DenoiseError::shape(
            "reference vector",
            matrix.nrows(),
            reference.len(),
        ));
    }
    let n_frames = matrix.nrows();
    let r = per_voxel(matrix.ncols(), opts.threads, |j| {
        pearson(matrix.column(j).iter(), reference.iter())
    });
    Ok(finish(r, n_frames, opts))
}

/// Fraction of scores strictly above `threshold`; NaN scores count as not above.
pub fn fraction_above(scores: &[f64], threshold: f64) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let above = scores.iter().filter(|&&s| s > threshold).count();
    above as f64 / scores.len() as f64
}

fn finish(r: Vec<Option<f64>>, n_frames: usize, opts: &FitOptions) -> FitResult {
    let mut n_degenerate = 0usize;
    let mut rs = Vec::with_capacity(r.len());
    let mut score = Vec::with_capacity(r.len());
    let mut p_value = Vec::with_capacity(r.len());
    for value in r {
        match value {
            Some(v) => {
                rs.push(v);
                score.push(1.0 - v * v);
                p_value.push(pearson_p_value(v, n_frames));
            }
            None => {
                n_degenerate += 1;
                rs.push(f64::NAN);
                score.push(match opts.zero_variance {
                    ZeroVariancePolicy::Nan => f64::NAN,
                    ZeroVariancePolicy::Zero => 0.0,
                });
                p_value.push(f64::NAN);
            }
        }
    }
    let fraction = fraction_above(&score, opts.threshold);
    FitResult {
        r: rs,
        score,
        p_value,
        threshold: opts.threshold,
        fraction_above: fraction,
        n_degenerate,
    }
}

#[cfg(feature = "mt")]
fn per_voxel<F>(n_voxels: usize, threads: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(usize) -> Option<f64> + Sync + Send,
{
    if threads == 0 {
        return (0..n_voxels).into_par_iter().map(&f).collect();
    }
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(|| (0..n_voxels).into_par_iter().map(&f).collect()),
        Err(err) => {
            tracing::warn!(error = %err, "thread pool unavailable; computing serially");
            (0..n_voxels).map(f).collect()
        }
    }
}

#[cfg(not(feature = "mt"))]
fn per_voxel<F>(n_voxels: usize, threads: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(usize) -> Option<f64>,
{
    let _ = threads;
    (0..n_voxels).map(f).collect()
}
