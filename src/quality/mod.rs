use ndarray::{Array1, ArrayView2};

use crate::confounds::ConfoundTable;
use crate::math::stats::{is_varying, mean, median, std, zscore_inplace};

pub const FD_COLUMN: &str = "framewise_displacement";
pub const DEFAULT_FD_THRESHOLD: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct FdOptions {
    pub threshold: f64,
}

impl Default for FdOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_FD_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FdSummary {
    pub threshold: f64,
    pub n_frames: usize,
    pub n_above: usize,
    /// Share of all frames (undefined ones included in the denominator), in percent.
    pub percent_above: f64,
    pub mean: f64,
    pub max: f64,
}

/// `None` when the table has no framewise displacement column.
pub fn framewise_displacement(table: &ConfoundTable, opts: &FdOptions) -> Option<FdSummary> {
    let fd = table.column(FD_COLUMN)?;
    let n_frames = fd.len();
    let defined: Vec<f64> = fd.iter().copied().filter(|v| !v.is_nan()).collect();
    let n_above = defined.iter().filter(|&&v| v > opts.threshold).count();
    let percent_above = if n_frames == 0 {
        0.0
    } else {
        100.0 * n_above as f64 / n_frames as f64
    };
    let max = defined.iter().copied().fold(f64::NAN, f64::max);
    Some(FdSummary {
        threshold: opts.threshold,
        n_frames,
        n_above,
        percent_above,
        mean: if defined.is_empty() { f64::NAN } else { mean(&defined) },
        max,
    })
}

/// Temporal SNR per voxel (mean / std over time, ddof 0); a constant series gives 0.
pub fn temporal_snr(matrix: ArrayView2<'_, f64>) -> Vec<f64> {
    matrix
        .columns()
        .into_iter()
        .map(|col| {
            let series: Vec<f64> = col.to_vec();
            if !is_varying(series.iter()) {
                return 0.0;
            }
            mean(&series) / std(&series)
        })
        .collect()
}

pub fn median_of(values: &[f64]) -> f64 {
    let mut scratch = values.to_vec();
    median(&mut scratch)
}

/// Per-frame mean of the z-scored voxel series. Zero-variance voxels are left out.
pub fn global_signal(matrix: ArrayView2<'_, f64>) -> Array1<f64> {
    let n_frames = matrix.nrows();
    let mut sum = Array1::<f64>::zeros(n_frames);
    let mut used = 0usize;
    for col in matrix.columns() {
        let mut series = col.to_vec();
        if !zscore_inplace(&mut series) {
            continue;
        }
        for (acc, v) in sum.iter_mut().zip(series) {
            *acc += v;
        }
        used += 1;
    }
    if used > 0 {
        sum.mapv_inplace(|v| v / used as f64);
    }
    sum
}
