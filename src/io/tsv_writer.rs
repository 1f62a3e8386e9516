use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use ndarray::Array2;

use crate::fit::FitResult;
use crate::volume::Mask;

/// Frames x selected regressors, header row first. Values use shortest round-trip formatting.
pub fn write_confounds(path: &Path, columns: &[String], matrix: &Array2<f64>) -> Result<()> {
    ensure_len(matrix.ncols(), columns.len(), "confound matrix columns")?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "{}", columns.join("\t"))?;
    for row in matrix.rows() {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(w, "{}", cells.join("\t"))?;
    }
    w.flush()?;
    Ok(())
}

/// One row per in-mask voxel, in mask order.
pub fn write_voxel_scores(path: &Path, mask: &Mask, fit: &FitResult) -> Result<()> {
    let n = mask.count();
    ensure_len(fit.r.len(), n, "r")?;
    ensure_len(fit.score.len(), n, "score")?;
    ensure_len(fit.p_value.len(), n, "p")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    writeln!(w, "voxel\tx\ty\tz\tr\tscore\tp")?;
    for (i, &[x, y, z]) in mask.indices().iter().enumerate() {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            i,
            x,
            y,
            z,
            fmt_value(fit.r[i]),
            fmt_value(fit.score[i]),
            fmt_value(fit.p_value[i])
        )?;
    }
    w.flush()?;
    Ok(())
}

fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "NA".to_string()
    } else {
        v.to_string()
    }
}

fn ensure_len(got: usize, expected: usize, name: &str) -> Result<()> {
    if got != expected {
        bail!("{} length mismatch: {} != {}", name, got, expected);
    }
    Ok(())
}
