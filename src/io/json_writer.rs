use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::fit::ZeroVariancePolicy;
use crate::quality::median_of;
use crate::schema::v1::{
    DenoiseQcV1, FdReport, FitSummary, GlobalSignalSummary, InputMeta, Quality, StrategyReport,
    TsnrReport, finite,
};

pub fn build_report(ctx: &Ctx) -> Result<DenoiseQcV1> {
    let input = InputMeta {
        confounds: ctx.input.confounds.display().to_string(),
        metadata: ctx.input.metadata.display().to_string(),
        reference: ctx.input.reference.as_ref().map(|p| p.display().to_string()),
        denoised: ctx.input.denoised.as_ref().map(|p| p.display().to_string()),
        mask: ctx.input.mask.as_ref().map(|p| p.display().to_string()),
        n_frames: ctx.table.as_ref().map(|t| t.n_frames() as u64),
        n_voxels: ctx.mask.as_ref().map(|m| m.count() as u64),
        tr: ctx.geometry.as_ref().and_then(|g| g.tr),
    };

    let selection = ctx.selection.as_ref().context("confound selection missing")?;
    let strategy = StrategyReport {
        name: selection.strategy.name().to_string(),
        fragments: selection
            .strategy
            .fragments()
            .iter()
            .map(|f| f.name().to_string())
            .collect(),
        columns: selection.columns.clone(),
        n_columns: selection.columns.len() as u64,
    };

    let fit = ctx.fit.as_ref().map(|fit| FitSummary {
        threshold: fit.threshold,
        fraction_above: fit.fraction_above,
        n_voxels: fit.n_voxels() as u64,
        n_degenerate: fit.n_degenerate as u64,
        zero_variance: match ctx.fit_opts.zero_variance {
            ZeroVariancePolicy::Nan => "nan".to_string(),
            ZeroVariancePolicy::Zero => "zero".to_string(),
        },
        median_score: finite(median_of(&fit.score)),
        map_path: Some(file_name(&ctx.output.r2_map_path)),
        voxel_tsv_path: ctx.write_tsv.then(|| file_name(&ctx.output.voxel_tsv_path)),
    });

    let global_signal = ctx.gs_fit.as_ref().map(|gs| GlobalSignalSummary {
        median_r: finite(median_of(&gs.r)),
        n_degenerate: gs.n_degenerate as u64,
        map_path: Some(file_name(&ctx.output.gs_map_path)),
    });

    let quality = Quality {
        framewise_displacement: ctx.fd.as_ref().map(|fd| FdReport {
            threshold: fd.threshold,
            n_frames: fd.n_frames as u64,
            n_above: fd.n_above as u64,
            percent_above: fd.percent_above,
            mean: finite(fd.mean),
            max: finite(fd.max),
        }),
        tsnr: ctx.tsnr.as_ref().map(|t| TsnrReport {
            reference_median: finite(t.reference_median),
            denoised_median: finite(t.denoised_median),
        }),
    };

    Ok(DenoiseQcV1 {
        tool: "fmri-denoiseqc".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: "v1".to_string(),
        input,
        strategy: Some(strategy),
        fit,
        global_signal,
        quality,
        warnings: ctx.warnings.clone(),
    })
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
