use anyhow::{Result, anyhow};

use crate::ctx::Ctx;
use crate::quality::median_of;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let selection = ctx
        .selection
        .as_ref()
        .ok_or_else(|| anyhow!("confound selection missing"))?;
    let frames = ctx.table.as_ref().map(|t| t.n_frames()).unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("fmri-denoiseqc v{}\n", version));
    out.push_str(&format!(
        "Strategy: {} ({} regressors, {} frames)\n",
        selection.strategy,
        selection.columns.len(),
        frames
    ));

    if let Some(fd) = &ctx.fd {
        out.push_str(&format!(
            "FD > {:.2}: {:.1}% of frames\n",
            fd.threshold, fd.percent_above
        ));
    }

    match &ctx.fit {
        Some(fit) => {
            out.push_str(&format!(
                "R2 score > {:.2}: {:.4} of {} voxels (median {:.4}, {} degenerate)\n",
                fit.threshold,
                fit.fraction_above,
                fit.n_voxels(),
                median_of(&fit.score),
                fit.n_degenerate
            ));
        }
        None => out.push_str("R2 map: skipped (no images)\n"),
    }

    if let Some(gs) = &ctx.gs_fit {
        out.push_str(&format!("GS correlation: median r {:.4}\n", median_of(&gs.r)));
    }
    if let Some(tsnr) = &ctx.tsnr {
        out.push_str(&format!(
            "tSNR median: reference {:.2}, denoised {:.2}\n",
            tsnr.reference_median, tsnr.denoised_median
        ));
    }

    Ok(out)
}
