use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::{Ctx, Tsnr};
use crate::fit::fit_matrices;
use crate::pipeline::Stage;
use crate::quality::{median_of, temporal_snr};

pub struct Stage4Fit;

impl Stage4Fit {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Fit {
    fn name(&self) -> &'static str {
        "stage4_fit"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let (Some(reference), Some(denoised)) = (&ctx.reference, &ctx.denoised) else {
            return Ok(());
        };

        let fit = fit_matrices(reference.view(), denoised.view(), &ctx.fit_opts)
            .context("voxel-wise fit")?;
        if fit.n_degenerate > 0 {
            warn!(
                voxels = fit.n_degenerate,
                "zero-variance voxels have no defined correlation"
            );
        }
        info!(
            voxels = fit.n_voxels(),
            threshold = fit.threshold,
            fraction_above = fit.fraction_above,
            "r2_fit_done"
        );

        let tsnr = Tsnr {
            reference_median: median_of(&temporal_snr(reference.view())),
            denoised_median: median_of(&temporal_snr(denoised.view())),
        };
        info!(
            reference = tsnr.reference_median,
            denoised = tsnr.denoised_median,
            "tsnr_median"
        );

        ctx.fit = Some(fit);
        ctx.tsnr = Some(tsnr);
        Ok(())
    }
}
