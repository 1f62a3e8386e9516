use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::fit::fit_vector;
use crate::pipeline::Stage;
use crate::quality::{global_signal, median_of};

pub struct Stage5GlobalSignal;

impl Stage5GlobalSignal {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5GlobalSignal {
    fn name(&self) -> &'static str {
        "stage5_global_signal"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if !ctx.global_signal {
            return Ok(());
        }
        let Some(denoised) = &ctx.denoised else {
            info!("global signal requested without images; skipped");
            return Ok(());
        };

        let gs = global_signal(denoised.view());
        let fit = fit_vector(denoised.view(), gs.view(), &ctx.fit_opts)
            .context("global-signal correlation")?;
        info!(
            voxels = fit.n_voxels(),
            median_r = median_of(&fit.r),
            "global_signal_correlation_done"
        );
        ctx.gs_fit = Some(fit);
        Ok(())
    }
}
