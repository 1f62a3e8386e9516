use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::io::nifti::write_volume;
use crate::pipeline::Stage;
use crate::volume::unmask;

pub struct Stage6Reproject;

impl Stage6Reproject {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Reproject {
    fn name(&self) -> &'static str {
        "stage6_reproject"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let Some(fit) = &ctx.fit else {
            return Ok(());
        };
        let mask = ctx.mask.as_ref().context("mask missing")?;
        let geometry = ctx.geometry.as_ref().context("mask geometry missing")?;

        let r2_map = unmask(&fit.score, mask)?;
        write_volume(&ctx.output.r2_map_path, &r2_map, geometry)?;
        info!(path = %ctx.output.r2_map_path.display(), "r2_map_written");

        if let Some(gs) = &ctx.gs_fit {
            let gs_map = unmask(&gs.r, mask)?;
            write_volume(&ctx.output.gs_map_path, &gs_map, geometry)?;
            info!(path = %ctx.output.gs_map_path.display(), "gs_corr_map_written");
        }
        Ok(())
    }
}
