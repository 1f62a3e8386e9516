use anyhow::Result;
use tracing::info;

use crate::confounds::{load_confound_table, load_metadata};
use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::quality::{FD_COLUMN, framewise_displacement};

pub struct Stage1Confounds;

impl Stage1Confounds {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Confounds {
    fn name(&self) -> &'static str {
        "stage1_confounds"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let table = load_confound_table(&ctx.input.confounds)?;
        let metadata = load_metadata(&ctx.input.metadata)?;
        info!(
            frames = table.n_frames(),
            columns = table.columns().len(),
            components = metadata.len(),
            "confounds_loaded"
        );

        ctx.fd = framewise_displacement(&table, &ctx.fd_opts);
        match &ctx.fd {
            Some(fd) => info!(
                threshold = fd.threshold,
                percent_above = fd.percent_above,
                "framewise_displacement"
            ),
            None => info!(column = FD_COLUMN, "framewise displacement column absent"),
        }

        ctx.report.input.n_frames = Some(table.n_frames() as u64);
        ctx.table = Some(table);
        ctx.metadata = Some(metadata);
        Ok(())
    }
}
