use anyhow::{Context, Result};
use tracing::info;

use crate::confounds::confound_matrix;
use crate::ctx::Ctx;
use crate::io::{json_writer, tsv_writer};
use crate::pipeline::Stage;

pub struct Stage7Output;

impl Stage7Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage7Output {
    fn name(&self) -> &'static str {
        "stage7_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let table = ctx.table.as_ref().context("confound table missing")?;
        let selection = ctx.selection.as_ref().context("confound selection missing")?;
        let matrix = confound_matrix(table, selection)?;
        tsv_writer::write_confounds(&ctx.output.confounds_path, &selection.columns, &matrix)?;
        info!(path = %ctx.output.confounds_path.display(), "confounds_written");

        if ctx.write_tsv {
            if let (Some(mask), Some(fit)) = (&ctx.mask, &ctx.fit) {
                tsv_writer::write_voxel_scores(&ctx.output.voxel_tsv_path, mask, fit)?;
                info!(path = %ctx.output.voxel_tsv_path.display(), "voxel_scores_written");
            }
        }

        let report = json_writer::build_report(ctx)?;
        ctx.report = report;
        if ctx.write_json {
            crate::io::write_json(&ctx.output.json_path, &ctx.report)?;
            info!(path = %ctx.output.json_path.display(), "report_written");
        }

        info!("stage7_output_ready");
        Ok(())
    }
}
