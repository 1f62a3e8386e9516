use anyhow::{Context, Result};
use tracing::info;

use crate::confounds::{WarningKind, select_confounds};
use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage2Select;

impl Stage2Select {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Select {
    fn name(&self) -> &'static str {
        "stage2_select"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let table = ctx.table.as_ref().context("confound table missing")?;
        let metadata = ctx.metadata.as_ref().context("confound metadata missing")?;
        let selection = select_confounds(ctx.strategy, table, metadata, &ctx.select_opts)
            .with_context(|| format!("strategy '{}'", ctx.strategy))?;

        info!(
            strategy = %selection.strategy,
            columns = selection.columns.len(),
            "confounds_selected"
        );

        for warning in &selection.warnings {
            let kind = match warning.kind {
                WarningKind::IcaNoiseCount => "ica_noise_count",
                WarningKind::ComponentShortfall => "component_shortfall",
            };
            ctx.warn(kind, warning.message.clone());
        }
        ctx.selection = Some(selection);
        Ok(())
    }
}
