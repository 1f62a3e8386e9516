use anyhow::{Result, bail};
use tracing::info;

use crate::ctx::Ctx;
use crate::io::nifti::{read_series, read_volume};
use crate::pipeline::Stage;
use crate::volume::{Mask, apply_mask};

pub struct Stage3Images;

impl Stage3Images {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Images {
    fn name(&self) -> &'static str {
        "stage3_images"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let (reference, denoised, mask) = match (
            &ctx.input.reference,
            &ctx.input.denoised,
            &ctx.input.mask,
        ) {
            (None, None, None) => {
                info!("no images given; voxel-wise stages skipped");
                return Ok(());
            }
            (Some(r), Some(d), Some(m)) => (r.clone(), d.clone(), m.clone()),
            _ => bail!("--reference, --denoised and --mask must be given together"),
        };

        let (geometry, mask_values) = read_volume(&mask)?;
        let mask = Mask::from_values(mask_values.view());
        info!(voxels = mask.count(), dims = ?mask.shape(), "mask_loaded");

        let (ref_geometry, ref_series) = read_series(&reference)?;
        let reference = apply_mask(ref_series.view(), &mask)?;
        drop(ref_series);
        let (_, den_series) = read_series(&denoised)?;
        let denoised = apply_mask(den_series.view(), &mask)?;
        drop(den_series);

        if let Some(table) = &ctx.table {
            if table.n_frames() != reference.nrows() {
                let message = format!(
                    "confound table has {} frames but the series has {}",
                    table.n_frames(),
                    reference.nrows()
                );
                ctx.warn("frame_count", message);
            }
        }

        let mut geometry = geometry;
        geometry.tr = ref_geometry.tr;
        ctx.report.input.n_voxels = Some(mask.count() as u64);
        ctx.report.input.tr = geometry.tr;
        ctx.geometry = Some(geometry);
        ctx.mask = Some(mask);
        ctx.reference = Some(reference);
        ctx.denoised = Some(denoised);
        Ok(())
    }
}
