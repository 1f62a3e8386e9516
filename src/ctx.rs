use std::path::PathBuf;

use ndarray::Array2;

use crate::confounds::{ConfoundMetadata, ConfoundTable, SelectOptions, Selection, Strategy};
use crate::fit::{FitOptions, FitResult};
use crate::io::nifti::Geometry;
use crate::quality::{FdOptions, FdSummary};
use crate::schema::v1::{DenoiseQcV1, WarningEntry};
use crate::volume::Mask;

#[derive(Debug, Clone)]
pub struct InputPaths {
    pub confounds: PathBuf,
    pub metadata: PathBuf,
    pub reference: Option<PathBuf>,
    pub denoised: Option<PathBuf>,
    pub mask: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub voxel_tsv_path: PathBuf,
    pub confounds_path: PathBuf,
    pub r2_map_path: PathBuf,
    pub gs_map_path: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            json_path: out_dir.join("denoiseqc.json"),
            voxel_tsv_path: out_dir.join("voxel_scores.tsv"),
            confounds_path: out_dir.join("confounds_selected.tsv"),
            r2_map_path: out_dir.join("r2_map.nii.gz"),
            gs_map_path: out_dir.join("gs_corr_map.nii.gz"),
            out_dir,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tsnr {
    pub reference_median: f64,
    pub denoised_median: f64,
}

#[derive(Debug)]
pub struct Ctx {
    pub input: InputPaths,
    pub strategy: Strategy,
    pub select_opts: SelectOptions,
    pub fit_opts: FitOptions,
    pub fd_opts: FdOptions,
    pub global_signal: bool,
    pub write_json: bool,
    pub write_tsv: bool,
    pub table: Option<ConfoundTable>,
    pub metadata: Option<ConfoundMetadata>,
    pub selection: Option<Selection>,
    pub fd: Option<FdSummary>,
    pub mask: Option<Mask>,
    pub geometry: Option<Geometry>,
    /// `[t, voxel]` in mask order.
    pub reference: Option<Array2<f64>>,
    pub denoised: Option<Array2<f64>>,
    pub fit: Option<FitResult>,
    pub gs_fit: Option<FitResult>,
    pub tsnr: Option<Tsnr>,
    pub warnings: Vec<WarningEntry>,
    pub output: OutputPaths,
    pub report: DenoiseQcV1,
}

impl Ctx {
    pub fn new(input: InputPaths, strategy: Strategy, out_dir: PathBuf, tool_version: &str) -> Self {
        let report = DenoiseQcV1::empty(
            tool_version,
            input.confounds.display().to_string(),
            input.metadata.display().to_string(),
        );
        Self {
            input,
            strategy,
            select_opts: SelectOptions::default(),
            fit_opts: FitOptions::default(),
            fd_opts: FdOptions::default(),
            global_signal: false,
            write_json: false,
            write_tsv: false,
            table: None,
            metadata: None,
            selection: None,
            fd: None,
            mask: None,
            geometry: None,
            reference: None,
            denoised: None,
            fit: None,
            gs_fit: None,
            tsnr: None,
            warnings: Vec::new(),
            output: OutputPaths::new(out_dir),
            report,
        }
    }

    pub fn warn(&mut self, kind: &str, message: String) {
        tracing::warn!(kind, message = %message, "integrity_warning");
        self.warnings.push(WarningEntry {
            kind: kind.to_string(),
            message,
        });
    }
}
