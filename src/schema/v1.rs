use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMeta {
    pub confounds: String,
    pub metadata: String,
    pub reference: Option<String>,
    pub denoised: Option<String>,
    pub mask: Option<String>,
    pub n_frames: Option<u64>,
    pub n_voxels: Option<u64>,
    pub tr: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyReport {
    pub name: String,
    pub fragments: Vec<String>,
    pub columns: Vec<String>,
    pub n_columns: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitSummary {
    pub threshold: f64,
    pub fraction_above: f64,
    pub n_voxels: u64,
    pub n_degenerate: u64,
    pub zero_variance: String,
    /// `None` when every score is undefined.
    pub median_score: Option<f64>,
    pub map_path: Option<String>,
    pub voxel_tsv_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSignalSummary {
    pub median_r: Option<f64>,
    pub n_degenerate: u64,
    pub map_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FdReport {
    pub threshold: f64,
    pub n_frames: u64,
    pub n_above: u64,
    pub percent_above: f64,
    pub mean: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TsnrReport {
    pub reference_median: Option<f64>,
    pub denoised_median: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Quality {
    pub framewise_displacement: Option<FdReport>,
    pub tsnr: Option<TsnrReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningEntry {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenoiseQcV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input: InputMeta,
    pub strategy: Option<StrategyReport>,
    pub fit: Option<FitSummary>,
    pub global_signal: Option<GlobalSignalSummary>,
    pub quality: Quality,
    pub warnings: Vec<WarningEntry>,
}

impl DenoiseQcV1 {
    pub fn empty(tool_version: &str, confounds: String, metadata: String) -> Self {
        Self {
            tool: "fmri-denoiseqc".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            input: InputMeta {
                confounds,
                metadata,
                reference: None,
                denoised: None,
                mask: None,
                n_frames: None,
                n_voxels: None,
                tr: None,
            },
            strategy: None,
            fit: None,
            global_signal: None,
            quality: Quality::default(),
            warnings: Vec::new(),
        }
    }
}

/// JSON has no NaN; undefined statistics become `null`.
pub fn finite(value: f64) -> Option<f64> {
    if value.is_finite() { Some(value) } else { None }
}
