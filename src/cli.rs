use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::confounds::ComponentShortfall;
use crate::fit::{DEFAULT_THRESHOLD, ZeroVariancePolicy};
use crate::quality::DEFAULT_FD_THRESHOLD;

#[derive(Debug, Parser)]
#[command(
    name = "fmri-denoiseqc",
    version,
    about = "Confound selection and voxel-wise R2 maps for fMRI denoising strategies"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Select confounds, score the denoised series against the reference, write reports.
    Run(RunArgs),
    /// Print the columns a strategy selects, one per line.
    Select(SelectArgs),
    /// List the strategy catalog.
    Strategies,
}

#[derive(Debug, Args)]
pub struct ConfoundArgs {
    #[arg(long, help = "Confounds TSV (frames x regressors)")]
    pub confounds: PathBuf,

    #[arg(long, help = "Confounds JSON sidecar with component metadata")]
    pub metadata: PathBuf,

    #[arg(long, help = "Denoising strategy name, e.g. 24HMP-8Phys-4GSR")]
    pub strategy: String,

    #[arg(long, value_enum, default_value_t = ShortfallArg::Fail)]
    pub shortfall: ShortfallArg,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub confounds: ConfoundArgs,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, help = "Reference (undenoised) 4-D NIfTI series")]
    pub reference: Option<PathBuf>,

    #[arg(long, help = "Denoised 4-D NIfTI series")]
    pub denoised: Option<PathBuf>,

    #[arg(long, help = "Brain mask NIfTI (non-zero = inside)")]
    pub mask: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    #[arg(long, value_enum, default_value_t = ZeroVarianceArg::Nan)]
    pub zero_variance: ZeroVarianceArg,

    #[arg(long, default_value_t = DEFAULT_FD_THRESHOLD, help = "Framewise displacement threshold (mm)")]
    pub fd_threshold: f64,

    #[arg(long, default_value_t = false, help = "Also map correlation with the global signal")]
    pub global_signal: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    #[command(flatten)]
    pub confounds: ConfoundArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShortfallArg {
    Fail,
    Warn,
}

impl From<ShortfallArg> for ComponentShortfall {
    fn from(arg: ShortfallArg) -> Self {
        match arg {
            ShortfallArg::Fail => ComponentShortfall::Fail,
            ShortfallArg::Warn => ComponentShortfall::Warn,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ZeroVarianceArg {
    Nan,
    Zero,
}

impl From<ZeroVarianceArg> for ZeroVariancePolicy {
    fn from(arg: ZeroVarianceArg) -> Self {
        match arg {
            ZeroVarianceArg::Nan => ZeroVariancePolicy::Nan,
            ZeroVarianceArg::Zero => ZeroVariancePolicy::Zero,
        }
    }
}
