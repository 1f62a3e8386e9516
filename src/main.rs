use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fmri_denoiseqc::cli::{Cli, Commands, ConfoundArgs, RunArgs};
use fmri_denoiseqc::confounds::{
    SelectOptions, Strategy, load_confound_table, load_metadata, select_confounds,
};
use fmri_denoiseqc::ctx::{Ctx, InputPaths};
use fmri_denoiseqc::fit::FitOptions;
use fmri_denoiseqc::io;
use fmri_denoiseqc::pipeline::Pipeline;
use fmri_denoiseqc::quality::FdOptions;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args)?,
        Commands::Select(args) => select(args.confounds)?,
        Commands::Strategies => print_strategies(),
    }

    Ok(())
}

fn run(args: RunArgs) -> Result<()> {
    let strategy: Strategy = args.confounds.strategy.parse()?;
    let input = InputPaths {
        confounds: args.confounds.confounds,
        metadata: args.confounds.metadata,
        reference: args.reference,
        denoised: args.denoised,
        mask: args.mask,
    };
    let mut ctx = Ctx::new(input, strategy, args.out, env!("CARGO_PKG_VERSION"));
    ctx.select_opts = SelectOptions {
        shortfall: args.confounds.shortfall.into(),
    };
    ctx.fit_opts = FitOptions {
        threshold: args.threshold,
        zero_variance: args.zero_variance.into(),
        threads: args.threads,
    };
    ctx.fd_opts = FdOptions {
        threshold: args.fd_threshold,
    };
    ctx.global_signal = args.global_signal;
    ctx.write_json = args.json;
    ctx.write_tsv = args.tsv;

    Pipeline::full().run(&mut ctx)?;
    print_summary(&ctx)
}

fn select(args: ConfoundArgs) -> Result<()> {
    let strategy: Strategy = args.strategy.parse()?;
    let table = load_confound_table(&args.confounds)?;
    let metadata = load_metadata(&args.metadata)?;
    let opts = SelectOptions {
        shortfall: args.shortfall.into(),
    };
    let selection = select_confounds(strategy, &table, &metadata, &opts)?;
    for warning in &selection.warnings {
        tracing::warn!(message = %warning.message, "integrity_warning");
    }
    for column in &selection.columns {
        println!("{}", column);
    }
    Ok(())
}

fn print_strategies() {
    for strategy in Strategy::ALL {
        let fragments: Vec<&str> = strategy.fragments().iter().map(|f| f.name()).collect();
        println!("{}\t{}", strategy, fragments.join(","));
    }
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning.message);
        }
    }
    Ok(())
}
