//! Checks the naive and vectorized sphere builders against each other, then
//! writes a 2-D and a 3-D sphere mask.
//!
//! Run with: cargo run --release
//!
//! With no arguments this:
//!   1. runs the equivalence harness and writes `data/timing.txt`
//!   2. saves `data/out.png`    (radius 100, size 256, 2-D)
//!   3. saves `data/out.nii.gz` (radius 100, size 256, 3-D)
//!
//! `data/` must already exist. Set `RUST_LOG=debug` for per-step timings.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use sphere_mask::{HarnessConfig, harness, save, vectorized};

#[derive(Parser, Debug)]
#[command(name = "sphere_mask")]
#[command(about = "Compare naive and vectorized N-D sphere masks and save examples")]
struct Args {
    /// Where to write the timing report
    #[arg(long, default_value = "data/timing.txt")]
    report: PathBuf,

    /// Base path (no extension) for the saved masks
    #[arg(long, default_value = "data/out")]
    out: PathBuf,

    /// Radius of the saved masks
    #[arg(long, default_value_t = 100.0)]
    radius: f64,

    /// Grid side length of the saved masks
    #[arg(long, default_value_t = 256)]
    size: usize,

    /// Skip the naive/vectorized equivalence run
    #[arg(long)]
    skip_harness: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if !args.skip_harness {
        let config = HarnessConfig {
            report_path: args.report.clone(),
            ..Default::default()
        };
        harness::run_and_write(&config).context("equivalence harness failed")?;
    }

    for n_dims in [2, 3] {
        let mask = vectorized::sphere(args.radius, args.size, n_dims)
            .with_context(|| format!("building {n_dims}-D sphere"))?;
        if let Some(path) = save(&mask, &args.out)
            .with_context(|| format!("saving {n_dims}-D sphere to {}", args.out.display()))?
        {
            log::info!("saved {}", path.display());
        }
    }

    Ok(())
}
