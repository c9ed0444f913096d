#[macro_use]
extern crate log;

mod options;

use clap::Parser;
use kernel::geometry::Point2f;
use kernel::integrator::{IntegratorConfig, SamplingPattern};
use kernel::{print_stats, report_stats};
use options::*;
use samplers::*;
use std::sync::Arc;

/// Grid resolution of the reported chi-square statistic.
const GRID: usize = 16;

/// Number of sampler outputs scored per dimension.
const SAMPLER_POINTS: u32 = 8192;

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    let result = match &options.command {
        Command::Bake { out } => bake(out, options.threads()),
        Command::Inspect { path, pattern, sampler } => inspect(path, *pattern, *sampler),
    };

    if options.stats {
        report_stats!();
        print_stats!();
    }

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

/// Generates the sample pattern table and writes it to `out`.
fn bake(out: &str, n_threads: usize) -> Result<(), String> {
    info!("Generating sample pattern table on {n_threads} threads");
    let table = SamplePatternTable::from_values(generate_pmj02_patterns(n_threads))?;
    table.save(out)
}

/// Loads the table at `path` and prints the stratification of one or all
/// patterns, and of the sampler output when `sampler` is given.
fn inspect(path: &str, pattern: Option<usize>, sampler: Option<SamplingPattern>) -> Result<(), String> {
    let table = Arc::new(SamplePatternTable::load(path)?);

    let patterns = match pattern {
        Some(p) if p >= NUM_PMJ_PATTERNS => {
            return Err(format!("Pattern {p} out of range, table has {NUM_PMJ_PATTERNS}"));
        }
        Some(p) => p..p + 1,
        None => 0..NUM_PMJ_PATTERNS,
    };

    let dof = (GRID * GRID - 1) as f64;
    println!("pattern  chi2(256)  chi2({NUM_PMJ_SAMPLES})  (dof {dof})");
    for p in patterns {
        let points: Vec<Point2f> = (0..NUM_PMJ_SAMPLES).map(|slot| table.point(p, slot)).collect();
        let prefix = chi_square_2d(&points[..GRID * GRID], GRID);
        let full = chi_square_2d(&points, GRID);
        println!("{p:7}  {prefix:9.2}  {full:10.2}");
        if full > dof {
            warn!("Pattern {p} is poorly stratified (chi-square {full:.2})");
        }
    }

    match sampler {
        Some(sampling_pattern) => inspect_sampler(table, sampling_pattern),
        None => Ok(()),
    }
}

/// Prints the stratification of `sample_2d` over the first samples of a few
/// dimensions, for all samples and for each half of the parity split.
fn inspect_sampler(table: Arc<SamplePatternTable>, sampling_pattern: SamplingPattern) -> Result<(), String> {
    let config = IntegratorConfig {
        sampling_pattern,
        ..Default::default()
    };
    let sampler = PatternSampler::with_table(config, table)?;
    let seed = PixelSeed::new(0, 0, config.seed);

    println!("{sampling_pattern} sampler, {SAMPLER_POINTS} samples");
    println!("dimension  chi2(all)  chi2(even)  chi2(odd)");
    for dimension in [0, 2, 6, 32] {
        let mut all = Vec::with_capacity(SAMPLER_POINTS as usize);
        let mut even = vec![];
        let mut odd = vec![];
        for i in 0..SAMPLER_POINTS {
            let p = sampler.sample_2d(seed, i, dimension);
            all.push(p);
            if sampler.sample_is_even(i) {
                even.push(p);
            } else {
                odd.push(p);
            }
        }
        println!(
            "{dimension:9}  {:9.2}  {:10.2}  {:9.2}",
            chi_square_2d(&all, GRID),
            chi_square_2d(&even, GRID),
            chi_square_2d(&odd, GRID)
        );
    }
    Ok(())
}
