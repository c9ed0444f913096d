//! Command line options

use clap::{Parser, Subcommand};
use kernel::integrator::SamplingPattern;

/// Bakes and inspects PMJ sample pattern tables.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Number of threads to use for generation.
    #[arg(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 0,
        help = "Use specified number of threads; 0 uses all logical CPUs."
    )]
    n_threads: usize,

    /// Print statistics when done.
    #[arg(long, help = "Print statistics when done.")]
    pub stats: bool,

    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Commands.
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Generate the sample pattern table and write it to a file.
    Bake {
        /// Path to the output file.
        #[arg(long = "out", short = 'o', value_name = "FILE")]
        out: String,
    },

    /// Load a baked table and report its stratification.
    Inspect {
        /// Path to the baked table.
        #[arg(value_name = "FILE")]
        path: String,

        /// Only report this pattern.
        #[arg(long, short = 'p', value_name = "N")]
        pattern: Option<usize>,

        /// Also report the stratification of the sampler output.
        #[arg(long, short = 's', value_name = "PATTERN", help = "Sampling pattern to evaluate: pmj or sobol.")]
        sampler: Option<SamplingPattern>,
    },
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            0 => max_threads,
            n if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            n => n,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bake() {
        let options = Options::try_parse_from(["pattern-tool", "-t", "2", "bake", "--out", "table.pmj"]).unwrap();
        assert!((1..=2).contains(&options.threads()));
        match options.command {
            Command::Bake { out } => assert_eq!(out, "table.pmj"),
            _ => panic!("expected bake"),
        }
    }

    #[test]
    fn parse_inspect() {
        let options = Options::try_parse_from(["pattern-tool", "inspect", "table.pmj", "--pattern", "3"]).unwrap();
        assert!(options.threads() >= 1);
        match options.command {
            Command::Inspect { path, pattern, sampler } => {
                assert_eq!(path, "table.pmj");
                assert_eq!(pattern, Some(3));
                assert_eq!(sampler, None);
            }
            _ => panic!("expected inspect"),
        }
    }

    #[test]
    fn parse_sampler() {
        let options = Options::try_parse_from(["pattern-tool", "inspect", "table.pmj", "--sampler", "Sobol"]).unwrap();
        match options.command {
            Command::Inspect { sampler, .. } => assert_eq!(sampler, Some(SamplingPattern::Sobol)),
            _ => panic!("expected inspect"),
        }

        assert!(Options::try_parse_from(["pattern-tool", "inspect", "table.pmj", "-s", "halton"]).is_err());
    }

    #[test]
    fn threads_follow_logical_cpus() {
        let all = Options::try_parse_from(["pattern-tool", "bake", "-o", "t.pmj"]).unwrap();
        assert_eq!(all.threads(), num_cpus::get());

        let too_many = Options::try_parse_from(["pattern-tool", "-t", "100000", "bake", "-o", "t.pmj"]).unwrap();
        assert_eq!(too_many.threads(), num_cpus::get());
    }

    #[test]
    fn missing_command_is_an_error() {
        assert!(Options::try_parse_from(["pattern-tool"]).is_err());
    }
}
