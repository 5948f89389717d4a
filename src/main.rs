mod config;
mod error;
mod partition;
mod pipeline;
mod primes;
mod reference;
mod report;
mod segment;

use clap::Parser;

use config::{Schedule, SieveConfig};

#[derive(Parser)]
#[command(name = "primecount")]
#[command(
    about = "Count primes up to a bound with a multi-threaded segmented sieve",
    long_about = None
)]
struct Cli {
    #[arg(
        long,
        default_value_t = config::DEFAULT_BOUND,
        help = "Inclusive upper limit of the count"
    )]
    bound: u64,
    #[arg(
        short,
        long = "segment-size",
        default_values_t = [config::DEFAULT_SEGMENT_SIZE],
        help = "Integers per sieve pass; repeat to run once per size"
    )]
    segment_size: Vec<usize>,
    #[arg(
        short,
        long,
        default_value_t = config::DEFAULT_WORKERS,
        help = "Number of worker threads"
    )]
    workers: usize,
    #[arg(
        short,
        long,
        help = "Known prime count for the bound (looked up for powers of ten)"
    )]
    reference: Option<u64>,
    #[arg(
        long,
        value_enum,
        default_value_t = Schedule::Static,
        help = "How segments are handed to workers"
    )]
    schedule: Schedule,
    #[arg(long, help = "Apply the wheel-30 filter while counting survivors")]
    wheel: bool,
    #[arg(short, long, help = "Print the per-worker breakdown")]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let reference_count = cli
        .reference
        .or_else(|| reference::known_count(cli.bound));

    for &segment_size in &cli.segment_size {
        let config = SieveConfig {
            reference_count,
            schedule: cli.schedule,
            wheel: cli.wheel,
            ..SieveConfig::new(cli.bound, segment_size, cli.workers)
        };

        match pipeline::count_primes(&config) {
            Ok(summary) => report::print(&summary, cli.verbose),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_is_the_fixed_run() {
        let cli = Cli::try_parse_from(["primecount"]).unwrap();
        let defaults = SieveConfig::default();

        assert_eq!(cli.bound, defaults.bound);
        assert_eq!(cli.segment_size, vec![defaults.segment_size]);
        assert_eq!(cli.workers, defaults.worker_count);
        assert_eq!(cli.schedule, defaults.schedule);
        assert_eq!(cli.reference, None);
        assert_eq!(reference::known_count(cli.bound), defaults.reference_count);
        assert!(!cli.wheel);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_segment_size_sweep_and_flags() {
        let cli = Cli::try_parse_from([
            "primecount",
            "--bound",
            "1000000",
            "-s",
            "1000",
            "-s",
            "100000",
            "-w",
            "4",
            "--schedule",
            "dynamic",
            "--wheel",
        ])
        .unwrap();

        assert_eq!(cli.bound, 1_000_000);
        assert_eq!(cli.segment_size, vec![1_000, 100_000]);
        assert_eq!(cli.workers, 4);
        assert_eq!(cli.schedule, Schedule::Dynamic);
        assert!(cli.wheel);
    }
}
