//! Benchmark runner for the blocked matmul kernels.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use blockmm::driver::{DEFAULT_SEED, doubling, run_suite, stepping};
use blockmm::report::{ConsoleSink, SummarySink, TableSink};
use blockmm::{
    Benchmark, Check, Dims, FillPlan, Kernel, KernelConfig, Sink, Sweep, Variant, verify_pair,
};
use clap::{Parser, Subcommand, ValueEnum};

/// Sweep matrix size, block size and thread count over layout-aware
/// matrix multiplication kernels.
#[derive(Parser)]
#[command(name = "blockmm", version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG wins if set.
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Seed for random operands.
    #[arg(long, default_value_t = DEFAULT_SEED, global = true)]
    seed: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Multiply the 2x2 reference case and print the result.
    Check,

    /// Fixed dimension, block size doubling from 16 up to --max-block.
    Blocks {
        #[arg(long, default_value_t = 1000)]
        dim: usize,
        #[arg(long, default_value_t = 128)]
        max_block: usize,
        /// Thread counts, one sweep each.
        #[arg(long, value_delimiter = ',', default_values_t = [1, 4, 8])]
        threads: Vec<usize>,
    },

    /// Fixed block size, dimension stepping from --from to --to.
    Dims {
        #[arg(long, default_value_t = 100)]
        from: usize,
        #[arg(long, default_value_t = 1000)]
        to: usize,
        #[arg(long, default_value_t = 100)]
        step: usize,
        #[arg(long, default_value_t = 64)]
        block: usize,
        #[arg(long, default_value_t = 1)]
        threads: usize,
        /// Write a (dimension, seconds) table here.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Fixed dimension and block size, varying thread count.
    Threads {
        #[arg(long, default_value_t = 1000)]
        dim: usize,
        #[arg(long, default_value_t = 64)]
        block: usize,
        #[arg(long, value_delimiter = ',', default_values_t = [1, 2, 4, 8])]
        threads: Vec<usize>,
    },

    /// Unblocked kernels across dimensions 100..=1000.
    Baseline {
        #[arg(long, value_enum, default_value_t = Layout::RowRow)]
        variant: Layout,
        #[arg(long, default_value_t = 1000)]
        to: usize,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Layout {
    /// A and B row-major.
    RowRow,
    /// A row-major, B column-major.
    RowCol,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        Command::Check => run_check(),
        Command::Blocks {
            dim,
            max_block,
            threads,
        } => {
            let benches: Vec<_> = threads
                .iter()
                .map(|&t| {
                    let name = format!("{dim}x{dim} blocks, {t} threads");
                    let bench = Benchmark::new(name, Variant::Blocked)
                        .fill(FillPlan::RandomConstant)
                        .check(Check::Reference { timed: true })
                        .seed(cli.seed);
                    let sweep = Sweep::new()
                        .square([dim])
                        .blocks(doubling(16, max_block))
                        .threads([t]);
                    (bench, sweep)
                })
                .collect();
            run_all(&benches, None)
        }
        Command::Dims {
            from,
            to,
            step,
            block,
            threads,
            output,
        } => {
            let name = format!("block {block}, {threads} threads");
            let bench = Benchmark::new(name, Variant::Blocked)
                .fill(FillPlan::RandomConstant)
                .seed(cli.seed);
            let sweep = Sweep::new()
                .square(stepping(from, to, step))
                .blocks([block])
                .threads([threads]);
            run_all(&[(bench, sweep)], output)
        }
        Command::Threads {
            dim,
            block,
            threads,
        } => {
            let bench = Benchmark::new(format!("{dim}x{dim} block {block}"), Variant::Blocked)
                .fill(FillPlan::Constant { a: 1.0, b: 1.0 })
                .check(Check::Analytic);
            let sweep = Sweep::new().square([dim]).blocks([block]).threads(threads);
            run_all(&[(bench, sweep)], None)
        }
        Command::Baseline {
            variant,
            to,
            output,
        } => {
            let (name, variant) = match variant {
                Layout::RowRow => ("naive row x row", Variant::NaiveRowRow),
                Layout::RowCol => ("naive row x col", Variant::NaiveRowCol),
            };
            let bench = Benchmark::new(name, variant)
                .fill(FillPlan::Constant { a: 1.0, b: 1.0 })
                .check(Check::Analytic);
            let sweep = Sweep::new().square(stepping(100, to, 100));
            run_all(&[(bench, sweep)], output)
        }
    }
}

/// Logs go to stderr so stdout only carries results.
fn setup_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run_check() -> Result<()> {
    let a = [1.0, 2.0, 3.0, 4.0];
    // logical B = [[5, 6], [7, 8]]
    let b_col = [5.0, 7.0, 6.0, 8.0];
    let mut c = [0.0; 4];

    let kernel = Kernel::new(KernelConfig::row_col(2))?;
    kernel.multiply(&a, &b_col, &mut c, Dims::square(2));

    println!("Small matrix test:");
    println!("{:8.2}{:8.2}", c[0], c[1]);
    println!("{:8.2}{:8.2}", c[2], c[3]);

    if let Err(mismatch) = verify_pair(&c, &[19.0, 22.0, 43.0, 50.0]) {
        bail!("2x2 check failed: {mismatch}");
    }
    Ok(())
}

fn run_all(benches: &[(Benchmark, Sweep)], output: Option<PathBuf>) -> Result<()> {
    let mut console = ConsoleSink::stdout();
    let mut summary = SummarySink::stdout();
    let mut table = output
        .as_ref()
        .map(TableSink::create)
        .transpose()
        .context("failed to open timing table")?;

    let report = {
        let mut sinks: Vec<&mut dyn Sink> = vec![&mut console, &mut summary];
        if let Some(table) = table.as_mut() {
            sinks.push(table);
        }
        run_suite(benches, &mut sinks).context("benchmark run aborted")?
    };

    console.finish()?;
    summary.finish()?;
    if let Some(table) = table.as_mut() {
        table.finish()?;
        println!("\nTiming data saved to {}", table.path().display());
    }

    // each failure was already logged where it happened
    if !report.passed() {
        bail!("{} benchmark(s) failed verification", report.failures.len());
    }
    Ok(())
}
