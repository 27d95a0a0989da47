use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use ddmcrs::cnf::Cnf;
use ddmcrs::config::{Config, WboHeaderMode};
use ddmcrs::order;

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    None,
}

impl LogLevel {
    fn to_trace(&self) -> Option<tracing::Level> {
        Some(match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::None => return None,
        })
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the cnf/wcnf/hwcnf/WBO input file
    #[arg(short, long, value_name = "formula.cnf")]
    cnf_path: String,

    /// Variable-order heuristic: 1/RANDOM, 2/DECLARED, 3/MOST_CLAUSES,
    /// 4/MINFILL, 5/MCS, 6/LEXP, 7/LEXM; negative for inverse order
    #[arg(short = 'o', long, default_value_t = order::MCS, allow_negative_numbers = true)]
    var_order_heuristic: i64,

    /// Read literal weights from the input (weighted counting)
    #[arg(short, long)]
    weighted: bool,

    /// Read show lines from the input (projected counting)
    #[arg(short, long)]
    projected: bool,

    /// Treat the input as a (Min-)MaxSAT instance
    #[arg(short, long)]
    maxsat: bool,

    /// Exact rational weights instead of binary doubles
    #[arg(long)]
    multiple_precision: bool,

    /// Doubles denote log10 of the represented value
    #[arg(long)]
    log_counting: bool,

    /// Seed of the RANDOM heuristic
    #[arg(long, default_value_t = 0)]
    random_seed: u64,

    /// Formula reporting: 0 quiet, 1 parsed input, 2 raw input
    #[arg(long, default_value_t = 0)]
    verbose_cnf: i64,

    /// Solving-phase reporting: 0, 1, 2
    #[arg(long, default_value_t = 0)]
    verbose_solving: i64,

    /// Accept any key=value labels before the trivial bound on WBO headers
    #[arg(long)]
    flexible_wbo_header: bool,

    /// Verbosity level. See `tracing::Level` for more information.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    verbosity: LogLevel,

    /// Print timing statistics
    #[arg(short = 's', long)]
    print_statistics: bool,
}

#[derive(Debug, Clone, Default)]
struct Statistics {
    parsing: Option<Duration>,
    ordering: Option<Duration>,
}

impl Statistics {
    fn print(&self) {
        if let Some(parsing) = self.parsing {
            println!("c parse time: {parsing:.2?}");
        }
        if let Some(ordering) = self.ordering {
            println!("c var order time: {ordering:.2?}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    if let Some(level) = args.verbosity.to_trace() {
        tracing_subscriber::fmt().with_max_level(level).init();
    }

    if !order::is_cnf_heuristic(args.var_order_heuristic) {
        anyhow::bail!(
            "heuristic {} needs a join tree; {}",
            args.var_order_heuristic,
            order::help_var_order_heuristics()
        );
    }

    let config = Config::builder()
        .weighted_counting(args.weighted)
        .projected_counting(args.projected)
        .maxsat_solving(args.maxsat)
        .multiple_precision(args.multiple_precision)
        .log_counting(args.log_counting)
        .random_seed(args.random_seed)
        .verbose_cnf(args.verbose_cnf)
        .verbose_solving(args.verbose_solving)
        .wbo_header_mode(if args.flexible_wbo_header {
            WboHeaderMode::Flexible
        } else {
            WboHeaderMode::Positional
        })
        .build();

    let mut statistics = Statistics::default();

    let parse_start = Instant::now();
    let cnf = Cnf::from_file(&args.cnf_path, &config)
        .with_context(|| format!("could not parse '{}'", args.cnf_path))?;
    statistics.parsing = Some(parse_start.elapsed());

    let order_start = Instant::now();
    let var_order = cnf.cnf_var_order(args.var_order_heuristic);
    statistics.ordering = Some(order_start.elapsed());

    let name = order::heuristic_name(args.var_order_heuristic).unwrap_or("UNKNOWN");
    print!("c {name} var order:");
    for var in &var_order {
        print!(" {var}");
    }
    println!();

    if args.print_statistics {
        statistics.print();
    }

    Ok(())
}
