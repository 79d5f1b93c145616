//! Reserve Rates CLI - quote and inspect conversion rates
//!
//! Builds a rate engine from a TOML reserve description and answers
//! questions about it: rate quotes with a full breakdown, per-asset state,
//! plus offline helpers for compact blobs and step functions.

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

mod codec;
mod config;
mod inspect;
mod quote;

use reserve_rates::{AssetId, Epoch, Side};

#[derive(Parser)]
#[command(name = "reserve-rates")]
#[command(about = "Reserve Rates CLI - quote and inspect reserve conversion rates", long_about = None)]
#[command(version)]
struct Cli {
    /// Reserve description file (default: ./reserve.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a conversion rate
    Quote {
        /// Asset symbol
        asset: AssetId,

        /// Trade direction
        #[arg(short, long, value_enum)]
        side: SideArg,

        /// Source quantity
        #[arg(short, long)]
        qty: u128,

        /// Current epoch
        #[arg(short, long)]
        epoch: Epoch,
    },

    /// Show everything known about one asset
    Inspect {
        /// Asset symbol
        asset: AssetId,

        /// Epoch for the imbalance snapshot (default: last rate update)
        #[arg(short, long)]
        epoch: Option<Epoch>,
    },

    /// List assets in listing order
    List,

    /// Compact delta blobs
    Compact {
        #[command(subcommand)]
        command: CompactCommands,
    },

    /// Evaluate a step function
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
}

#[derive(Subcommand)]
enum CompactCommands {
    /// Pack signed deltas (x10 bps) into a hex blob
    Encode {
        /// Up to 14 deltas
        #[arg(allow_hyphen_values = true)]
        deltas: Vec<i8>,
    },
    /// Unpack a hex blob
    Decode {
        /// Hex blob, optionally 0x-prefixed
        blob: String,
    },
}

#[derive(Subcommand)]
enum StepCommands {
    /// Legacy evaluation at a single point
    Point {
        /// Quantity or imbalance
        #[arg(allow_hyphen_values = true)]
        qty: i128,

        /// Breakpoints, comma separated
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        x: Vec<i128>,

        /// Values in bps, comma separated
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        y: Vec<i128>,
    },
    /// Enhanced evaluation over [from, to)
    Range {
        #[arg(allow_hyphen_values = true)]
        from: i128,

        #[arg(allow_hyphen_values = true)]
        to: i128,

        /// Breakpoints, comma separated
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        x: Vec<i128>,

        /// Values in bps (one more than breakpoints), comma separated
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        y: Vec<i128>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Buy,
    Sell,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Buy => Side::Buy,
            SideArg::Sell => Side::Sell,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    // Offline commands need no reserve file
    match &cli.command {
        Commands::Compact { command } => {
            return match command {
                CompactCommands::Encode { deltas } => codec::compact_encode(deltas, cli.json),
                CompactCommands::Decode { blob } => codec::compact_decode(blob, cli.json),
            };
        }
        Commands::Step { command } => {
            return match command {
                StepCommands::Point { qty, x, y } => codec::step_eval(x, y, *qty, None, cli.json),
                StepCommands::Range { from, to, x, y } => {
                    codec::step_eval(x, y, *from, Some(*to), cli.json)
                }
            };
        }
        _ => {}
    }

    let path = config::resolve_path(cli.config.clone());
    let reserve = config::load(&path)?;
    let engine = config::build_engine(&reserve)?;

    if cli.verbose && !cli.json {
        println!("{} {}", "Reserve:".bright_cyan(), path.display());
        println!("{} {:?}", "Step mode:".bright_cyan(), engine.step_mode());
        println!(
            "{} {} epochs",
            "Valid duration:".bright_cyan(),
            engine.valid_duration()
        );
        println!();
    }

    match cli.command {
        Commands::Quote { asset, side, qty, epoch } => {
            quote::show_quote(&engine, asset, side.into(), qty, epoch, cli.json)?;
        }
        Commands::Inspect { asset, epoch } => {
            inspect::inspect_asset(&engine, asset, epoch, cli.json)?;
        }
        Commands::List => {
            inspect::list_assets(&engine, cli.json)?;
        }
        Commands::Compact { .. } | Commands::Step { .. } => {}
    }

    Ok(())
}
