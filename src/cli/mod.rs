use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod formatters;

#[derive(Parser)]
#[command(name = "isa-perf")]
#[command(
    version,
    about = "Compare investment account returns from broker PDF statements"
)]
#[command(
    long_about = "Read Moneyfarm and Interactive Investor PDF statements, extract deposits, withdrawals and the latest account value, then report the annualized (XIRR) and simple total return of each account."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Path to the config file (defaults to <config dir>/isa-perf/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Compare returns across all configured accounts (default)
    Compare {
        /// Also write the chart series as JSON to this path
        #[arg(long)]
        chart_data: Option<PathBuf>,

        /// Skip drawing the bar chart
        #[arg(long)]
        no_chart: bool,
    },

    /// Show the deposits and withdrawals found for one account
    Flows {
        /// Account name as shown in the comparison (e.g. "Moneyfarm")
        account: String,
    },

    /// Print the text extracted from a statement PDF
    Inspect {
        /// Path to the PDF file
        file: PathBuf,

        /// Number of characters to print
        #[arg(short = 'n', long, default_value_t = 1000)]
        chars: usize,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Compare {
            chart_data: None,
            no_chart: false,
        }
    }
}
