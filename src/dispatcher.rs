//! Command dispatcher that routes parsed CLI commands to their handlers.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use isa_perf::chart;
use isa_perf::config::{load_config, AccountConfig, Config};
use isa_perf::importers::pdf_text::text_sample;
use isa_perf::importers::{reader_for, PdfTextExtractor, TextExtractor};
use isa_perf::models::Portfolio;
use isa_perf::reports::compare_portfolios;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::cli::{formatters, Commands};

/// Route a parsed command to its handler
pub fn dispatch_command(
    command: Commands,
    config_path: Option<&Path>,
    json_output: bool,
) -> Result<()> {
    match command {
        Commands::Compare {
            chart_data,
            no_chart,
        } => {
            let config = load_config(config_path)?;
            dispatch_compare(&config, chart_data, no_chart, json_output)
        }
        Commands::Flows { account } => {
            let config = load_config(config_path)?;
            dispatch_flows(&config, &account, json_output)
        }
        Commands::Inspect { file, chars } => dispatch_inspect(&file, chars, json_output),
    }
}

/// Read one configured account into a portfolio named as configured
fn read_account(account: &AccountConfig, extractor: &dyn TextExtractor) -> Result<Portfolio> {
    let reader = reader_for(account.provider, extractor);
    let portfolio = reader.read_all(&account.directory).with_context(|| {
        format!(
            "Failed to read {} statements from {:?}",
            account.display_name(),
            account.directory
        )
    })?;
    Ok(portfolio.renamed(account.display_name()))
}

fn dispatch_compare(
    config: &Config,
    chart_data: Option<PathBuf>,
    no_chart: bool,
    json_output: bool,
) -> Result<()> {
    if !json_output {
        println!("Reading statements...");
    }

    let extractor = PdfTextExtractor;
    let mut portfolios = Vec::new();
    for account in &config.accounts {
        match read_account(account, &extractor) {
            Ok(p) => portfolios.push(p),
            Err(e) => {
                warn!("Skipping account {}: {:#}", account.display_name(), e);
                eprintln!("{} {:#}", "✗".red().bold(), e);
            }
        }
    }

    if portfolios.is_empty() {
        if !json_output {
            print!("{}", formatters::format_no_accounts());
        }
        return Err(anyhow!("no account statements could be read"));
    }

    let report = compare_portfolios(&portfolios);
    info!("Compared {} accounts", report.len());

    if json_output {
        println!("{}", formatters::format_comparison_json(&report));
    } else {
        print!("{}", formatters::format_comparison_table(&report));
        if !no_chart {
            print!("{}", chart::render_bar_chart(&report, config.chart.width));
        }
    }

    if let Some(path) = chart_data.as_ref().or(config.chart.data_path.as_ref()) {
        chart::write_chart_data(&report, path)?;
        if !json_output {
            println!("{} Chart data saved to {}", "✓".green().bold(), path.display());
        }
    }

    Ok(())
}

fn dispatch_flows(config: &Config, account_name: &str, json_output: bool) -> Result<()> {
    let account = config.account(account_name).ok_or_else(|| {
        let known: Vec<&str> = config.accounts.iter().map(|a| a.display_name()).collect();
        anyhow!(
            "Unknown account '{}'. Configured accounts: {}",
            account_name,
            known.join(", ")
        )
    })?;

    let portfolio = read_account(account, &PdfTextExtractor)?;

    if json_output {
        println!("{}", formatters::format_flows_json(&portfolio));
    } else {
        print!("{}", formatters::format_flows_table(&portfolio));
        if portfolio.flows_after_valuation().next().is_some() {
            println!(
                "\n{} Some cash flows are dated after the valuation date",
                "⚠".yellow().bold()
            );
        }
    }
    Ok(())
}

fn dispatch_inspect(file: &Path, chars: usize, json_output: bool) -> Result<()> {
    let text = PdfTextExtractor.extract_text(file)?;
    let sample = text_sample(&text, chars);

    if json_output {
        let payload = serde_json::json!({
            "file": file.display().to_string(),
            "total_chars": text.chars().count(),
            "text": sample,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("\n--- {} ---", file.display());
        println!("{}", sample);
    }
    Ok(())
}
