//! Print the tagged blocks of a THOR experiment config file

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;
use thor_rs::blocks::{get_data_block, list_tags, BlockValue};

#[derive(Parser)]
#[command(name = "thor_blocks", version)]
#[command(about = "Show how a THOR config file is split into tagged blocks")]
struct Args {
    /// Experiment config file (plain or gzip compressed)
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Only show these tags [default: every tag in the file]
    #[arg(short, long, value_delimiter = ',')]
    tags: Vec<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(if args.verbose {
        "info"
    } else {
        "warn"
    }))
    .format_timestamp_secs()
    .init();

    let tags = if args.tags.is_empty() {
        list_tags(&args.config)
            .with_context(|| format!("Could not read tags from {}", args.config.display()))?
    } else {
        args.tags.clone()
    };
    log::info!("Found {} tags in {}", tags.len(), args.config.display());

    for tag in &tags {
        let value = get_data_block(&args.config, tag)
            .with_context(|| format!("Could not read block #{}", tag))?;
        match value {
            BlockValue::Scalar(line) => println!("#{}\t{}", tag, line),
            BlockValue::List(lines) => {
                println!("#{}\t[{} lines]", tag, lines.len());
                for line in lines {
                    println!("\t{}", line);
                }
            }
        }
    }

    Ok(())
}
