//! CLI binary for THOR - validates the experiment and prepares the output tree

use clap::{CommandFactory, Parser};
use env_logger::Env;
use std::io::{self, BufReader};
use thor_rs::{
    cli::Args,
    configure,
    output::{AssumeAnswer, Confirm, Prompt},
    RunConfig, ThorError, ThorResult,
};

fn run(args: &Args) -> ThorResult<RunConfig> {
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level()))
        .format_timestamp_secs()
        .init();

    log::info!("Starting THOR setup");
    log::info!("Config file: {:?}", args.config);

    let mut confirm: Box<dyn Confirm> = match args.assumed_answer() {
        Some(answer) => Box::new(AssumeAnswer(answer)),
        None => Box::new(Prompt::new(BufReader::new(io::stdin()), io::stderr())),
    };

    let config = configure(args, confirm.as_mut())?;

    log::info!("Experiment name: {}", config.options.name);
    log::info!("BAM files per condition: {}", config.dims.replicates);
    log::info!("Output directory: {:?}", config.layout.output_dir);
    if let Some(report) = &config.layout.report {
        log::info!("Report directory: {:?}", report.dir);
    }

    if args.print_config {
        println!("{}", render_config(&config)?);
    }

    Ok(config)
}

fn render_config(config: &RunConfig) -> ThorResult<String> {
    serde_json::to_string_pretty(config)
        .map_err(|e| ThorError::InvalidConfig(format!("cannot render configuration: {}", e)))
}

/// Handle application errors and provide user-friendly messages
fn handle_error(error: ThorError) -> ! {
    match &error {
        ThorError::Usage(msg) => {
            // Help text first, like a clap usage error
            let _ = Args::command().print_help();
            eprintln!("\nthor: error: {}", msg);
        }
        ThorError::MissingFile { .. } => {
            eprintln!("Error: {}", error);
            eprintln!("Please check the paths listed in your config file and options.");
        }
        ThorError::DimensionMismatch { .. } | ThorError::ReplicateMismatch { .. } => {
            eprintln!("Error: {}", error);
            eprintln!("Give one value per BAM file: all of #rep1 first, then all of #rep2.");
        }
        ThorError::DirectoryConflict(msg) => {
            eprintln!("Error: {}", msg);
            eprintln!("Use --yes to replace existing results or choose another --output-dir.");
        }
        ThorError::InvalidConfig(msg) => {
            eprintln!("Error: Invalid configuration: {}", msg);
        }
        ThorError::Io(e) => {
            eprintln!("Error: I/O error: {}", e);
            eprintln!("Please check file permissions and disk space.");
        }
    }
    std::process::exit(error.exit_code());
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        handle_error(e);
    }
}
