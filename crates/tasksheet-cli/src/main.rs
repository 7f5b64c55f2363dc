// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use runtime::TracingSink;
use std::env;
use std::path::PathBuf;
use tasksheet_app::{AppState, seed_records};
use tasksheet_tui::TuiOptions;
use time::OffsetDateTime;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    if options.print_seed {
        println!("{}", seed_json()?);
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `tasksheet --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let log_file = config.log_file()?;
    if options.check_only {
        runtime::open_log_file(&log_file)?;
        runtime::log_filter(config.log_level())?;
        return Ok(());
    }
    runtime::init_logging(&log_file, config.log_level())?;

    let mut state = AppState::seeded(OffsetDateTime::now_utc().date());
    state.active_tab = config.default_tab();
    tracing::info!(
        records = state.store.len(),
        config = %options.config_path.display(),
        "starting tasksheet"
    );

    let mut sink = TracingSink;
    let result = tasksheet_tui::run_app(
        &mut state,
        &mut sink,
        TuiOptions {
            narrow_width: config.narrow_width(),
        },
    );
    match &result {
        Ok(()) => tracing::info!(records = state.store.len(), "tasksheet exited"),
        Err(error) => tracing::error!(error = %format!("{error:#}"), "tasksheet failed"),
    }
    result
}

fn seed_json() -> Result<String> {
    serde_json::to_string_pretty(&seed_records()).context("encode seed records as JSON")
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    print_seed: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        print_seed: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--print-seed" => {
                options.print_seed = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("tasksheet: terminal task sheet");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --print-seed             Print the starting rows as JSON");
    println!("  --check                  Validate config and log destination, then exit");
    println!("  --help                   Show this help");
    println!();
    println!("Set TASKSHEET_LOG (for example TASKSHEET_LOG=debug) to override the log filter.");
}
