// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tasksheet_app::{AppEvent, EventSink};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter that beats the config.
pub const LOG_ENV: &str = "TASKSHEET_LOG";

/// Forwards every sheet event to `tracing` as one structured line.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&mut self, event: &AppEvent) {
        let trace = event.trace();
        tracing::info!(
            action = trace.action,
            record = trace.record.map(|id| id.get()),
            field = trace.field.map(|field| field.key()),
            old = trace.old.as_deref(),
            new = trace.new.as_deref(),
            "sheet event"
        );
    }
}

pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| {
            format!(
                "open log file {}; set [log] file to a writable path",
                path.display()
            )
        })
}

pub fn log_filter(default_level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_level)
            .with_context(|| format!("invalid log level {default_level:?}")),
    }
}

/// Installs the global subscriber. Output goes to `path` because the
/// terminal belongs to the TUI.
pub fn init_logging(path: &Path, default_level: &str) -> Result<()> {
    let file = open_log_file(path)?;
    let filter = log_filter(default_level)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}
