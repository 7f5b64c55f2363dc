// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tasksheet_app::TabKind;
use tracing_subscriber::EnvFilter;

pub const APP_NAME: &str = "tasksheet";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_NARROW_WIDTH: u16 = 100;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub narrow_width: Option<i64>,
    pub default_tab: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            narrow_width: Some(i64::from(DEFAULT_NARROW_WIDTH)),
            default_tab: Some(TabKind::AllOrders.label().to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("TASKSHEET_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set TASKSHEET_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` at the top and keep settings under [ui] and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Regenerate it with `tasksheet --print-example-config`",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(width) = self.ui.narrow_width
            && (width <= 0 || width > i64::from(u16::MAX))
        {
            bail!(
                "ui.narrow_width in {} must be a positive column count, got {}",
                path.display(),
                width
            );
        }

        if let Some(tab) = &self.ui.default_tab
            && TabKind::parse(tab).is_none()
        {
            let names = TabKind::ALL
                .iter()
                .map(|tab| format!("{:?}", tab.label()))
                .collect::<Vec<_>>()
                .join(", ");
            bail!(
                "ui.default_tab {tab:?} in {} is not a tab; use one of {names}",
                path.display()
            );
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).with_context(|| {
                format!(
                    "log.level {level:?} in {} is not a valid filter; try \"info\" or \"tasksheet=debug\"",
                    path.display()
                )
            })?;
        }

        if let Some(file) = &self.log.file
            && file.trim().is_empty()
        {
            bail!(
                "log.file in {} is empty; remove it to use the default location",
                path.display()
            );
        }

        Ok(())
    }

    pub fn narrow_width(&self) -> u16 {
        self.ui
            .narrow_width
            .and_then(|width| u16::try_from(width).ok())
            .unwrap_or(DEFAULT_NARROW_WIDTH)
    }

    pub fn default_tab(&self) -> TabKind {
        self.ui
            .default_tab
            .as_deref()
            .and_then(TabKind::parse)
            .unwrap_or(TabKind::AllOrders)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        if let Some(file) = &self.log.file {
            return Ok(PathBuf::from(file));
        }
        let data_root = dirs::data_dir()
            .ok_or_else(|| anyhow!("cannot resolve data directory; set [log] file in the config"))?;
        Ok(data_root.join(APP_NAME).join("tasksheet.log"))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# tasksheet config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\n# Terminals narrower than this get the card layout.\nnarrow_width = {}\n# One of \"All Orders\", \"Pending\", \"Reviewed\", \"Arrived\".\ndefault_tab = \"{}\"\n\n[log]\n# Overridden by TASKSHEET_LOG when set.\nlevel = \"{}\"\n# Optional. Default is platform data dir (for example ~/.local/share/tasksheet/tasksheet.log)\n# file = \"/absolute/path/to/tasksheet.log\"\n",
            path.display(),
            DEFAULT_NARROW_WIDTH,
            TabKind::AllOrders.label(),
            DEFAULT_LOG_LEVEL,
        )
    }
}
