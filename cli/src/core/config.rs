//! # MedAssist Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads, merges, expands and validates the MedAssist
//! configuration. It covers the ambient settings of the front ends: where the
//! reference data lives, where reports go, how the assistant introduces
//! itself, and how the HTTP service binds. The reference tables themselves
//! are not configuration; see `crate::engine::reference`.
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.medassist.toml` in the current directory or ancestors
//!    (the search stops at a directory containing `.git`)
//! 2. User-specific `<config dir>/medassist/config.toml`
//! 3. Default values defined in the code
//!
//! Files are merged key by key before defaults are filled in, so a project
//! file can also set a key back to its default value. Relative paths in a
//! file are resolved against the directory that file lives in.
//!
//! Command-line flags and their environment variables (`--data` /
//! `MEDASSIST_DATA`, `--output` / `MEDASSIST_REPORT_DIR`, `srv` flags) are
//! applied on top by the command handlers.
//!
//! ## Example
//!
//! ```toml
//! [reference]
//! data_file = "~/medassist/clinic-tables.toml"
//!
//! [report]
//! output_dir = "~/reports"
//!
//! [chat]
//! assistant_name = "Clinic Helper"
//!
//! [server]
//! port = 9000
//! enable_cors = false
//! ```
//!
//! The configuration is loaded once per process in `main.rs` and passed by
//! reference to the command handlers.
//!
use crate::core::error::{MedassistError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::{
    fs,
    path::{Path, PathBuf},
};
use toml::Table;
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub server: ServerSection,
}

/// Where to find the reference tables.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReferenceConfig {
    /// Reference data TOML replacing the built-in tables (can use ~).
    pub data_file: Option<String>,
}

/// Settings for the plain-text analysis report.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Directory reports are written to (can use ~).
    #[serde(default = "default_report_dir")]
    pub output_dir: String,
    /// Custom tera template replacing the built-in report layout (can use ~).
    pub template: Option<String>,
}

/// Settings for the chat surface.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Name printed in front of assistant replies.
    #[serde(default = "default_assistant_name")]
    pub assistant_name: String,
}

/// Settings for `medassist srv`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_server_host")]
    pub host: IpAddr,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_report_dir(),
            template: None,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            assistant_name: default_assistant_name(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            host: default_server_host(),
            enable_cors: default_enable_cors(),
        }
    }
}

fn default_report_dir() -> String {
    dirs::download_dir()
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string())
}
fn default_assistant_name() -> String {
    "Medical Assistant".to_string()
}
pub(crate) fn default_server_port() -> u16 {
    8000
}
pub(crate) fn default_server_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}
fn default_enable_cors() -> bool {
    true
}

const PROJECT_CONFIG_FILENAME: &str = ".medassist.toml";

/// Keys holding paths; relative values are relative to the file that sets them.
const PATH_KEYS: [(&str, &str); 3] = [
    ("reference", "data_file"),
    ("report", "template"),
    ("report", "output_dir"),
];

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let merged = merge_configs(user_config.unwrap_or_default(), project_config);
    let mut merged_config: Config = toml::Value::Table(merged)
        .try_into()
        .context("Failed to build merged configuration")?;
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Table>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "MedAssist", "medassist") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Table>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.medassist.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

/// Reads one configuration layer. The file is checked against `Config` on its
/// own so errors name it, and its relative paths are anchored to its directory.
fn load_config_from_path(path: &Path) -> Result<Table> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    let mut table: Table = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))?;
    toml::Value::Table(table.clone())
        .try_into::<Config>()
        .with_context(|| format!("Invalid configuration in file: {}", path.display()))?;
    if let Some(base) = path.parent() {
        anchor_relative_paths(&mut table, base);
    }
    Ok(table)
}

fn anchor_relative_paths(table: &mut Table, base: &Path) {
    for (section, key) in PATH_KEYS {
        let value = table
            .get_mut(section)
            .and_then(toml::Value::as_table_mut)
            .and_then(|entries| entries.get_mut(key));
        if let Some(toml::Value::String(path)) = value {
            let expanded = shellexpand::tilde(path.as_str()).into_owned();
            if Path::new(&expanded).is_relative() {
                *path = base.join(&expanded).to_string_lossy().into_owned();
                debug!("Resolved {}.{} to {}", section, key, path);
            }
        }
    }
}

/// Project keys win over user keys one by one; sections are merged, not replaced.
fn merge_configs(mut user: Table, project: Option<Table>) -> Table {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    for (name, value) in project_cfg {
        match value {
            toml::Value::Table(overlay) => match user.get_mut(&name) {
                Some(toml::Value::Table(base)) => base.extend(overlay),
                _ => {
                    user.insert(name, toml::Value::Table(overlay));
                }
            },
            value => {
                user.insert(name, value);
            }
        }
    }
    user
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    debug!("Expanding paths in configuration...");
    config.report.output_dir = shellexpand::tilde(&config.report.output_dir).into_owned();
    if let Some(data_file) = config.reference.data_file.as_mut() {
        *data_file = shellexpand::tilde(data_file).into_owned();
        debug!("Expanded reference data path: {}", data_file);
    }
    if let Some(template) = config.report.template.as_mut() {
        *template = shellexpand::tilde(template).into_owned();
        debug!("Expanded report template path: {}", template);
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if let Some(data_file) = &config.reference.data_file {
        require_file(data_file, "reference data file")?;
    }
    if let Some(template) = &config.report.template {
        require_file(template, "report template")?;
    }

    let output_dir = PathBuf::from(&config.report.output_dir);
    if output_dir.exists() && !output_dir.is_dir() {
        return Err(anyhow!(MedassistError::Config(format!(
            "Configured report directory '{}' exists but is not a directory.",
            output_dir.display()
        ))));
    }

    if config.chat.assistant_name.trim().is_empty() {
        return Err(anyhow!(MedassistError::Config(
            "chat.assistant_name must not be empty.".to_string()
        )));
    }
    info!("Configuration validation successful.");
    Ok(())
}

fn require_file(path: &str, what: &str) -> Result<()> {
    let path = Path::new(path);
    if !path.is_file() {
        return Err(anyhow!(MedassistError::Config(format!(
            "Configured {} '{}' does not exist or is not a file.",
            what,
            path.display()
        ))));
    }
    Ok(())
}
