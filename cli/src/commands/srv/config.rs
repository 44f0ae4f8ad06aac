//! # MedAssist Server Configuration
//!
//! File: cli/src/commands/srv/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Defines the `medassist srv` arguments and produces the effective
//! `ServerConfig` by combining them with the `[server]` section of the
//! layered MedAssist configuration (user file, then project file).
//!
//! ## Precedence
//!
//! A command-line value wins only when it differs from the command-line
//! default. A user who runs plain `medassist srv` therefore gets the port and
//! host from `[server]`, while `medassist srv --port 9000` always binds 9000.
//! `--no-cors` disables CORS regardless of the file; without the flag the
//! file's `enable_cors` applies.
//!
//! ```toml
//! # .medassist.toml
//! [server]
//! port = 8080
//! host = "0.0.0.0"
//! enable_cors = false
//! ```
//!
use crate::core::config::{default_server_host, default_server_port, ServerSection};
use clap::Parser;
use std::net::IpAddr;
use tracing::debug;

/// # Server Command Arguments (`SrvArgs`)
#[derive(Parser, Debug)]
#[command(about = "Serve the engines as a local JSON API")]
pub struct SrvArgs {
    /// Port to listen on. The next free port is used if it is taken.
    #[arg(long, short, default_value_t = default_server_port())]
    pub port: u16,

    /// Address to bind.
    #[arg(long, default_value_t = default_server_host())]
    pub host: IpAddr,

    /// Disable CORS headers.
    #[arg(long)]
    pub no_cors: bool,
}

/// Settings the server actually runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub host: IpAddr,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
            host: default_server_host(),
            enable_cors: true,
        }
    }
}

impl ServerConfig {
    fn from_args(args: &SrvArgs) -> Self {
        Self {
            port: args.port,
            host: args.host,
            enable_cors: !args.no_cors,
        }
    }
}

/// Merges `args` over the `[server]` configuration section.
pub fn merge_config(args: &SrvArgs, section: &ServerSection) -> ServerConfig {
    let mut effective = ServerConfig::from_args(args);
    let cli_defaults = SrvArgs::parse_from([""]);

    if args.port == cli_defaults.port {
        effective.port = section.port;
    }
    if args.host == cli_defaults.host {
        effective.host = section.host;
    }
    if !args.no_cors {
        effective.enable_cors = section.enable_cors;
    }

    debug!("Merged server config: {:?}", effective);
    effective
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn section(port: u16, host: &str, enable_cors: bool) -> ServerSection {
        ServerSection {
            port,
            host: host.parse().unwrap(),
            enable_cors,
        }
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(config.enable_cors);
    }

    #[test]
    fn test_cli_defaults_match_config_defaults() {
        let args = SrvArgs::parse_from([""]);
        let merged = merge_config(&args, &ServerSection::default());
        assert_eq!(merged, ServerConfig::default());
    }

    #[test]
    fn test_file_values_apply_when_cli_is_default() {
        let args = SrvArgs::parse_from(["srv"]);
        let merged = merge_config(&args, &section(8080, "0.0.0.0", false));
        assert_eq!(merged.port, 8080);
        assert_eq!(merged.host, "0.0.0.0".parse::<IpAddr>().unwrap());
        assert!(!merged.enable_cors);
    }

    #[test]
    fn test_explicit_cli_values_win() {
        let args = SrvArgs::parse_from(["srv", "--port", "9001", "--host", "10.0.0.5", "--no-cors"]);
        let merged = merge_config(&args, &section(8080, "0.0.0.0", true));
        assert_eq!(merged.port, 9001);
        assert_eq!(merged.host, "10.0.0.5".parse::<IpAddr>().unwrap());
        assert!(!merged.enable_cors);
    }

    #[test]
    fn test_rejects_invalid_host() {
        assert!(SrvArgs::try_parse_from(["srv", "--host", "not-an-ip"]).is_err());
    }
}
