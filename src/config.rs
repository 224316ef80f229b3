//! Configuration loading.
//!
//! Mirrors the teacher's `Config::load` shape (`toml` + `serde`, a
//! `ConfigError` enum wrapping I/O and parse failures, `#[serde(default
//! = "fn")]` per optional field) but the struct itself is the table
//! spec.md §6.2 names, with the plugin-owned stanzas (`websocket`,
//! `tls`, `database`, `account_registration`, `webirc`) dropped.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Top-level server configuration, loaded from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server_name: String,
    pub network_name: String,
    #[serde(default = "default_max_clients_soft")]
    pub max_clients_soft: usize,
    #[serde(default = "default_net_buffer_size")]
    pub net_buffer_size: usize,
    #[serde(default = "default_recvq_limit")]
    pub recvq_limit: usize,
    #[serde(default = "default_sendq_limit")]
    pub sendq_limit: usize,
    #[serde(default = "default_ping_period")]
    pub ping_period: u64,
    #[serde(default = "default_reg_timeout")]
    pub reg_timeout: u64,
    #[serde(default = "default_dns_timeout")]
    pub dns_timeout: u64,
    /// Default flood-control limit (lines per `flood_threshold` window)
    /// for connections matched by no `connect_class`.
    #[serde(default = "default_flood_limit")]
    pub flood_limit: u32,
    /// Default flood-control window, in seconds.
    #[serde(default = "default_flood_threshold")]
    pub flood_threshold: u64,
    #[serde(default)]
    pub oper_block: Vec<OperBlock>,
    #[serde(default)]
    pub oper_type: Vec<OperType>,
    #[serde(default)]
    pub connect_class: Vec<ConnectClass>,
    #[serde(default = "default_bind")]
    pub bind: Vec<SocketAddr>,
    #[serde(default)]
    pub xline_seed: Vec<XlineSeed>,
    #[serde(default)]
    pub disabled_commands: Vec<String>,
    #[serde(default)]
    pub motd: Vec<String>,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// An `oper_block` entry: credentials plus the named `oper_type` to grant.
#[derive(Debug, Clone, Deserialize)]
pub struct OperBlock {
    pub name: String,
    pub password: String,
    #[serde(default = "default_host_mask")]
    pub host: String,
    #[serde(rename = "type")]
    pub oper_type: String,
}

/// A named bundle of operator privileges referenced by `oper_block.type`.
#[derive(Debug, Clone, Deserialize)]
pub struct OperType {
    pub name: String,
    #[serde(default)]
    pub snomasks: String,
    #[serde(default)]
    pub can_kill: bool,
    #[serde(default)]
    pub can_xline: bool,
    #[serde(default)]
    pub can_rehash: bool,
    #[serde(default)]
    pub can_die: bool,
}

/// A `connect_class`: per-host connection limits and timeouts.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectClass {
    pub name: String,
    #[serde(default = "default_host_mask")]
    pub host: String,
    #[serde(default = "default_max_clients_soft")]
    pub max_clients: usize,
    #[serde(default = "default_ping_period")]
    pub ping_period: u64,
    #[serde(default = "default_flood_limit")]
    pub flood_limit: u32,
    #[serde(default = "default_flood_threshold")]
    pub threshold: u64,
}

/// A seed X-line loaded at startup, grounded in the same
/// `#[serde(default)] + Vec<T>` pattern as `oper_block`.
#[derive(Debug, Clone, Deserialize)]
pub struct XlineSeed {
    pub kind: String,
    pub mask: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub duration_secs: Option<u64>,
}

/// Log output format, selected via `[server] log_format`.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_max_clients_soft() -> usize {
    4096
}
fn default_net_buffer_size() -> usize {
    8192
}
fn default_recvq_limit() -> usize {
    8192
}
fn default_sendq_limit() -> usize {
    1_048_576
}
fn default_ping_period() -> u64 {
    90
}
fn default_reg_timeout() -> u64 {
    60
}
fn default_dns_timeout() -> u64 {
    5
}
fn default_flood_limit() -> u32 {
    10
}
fn default_flood_threshold() -> u64 {
    5
}
fn default_host_mask() -> String {
    "*@*".to_string()
}
fn default_bind() -> Vec<SocketAddr> {
    vec!["127.0.0.1:6667".parse().expect("valid default bind addr")]
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load configuration from a TOML file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Validate cross-field invariants the type system can't express.
    ///
    /// Never panics; collects every problem found so an operator sees
    /// the whole list in one rehash, matching the teacher's
    /// `config::validate` shape.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.server_name.is_empty() {
            errors.push("server_name must not be empty".to_string());
        }
        if self.network_name.is_empty() {
            errors.push("network_name must not be empty".to_string());
        }
        if self.bind.is_empty() {
            errors.push("at least one `bind` address is required".to_string());
        }
        if self.recvq_limit == 0 {
            errors.push("recvq_limit must be greater than zero".to_string());
        }
        if self.sendq_limit == 0 {
            errors.push("sendq_limit must be greater than zero".to_string());
        }
        for oper in &self.oper_block {
            if !self.oper_type.iter().any(|t| t.name == oper.oper_type) {
                errors.push(format!(
                    "oper_block '{}' references unknown oper_type '{}'",
                    oper.name, oper.oper_type
                ));
            }
        }
        for seed in &self.xline_seed {
            if !matches!(seed.kind.as_str(), "K" | "G" | "Z" | "Q" | "E") {
                errors.push(format!(
                    "xline_seed mask '{}' has unknown kind '{}' (expected K/G/Z/Q/E)",
                    seed.mask, seed.kind
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_toml() -> &'static str {
        r#"
        server_name = "irc.example.org"
        network_name = "ExampleNet"
        bind = ["127.0.0.1:6667"]
        "#
    }

    #[test]
    fn defaults_fill_in_missing_fields() {
        let config: Config = toml::from_str(minimal_toml()).unwrap();
        assert_eq!(config.max_clients_soft, 4096);
        assert_eq!(config.ping_period, 90);
        assert!(config.oper_block.is_empty());
    }

    #[test]
    fn validate_rejects_empty_bind() {
        let mut config: Config = toml::from_str(minimal_toml()).unwrap();
        config.bind.clear();
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("bind")));
    }

    #[test]
    fn validate_rejects_dangling_oper_type() {
        let mut config: Config = toml::from_str(minimal_toml()).unwrap();
        config.oper_block.push(OperBlock {
            name: "alice".into(),
            password: "hunter2".into(),
            host: "*@*".into(),
            oper_type: "netadmin".into(),
        });
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("netadmin")));
    }

    #[test]
    fn validate_rejects_unknown_xline_kind() {
        let mut config: Config = toml::from_str(minimal_toml()).unwrap();
        config.xline_seed.push(XlineSeed {
            kind: "X".into(),
            mask: "*@*".into(),
            reason: String::new(),
            duration_secs: None,
        });
        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("unknown kind")));
    }
}
