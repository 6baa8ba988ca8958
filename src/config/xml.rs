//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - A missing file means defaults; unknown or malformed fields are errors.
//!
//! Example:
//! ```xml
//! <config>
//!   <log_level>info</log_level>
//!   <log_file>/var/log/fm_io.log</log_file>
//!   <conflict_policy>replace_files</conflict_policy>
//!   <cancellable>true</cancellable>
//!   <dir_mode>0750</dir_mode>
//! </config>
//! ```

use anyhow::{Context, Result, anyhow};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::types::{Config, LogLevel, parse_mode};
use crate::fs_ops::ConflictPolicy;

/// Struct mirroring the XML config for deserialization.
/// Values are read as text and validated afterwards for clearer messages.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    conflict_policy: Option<String>,
    cancellable: Option<String>,
    dir_mode: Option<String>,
}

/// Trimmed, non-empty text of an optional element.
fn text(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Parse config XML text over `Config::default()`.
pub fn parse_config(content: &str) -> Result<Config> {
    let parsed: XmlConfig = if content.trim().is_empty() {
        XmlConfig::default()
    } else {
        from_xml_str(content).context("invalid config XML")?
    };

    let mut cfg = Config::default();
    if let Some(s) = text(&parsed.log_level) {
        cfg.log_level = s.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = text(&parsed.log_file) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = text(&parsed.conflict_policy) {
        cfg.conflict_policy = s.parse::<ConflictPolicy>().map_err(|e| anyhow!(e))?;
    }
    if let Some(s) = text(&parsed.cancellable) {
        cfg.cancellable = parse_bool(s).ok_or_else(|| anyhow!("invalid boolean for cancellable: '{s}'"))?;
    }
    if let Some(s) = text(&parsed.dir_mode) {
        cfg.dir_mode = parse_mode(s).ok_or_else(|| anyhow!("invalid octal dir_mode: '{s}'"))?;
    }
    Ok(cfg)
}

/// Load the config at `path`. A missing file yields defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Config::default());
        }
        Err(e) => return Err(e).with_context(|| format!("reading config {}", path.display())),
    };
    let cfg = parse_config(&content).with_context(|| format!("in config {}", path.display()))?;
    debug!(path = %path.display(), ?cfg, "loaded config");
    Ok(cfg)
}
