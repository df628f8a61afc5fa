//! Settings struct with TOML-based sections.
//!
//! Each section maps to a TOML table and can be rewritten on its own.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::tools::{Mkvmerge, DEFAULT_MKVMERGE};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// External MKVToolNix programs.
    #[serde(default)]
    pub tools: ToolSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    /// Defaults for the mux step.
    #[serde(default)]
    pub mux: MuxSettings,
}

/// Locations of the MKVToolNix executables.
///
/// Bare names are looked up on `PATH`; a leading `~` is expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default = "default_mkvmerge_path")]
    pub mkvmerge_path: String,

    #[serde(default = "default_mkvextract_path")]
    pub mkvextract_path: String,
}

fn default_mkvmerge_path() -> String {
    DEFAULT_MKVMERGE.to_string()
}

fn default_mkvextract_path() -> String {
    "mkvextract".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            mkvmerge_path: default_mkvmerge_path(),
            mkvextract_path: default_mkvextract_path(),
        }
    }
}

impl ToolSettings {
    /// The configured mkvmerge toolchain.
    pub fn mkvmerge(&self) -> Mkvmerge {
        Mkvmerge::new(&self.mkvmerge_path)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Level used when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Print commands one option per line instead of a single shell line.
    #[serde(default)]
    pub pretty_command: bool,
}

/// Mux defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MuxSettings {
    /// Discard mkvmerge's progress output.
    #[serde(default)]
    pub silent: bool,

    /// Link split parts to each other unless told otherwise.
    #[serde(default)]
    pub link_splits: bool,
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Tools,
    Logging,
    Mux,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 3] = [ConfigSection::Tools, ConfigSection::Logging, ConfigSection::Mux];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Tools => "tools",
            ConfigSection::Logging => "logging",
            ConfigSection::Mux => "mux",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let toml = toml::to_string_pretty(&Settings::default()).unwrap();
        assert!(toml.contains("[tools]"));
        assert!(toml.contains("[logging]"));
        assert!(toml.contains("mkvmerge_path = \"mkvmerge\""));
        assert!(toml.contains("level = \"info\""));
    }

    #[test]
    fn settings_round_trip() {
        let mut settings = Settings::default();
        settings.logging.level = LogLevel::Debug;
        settings.mux.link_splits = true;
        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[tools]\nmkvmerge_path = \"/opt/mkvtoolnix/mkvmerge\"";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        assert_eq!(parsed.tools.mkvmerge_path, "/opt/mkvtoolnix/mkvmerge");
        assert_eq!(parsed.tools.mkvextract_path, "mkvextract");
        assert_eq!(parsed.logging.level, LogLevel::Info);
        assert!(!parsed.mux.silent);
    }

    #[test]
    fn tool_settings_build_mkvmerge() {
        let tools = ToolSettings {
            mkvmerge_path: "/opt/bin/mkvmerge".to_string(),
            ..Default::default()
        };
        assert_eq!(tools.mkvmerge().path(), std::path::Path::new("/opt/bin/mkvmerge"));
    }
}
