//! Configuration management.
//!
//! - TOML-based configuration with one table per concern
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only the changed table is rewritten)
//!
//! # Example
//!
//! ```no_run
//! use mkvmux_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/mkvmux.toml");
//! config.load_or_create().unwrap();
//!
//! println!("mkvmerge: {}", config.settings().tools.mkvmerge_path);
//!
//! config.settings_mut().mux.silent = true;
//! config.update_section(ConfigSection::Mux).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{ConfigSection, LoggingSettings, MuxSettings, Settings, ToolSettings};
