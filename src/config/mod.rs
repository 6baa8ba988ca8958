//! Config module.
//! Provides configuration types, the config file location, and XML loading.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{CONFIG_ENV, config_path, default_config_path, path_has_symlink_ancestor};
pub use types::{Config, DEFAULT_DIR_MODE, LogLevel, parse_mode};
pub use xml::{load_config, parse_config};
