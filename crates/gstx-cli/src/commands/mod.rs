//! CLI subcommands.

pub mod labels;
pub mod parse;

use std::path::Path;

use gstx_core::GstxConfig;

/// Load configuration from the optional `--config` path.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<GstxConfig> {
    match config_path {
        Some(path) => Ok(GstxConfig::from_file(Path::new(path))?),
        None => Ok(GstxConfig::default()),
    }
}
