//! Config loader (strict parsing).

pub mod schema;

use std::fs;

use qualname_core::error::{QualnameError, Result};

pub use schema::{FilterSection, QualnameConfig};

pub fn load_from_file(path: &str) -> Result<QualnameConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| QualnameError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<QualnameConfig> {
    let cfg: QualnameConfig = serde_yaml::from_str(s)
        .map_err(|e| QualnameError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
