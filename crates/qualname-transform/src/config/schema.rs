use serde::Deserialize;

use qualname_core::error::{QualnameError, Result};

use crate::policy::{Filter, FilterGuard, FilterScope};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualnameConfig {
    pub version: u32,

    #[serde(default)]
    pub filter: FilterSection,
}

impl QualnameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(QualnameError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.filter.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    /// Glob over fully qualified names. Absent = deny all.
    #[serde(default)]
    pub pattern: Option<String>,
}

impl FilterSection {
    pub fn validate(&self) -> Result<()> {
        if let Some(p) = &self.pattern {
            if p.is_empty() {
                return Err(QualnameError::Config(
                    "filter.pattern must not be empty (omit it to deny all)".into(),
                ));
            }
        }
        self.to_filter().map(|_| ())
    }

    pub fn to_filter(&self) -> Result<Filter> {
        Filter::from_option(self.pattern.as_deref())
    }

    /// Activate the configured filter on the calling thread.
    pub fn activate(&self) -> Result<FilterScope> {
        Ok(FilterGuard::activate(self.to_filter()?))
    }
}
