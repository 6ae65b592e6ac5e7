//! Configuration loading for Brewlab services.
//!
//! Each service reads its own section. Values are resolved from (in
//! priority order):
//! 1. Environment variables (`BREWLAB_<SECTION>__<KEY>`)
//! 2. Config file (`brewlab.toml` unless another prefix is given)
//! 3. The section type's defaults

use serde::de::DeserializeOwned;

use crate::error::{BrewlabError, Result};

/// File prefix used when no `--config` is given.
pub const DEFAULT_FILE_PREFIX: &str = "brewlab";

/// Load one configuration section.
///
/// A missing file or missing section yields `T::default()`; a section that
/// is present but malformed is an error.
pub fn load_section<T>(file_prefix: &str, section: &str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("BREWLAB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| BrewlabError::Config(e.to_string()))?;

    match cfg.get::<T>(section) {
        Ok(c) => Ok(c),
        Err(config::ConfigError::NotFound(_)) => {
            tracing::debug!(section, "Config section absent, using defaults");
            Ok(T::default())
        }
        Err(e) => Err(BrewlabError::Config(format!("[{section}]: {e}"))),
    }
}
