//! Configuration for the matcher
//!
//! Configuration is read from TOML text already in memory; the library does no
//! file discovery and reads no environment variables.
//!
//! ## Example (guards.toml):
//! ```toml
//! [matcher]
//! root = "payload"
//! max_mismatches = 20
//! ```

use config_crate::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::matcher::{Matcher, ROOT};

/// Main configuration for shape guards
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GuardConfig {
    /// Matcher settings
    #[serde(default)]
    pub matcher: MatcherConfig,
}

/// Matcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Root token mismatch paths start from
    #[serde(default = "default_root")]
    pub root: String,

    /// Stop collecting mismatches after this many (`0` counts as `1`)
    #[serde(default)]
    pub max_mismatches: Option<usize>,
}

fn default_root() -> String {
    ROOT.to_string()
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_mismatches: None,
        }
    }
}

impl GuardConfig {
    /// Load configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;
        config.try_deserialize()
    }

    /// Render configuration as TOML
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Build a matcher from these settings
    pub fn matcher(&self) -> Matcher {
        Matcher::new(&self.matcher)
    }
}
