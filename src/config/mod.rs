//! Optional TOML configuration file.
//!
//! Every key is optional. Values given on the command line win over the file,
//! and the file wins over the built-in defaults; merging happens in the
//! binary, this module only parses and validates.
//!
//! ```toml
//! [toolkit]
//! kind = "rdkit"
//! python = "/opt/conda/bin/python"
//!
//! [naming]
//! provider = "cactus"
//! timeout_ms = 5000
//! retries = 1
//!
//! [export]
//! molfile_version = "V3000"
//! svg_width = 600
//!
//! [output]
//! format = "json"
//! precision = 3
//! ```

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::types::MolFileVersion;
use crate::naming::Provider;
use crate::toolkit::ToolkitKind;

mod error;

pub use error::Error;

/// Environment variable naming a configuration file when `--config` is absent.
pub const CONFIG_ENV: &str = "AROMATICITY_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub toolkit: ToolkitConfig,
    pub naming: NamingConfig,
    pub export: ExportConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolkitConfig {
    pub kind: ToolkitKind,
    /// Interpreter for the `rdkit` session.
    pub python: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingConfig {
    #[serde(default)]
    pub provider: Provider,
    /// Overrides the provider's public URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_retries")]
    pub retries: u32,
}

fn default_timeout_ms() -> u64 {
    10_000
}
fn default_retries() -> u32 {
    2
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            endpoint: None,
            timeout_ms: default_timeout_ms(),
            retries: default_retries(),
        }
    }
}

/// Export settings that, when present, replace the interactive prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub molfile_version: Option<MolFileVersion>,
    pub svg_width: Option<u32>,
    pub svg_height: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    /// Decimals for real-valued properties.
    pub precision: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown output format: '{0}' (expected text or json)")]
pub struct ParseOutputFormatError(String);

/// How the property report is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ParseOutputFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ParseOutputFormatError(s.to_string())),
        }
    }
}

impl Config {
    /// Parses and validates configuration text. `origin` is only used in
    /// error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, Error> {
        let config: Config = toml::from_str(text).map_err(|source| Error::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Loads the file named by `explicit`, else by [`CONFIG_ENV`], else
    /// returns the defaults. The second value is the file actually read.
    pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), Error> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()).map(PathBuf::from));

        match path {
            Some(path) => Ok((Self::load(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.naming.timeout_ms == 0 {
            return Err(Error::Invalid {
                key: "naming.timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        for (key, edge) in [
            ("export.svg_width", self.export.svg_width),
            ("export.svg_height", self.export.svg_height),
        ] {
            if edge == Some(0) {
                return Err(Error::Invalid {
                    key,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        if let Some(python) = &self.toolkit.python {
            if python.trim().is_empty() {
                return Err(Error::Invalid {
                    key: "toolkit.python",
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}
