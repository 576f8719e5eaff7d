use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid MolFile version: '{0}' (expected V2000 or V3000)")]
pub struct ParseMolFileVersionError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid SVG size: {0}")]
pub struct InvalidSvgSize(String);

/// Connection table flavour used when writing a MolFile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MolFileVersion {
    #[default]
    #[serde(alias = "v2000")]
    V2000,
    #[serde(alias = "v3000")]
    V3000,
}

impl MolFileVersion {
    pub const ALL: [MolFileVersion; 2] = [MolFileVersion::V2000, MolFileVersion::V3000];

    pub fn as_str(self) -> &'static str {
        match self {
            MolFileVersion::V2000 => "V2000",
            MolFileVersion::V3000 => "V3000",
        }
    }
}

impl fmt::Display for MolFileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MolFileVersion {
    type Err = ParseMolFileVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "V2000" | "2000" => Ok(MolFileVersion::V2000),
            "V3000" | "3000" => Ok(MolFileVersion::V3000),
            _ => Err(ParseMolFileVersionError(s.to_string())),
        }
    }
}

/// Canvas size of an SVG depiction, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SvgSize {
    width: u32,
    height: u32,
}

impl SvgSize {
    pub const DEFAULT_EDGE: u32 = 400;

    pub fn new(width: u32, height: u32) -> Result<Self, InvalidSvgSize> {
        if width == 0 || height == 0 {
            return Err(InvalidSvgSize(format!(
                "{width}x{height} (both edges must be positive)"
            )));
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Default for SvgSize {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_EDGE,
            height: Self::DEFAULT_EDGE,
        }
    }
}

impl fmt::Display for SvgSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}
