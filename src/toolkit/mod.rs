//! Call-through layer to the external chemistry toolkit.
//!
//! All chemistry (parsing, descriptors, depiction, MolFile encoding) happens in
//! RDKit. This module only moves requests and answers across a [`Channel`]:
//!
//! - [`ToolkitKind::Rdkit`] runs RDKit in a child Python process
//!   ([`ProcessChannel`]).
//! - [`ToolkitKind::RdkitEmbedded`] runs it in an embedded interpreter
//!   (requires the `embedded` cargo feature).
//!
//! Both speak the same line protocol (see [`protocol`]) to the same bridge
//! script, so a single [`Session`] type implements [`Toolkit`] for either.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::model::molecule::{Molecule, MoleculeSource};
use crate::model::property::{Property, PropertyOptions, PropertyValue};
use crate::model::structure::StructureSummary;
use crate::model::types::{MolFileVersion, SvgSize};

pub mod error;
pub mod protocol;

mod process;
mod session;

#[cfg(feature = "embedded")]
mod embedded;

pub use error::Error;
pub use process::ProcessChannel;
pub use session::{Channel, Session};

#[cfg(feature = "embedded")]
pub use embedded::EmbeddedChannel;

/// Source of the RDKit bridge, executed by every session.
pub const BRIDGE_SCRIPT: &str = include_str!("bridge.py");

/// Interpreter used for [`ToolkitKind::Rdkit`] when none is configured.
pub const DEFAULT_PYTHON: &str = "python3";

/// Name and version reported by the toolkit during the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ToolkitInfo {
    #[serde(rename = "toolkit")]
    pub name: String,
    pub version: String,
}

impl fmt::Display for ToolkitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Operations the command-line front-end needs from a chemistry toolkit.
///
/// Every method is a single delegating call; implementations must not compute
/// chemistry themselves.
pub trait Toolkit {
    fn info(&self) -> &ToolkitInfo;

    /// Parses a SMILES string or MolFile into a toolkit-owned molecule.
    fn load(&mut self, source: &MoleculeSource) -> Result<Molecule, Error>;

    fn property(
        &mut self,
        molecule: &Molecule,
        property: Property,
        options: &PropertyOptions,
    ) -> Result<PropertyValue, Error>;

    /// Canonical SMILES of the molecule.
    fn smiles(&mut self, molecule: &Molecule) -> Result<String, Error>;

    fn molfile(&mut self, molecule: &Molecule, version: MolFileVersion) -> Result<String, Error>;

    fn svg(&mut self, molecule: &Molecule, size: SvgSize) -> Result<String, Error>;

    fn summary(&mut self, molecule: &Molecule) -> Result<StructureSummary, Error>;

    /// Frees the toolkit-side molecule.
    fn release(&mut self, molecule: Molecule) -> Result<(), Error>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown toolkit: '{0}' (expected rdkit or rdkit-embedded)")]
pub struct ParseToolkitKindError(String);

/// How the RDKit bridge is hosted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolkitKind {
    #[default]
    Rdkit,
    RdkitEmbedded,
}

impl fmt::Display for ToolkitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolkitKind::Rdkit => write!(f, "rdkit"),
            ToolkitKind::RdkitEmbedded => write!(f, "rdkit-embedded"),
        }
    }
}

impl FromStr for ToolkitKind {
    type Err = ParseToolkitKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rdkit" => Ok(ToolkitKind::Rdkit),
            "rdkit-embedded" | "embedded" => Ok(ToolkitKind::RdkitEmbedded),
            _ => Err(ParseToolkitKindError(s.to_string())),
        }
    }
}

/// Starts a toolkit session of the requested kind.
///
/// `python` is only used by [`ToolkitKind::Rdkit`].
pub fn open(kind: ToolkitKind, python: &str) -> Result<Box<dyn Toolkit>, Error> {
    match kind {
        ToolkitKind::Rdkit => {
            let channel = ProcessChannel::spawn(python)?;
            Ok(Box::new(Session::open(channel)?))
        }
        ToolkitKind::RdkitEmbedded => open_embedded(),
    }
}

#[cfg(feature = "embedded")]
fn open_embedded() -> Result<Box<dyn Toolkit>, Error> {
    let channel = EmbeddedChannel::load()?;
    Ok(Box::new(Session::open(channel)?))
}

#[cfg(not(feature = "embedded"))]
fn open_embedded() -> Result<Box<dyn Toolkit>, Error> {
    Err(Error::NotCompiled(ToolkitKind::RdkitEmbedded))
}
