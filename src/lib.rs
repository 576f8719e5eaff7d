//! Molecular property reports on top of RDKit.
//!
//! `aromaticity` takes a molecule given as SMILES or as a MolFile, hands it to
//! a chemistry toolkit session and reports what the toolkit computes: formula,
//! weight, LogP/LogS, hydrogen-bond donors and acceptors, polar surface area,
//! rotatable bonds, stereo centers and bond statistics. It can also export the
//! molecule as a MolFile (V2000 or V3000) or an SVG depiction, and look up its
//! IUPAC name through a public web service.
//!
//! No chemistry is implemented in this crate. All of it happens in RDKit,
//! reached through the [`Toolkit`] trait.
//!
//! # Quick Start
//!
//! ```no_run
//! use aromaticity::{MoleculeSource, Property, PropertyOptions, ToolkitKind, toolkit};
//!
//! let mut session = toolkit::open(ToolkitKind::Rdkit, toolkit::DEFAULT_PYTHON)?;
//! let ethanol = session.load(&MoleculeSource::Smiles("CCO".into()))?;
//!
//! for property in Property::ALL {
//!     let value = session.property(&ethanol, property, &PropertyOptions::default())?;
//!     println!("{} {}", property.label(), value.render(Some(2)));
//! }
//!
//! session.release(ethanol)?;
//! # Ok::<(), aromaticity::ToolkitError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`model`] — Molecule handles, properties and export parameters
//! - [`toolkit`] — The [`Toolkit`] trait and its RDKit sessions
//! - [`naming`] — IUPAC name lookup (PubChem, NCI CACTUS)
//! - [`config`] — Optional TOML configuration file

pub mod config;
pub mod model;
pub mod naming;
pub mod toolkit;

pub use model::molecule::{Molecule, MoleculeSource, Origin, SourceKind};
pub use model::property::{ParsePropertyError, Property, PropertyOptions, PropertyValue, ValueKind};
pub use model::structure::StructureSummary;
pub use model::types::{InvalidSvgSize, MolFileVersion, ParseMolFileVersionError, SvgSize};

pub use toolkit::{Toolkit, ToolkitInfo, ToolkitKind};

pub use naming::{NameLookup, NameResolver, Provider};

pub use config::{Config, OutputFormat};

pub use config::Error as ConfigError;
pub use naming::Error as NamingError;
pub use toolkit::Error as ToolkitError;
