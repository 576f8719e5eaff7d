//! Data types exchanged between the command-line layer and the chemistry toolkit.
//!
//! The crate never looks inside a molecule. Everything here is either a handle
//! issued by a [`Toolkit`](crate::toolkit::Toolkit) session or a plain value the
//! toolkit hands back:
//!
//! - [`molecule`] – Opaque molecule handles and the sources they are loaded from.
//! - [`property`] – The closed set of computed properties and their values.
//! - [`types`] – Export parameters (MolFile version, SVG canvas size).
//! - [`structure`] – Display-only structure summary reported by the toolkit.

pub mod molecule;
pub mod property;
pub mod structure;
pub mod types;
