use std::fmt;
use std::path::PathBuf;

/// Where a MolFile was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Path(PathBuf),
    Stdin,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Path(path) => write!(f, "{}", path.display()),
            Origin::Stdin => write!(f, "<stdin>"),
        }
    }
}

/// Molecule input handed to the toolkit for parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoleculeSource {
    Smiles(String),
    MolFile { text: String, origin: Origin },
}

impl MoleculeSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            MoleculeSource::Smiles(_) => SourceKind::Smiles,
            MoleculeSource::MolFile { .. } => SourceKind::MolFile,
        }
    }

    /// The SMILES text, when the molecule was given as SMILES.
    pub fn as_smiles(&self) -> Option<&str> {
        match self {
            MoleculeSource::Smiles(s) => Some(s),
            MoleculeSource::MolFile { .. } => None,
        }
    }

    /// Short human-readable description used in reports and logs.
    pub fn describe(&self) -> String {
        match self {
            MoleculeSource::Smiles(s) => s.clone(),
            MoleculeSource::MolFile { origin, .. } => origin.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Smiles,
    MolFile,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Smiles => write!(f, "SMILES"),
            SourceKind::MolFile => write!(f, "MolFile"),
        }
    }
}

/// Opaque reference to a molecule owned by a toolkit session.
///
/// Handles are only meaningful to the session that issued them. They carry no
/// chemistry of their own; every question about the molecule goes back through
/// the [`Toolkit`](crate::toolkit::Toolkit).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Molecule {
    id: u64,
    kind: SourceKind,
}

impl Molecule {
    /// Wraps a toolkit-side identifier. Intended for [`Toolkit`](crate::toolkit::Toolkit)
    /// implementations.
    pub fn from_raw(id: u64, kind: SourceKind) -> Self {
        Self { id, kind }
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn source_kind(&self) -> SourceKind {
        self.kind
    }
}
