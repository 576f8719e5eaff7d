use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Connectivity overview of a loaded molecule, as reported by the toolkit.
///
/// Only used for display; none of these numbers are derived locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureSummary {
    /// Atom counts keyed by element symbol, implicit hydrogens included.
    pub elements: BTreeMap<String, u64>,
    pub heavy_atoms: u64,
    pub bonds: u64,
    pub rings: u64,
    pub formal_charge: i64,
    pub smiles: String,
}

impl StructureSummary {
    /// Total atom count including hydrogens.
    pub fn atom_count(&self) -> u64 {
        self.elements.values().sum()
    }

    /// Element counts, most frequent first, ties broken alphabetically.
    pub fn element_distribution(&self) -> Vec<(&str, u64)> {
        let mut rows: Vec<_> = self
            .elements
            .iter()
            .map(|(symbol, count)| (symbol.as_str(), *count))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }
}
