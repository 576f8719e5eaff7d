use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::debug;

use aromaticity::{MoleculeSource, Origin};

use crate::io::read_molfile;
use crate::prompt::Prompter;

const STDIN_MARKER: &str = "-";
const SMILES_QUESTION: &str = "Please insert a SMILES";

/// Turns the positional input, `--import` and the SMILES prompt into one
/// molecule source. Clap already rejects giving both inputs.
pub fn resolve(
    input: Option<&str>,
    import: Option<&Path>,
    prompter: &mut dyn Prompter,
) -> Result<MoleculeSource> {
    if let Some(path) = import {
        return molfile_from(path);
    }

    match input {
        Some(STDIN_MARKER) => Ok(MoleculeSource::MolFile {
            text: read_molfile(None)?,
            origin: Origin::Stdin,
        }),
        Some(value) if Path::new(value).is_file() => molfile_from(Path::new(value)),
        Some(value) => smiles(value),
        None => {
            let answer = prompter.ask(SMILES_QUESTION, None)?;
            smiles(&answer)
        }
    }
}

fn molfile_from(path: &Path) -> Result<MoleculeSource> {
    debug!(path = %path.display(), "reading MolFile");
    Ok(MoleculeSource::MolFile {
        text: read_molfile(Some(path))?,
        origin: Origin::Path(PathBuf::from(path)),
    })
}

fn smiles(value: &str) -> Result<MoleculeSource> {
    let value = value.trim();
    if value.is_empty() {
        bail!("No SMILES was given");
    }
    Ok(MoleculeSource::Smiles(value.to_string()))
}
