use std::path::PathBuf;

use anyhow::{Context, Result};

use aromaticity::{MolFileVersion, SvgSize};

use super::plan::{MolFileRequest, SvgRequest};
use crate::prompt::Prompter;

const DEFAULT_MOLFILE_NAME: &str = "untitled.mol";
const DEFAULT_SVG_NAME: &str = "untitled.svg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MolFileExport {
    pub version: MolFileVersion,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgExport {
    pub path: PathBuf,
    pub size: SvgSize,
}

/// Fills in whatever the request left open by asking.
pub fn resolve_molfile(request: &MolFileRequest, prompter: &mut dyn Prompter) -> Result<MolFileExport> {
    let version = match request.version {
        Some(version) => version,
        None => {
            let choices: Vec<&str> = MolFileVersion::ALL.iter().map(|v| v.as_str()).collect();
            let index = prompter.select("Please select a MolFile Type", &choices, 0)?;
            MolFileVersion::ALL[index]
        }
    };

    let path = match &request.path {
        Some(path) => path.clone(),
        None => ask_path(
            prompter,
            "Please insert the name of the MolFile",
            DEFAULT_MOLFILE_NAME,
        )?,
    };

    Ok(MolFileExport { version, path })
}

pub fn resolve_svg(request: &SvgRequest, prompter: &mut dyn Prompter) -> Result<SvgExport> {
    let path = match &request.path {
        Some(path) => path.clone(),
        None => ask_path(
            prompter,
            "Please insert the name of the SVG File",
            DEFAULT_SVG_NAME,
        )?,
    };

    let width = match request.width {
        Some(width) => width,
        None => ask_edge(prompter, "SVG Width")?,
    };
    let height = match request.height {
        Some(height) => height,
        None => ask_edge(prompter, "SVG Height")?,
    };

    Ok(SvgExport {
        path,
        size: SvgSize::new(width, height)?,
    })
}

fn ask_path(prompter: &mut dyn Prompter, question: &str, default: &str) -> Result<PathBuf> {
    let answer = prompter.ask(question, Some(default))?;
    Ok(PathBuf::from(answer))
}

fn ask_edge(prompter: &mut dyn Prompter, question: &str) -> Result<u32> {
    let default = SvgSize::DEFAULT_EDGE.to_string();
    let answer = prompter.ask(question, Some(&default))?;
    answer
        .trim()
        .parse()
        .with_context(|| format!("{question} must be a whole number of pixels, got '{answer}'"))
}
