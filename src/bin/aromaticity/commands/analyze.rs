use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use aromaticity::{Molecule, MoleculeSource, NameLookup, OutputFormat, Property, Toolkit};

use super::export::{resolve_molfile, resolve_svg};
use super::plan::Plan;
use crate::display::{ExportKind, ExportRecord, Progress, ReportWriter, print_structure_summary};
use crate::io::write_export;
use crate::prompt::Prompter;

/// The collaborators one analysis talks to.
pub struct Services<'a> {
    pub toolkit: &'a mut dyn Toolkit,
    /// Present whenever the plan asks for the name.
    pub naming: Option<&'a dyn NameLookup>,
    pub prompter: &'a mut dyn Prompter,
    pub progress: &'a mut Progress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportItem {
    Property(Property),
    Name,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameOutcome {
    Found(String),
    NotFound,
    Failed,
}

/// Loads the molecule, reports every requested item, then runs the exports.
/// The toolkit-side molecule is released even when a step fails.
pub fn analyze<W: Write>(
    source: &MoleculeSource,
    plan: &Plan,
    services: &mut Services<'_>,
    report: &mut ReportWriter<W>,
) -> Result<()> {
    let molecule = services
        .toolkit
        .load(source)
        .with_context(|| format!("Failed to load {} '{}'", source.kind(), source.describe()))?;
    debug!(id = molecule.id(), kind = %molecule.source_kind(), "molecule loaded");

    let outcome = report_molecule(source, &molecule, plan, services, report);

    if let Err(e) = services.toolkit.release(molecule) {
        warn!(error = %e, "failed to release molecule");
    }

    outcome
}

fn report_molecule<W: Write>(
    source: &MoleculeSource,
    molecule: &Molecule,
    plan: &Plan,
    services: &mut Services<'_>,
    report: &mut ReportWriter<W>,
) -> Result<()> {
    if plan.summary {
        let summary = services
            .toolkit
            .summary(molecule)
            .context("Failed to summarize the structure")?;
        match plan.format {
            OutputFormat::Text => print_structure_summary(&summary),
            OutputFormat::Json => report.summary(&summary),
        }
    }

    for item in report_items(plan) {
        match item {
            ReportItem::Property(property) => {
                let value = services
                    .toolkit
                    .property(molecule, property, &plan.options)
                    .with_context(|| format!("Failed to compute {}", property.label()))?;
                report.property(property, &value)?;
            }
            ReportItem::Name => match lookup_name(source, molecule, services) {
                NameOutcome::Found(name) => report.name(Some(&name))?,
                NameOutcome::NotFound | NameOutcome::Failed => report.name(None)?,
            },
        }
    }

    if let Some(request) = &plan.svg {
        let export = resolve_svg(request, services.prompter)?;
        let svg = services
            .toolkit
            .svg(molecule, export.size)
            .context("Failed to render the SVG")?;
        write_export(&export.path, &svg)?;
        report.export(&ExportRecord {
            kind: ExportKind::Svg(export.size),
            path: export.path,
        })?;
    }

    if let Some(request) = &plan.molfile {
        let export = resolve_molfile(request, services.prompter)?;
        let text = services
            .toolkit
            .molfile(molecule, export.version)
            .with_context(|| format!("Failed to encode the {} MolFile", export.version))?;
        let written = write_export(&export.path, &text)?;
        report.export(&ExportRecord {
            kind: ExportKind::MolFile(export.version),
            path: written,
        })?;
    }

    Ok(())
}

/// Requested properties in report order, with the name slotted in after LogS.
fn report_items(plan: &Plan) -> Vec<ReportItem> {
    let mut items: Vec<ReportItem> = Vec::with_capacity(plan.properties.len() + 1);
    let mut name_pending = plan.name;

    for &property in &plan.properties {
        if name_pending && property > Property::LogS {
            items.push(ReportItem::Name);
            name_pending = false;
        }
        items.push(ReportItem::Property(property));
    }
    if name_pending {
        items.push(ReportItem::Name);
    }

    items
}

/// Never fails the run: network or toolkit trouble becomes a warning.
fn lookup_name(
    source: &MoleculeSource,
    molecule: &Molecule,
    services: &mut Services<'_>,
) -> NameOutcome {
    let Some(naming) = services.naming else {
        return NameOutcome::NotFound;
    };

    let smiles = match source.as_smiles() {
        Some(smiles) => smiles.to_string(),
        None => match services.toolkit.smiles(molecule) {
            Ok(smiles) => smiles,
            Err(e) => {
                warn!(error = %e, "could not derive a SMILES for the IUPAC lookup");
                return NameOutcome::Failed;
            }
        },
    };

    services.progress.step("Looking up IUPAC name");
    match naming.iupac_name(&smiles) {
        Ok(Some(name)) => {
            services.progress.complete_step("Looking up IUPAC name", &[]);
            NameOutcome::Found(name)
        }
        Ok(None) => {
            services
                .progress
                .complete_step("Looking up IUPAC name", &["No name found"]);
            NameOutcome::NotFound
        }
        Err(e) => {
            services
                .progress
                .fail_step("Looking up IUPAC name", &e.to_string());
            warn!(error = %e, smiles = %smiles, "IUPAC name lookup failed");
            NameOutcome::Failed
        }
    }
}
