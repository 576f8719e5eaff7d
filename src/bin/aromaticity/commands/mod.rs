mod analyze;
mod export;
mod input;
mod plan;

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use aromaticity::toolkit;
use aromaticity::{Config, MoleculeSource, NameLookup, NameResolver, ToolkitInfo};

use analyze::{Services, analyze};
use plan::{Plan, ToolkitSettings, naming_config};

use crate::cli::Cli;
use crate::display::{Context as DisplayContext, Progress, ReportWriter};
use crate::io::{create_output, stdin_is_tty};
use crate::prompt::{Defaults, Prompter, TerminalPrompter};

const LICENSE: &str = "GPL-3.0";
const REPOSITORY: &str = env!("CARGO_PKG_REPOSITORY");
const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

pub fn run(cli: Cli, ctx: DisplayContext) -> Result<()> {
    if cli.version {
        let config = config_for_version(cli.output.config.as_deref());
        return print_version(&ToolkitSettings::build(&cli, &config));
    }

    let (config, config_path) = Config::discover(cli.output.config.as_deref())?;
    match &config_path {
        Some(path) => info!(path = %path.display(), "configuration loaded"),
        None => debug!("no configuration file, using defaults"),
    }

    let settings = ToolkitSettings::build(&cli, &config);

    let plan = Plan::build(&cli, &config);
    if plan.is_empty() {
        info!("no property or export requested; the input is only validated");
    }

    let resolver = if plan.name {
        let naming = naming_config(&cli, &config);
        let resolver = NameResolver::from_config(&naming)
            .context("Invalid naming service configuration")?;
        debug!(provider = %resolver.provider(), endpoint = %resolver.endpoint(), "naming service ready");
        Some(resolver)
    } else {
        None
    };

    let source = resolve_source(&cli)?;
    debug!(kind = %source.kind(), input = %source.describe(), "input resolved");

    let mut progress = Progress::new(ctx.interactive, 1 + u8::from(plan.name));
    let mut session = start_toolkit(&settings, &mut progress)?;

    let mut prompter: Box<dyn Prompter> = if stdin_is_tty() {
        Box::new(TerminalPrompter::stdio())
    } else {
        Box::new(Defaults)
    };

    let mut report = ReportWriter::new(create_output(None)?, plan.format, ctx.color, plan.precision);
    {
        let mut services = Services {
            toolkit: session.as_mut(),
            naming: resolver.as_ref().map(|r| r as &dyn NameLookup),
            prompter: prompter.as_mut(),
            progress: &mut progress,
        };
        analyze(&source, &plan, &mut services, &mut report)?;
    }
    report.finish(&source, session.info())?;

    progress.finish();

    Ok(())
}

/// The SMILES prompt reads stdin even when it is piped; MolFile input and
/// `--import` never prompt.
fn resolve_source(cli: &Cli) -> Result<MoleculeSource> {
    if cli.input.is_none() && cli.import.is_none() {
        return input::resolve(None, None, &mut TerminalPrompter::stdio());
    }
    input::resolve(cli.input.as_deref(), cli.import.as_deref(), &mut Defaults)
}

fn start_toolkit(
    settings: &ToolkitSettings,
    progress: &mut Progress,
) -> Result<Box<dyn aromaticity::Toolkit>> {
    const STEP: &str = "Starting RDKit";

    progress.step(STEP);
    match toolkit::open(settings.kind, &settings.python) {
        Ok(session) => {
            let detail = format!("{} via {}", session.info(), host_label(settings));
            progress.complete_step(STEP, &[detail.as_str()]);
            info!(toolkit = %session.info(), kind = %settings.kind, "toolkit session started");
            Ok(session)
        }
        Err(e) => {
            progress.fail_step(STEP, "toolkit unavailable");
            Err(e).context("Failed to start the chemistry toolkit")
        }
    }
}

fn host_label(settings: &ToolkitSettings) -> String {
    match settings.kind {
        aromaticity::ToolkitKind::Rdkit => settings.python.clone(),
        aromaticity::ToolkitKind::RdkitEmbedded => "embedded Python".to_string(),
    }
}

/// `--version` never fails on a broken configuration file; it falls back to defaults.
fn config_for_version(explicit: Option<&Path>) -> Config {
    match Config::discover(explicit) {
        Ok((config, _)) => config,
        Err(e) => {
            warn!(error = %e, "ignoring configuration for --version");
            Config::default()
        }
    }
}

fn print_version(settings: &ToolkitSettings) -> Result<()> {
    let toolkit = toolkit::open(settings.kind, &settings.python)
        .map(|session| session.info().clone())
        .map_err(|e| e.to_string());

    let mut out = create_output(None)?;
    write_version(&mut out, &toolkit)?;
    out.flush()?;
    Ok(())
}

fn write_version(out: &mut impl Write, toolkit: &Result<ToolkitInfo, String>) -> io::Result<()> {
    writeln!(out, "aromaticity CLI v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out)?;
    writeln!(out, "License: {LICENSE}")?;
    writeln!(out, "GitHub Repository: {REPOSITORY}")?;
    writeln!(out, "Website: {HOMEPAGE}")?;
    match toolkit {
        Ok(info) => writeln!(out, "Toolkit: {info}")?,
        Err(reason) => writeln!(out, "Toolkit: unavailable ({reason})")?,
    }
    writeln!(out)?;
    writeln!(out, "Developed by {AUTHORS}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_lists_license_links_and_toolkit() {
        let mut out = Vec::new();
        let info = ToolkitInfo {
            name: "RDKit".to_string(),
            version: "2024.03.5".to_string(),
        };
        write_version(&mut out, &Ok(info)).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with(&format!("aromaticity CLI v{}", env!("CARGO_PKG_VERSION"))));
        assert!(text.contains("License: GPL-3.0\n"));
        assert!(text.contains("GitHub Repository: https://github.com/aromaticity/aromaticity-cli"));
        assert!(text.contains("Website: https://aromaticity.io/cli"));
        assert!(text.contains("Toolkit: RDKit 2024.03.5"));
        assert!(text.trim_end().ends_with("Developed by Giulio De Matteis"));
    }

    #[test]
    fn version_ignores_malformed_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[toolkit\nkind = ").unwrap();

        assert_eq!(config_for_version(Some(&path)), Config::default());
        assert_eq!(
            config_for_version(Some(&dir.path().join("missing.toml"))),
            Config::default()
        );
    }

    #[test]
    fn version_uses_a_valid_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aromaticity.toml");
        std::fs::write(&path, "[toolkit]\npython = \"/opt/rdkit/bin/python\"\n").unwrap();

        let config = config_for_version(Some(&path));
        assert_eq!(config.toolkit.python.as_deref(), Some("/opt/rdkit/bin/python"));
    }

    #[test]
    fn version_survives_missing_toolkit() {
        let mut out = Vec::new();
        write_version(&mut out, &Err("python3 not found".to_string())).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Toolkit: unavailable (python3 not found)"));
    }
}
