use std::path::PathBuf;

use aromaticity::config::NamingConfig;
use aromaticity::toolkit::DEFAULT_PYTHON;
use aromaticity::{Config, MolFileVersion, OutputFormat, Property, PropertyOptions, ToolkitKind};

use crate::cli::Cli;

/// MolFile export parameters known before prompting; `None` fields are asked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MolFileRequest {
    pub version: Option<MolFileVersion>,
    pub path: Option<PathBuf>,
}

/// SVG export parameters known before prompting; `None` fields are asked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SvgRequest {
    pub path: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Everything one run has to do, after merging flags, config file and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub properties: Vec<Property>,
    pub options: PropertyOptions,
    pub name: bool,
    pub summary: bool,
    pub format: OutputFormat,
    pub precision: Option<usize>,
    pub svg: Option<SvgRequest>,
    pub molfile: Option<MolFileRequest>,
}

impl Plan {
    pub fn build(cli: &Cli, config: &Config) -> Self {
        let export = &cli.export;

        let molfile = (export.export || export.output.is_some()).then(|| MolFileRequest {
            version: export
                .molfile_version
                .map(Into::into)
                .or(config.export.molfile_version),
            path: export.output.clone(),
        });

        let svg = (export.svg || export.svg_output.is_some()).then(|| SvgRequest {
            path: export.svg_output.clone(),
            width: export.svg_width.or(config.export.svg_width),
            height: export.svg_height.or(config.export.svg_height),
        });

        Self {
            properties: cli.properties.selected(),
            options: PropertyOptions {
                non_hydrogen_bonds_only: cli.properties.non_hydrogen_bonds_only,
            },
            name: cli.properties.name,
            summary: cli.output.summary && !cli.output.quiet,
            format: cli
                .output
                .format
                .map(Into::into)
                .or(config.output.format)
                .unwrap_or_default(),
            precision: cli.output.precision.or(config.output.precision),
            svg,
            molfile,
        }
    }

    /// Whether the run has anything to do once the molecule is loaded.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && !self.name
            && !self.summary
            && self.svg.is_none()
            && self.molfile.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolkitSettings {
    pub kind: ToolkitKind,
    pub python: String,
}

impl ToolkitSettings {
    pub fn build(cli: &Cli, config: &Config) -> Self {
        Self {
            kind: cli
                .toolkit
                .toolkit
                .map(Into::into)
                .unwrap_or(config.toolkit.kind),
            python: cli
                .toolkit
                .python
                .clone()
                .or_else(|| config.toolkit.python.clone())
                .unwrap_or_else(|| DEFAULT_PYTHON.to_string()),
        }
    }
}

pub fn naming_config(cli: &Cli, config: &Config) -> NamingConfig {
    let mut naming = config.naming.clone();
    if let Some(service) = cli.toolkit.naming_service {
        naming.provider = service.into();
    }
    naming
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::Path;

    use aromaticity::Provider;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("aromaticity").chain(args.iter().copied())).unwrap()
    }

    fn config(text: &str) -> Config {
        Config::parse(text, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn defaults_apply_without_flags_or_config() {
        let plan = Plan::build(&cli(&["CCO"]), &Config::default());
        assert!(plan.is_empty());
        assert_eq!(plan.format, OutputFormat::Text);
        assert_eq!(plan.precision, None);
        assert!(!plan.options.non_hydrogen_bonds_only);
    }

    #[test]
    fn flags_override_config_file() {
        let config = config(
            "[output]\nformat = \"json\"\nprecision = 4\n\n[export]\nmolfile_version = \"V3000\"\nsvg_width = 800\n",
        );
        let plan = Plan::build(
            &cli(&[
                "CCO",
                "--format",
                "text",
                "--precision",
                "1",
                "-e",
                "--molfile-version",
                "V2000",
                "--svg",
                "--svg-width",
                "300",
            ]),
            &config,
        );

        assert_eq!(plan.format, OutputFormat::Text);
        assert_eq!(plan.precision, Some(1));
        assert_eq!(plan.molfile.unwrap().version, Some(MolFileVersion::V2000));
        assert_eq!(plan.svg.unwrap().width, Some(300));
    }

    #[test]
    fn config_file_overrides_defaults() {
        let config = config("[output]\nformat = \"json\"\n\n[export]\nmolfile_version = \"V3000\"\nsvg_height = 250\n");
        let plan = Plan::build(&cli(&["CCO", "--export", "--svg"]), &config);

        assert_eq!(plan.format, OutputFormat::Json);
        assert_eq!(
            plan.molfile,
            Some(MolFileRequest {
                version: Some(MolFileVersion::V3000),
                path: None,
            })
        );
        assert_eq!(
            plan.svg,
            Some(SvgRequest {
                path: None,
                width: None,
                height: Some(250),
            })
        );
    }

    #[test]
    fn export_settings_alone_do_not_request_an_export() {
        let config = config("[export]\nmolfile_version = \"V3000\"\n");
        let plan = Plan::build(&cli(&["CCO", "--weight"]), &config);
        assert!(plan.molfile.is_none());
        assert!(plan.svg.is_none());
    }

    #[test]
    fn output_paths_imply_their_export() {
        let plan = Plan::build(
            &cli(&["CCO", "-o", "ethanol.mol", "--svg-output", "ethanol.svg"]),
            &Config::default(),
        );
        assert_eq!(plan.molfile.unwrap().path, Some(PathBuf::from("ethanol.mol")));
        assert_eq!(plan.svg.unwrap().path, Some(PathBuf::from("ethanol.svg")));
    }

    #[test]
    fn quiet_suppresses_summary() {
        let plan = Plan::build(&cli(&["CCO", "--summary", "-q"]), &Config::default());
        assert!(!plan.summary);
    }

    #[test]
    fn toolkit_settings_merge_in_order() {
        let config = config("[toolkit]\nkind = \"rdkit-embedded\"\npython = \"/opt/py\"\n");

        let settings = ToolkitSettings::build(&cli(&["CCO"]), &config);
        assert_eq!(settings.kind, ToolkitKind::RdkitEmbedded);
        assert_eq!(settings.python, "/opt/py");

        let settings = ToolkitSettings::build(
            &cli(&["CCO", "--toolkit", "rdkit", "--python", "python3.12"]),
            &config,
        );
        assert_eq!(settings.kind, ToolkitKind::Rdkit);
        assert_eq!(settings.python, "python3.12");

        let settings = ToolkitSettings::build(&cli(&["CCO"]), &Config::default());
        assert_eq!(settings.python, DEFAULT_PYTHON);
    }

    #[test]
    fn naming_service_flag_overrides_provider_only() {
        let config = config("[naming]\nprovider = \"pubchem\"\nretries = 0\n");
        let naming = naming_config(&cli(&["CCO", "--naming-service", "cactus"]), &config);
        assert_eq!(naming.provider, Provider::Cactus);
        assert_eq!(naming.retries, 0);
    }
}
