use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, ValueEnum};

use aromaticity::{MolFileVersion, OutputFormat, Property, Provider, ToolkitKind};

#[derive(Parser)]
#[command(
    name = "aromaticity",
    about = "Molecular properties from SMILES strings and MolFiles, powered by RDKit",
    author,
    before_help = crate::display::banner_for_help(),
    disable_version_flag = true,
    after_help = "If no SMILES or MolFile is given, you will be asked for a SMILES.\n\
                  --help and --version never need an input."
)]
pub struct Cli {
    /// SMILES string or MolFile path (`-` reads a MolFile from stdin)
    #[arg(value_name = "SMILES|MOLFILE")]
    pub input: Option<String>,

    /// Read the molecule from a MolFile
    #[arg(short = 'i', long = "import", value_name = "FILE", conflicts_with = "input")]
    pub import: Option<PathBuf>,

    #[command(flatten)]
    pub properties: PropertyFlags,

    #[command(flatten)]
    pub export: ExportOptions,

    #[command(flatten)]
    pub output: OutputOptions,

    #[command(flatten)]
    pub toolkit: ToolkitOptions,

    /// Print version, license and toolkit information
    #[arg(short = 'v', long = "version", action = ArgAction::SetTrue)]
    pub version: bool,
}

/// Properties to report, printed in a fixed order.
#[derive(Args)]
#[command(next_help_heading = "Properties")]
pub struct PropertyFlags {
    /// Number of hydrogen-bond acceptors
    #[arg(long)]
    pub acceptor: bool,

    /// Average bond length (see --non-hydrogen-bonds-only)
    #[arg(long = "average-bond-length")]
    pub average_bond_length: bool,

    /// Number of bonds (bonds to plain hydrogen atoms are not counted)
    #[arg(long)]
    pub bonds: bool,

    /// Number of hydrogen-bond donors
    #[arg(long)]
    pub donor: bool,

    /// Molecular formula
    #[arg(long)]
    pub formula: bool,

    /// Octanol/water partition coefficient (Crippen)
    #[arg(long = "logP", alias = "logp")]
    pub log_p: bool,

    /// Aqueous solubility estimate (ESOL)
    #[arg(long = "logS", alias = "logs")]
    pub log_s: bool,

    /// IUPAC name, looked up through a web service
    #[arg(long)]
    pub name: bool,

    /// Leave bonds to hydrogen out of bond-length statistics
    #[arg(long = "non-hydrogen-bonds-only")]
    pub non_hydrogen_bonds_only: bool,

    /// Topological polar surface area
    #[arg(long = "polar-surface-area")]
    pub polar_surface_area: bool,

    /// Number of rotatable bonds
    #[arg(long = "rotatable-bond")]
    pub rotatable_bond: bool,

    /// Number of stereo centers (assigned or not)
    #[arg(long = "stereo-center")]
    pub stereo_center: bool,

    /// Molecular weight
    #[arg(long)]
    pub weight: bool,

    /// Every property above except --name
    #[arg(long)]
    pub all: bool,
}

impl PropertyFlags {
    /// Requested properties in report order.
    pub fn selected(&self) -> Vec<Property> {
        Property::ALL
            .into_iter()
            .filter(|property| self.all || self.is_set(*property))
            .collect()
    }

    fn is_set(&self, property: Property) -> bool {
        match property {
            Property::Acceptor => self.acceptor,
            Property::AverageBondLength => self.average_bond_length,
            Property::Bonds => self.bonds,
            Property::Donor => self.donor,
            Property::Formula => self.formula,
            Property::LogP => self.log_p,
            Property::LogS => self.log_s,
            Property::PolarSurfaceArea => self.polar_surface_area,
            Property::RotatableBond => self.rotatable_bond,
            Property::StereoCenter => self.stereo_center,
            Property::Weight => self.weight,
        }
    }
}

#[derive(Args)]
#[command(next_help_heading = "Export")]
pub struct ExportOptions {
    /// Export the molecule as a MolFile
    #[arg(short = 'e', long)]
    pub export: bool,

    /// MolFile version (asked interactively if omitted)
    #[arg(long = "molfile-version", value_name = "VERSION")]
    pub molfile_version: Option<MolFileVersionArg>,

    /// MolFile destination (asked interactively if omitted; implies --export)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Export an SVG depiction
    #[arg(long, visible_alias = "image")]
    pub svg: bool,

    /// SVG destination (asked interactively if omitted; implies --svg)
    #[arg(long = "svg-output", value_name = "FILE")]
    pub svg_output: Option<PathBuf>,

    /// SVG width in pixels
    #[arg(long = "svg-width", value_name = "PX", value_parser = clap::value_parser!(u32).range(1..))]
    pub svg_width: Option<u32>,

    /// SVG height in pixels
    #[arg(long = "svg-height", value_name = "PX", value_parser = clap::value_parser!(u32).range(1..))]
    pub svg_height: Option<u32>,
}

#[derive(Args)]
#[command(next_help_heading = "Output")]
pub struct OutputOptions {
    /// Report format
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<FormatArg>,

    /// Decimals for real-valued properties
    #[arg(long, value_name = "N")]
    pub precision: Option<usize>,

    /// Print a structure summary (element counts, rings, charge)
    #[arg(long)]
    pub summary: bool,

    /// Suppress banner, progress and summary output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log filter used when AROMATICITY_LOG is unset (e.g. info, debug)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Configuration file (defaults to $AROMATICITY_CONFIG)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
#[command(next_help_heading = "Toolkit")]
pub struct ToolkitOptions {
    /// How RDKit is hosted
    #[arg(long, value_name = "KIND")]
    pub toolkit: Option<ToolkitArg>,

    /// Python interpreter with RDKit installed (rdkit toolkit only)
    #[arg(long, value_name = "PATH")]
    pub python: Option<String>,

    /// Web service used for --name
    #[arg(long = "naming-service", value_name = "SERVICE")]
    pub naming_service: Option<NamingServiceArg>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MolFileVersionArg {
    #[value(name = "V2000", alias = "v2000")]
    V2000,
    #[value(name = "V3000", alias = "v3000")]
    V3000,
}

impl From<MolFileVersionArg> for MolFileVersion {
    fn from(v: MolFileVersionArg) -> Self {
        match v {
            MolFileVersionArg::V2000 => MolFileVersion::V2000,
            MolFileVersionArg::V3000 => MolFileVersion::V3000,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// One `LABEL value` line per item
    Text,
    /// A single JSON object
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ToolkitArg {
    /// RDKit in a child Python process
    Rdkit,
    /// RDKit in an embedded Python interpreter
    RdkitEmbedded,
}

impl From<ToolkitArg> for ToolkitKind {
    fn from(t: ToolkitArg) -> Self {
        match t {
            ToolkitArg::Rdkit => ToolkitKind::Rdkit,
            ToolkitArg::RdkitEmbedded => ToolkitKind::RdkitEmbedded,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum NamingServiceArg {
    /// PubChem PUG REST
    Pubchem,
    /// NCI CACTUS chemical identifier resolver
    Cactus,
}

impl From<NamingServiceArg> for Provider {
    fn from(n: NamingServiceArg) -> Self {
        match n {
            NamingServiceArg::Pubchem => Provider::PubChem,
            NamingServiceArg::Cactus => Provider::Cactus,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("aromaticity").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn selected_properties_follow_report_order() {
        let cli = parse_args(&["CCO", "--weight", "--logP", "--acceptor"]);
        assert_eq!(
            cli.properties.selected(),
            vec![Property::Acceptor, Property::LogP, Property::Weight]
        );
    }

    #[test]
    fn all_selects_every_property_but_not_the_name() {
        let cli = parse_args(&["CCO", "--all"]);
        assert_eq!(cli.properties.selected(), Property::ALL.to_vec());
        assert!(!cli.properties.name);
    }

    #[test]
    fn lowercase_aliases_are_accepted() {
        let cli = parse_args(&["CCO", "--logp", "--logs", "--image"]);
        assert!(cli.properties.log_p);
        assert!(cli.properties.log_s);
        assert!(cli.export.svg);
    }

    #[test]
    fn import_conflicts_with_positional_input() {
        let result = Cli::try_parse_from(["aromaticity", "CCO", "--import", "x.mol"]);
        assert!(result.is_err());
    }

    #[test]
    fn version_flag_needs_no_input() {
        let cli = parse_args(&["-v"]);
        assert!(cli.version);
        assert!(cli.input.is_none());
    }

    #[test]
    fn svg_size_must_be_positive() {
        assert!(Cli::try_parse_from(["aromaticity", "CCO", "--svg-width", "0"]).is_err());
        let cli = parse_args(&["CCO", "--svg-width", "640"]);
        assert_eq!(cli.export.svg_width, Some(640));
    }

    #[test]
    fn molfile_version_accepts_both_cases() {
        let cli = parse_args(&["CCO", "-e", "--molfile-version", "v3000"]);
        let version: MolFileVersion = cli.export.molfile_version.unwrap().into();
        assert_eq!(version, MolFileVersion::V3000);
    }
}
