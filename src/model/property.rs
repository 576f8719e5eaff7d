use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown molecular property: '{0}'")]
pub struct ParsePropertyError(String);

/// Properties the toolkit can compute for a loaded molecule.
///
/// The declaration order is the order in which properties are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Acceptor,
    AverageBondLength,
    Bonds,
    Donor,
    Formula,
    LogP,
    LogS,
    PolarSurfaceArea,
    RotatableBond,
    StereoCenter,
    Weight,
}

/// Shape of the value a property evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Count,
    Real,
    Text,
}

impl Property {
    pub const ALL: [Property; 11] = [
        Property::Acceptor,
        Property::AverageBondLength,
        Property::Bonds,
        Property::Donor,
        Property::Formula,
        Property::LogP,
        Property::LogS,
        Property::PolarSurfaceArea,
        Property::RotatableBond,
        Property::StereoCenter,
        Property::Weight,
    ];

    /// Label printed in front of the value in text reports.
    pub fn label(self) -> &'static str {
        match self {
            Property::Acceptor => "ACCEPTOR",
            Property::AverageBondLength => "AVERAGE BOND LENGTH",
            Property::Bonds => "BONDS",
            Property::Donor => "DONOR",
            Property::Formula => "MOLECULAR FORMULA",
            Property::LogP => "LOGP",
            Property::LogS => "LOGS",
            Property::PolarSurfaceArea => "POLAR SURFACE AREA",
            Property::RotatableBond => "ROTATABLE BOND",
            Property::StereoCenter => "STEREO CENTER",
            Property::Weight => "MOLECULAR WEIGHT",
        }
    }

    /// Stable machine name, shared by JSON reports and the bridge protocol.
    pub fn key(self) -> &'static str {
        match self {
            Property::Acceptor => "acceptor",
            Property::AverageBondLength => "average_bond_length",
            Property::Bonds => "bonds",
            Property::Donor => "donor",
            Property::Formula => "formula",
            Property::LogP => "logp",
            Property::LogS => "logs",
            Property::PolarSurfaceArea => "polar_surface_area",
            Property::RotatableBond => "rotatable_bond",
            Property::StereoCenter => "stereo_center",
            Property::Weight => "weight",
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            Property::Acceptor
            | Property::Bonds
            | Property::Donor
            | Property::RotatableBond
            | Property::StereoCenter => ValueKind::Count,
            Property::AverageBondLength
            | Property::LogP
            | Property::LogS
            | Property::PolarSurfaceArea
            | Property::Weight => ValueKind::Real,
            Property::Formula => ValueKind::Text,
        }
    }

    /// Whether [`PropertyOptions`] can change the result.
    pub fn honours_hydrogen_filter(self) -> bool {
        matches!(self, Property::AverageBondLength)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Property {
    type Err = ParsePropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Property::ALL
            .into_iter()
            .find(|p| p.key() == normalized)
            .ok_or_else(|| ParsePropertyError(s.to_string()))
    }
}

/// Knobs that some property calculations accept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyOptions {
    /// Ignore bonds to hydrogen when computing bond-length statistics.
    pub non_hydrogen_bonds_only: bool,
}

/// A value computed by the toolkit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Count(u64),
    Real(f64),
    Text(String),
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Count(_) => ValueKind::Count,
            PropertyValue::Real(_) => ValueKind::Real,
            PropertyValue::Text(_) => ValueKind::Text,
        }
    }

    /// Renders the value, rounding reals to `precision` decimals when given.
    pub fn render(&self, precision: Option<usize>) -> String {
        match (self, precision) {
            (PropertyValue::Real(v), Some(p)) => format!("{v:.p$}"),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Count(v) => write!(f, "{v}"),
            PropertyValue::Real(v) => write!(f, "{v}"),
            PropertyValue::Text(v) => f.write_str(v),
        }
    }
}
