//! The closed catalogue of amino-acid labels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Amino acid label
///
/// Variants are declared in catalogue order; [`AminoAcid::ALL`] preserves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AminoAcid {
    /// Leucine (BCAA)
    Leucine,
    /// Isoleucine (BCAA)
    Isoleucine,
    /// Valine (BCAA)
    Valine,
    /// Lysine
    Lysine,
    /// Methionine
    Methionine,
    /// Phenylalanine
    Phenylalanine,
    /// Threonine
    Threonine,
    /// Tryptophan
    Tryptophan,
    /// Histidine
    Histidine,
    /// Arginine
    Arginine,
    /// Cysteine
    Cysteine,
    /// Glutamine
    Glutamine,
    /// Tyrosine
    Tyrosine,
    /// Ornithine
    Ornithine,
    /// Alanine
    Alanine,
    /// Aspartic acid
    #[serde(rename = "Aspartic Acid")]
    AsparticAcid,
    /// Glutamic acid
    #[serde(rename = "Glutamic Acid")]
    GlutamicAcid,
    /// Glycine
    Glycine,
    /// Proline
    Proline,
    /// Serine
    Serine,
    /// Asparagine
    Asparagine,
    /// Beta-alanine
    #[serde(rename = "Beta-Alanine")]
    BetaAlanine,
}

impl AminoAcid {
    /// Number of labels in the catalogue
    pub const COUNT: usize = 22;

    /// Every label, in catalogue order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Leucine,
        Self::Isoleucine,
        Self::Valine,
        Self::Lysine,
        Self::Methionine,
        Self::Phenylalanine,
        Self::Threonine,
        Self::Tryptophan,
        Self::Histidine,
        Self::Arginine,
        Self::Cysteine,
        Self::Glutamine,
        Self::Tyrosine,
        Self::Ornithine,
        Self::Alanine,
        Self::AsparticAcid,
        Self::GlutamicAcid,
        Self::Glycine,
        Self::Proline,
        Self::Serine,
        Self::Asparagine,
        Self::BetaAlanine,
    ];

    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Leucine => "Leucine",
            Self::Isoleucine => "Isoleucine",
            Self::Valine => "Valine",
            Self::Lysine => "Lysine",
            Self::Methionine => "Methionine",
            Self::Phenylalanine => "Phenylalanine",
            Self::Threonine => "Threonine",
            Self::Tryptophan => "Tryptophan",
            Self::Histidine => "Histidine",
            Self::Arginine => "Arginine",
            Self::Cysteine => "Cysteine",
            Self::Glutamine => "Glutamine",
            Self::Tyrosine => "Tyrosine",
            Self::Ornithine => "Ornithine",
            Self::Alanine => "Alanine",
            Self::AsparticAcid => "Aspartic Acid",
            Self::GlutamicAcid => "Glutamic Acid",
            Self::Glycine => "Glycine",
            Self::Proline => "Proline",
            Self::Serine => "Serine",
            Self::Asparagine => "Asparagine",
            Self::BetaAlanine => "Beta-Alanine",
        }
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AminoAcid {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|aa| aa.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| crate::Error::InvalidInput(format!("Unknown amino acid: {s}")))
    }
}
