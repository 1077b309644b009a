//! Outcome metrics tracked per observation
//!
//! Four independent real-valued outcomes, each generated from its own
//! normal distribution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome field of an observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Muscle protein synthesis (%)
    MuscleProteinSynthesis,
    /// Recovery rate (%)
    RecoveryRate,
    /// Muscle strength (%)
    MuscleStrength,
    /// Hypertrophy (%)
    Hypertrophy,
}

impl Outcome {
    /// All outcomes in column order
    pub const ALL: [Self; 4] = [
        Self::MuscleProteinSynthesis,
        Self::RecoveryRate,
        Self::MuscleStrength,
        Self::Hypertrophy,
    ];

    /// Arrow/JSON column name
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::MuscleProteinSynthesis => "muscle_protein_synthesis",
            Self::RecoveryRate => "recovery_rate",
            Self::MuscleStrength => "muscle_strength",
            Self::Hypertrophy => "hypertrophy",
        }
    }

    /// Human-readable title used in reports
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::MuscleProteinSynthesis => "Muscle Protein Synthesis (%)",
            Self::RecoveryRate => "Recovery Rate (%)",
            Self::MuscleStrength => "Muscle Strength (%)",
            Self::Hypertrophy => "Hypertrophy (%)",
        }
    }

    /// Default generating distribution
    #[must_use]
    pub const fn default_params(self) -> NormalParams {
        match self {
            Self::MuscleProteinSynthesis => NormalParams::new(10.0, 2.0),
            Self::RecoveryRate => NormalParams::new(8.0, 3.0),
            Self::MuscleStrength => NormalParams::new(5.0, 2.0),
            Self::Hypertrophy => NormalParams::new(6.0, 1.5),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Mean and standard deviation of a normal distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParams {
    /// Distribution mean
    pub mean: f64,
    /// Standard deviation
    pub std_dev: f64,
}

impl NormalParams {
    /// Create distribution parameters
    #[must_use]
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    /// Check the parameters describe a proper distribution
    ///
    /// # Errors
    /// Returns `InvalidInput` for a non-finite mean or a negative or non-finite
    /// standard deviation.
    pub fn validate(&self, outcome: Outcome) -> crate::Result<()> {
        if !self.mean.is_finite() {
            return Err(crate::Error::InvalidInput(format!(
                "{outcome}: mean must be finite, got {}",
                self.mean
            )));
        }
        if !self.std_dev.is_finite() || self.std_dev < 0.0 {
            return Err(crate::Error::InvalidInput(format!(
                "{outcome}: standard deviation must be finite and non-negative, got {}",
                self.std_dev
            )));
        }
        Ok(())
    }
}

/// Per-outcome generating distributions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutcomeParams {
    /// Muscle protein synthesis distribution
    pub muscle_protein_synthesis: NormalParams,
    /// Recovery rate distribution
    pub recovery_rate: NormalParams,
    /// Muscle strength distribution
    pub muscle_strength: NormalParams,
    /// Hypertrophy distribution
    pub hypertrophy: NormalParams,
}

impl Default for OutcomeParams {
    fn default() -> Self {
        Self {
            muscle_protein_synthesis: Outcome::MuscleProteinSynthesis.default_params(),
            recovery_rate: Outcome::RecoveryRate.default_params(),
            muscle_strength: Outcome::MuscleStrength.default_params(),
            hypertrophy: Outcome::Hypertrophy.default_params(),
        }
    }
}

impl OutcomeParams {
    /// Parameters for one outcome
    #[must_use]
    pub const fn get(&self, outcome: Outcome) -> NormalParams {
        match outcome {
            Outcome::MuscleProteinSynthesis => self.muscle_protein_synthesis,
            Outcome::RecoveryRate => self.recovery_rate,
            Outcome::MuscleStrength => self.muscle_strength,
            Outcome::Hypertrophy => self.hypertrophy,
        }
    }

    /// Replace the parameters for one outcome
    #[must_use]
    pub fn with(mut self, outcome: Outcome, params: NormalParams) -> Self {
        match outcome {
            Outcome::MuscleProteinSynthesis => self.muscle_protein_synthesis = params,
            Outcome::RecoveryRate => self.recovery_rate = params,
            Outcome::MuscleStrength => self.muscle_strength = params,
            Outcome::Hypertrophy => self.hypertrophy = params,
        }
        self
    }

    /// Validate every outcome's parameters
    ///
    /// # Errors
    /// Returns the first invalid outcome's error.
    pub fn validate(&self) -> crate::Result<()> {
        Outcome::ALL
            .iter()
            .try_for_each(|&outcome| self.get(outcome).validate(outcome))
    }
}

/// One value per outcome field
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutcomeValues {
    /// Muscle protein synthesis (%)
    pub muscle_protein_synthesis: f64,
    /// Recovery rate (%)
    pub recovery_rate: f64,
    /// Muscle strength (%)
    pub muscle_strength: f64,
    /// Hypertrophy (%)
    pub hypertrophy: f64,
}

impl OutcomeValues {
    /// Value of one outcome field
    #[must_use]
    pub const fn get(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::MuscleProteinSynthesis => self.muscle_protein_synthesis,
            Outcome::RecoveryRate => self.recovery_rate,
            Outcome::MuscleStrength => self.muscle_strength,
            Outcome::Hypertrophy => self.hypertrophy,
        }
    }

    /// Mutable access to one outcome field
    pub fn get_mut(&mut self, outcome: Outcome) -> &mut f64 {
        match outcome {
            Outcome::MuscleProteinSynthesis => &mut self.muscle_protein_synthesis,
            Outcome::RecoveryRate => &mut self.recovery_rate,
            Outcome::MuscleStrength => &mut self.muscle_strength,
            Outcome::Hypertrophy => &mut self.hypertrophy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_match_catalogue() {
        let params = OutcomeParams::default();
        assert_eq!(params.get(Outcome::MuscleProteinSynthesis), NormalParams::new(10.0, 2.0));
        assert_eq!(params.get(Outcome::RecoveryRate), NormalParams::new(8.0, 3.0));
        assert_eq!(params.get(Outcome::MuscleStrength), NormalParams::new(5.0, 2.0));
        assert_eq!(params.get(Outcome::Hypertrophy), NormalParams::new(6.0, 1.5));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_negative_std_dev_rejected() {
        let params = OutcomeParams::default()
            .with(Outcome::Hypertrophy, NormalParams::new(6.0, -1.0));
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("hypertrophy"));
    }

    #[test]
    fn test_outcome_values_get_mut() {
        let mut values = OutcomeValues::default();
        *values.get_mut(Outcome::RecoveryRate) = 3.5;
        assert!((values.get(Outcome::RecoveryRate) - 3.5).abs() < f64::EPSILON);
        assert!(values.get(Outcome::Hypertrophy).abs() < f64::EPSILON);
    }
}
