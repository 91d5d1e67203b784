use serde::{Deserialize, Serialize};

use crate::{CanonicalRecord, HabitabilityClass, PriorityTier, TargetId};

/// Individual factors feeding the two merit scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    // Characterizability
    Distance,
    StellarType,
    PlanetSize,
    HabitableZone,
    StellarMassStability,
    DataQuality,
    // Habitability
    TemperatureZone,
    SizeFit,
    EccentricityStability,
    StellarSuitability,
}

impl ScoreFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreFactor::Distance => "distance",
            ScoreFactor::StellarType => "stellar_type",
            ScoreFactor::PlanetSize => "planet_size",
            ScoreFactor::HabitableZone => "habitable_zone",
            ScoreFactor::StellarMassStability => "stellar_mass_stability",
            ScoreFactor::DataQuality => "data_quality",
            ScoreFactor::TemperatureZone => "temperature_zone",
            ScoreFactor::SizeFit => "size_fit",
            ScoreFactor::EccentricityStability => "eccentricity_stability",
            ScoreFactor::StellarSuitability => "stellar_suitability",
        }
    }
}

impl std::fmt::Display for ScoreFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One factor that was present for a record, with the weight it carried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub factor: ScoreFactor,
    /// Factor value in [0, 1].
    pub value: f64,
    /// Configured (un-normalized) weight.
    pub weight: f64,
}

/// Quantities the engine derived instead of reading them from the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedQuantity {
    /// Semi-major axis from orbital period and stellar mass (Kepler's third law).
    SemiMajorAxis,
    /// Equilibrium temperature from stellar Teff, stellar radius and orbit.
    EquilibriumTemperature,
    /// Spectral class from effective temperature.
    SpectralClass,
}

/// The two merit scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeritScore {
    Characterizability,
    Habitability,
}

/// Direct-imaging feasibility for a reference instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservabilityEstimate {
    /// Maximum planet-star angular separation in milliarcseconds.
    pub separation_mas: f64,
    /// Reflected-light planet/star flux ratio.
    pub contrast_ratio: f64,
    /// Aperture needed to resolve the separation; `None` when unresolvable.
    pub required_diameter_m: Option<f64>,
    /// In [0, 1].
    pub spectroscopic_score: f64,
    /// In [0, 1]; 0 inside half the inner working angle.
    pub iwa_score: f64,
    /// Weighted combination in [0, 1].
    pub observability_score: f64,
}

/// Published habitability indices, each in [0, 1] when computable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitabilityIndices {
    /// Comprehensive distance habitability score.
    pub cdhs: Option<f64>,
    /// Standard exoplanet planetary habitability index.
    pub sephi: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub characterizability: Vec<FactorScore>,
    pub habitability: Vec<FactorScore>,
    /// Fraction of confidence-relevant fields that were populated.
    pub completeness: f64,
    /// Penalty in [0, 0.5] for values outside their plausible bands.
    pub extremeness_penalty: f64,
    pub derived: Vec<DerivedQuantity>,
    /// Scores with no contributing factor, reported at the neutral value.
    #[serde(default)]
    pub neutral: Vec<MeritScore>,
    #[serde(default)]
    pub observability: Option<ObservabilityEstimate>,
    #[serde(default)]
    pub indices: HabitabilityIndices,
}

impl ScoreBreakdown {
    pub fn factor(&self, factor: ScoreFactor) -> Option<&FactorScore> {
        self.characterizability
            .iter()
            .chain(self.habitability.iter())
            .find(|score| score.factor == factor)
    }
}

/// A canonical record with its merit scores.
///
/// Produced by pure functions; rescoring creates a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: CanonicalRecord,
    /// Habitability score in [0, 100].
    pub habitability_score: f64,
    /// Characterizability score in [0, 100].
    pub characterizability_score: f64,
    /// Confidence in [0, 100].
    pub confidence: f64,
    pub tier: PriorityTier,
    pub habitability_class: HabitabilityClass,
    pub breakdown: ScoreBreakdown,
}

impl ScoredRecord {
    pub fn id(&self) -> &TargetId {
        &self.record.id
    }
}
