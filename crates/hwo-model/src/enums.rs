//! Type-safe enumerations for target metadata.
//!
//! These enums give compile-time safety to concepts that arrive as free text in
//! catalog exports (quality grades, detection methods, spectral types).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Canonical fields understood by the engine.
///
/// The declaration order is the canonical column order used for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Identifier,
    Distance,
    StellarTeff,
    StellarRadius,
    StellarMass,
    PlanetRadius,
    PlanetMass,
    OrbitalPeriod,
    SemiMajorAxis,
    Eccentricity,
    EquilibriumTemperature,
    DataQuality,
    DiscoveryYear,
    DetectionMethod,
    SpectralType,
    #[serde(rename = "ra")]
    RightAscension,
    #[serde(rename = "dec")]
    Declination,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 17] = [
        CanonicalField::Identifier,
        CanonicalField::Distance,
        CanonicalField::StellarTeff,
        CanonicalField::StellarRadius,
        CanonicalField::StellarMass,
        CanonicalField::PlanetRadius,
        CanonicalField::PlanetMass,
        CanonicalField::OrbitalPeriod,
        CanonicalField::SemiMajorAxis,
        CanonicalField::Eccentricity,
        CanonicalField::EquilibriumTemperature,
        CanonicalField::DataQuality,
        CanonicalField::DiscoveryYear,
        CanonicalField::DetectionMethod,
        CanonicalField::SpectralType,
        CanonicalField::RightAscension,
        CanonicalField::Declination,
    ];

    /// Returns the canonical column name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Identifier => "identifier",
            CanonicalField::Distance => "distance",
            CanonicalField::StellarTeff => "stellar_teff",
            CanonicalField::StellarRadius => "stellar_radius",
            CanonicalField::StellarMass => "stellar_mass",
            CanonicalField::PlanetRadius => "planet_radius",
            CanonicalField::PlanetMass => "planet_mass",
            CanonicalField::OrbitalPeriod => "orbital_period",
            CanonicalField::SemiMajorAxis => "semi_major_axis",
            CanonicalField::Eccentricity => "eccentricity",
            CanonicalField::EquilibriumTemperature => "equilibrium_temperature",
            CanonicalField::DataQuality => "data_quality",
            CanonicalField::DiscoveryYear => "discovery_year",
            CanonicalField::DetectionMethod => "detection_method",
            CanonicalField::SpectralType => "spectral_type",
            CanonicalField::RightAscension => "ra",
            CanonicalField::Declination => "dec",
        }
    }

    /// Unit the engine stores this field in, if it is a physical quantity.
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            CanonicalField::Distance => Some("pc"),
            CanonicalField::StellarTeff | CanonicalField::EquilibriumTemperature => Some("K"),
            CanonicalField::StellarRadius => Some("R_sun"),
            CanonicalField::StellarMass => Some("M_sun"),
            CanonicalField::PlanetRadius => Some("R_earth"),
            CanonicalField::PlanetMass => Some("M_earth"),
            CanonicalField::OrbitalPeriod => Some("days"),
            CanonicalField::SemiMajorAxis => Some("AU"),
            CanonicalField::RightAscension | CanonicalField::Declination => Some("deg"),
            _ => None,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        CanonicalField::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| ModelError::UnknownCategory {
                kind: "canonical field",
                value: s.to_string(),
            })
    }
}

/// Ordinal data-quality grade attached to a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DataQuality {
    Limited,
    Fair,
    Good,
    Excellent,
}

impl DataQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataQuality::Excellent => "Excellent",
            DataQuality::Good => "Good",
            DataQuality::Fair => "Fair",
            DataQuality::Limited => "Limited",
        }
    }
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataQuality {
    type Err = ModelError;

    /// Accepts the grade name anywhere in the text ("good", "Quality: Excellent").
    /// "poor" is read as `Limited`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.contains("excellent") {
            Ok(DataQuality::Excellent)
        } else if lower.contains("good") {
            Ok(DataQuality::Good)
        } else if lower.contains("fair") {
            Ok(DataQuality::Fair)
        } else if lower.contains("limited") || lower.contains("poor") {
            Ok(DataQuality::Limited)
        } else {
            Err(ModelError::UnknownCategory {
                kind: "data quality",
                value: s.to_string(),
            })
        }
    }
}

/// Technique that produced the discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Transit,
    RadialVelocity,
    Imaging,
    Microlensing,
    Astrometry,
    TransitTiming,
    PulsarTiming,
    Other,
}

impl DetectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::Transit => "Transit",
            DetectionMethod::RadialVelocity => "Radial Velocity",
            DetectionMethod::Imaging => "Imaging",
            DetectionMethod::Microlensing => "Microlensing",
            DetectionMethod::Astrometry => "Astrometry",
            DetectionMethod::TransitTiming => "Transit Timing Variations",
            DetectionMethod::PulsarTiming => "Pulsar Timing",
            DetectionMethod::Other => "Other",
        }
    }

    /// Parses free text, falling back to `Other` for unrecognized techniques.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(DetectionMethod::Other)
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DetectionMethod {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        // Timing variants first: "transit timing" also contains "transit".
        let method = if (lower.contains("timing") && lower.contains("transit")) || lower == "ttv" {
            DetectionMethod::TransitTiming
        } else if lower.contains("pulsar") {
            DetectionMethod::PulsarTiming
        } else if lower.contains("transit") {
            DetectionMethod::Transit
        } else if lower.contains("radial") || lower.contains("velocity") || lower == "rv" {
            DetectionMethod::RadialVelocity
        } else if lower.contains("imaging") {
            DetectionMethod::Imaging
        } else if lower.contains("microlens") {
            DetectionMethod::Microlensing
        } else if lower.contains("astrometry") {
            DetectionMethod::Astrometry
        } else if lower == "other" {
            DetectionMethod::Other
        } else {
            return Err(ModelError::UnknownCategory {
                kind: "detection method",
                value: s.to_string(),
            });
        };
        Ok(method)
    }
}

/// Harvard spectral class of the host star.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpectralClass {
    O,
    B,
    A,
    F,
    G,
    K,
    M,
}

impl SpectralClass {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'O' => Some(SpectralClass::O),
            'B' => Some(SpectralClass::B),
            'A' => Some(SpectralClass::A),
            'F' => Some(SpectralClass::F),
            'G' => Some(SpectralClass::G),
            'K' => Some(SpectralClass::K),
            'M' => Some(SpectralClass::M),
            _ => None,
        }
    }

    /// Reads the class letter from a spectral type such as "G2V" or "m3.5 V".
    pub fn from_spectral_type(spectral_type: &str) -> Option<Self> {
        spectral_type.trim().chars().next().and_then(Self::from_letter)
    }

    /// Main-sequence class for an effective temperature in kelvin.
    pub fn from_temperature(teff_k: f64) -> Self {
        match teff_k {
            t if t >= 30_000.0 => SpectralClass::O,
            t if t >= 10_000.0 => SpectralClass::B,
            t if t >= 7_500.0 => SpectralClass::A,
            t if t >= 6_000.0 => SpectralClass::F,
            t if t >= 5_200.0 => SpectralClass::G,
            t if t >= 3_700.0 => SpectralClass::K,
            _ => SpectralClass::M,
        }
    }

    pub fn letter(&self) -> char {
        match self {
            SpectralClass::O => 'O',
            SpectralClass::B => 'B',
            SpectralClass::A => 'A',
            SpectralClass::F => 'F',
            SpectralClass::G => 'G',
            SpectralClass::K => 'K',
            SpectralClass::M => 'M',
        }
    }
}

impl fmt::Display for SpectralClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Observation priority derived from the characterizability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriorityTier {
    Low,
    Medium,
    High,
}

impl PriorityTier {
    pub const HIGH_THRESHOLD: f64 = 75.0;
    pub const MEDIUM_THRESHOLD: f64 = 50.0;

    /// ≥75 High, ≥50 Medium, otherwise Low.
    pub fn from_score(characterizability: f64) -> Self {
        if characterizability >= Self::HIGH_THRESHOLD {
            PriorityTier::High
        } else if characterizability >= Self::MEDIUM_THRESHOLD {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTier::High => "High",
            PriorityTier::Medium => "Medium",
            PriorityTier::Low => "Low",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse habitability label derived from the habitability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HabitabilityClass {
    PotentiallyHabitable,
    Marginal,
    Unlikely,
}

impl HabitabilityClass {
    pub fn from_score(habitability: f64) -> Self {
        if habitability >= 70.0 {
            HabitabilityClass::PotentiallyHabitable
        } else if habitability >= 40.0 {
            HabitabilityClass::Marginal
        } else {
            HabitabilityClass::Unlikely
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HabitabilityClass::PotentiallyHabitable => "Potentially Habitable",
            HabitabilityClass::Marginal => "Marginal",
            HabitabilityClass::Unlikely => "Unlikely",
        }
    }
}

impl fmt::Display for HabitabilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_field_round_trips_through_str() {
        for field in CanonicalField::ALL {
            assert_eq!(field.as_str().parse::<CanonicalField>().unwrap(), field);
        }
        assert_eq!(
            "Planet-Radius".parse::<CanonicalField>().unwrap(),
            CanonicalField::PlanetRadius
        );
    }

    #[test]
    fn detection_method_prefers_timing_over_transit() {
        assert_eq!(
            "Transit Timing Variations".parse::<DetectionMethod>().unwrap(),
            DetectionMethod::TransitTiming
        );
        assert_eq!(
            "transit".parse::<DetectionMethod>().unwrap(),
            DetectionMethod::Transit
        );
        assert_eq!(
            DetectionMethod::parse_lenient("disk kinematics"),
            DetectionMethod::Other
        );
    }

    #[test]
    fn spectral_class_from_temperature_bands() {
        assert_eq!(SpectralClass::from_temperature(5778.0), SpectralClass::G);
        assert_eq!(SpectralClass::from_temperature(3200.0), SpectralClass::M);
        assert_eq!(SpectralClass::from_temperature(6500.0), SpectralClass::F);
        assert_eq!(SpectralClass::from_spectral_type(" k5V"), Some(SpectralClass::K));
        assert_eq!(SpectralClass::from_spectral_type("DA2"), None);
    }

    #[test]
    fn tier_thresholds_are_inclusive() {
        assert_eq!(PriorityTier::from_score(75.0), PriorityTier::High);
        assert_eq!(PriorityTier::from_score(74.0), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_score(50.0), PriorityTier::Medium);
        assert_eq!(PriorityTier::from_score(49.0), PriorityTier::Low);
    }
}
