//! Scoring weights and curve constants.
//!
//! Curve shapes are fixed in [`crate::factors`]; the numbers that parameterize
//! them live here so they can be tuned from configuration.

use serde::{Deserialize, Serialize};

use crate::error::ScoringConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterizabilityWeights {
    pub distance: f64,
    pub stellar_type: f64,
    pub planet_size: f64,
    pub habitable_zone: f64,
    pub stellar_mass: f64,
    pub data_quality: f64,
}

impl Default for CharacterizabilityWeights {
    fn default() -> Self {
        Self {
            distance: 0.25,
            stellar_type: 0.20,
            planet_size: 0.20,
            habitable_zone: 0.15,
            stellar_mass: 0.10,
            data_quality: 0.10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitabilityWeights {
    pub temperature: f64,
    pub size: f64,
    pub eccentricity: f64,
    pub stellar: f64,
}

impl Default for HabitabilityWeights {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            size: 0.3,
            eccentricity: 0.15,
            stellar: 0.15,
        }
    }
}

/// Distance factor: flat, then linear, then a `1/d` tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceCurve {
    /// Distances up to this score 1.0.
    pub full_score_pc: f64,
    /// End of the linear segment.
    pub linear_limit_pc: f64,
    /// Factor value at `linear_limit_pc`, where the tail starts.
    pub tail_start: f64,
}

impl Default for DistanceCurve {
    fn default() -> Self {
        Self {
            full_score_pc: 5.0,
            linear_limit_pc: 50.0,
            tail_start: 0.1,
        }
    }
}

/// Planet size factor in Earth radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetSizeCurve {
    pub optimal: f64,
    pub lower_edge: f64,
    pub upper_edge: f64,
    /// Factor value at both edges of the preferred band.
    pub edge_value: f64,
    /// Upper end of the secondary regime.
    pub outer_edge: f64,
    /// Factor value at `outer_edge`.
    pub outer_value: f64,
    pub floor: f64,
}

impl Default for PlanetSizeCurve {
    fn default() -> Self {
        Self {
            optimal: 1.0,
            lower_edge: 0.5,
            upper_edge: 2.0,
            edge_value: 0.4,
            outer_edge: 4.0,
            outer_value: 0.1,
            floor: 0.02,
        }
    }
}

/// Habitable zone bounds as multiples of `sqrt(M★)` AU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitableZoneCurve {
    pub inner_factor: f64,
    pub outer_factor: f64,
    pub floor: f64,
}

impl Default for HabitableZoneCurve {
    fn default() -> Self {
        Self {
            inner_factor: 0.95,
            outer_factor: 1.37,
            floor: 0.05,
        }
    }
}

/// Stellar mass stability band in solar masses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StellarMassCurve {
    pub lower: f64,
    pub upper: f64,
    /// Distance outside the band at which the factor reaches zero.
    pub decay_width: f64,
}

impl Default for StellarMassCurve {
    fn default() -> Self {
        Self {
            lower: 0.8,
            upper: 1.2,
            decay_width: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EccentricityCurve {
    /// Eccentricities up to this score 1.0.
    pub circular_limit: f64,
    /// Factor value as eccentricity approaches 1.
    pub floor: f64,
}

impl Default for EccentricityCurve {
    fn default() -> Self {
        Self {
            circular_limit: 0.1,
            floor: 0.05,
        }
    }
}

/// Lookup values for the stellar type factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StellarTypeScores {
    pub o: f64,
    pub b: f64,
    pub a: f64,
    pub f: f64,
    pub g: f64,
    pub k: f64,
    pub m: f64,
    pub unknown: f64,
}

impl Default for StellarTypeScores {
    fn default() -> Self {
        Self {
            o: 0.1,
            b: 0.1,
            a: 0.3,
            f: 0.7,
            g: 1.0,
            k: 0.8,
            m: 0.6,
            unknown: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataQualityScores {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
    pub limited: f64,
}

impl Default for DataQualityScores {
    fn default() -> Self {
        Self {
            excellent: 1.0,
            good: 0.8,
            fair: 0.6,
            limited: 0.4,
        }
    }
}

/// Plausible bands for the confidence penalty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceBands {
    pub distance_pc: (f64, f64),
    pub planet_radius_rearth: (f64, f64),
    pub stellar_mass_msun: (f64, f64),
    /// Penalty added per value outside its band.
    pub increment: f64,
    pub max_penalty: f64,
}

impl Default for ConfidenceBands {
    fn default() -> Self {
        Self {
            distance_pc: (1.0, 100.0),
            // 0.01 to 2.0 Jupiter radii.
            planet_radius_rearth: (0.112_09, 22.418),
            stellar_mass_msun: (0.1, 3.0),
            increment: 0.2,
            max_penalty: 0.5,
        }
    }
}

/// Observing band of the reference instrument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WavelengthBand {
    Uv,
    #[default]
    Visible,
    Nir,
}

impl WavelengthBand {
    /// Band centre in microns.
    pub fn microns(self) -> f64 {
        match self {
            WavelengthBand::Uv => 0.25,
            WavelengthBand::Visible => 0.55,
            WavelengthBand::Nir => 1.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityWeights {
    pub iwa: f64,
    pub spectroscopy: f64,
    pub aperture: f64,
}

impl Default for ObservabilityWeights {
    fn default() -> Self {
        Self {
            iwa: 0.4,
            spectroscopy: 0.4,
            aperture: 0.2,
        }
    }
}

/// Reference coronagraph for the observability estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub telescope_diameter_m: f64,
    pub band: WavelengthBand,
    pub inner_working_angle_mas: f64,
    /// Faintest planet/star flux ratio the instrument reaches.
    pub contrast_sensitivity: f64,
    pub geometric_albedo: f64,
    /// Resolution elements the separation must span.
    pub iwa_factor: f64,
    pub weights: ObservabilityWeights,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            telescope_diameter_m: 6.0,
            band: WavelengthBand::Visible,
            inner_working_angle_mas: 75.0,
            contrast_sensitivity: 1e-10,
            geometric_albedo: 0.3,
            iwa_factor: 2.0,
            weights: ObservabilityWeights::default(),
        }
    }
}

/// A preferred band `[min, max]` with its optimum, scored by distance from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimumBand {
    pub min: f64,
    pub optimal: f64,
    pub max: f64,
}

impl OptimumBand {
    pub const fn new(min: f64, optimal: f64, max: f64) -> Self {
        Self { min, optimal, max }
    }
}

/// Thresholds and weights of the comprehensive distance habitability score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CdhsCriteria {
    /// Equilibrium temperature in K.
    pub temperature: OptimumBand,
    /// Planet radius in Earth radii.
    pub radius: OptimumBand,
    /// Insolation relative to Earth.
    pub flux: OptimumBand,
    pub temperature_weight: f64,
    pub radius_weight: f64,
    pub flux_weight: f64,
    pub stability_weight: f64,
}

impl Default for CdhsCriteria {
    fn default() -> Self {
        Self {
            temperature: OptimumBand::new(273.0, 288.0, 373.0),
            radius: OptimumBand::new(0.5, 1.0, 1.5),
            flux: OptimumBand::new(0.5, 1.0, 2.0),
            temperature_weight: 0.35,
            radius_weight: 0.25,
            flux_weight: 0.20,
            stability_weight: 0.20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub characterizability: CharacterizabilityWeights,
    pub habitability: HabitabilityWeights,
    pub distance: DistanceCurve,
    pub planet_size: PlanetSizeCurve,
    pub habitable_zone: HabitableZoneCurve,
    pub stellar_mass: StellarMassCurve,
    pub eccentricity: EccentricityCurve,
    pub stellar_type: StellarTypeScores,
    pub data_quality: DataQualityScores,
    pub confidence: ConfidenceBands,
    /// Bond albedo used when estimating equilibrium temperature.
    pub bond_albedo: f64,
    /// Score reported when no factor of a merit score is present.
    pub neutral_score: f64,
    pub observability: ObservabilityConfig,
    pub cdhs: CdhsCriteria,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            characterizability: CharacterizabilityWeights::default(),
            habitability: HabitabilityWeights::default(),
            distance: DistanceCurve::default(),
            planet_size: PlanetSizeCurve::default(),
            habitable_zone: HabitableZoneCurve::default(),
            stellar_mass: StellarMassCurve::default(),
            eccentricity: EccentricityCurve::default(),
            stellar_type: StellarTypeScores::default(),
            data_quality: DataQualityScores::default(),
            confidence: ConfidenceBands::default(),
            bond_albedo: 0.3,
            neutral_score: 50.0,
            observability: ObservabilityConfig::default(),
            cdhs: CdhsCriteria::default(),
        }
    }
}

impl ScoringConfig {
    /// Checks weights are finite and non-negative with a positive sum, and
    /// that curve breakpoints are ordered.
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let c = &self.characterizability;
        check_weights(
            "characterizability",
            &[
                ("distance", c.distance),
                ("stellar_type", c.stellar_type),
                ("planet_size", c.planet_size),
                ("habitable_zone", c.habitable_zone),
                ("stellar_mass", c.stellar_mass),
                ("data_quality", c.data_quality),
            ],
        )?;
        let h = &self.habitability;
        check_weights(
            "habitability",
            &[
                ("temperature", h.temperature),
                ("size", h.size),
                ("eccentricity", h.eccentricity),
                ("stellar", h.stellar),
            ],
        )?;

        let d = &self.distance;
        ordered("distance", &[0.0, d.full_score_pc, d.linear_limit_pc])?;
        let p = &self.planet_size;
        ordered(
            "planet_size",
            &[0.0, p.lower_edge, p.optimal, p.upper_edge, p.outer_edge],
        )?;
        let z = &self.habitable_zone;
        ordered("habitable_zone", &[0.0, z.inner_factor, z.outer_factor])?;
        let m = &self.stellar_mass;
        ordered("stellar_mass", &[0.0, m.lower, m.upper])?;
        if !m.decay_width.is_finite() || m.decay_width <= 0.0 {
            return Err(ScoringConfigError::Curve {
                curve: "stellar_mass",
                message: "decay_width must be positive".to_string(),
            });
        }
        ordered("eccentricity", &[0.0, self.eccentricity.circular_limit, 1.0])?;
        if !(0.0..1.0).contains(&self.bond_albedo) {
            return Err(ScoringConfigError::Curve {
                curve: "bond_albedo",
                message: format!("{} is outside [0, 1)", self.bond_albedo),
            });
        }
        if !(0.0..=100.0).contains(&self.neutral_score) {
            return Err(ScoringConfigError::Curve {
                curve: "neutral_score",
                message: format!("{} is outside [0, 100]", self.neutral_score),
            });
        }
        self.validate_observability()?;
        self.validate_cdhs()
    }

    fn validate_observability(&self) -> Result<(), ScoringConfigError> {
        let o = &self.observability;
        for (name, value) in [
            ("telescope_diameter_m", o.telescope_diameter_m),
            ("inner_working_angle_mas", o.inner_working_angle_mas),
            ("contrast_sensitivity", o.contrast_sensitivity),
            ("iwa_factor", o.iwa_factor),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ScoringConfigError::Curve {
                    curve: "observability",
                    message: format!("{name} must be positive, got {value}"),
                });
            }
        }
        if !(o.geometric_albedo > 0.0 && o.geometric_albedo <= 1.0) {
            return Err(ScoringConfigError::Curve {
                curve: "observability",
                message: format!("geometric_albedo {} is outside (0, 1]", o.geometric_albedo),
            });
        }
        let w = &o.weights;
        check_weights(
            "observability",
            &[
                ("iwa", w.iwa),
                ("spectroscopy", w.spectroscopy),
                ("aperture", w.aperture),
            ],
        )
    }

    fn validate_cdhs(&self) -> Result<(), ScoringConfigError> {
        let c = &self.cdhs;
        for band in [&c.temperature, &c.radius, &c.flux] {
            ordered("cdhs", &[band.min, band.optimal, band.max])?;
        }
        check_weights(
            "cdhs",
            &[
                ("temperature", c.temperature_weight),
                ("radius", c.radius_weight),
                ("flux", c.flux_weight),
                ("stability", c.stability_weight),
            ],
        )
    }
}

fn check_weights(group: &'static str, weights: &[(&'static str, f64)]) -> Result<(), ScoringConfigError> {
    for (name, weight) in weights {
        if !weight.is_finite() || *weight < 0.0 {
            return Err(ScoringConfigError::InvalidWeight {
                group,
                name,
                value: *weight,
            });
        }
    }
    if weights.iter().map(|(_, weight)| weight).sum::<f64>() <= 0.0 {
        return Err(ScoringConfigError::ZeroWeights { group });
    }
    Ok(())
}

fn ordered(curve: &'static str, points: &[f64]) -> Result<(), ScoringConfigError> {
    let increasing = points
        .windows(2)
        .all(|pair| pair[0].is_finite() && pair[1].is_finite() && pair[0] < pair[1]);
    if increasing {
        Ok(())
    } else {
        Err(ScoringConfigError::Curve {
            curve,
            message: format!("breakpoints {points:?} must be finite and strictly increasing"),
        })
    }
}
