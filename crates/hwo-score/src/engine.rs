//! Scoring engine.

use hwo_model::{
    CanonicalField, CanonicalRecord, DerivedQuantity, HabitabilityClass, HabitabilityIndices,
    MeritScore, ObservabilityEstimate, PriorityTier, ScoreBreakdown, ScoreFactor, ScoredRecord,
    SpectralClass, ValidationError,
};
use tracing::debug;

use crate::accumulator::WeightedAccumulator;
use crate::config::ScoringConfig;
use crate::{factors, indices, observability};

/// Quantities filled in from other fields when the record lacks them.
#[derive(Debug, Clone, Default)]
struct Derived {
    semi_major_axis_au: Option<f64>,
    equilibrium_temp_k: Option<f64>,
    spectral_class: Option<SpectralClass>,
    /// A spectral type was given, its class letter was not recognized and no
    /// Teff was available to fall back on.
    unknown_class: bool,
    marks: Vec<DerivedQuantity>,
}

impl Derived {
    fn compute(record: &CanonicalRecord, config: &ScoringConfig) -> Self {
        let mut derived = Derived::default();

        derived.semi_major_axis_au = record.semi_major_axis_au.or_else(|| {
            let period = record.orbital_period_days?;
            let mass = record.stellar_mass_msun?;
            derived.marks.push(DerivedQuantity::SemiMajorAxis);
            Some(factors::kepler_semi_major_axis(period, mass))
        });

        derived.equilibrium_temp_k = record.equilibrium_temp_k.or_else(|| {
            let teff = record.stellar_teff_k?;
            let radius = record.stellar_radius_rsun?;
            let sma = derived.semi_major_axis_au?;
            derived.marks.push(DerivedQuantity::EquilibriumTemperature);
            Some(factors::equilibrium_temperature(
                teff,
                radius,
                sma,
                config.bond_albedo,
            ))
        });

        derived.spectral_class = record
            .spectral_type
            .as_deref()
            .and_then(SpectralClass::from_spectral_type);
        if derived.spectral_class.is_none() {
            match record.stellar_teff_k {
                Some(teff) => {
                    derived.spectral_class = Some(SpectralClass::from_temperature(teff));
                    derived.marks.push(DerivedQuantity::SpectralClass);
                }
                None => derived.unknown_class = record.spectral_type.is_some(),
            }
        }
        derived
    }

    /// The stellar type factor input: a class, an explicit unknown, or absent.
    fn stellar_type_input(&self) -> Option<Option<SpectralClass>> {
        if self.spectral_class.is_some() || self.unknown_class {
            Some(self.spectral_class)
        } else {
            None
        }
    }
}

/// Scores canonical records. Pure: the same record and config always give the
/// same [`ScoredRecord`].
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores one record.
    ///
    /// Missing values never fail; out-of-domain values (negative radius,
    /// eccentricity ≥ 1, non-finite numbers) return a [`ValidationError`].
    pub fn score(&self, record: &CanonicalRecord) -> Result<ScoredRecord, ValidationError> {
        record.validate()?;
        let config = &self.config;
        let derived = Derived::compute(record, config);

        let weights = &config.characterizability;
        let mut characterizability = WeightedAccumulator::new();
        characterizability.add(
            ScoreFactor::Distance,
            record
                .distance_pc
                .map(|d| factors::distance(d, &config.distance)),
            weights.distance,
        );
        characterizability.add(
            ScoreFactor::StellarType,
            derived
                .stellar_type_input()
                .map(|class| factors::stellar_type(class, &config.stellar_type)),
            weights.stellar_type,
        );
        characterizability.add(
            ScoreFactor::PlanetSize,
            record
                .planet_radius_rearth
                .map(|r| factors::planet_size(r, &config.planet_size)),
            weights.planet_size,
        );
        characterizability.add(
            ScoreFactor::HabitableZone,
            derived
                .semi_major_axis_au
                .zip(record.stellar_mass_msun)
                .map(|(a, m)| factors::habitable_zone(a, m, &config.habitable_zone)),
            weights.habitable_zone,
        );
        characterizability.add(
            ScoreFactor::StellarMassStability,
            record
                .stellar_mass_msun
                .map(|m| factors::stellar_mass(m, &config.stellar_mass)),
            weights.stellar_mass,
        );
        characterizability.add(
            ScoreFactor::DataQuality,
            record
                .data_quality
                .map(|q| factors::data_quality(q, &config.data_quality)),
            weights.data_quality,
        );

        let weights = &config.habitability;
        let mut habitability = WeightedAccumulator::new();
        habitability.add(
            ScoreFactor::TemperatureZone,
            derived.equilibrium_temp_k.map(factors::temperature_zone),
            weights.temperature,
        );
        habitability.add(
            ScoreFactor::SizeFit,
            record
                .planet_radius_rearth
                .map(|r| factors::size_fit(r, record.planet_mass_mearth)),
            weights.size,
        );
        habitability.add(
            ScoreFactor::EccentricityStability,
            record
                .eccentricity
                .map(|e| factors::eccentricity(e, &config.eccentricity)),
            weights.eccentricity,
        );
        habitability.add(
            ScoreFactor::StellarSuitability,
            self.stellar_suitability(record),
            weights.stellar,
        );

        let mut neutral = Vec::new();
        let mut merit = |accumulator: &WeightedAccumulator, which: MeritScore| {
            accumulator.score().unwrap_or_else(|| {
                neutral.push(which);
                config.neutral_score
            })
        };
        let characterizability_score = merit(&characterizability, MeritScore::Characterizability);
        let habitability_score = merit(&habitability, MeritScore::Habitability);
        let (completeness, penalty) = self.confidence_terms(record);
        let confidence = round_tenth((100.0 * completeness * (1.0 - penalty)).clamp(0.0, 100.0));
        let tier = PriorityTier::from_score(characterizability_score);

        debug!(
            id = %record.id,
            characterizability = characterizability_score,
            habitability = habitability_score,
            confidence,
            tier = %tier,
            "scored record"
        );

        Ok(ScoredRecord {
            record: record.clone(),
            habitability_score,
            characterizability_score,
            confidence,
            tier,
            habitability_class: HabitabilityClass::from_score(habitability_score),
            breakdown: ScoreBreakdown {
                characterizability: characterizability.into_factors(),
                habitability: habitability.into_factors(),
                completeness,
                extremeness_penalty: penalty,
                neutral,
                observability: self.observability(record, &derived),
                indices: self.indices(record, &derived),
                derived: derived.marks,
            },
        })
    }

    /// Needs an orbit, a distance and a planet radius; nothing is assumed.
    fn observability(
        &self,
        record: &CanonicalRecord,
        derived: &Derived,
    ) -> Option<ObservabilityEstimate> {
        let a = derived.semi_major_axis_au?;
        let distance = record.distance_pc?;
        let radius = record.planet_radius_rearth?;
        Some(observability::assess(
            a,
            distance,
            radius,
            &self.config.observability,
        ))
    }

    fn indices(&self, record: &CanonicalRecord, derived: &Derived) -> HabitabilityIndices {
        let teq = derived.equilibrium_temp_k;
        let radius = record.planet_radius_rearth;
        let flux = record
            .stellar_teff_k
            .zip(record.stellar_radius_rsun)
            .zip(derived.semi_major_axis_au)
            .map(|((teff, rstar), a)| indices::stellar_flux(teff, rstar, a));

        let cdhs = teq.zip(radius).zip(flux).map(|((teq, radius), flux)| {
            indices::cdhs(
                teq,
                radius,
                flux,
                record.eccentricity,
                record.orbital_period_days,
                &self.config.cdhs,
            )
        });
        let sephi = teq
            .zip(radius)
            .zip(record.stellar_teff_k.zip(record.orbital_period_days))
            .map(|((teq, radius), (teff, period))| {
                indices::sephi(teq, radius, record.planet_mass_mearth, teff, period)
            });
        HabitabilityIndices { cdhs, sephi }
    }

    /// Mean of the host temperature and mass terms that are present.
    fn stellar_suitability(&self, record: &CanonicalRecord) -> Option<f64> {
        let terms: Vec<f64> = [
            record.stellar_teff_k.map(factors::stellar_temperature),
            record
                .stellar_mass_msun
                .map(|m| factors::stellar_mass(m, &self.config.stellar_mass)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if terms.is_empty() {
            None
        } else {
            Some(terms.iter().sum::<f64>() / terms.len() as f64)
        }
    }

    /// Completeness fraction and extremeness penalty.
    fn confidence_terms(&self, record: &CanonicalRecord) -> (f64, f64) {
        let has = |field| record.has(field);
        let items = [
            has(CanonicalField::Distance),
            has(CanonicalField::StellarTeff) || has(CanonicalField::SpectralType),
            has(CanonicalField::StellarRadius),
            has(CanonicalField::StellarMass),
            has(CanonicalField::PlanetRadius),
            has(CanonicalField::PlanetMass),
            has(CanonicalField::OrbitalPeriod) || has(CanonicalField::SemiMajorAxis),
            has(CanonicalField::Eccentricity),
            has(CanonicalField::EquilibriumTemperature),
            has(CanonicalField::DataQuality),
        ];
        let completeness =
            items.iter().filter(|present| **present).count() as f64 / items.len() as f64;

        let bands = &self.config.confidence;
        let outside = |value: Option<f64>, (low, high): (f64, f64)| {
            value.is_some_and(|v| v < low || v > high)
        };
        let strikes = [
            outside(record.distance_pc, bands.distance_pc),
            outside(record.planet_radius_rearth, bands.planet_radius_rearth),
            outside(record.stellar_mass_msun, bands.stellar_mass_msun),
        ]
        .into_iter()
        .filter(|strike| *strike)
        .count();
        let penalty = (strikes as f64 * bands.increment).min(bands.max_penalty);
        (completeness, penalty)
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
