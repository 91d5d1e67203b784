//! Canonical target records.
//!
//! Every physical quantity is optional and stored in a fixed unit. A value that
//! was not supplied is `None`; nothing downstream substitutes zero or a sentinel.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, ValidationErrorKind};
use crate::{CanonicalField, DataQuality, DetectionMethod, TargetId};

/// One target after reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub id: TargetId,
    /// Distance from the Sun in parsecs.
    pub distance_pc: Option<f64>,
    pub stellar_teff_k: Option<f64>,
    pub stellar_radius_rsun: Option<f64>,
    pub stellar_mass_msun: Option<f64>,
    pub planet_radius_rearth: Option<f64>,
    pub planet_mass_mearth: Option<f64>,
    pub orbital_period_days: Option<f64>,
    pub semi_major_axis_au: Option<f64>,
    pub eccentricity: Option<f64>,
    pub equilibrium_temp_k: Option<f64>,
    pub data_quality: Option<DataQuality>,
    pub discovery_year: Option<i32>,
    pub detection_method: Option<DetectionMethod>,
    /// Spectral type as published, e.g. "G2V".
    pub spectral_type: Option<String>,
    pub ra_deg: Option<f64>,
    pub dec_deg: Option<f64>,
}

impl CanonicalRecord {
    /// A record with only an identifier; every quantity absent.
    pub fn new(id: TargetId) -> Self {
        Self {
            id,
            distance_pc: None,
            stellar_teff_k: None,
            stellar_radius_rsun: None,
            stellar_mass_msun: None,
            planet_radius_rearth: None,
            planet_mass_mearth: None,
            orbital_period_days: None,
            semi_major_axis_au: None,
            eccentricity: None,
            equilibrium_temp_k: None,
            data_quality: None,
            discovery_year: None,
            detection_method: None,
            spectral_type: None,
            ra_deg: None,
            dec_deg: None,
        }
    }

    /// Numeric value of a canonical field, `None` when absent or not numeric.
    pub fn numeric(&self, field: CanonicalField) -> Option<f64> {
        match field {
            CanonicalField::Distance => self.distance_pc,
            CanonicalField::StellarTeff => self.stellar_teff_k,
            CanonicalField::StellarRadius => self.stellar_radius_rsun,
            CanonicalField::StellarMass => self.stellar_mass_msun,
            CanonicalField::PlanetRadius => self.planet_radius_rearth,
            CanonicalField::PlanetMass => self.planet_mass_mearth,
            CanonicalField::OrbitalPeriod => self.orbital_period_days,
            CanonicalField::SemiMajorAxis => self.semi_major_axis_au,
            CanonicalField::Eccentricity => self.eccentricity,
            CanonicalField::EquilibriumTemperature => self.equilibrium_temp_k,
            CanonicalField::DiscoveryYear => self.discovery_year.map(f64::from),
            CanonicalField::RightAscension => self.ra_deg,
            CanonicalField::Declination => self.dec_deg,
            CanonicalField::Identifier
            | CanonicalField::DataQuality
            | CanonicalField::DetectionMethod
            | CanonicalField::SpectralType => None,
        }
    }

    /// Sets a numeric canonical field. Non-numeric fields are left untouched.
    pub fn set_numeric(&mut self, field: CanonicalField, value: Option<f64>) {
        match field {
            CanonicalField::Distance => self.distance_pc = value,
            CanonicalField::StellarTeff => self.stellar_teff_k = value,
            CanonicalField::StellarRadius => self.stellar_radius_rsun = value,
            CanonicalField::StellarMass => self.stellar_mass_msun = value,
            CanonicalField::PlanetRadius => self.planet_radius_rearth = value,
            CanonicalField::PlanetMass => self.planet_mass_mearth = value,
            CanonicalField::OrbitalPeriod => self.orbital_period_days = value,
            CanonicalField::SemiMajorAxis => self.semi_major_axis_au = value,
            CanonicalField::Eccentricity => self.eccentricity = value,
            CanonicalField::EquilibriumTemperature => self.equilibrium_temp_k = value,
            CanonicalField::RightAscension => self.ra_deg = value,
            CanonicalField::Declination => self.dec_deg = value,
            CanonicalField::DiscoveryYear => {
                self.discovery_year = value.map(|year| year as i32);
            }
            CanonicalField::Identifier
            | CanonicalField::DataQuality
            | CanonicalField::DetectionMethod
            | CanonicalField::SpectralType => {}
        }
    }

    /// Builder-style setter for numeric fields.
    pub fn with(mut self, field: CanonicalField, value: f64) -> Self {
        self.set_numeric(field, Some(value));
        self
    }

    pub fn with_data_quality(mut self, quality: DataQuality) -> Self {
        self.data_quality = Some(quality);
        self
    }

    pub fn with_spectral_type(mut self, spectral_type: impl Into<String>) -> Self {
        self.spectral_type = Some(spectral_type.into());
        self
    }

    /// Checks every present value against its physical domain.
    ///
    /// Returns the first violation in canonical field order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in CanonicalField::ALL {
            let Some(value) = self.numeric(field) else {
                continue;
            };
            if let Some(kind) = domain_violation(field, value) {
                return Err(ValidationError::new(
                    Some(self.id.clone()),
                    field,
                    value.to_string(),
                    kind,
                ));
            }
        }
        Ok(())
    }

    /// Number of populated fields among `fields`.
    pub fn populated(&self, fields: &[CanonicalField]) -> usize {
        fields.iter().filter(|field| self.has(**field)).count()
    }

    pub fn has(&self, field: CanonicalField) -> bool {
        match field {
            CanonicalField::Identifier => true,
            CanonicalField::DataQuality => self.data_quality.is_some(),
            CanonicalField::DetectionMethod => self.detection_method.is_some(),
            CanonicalField::SpectralType => self.spectral_type.is_some(),
            other => self.numeric(other).is_some(),
        }
    }
}

fn domain_violation(field: CanonicalField, value: f64) -> Option<ValidationErrorKind> {
    if !value.is_finite() {
        return Some(ValidationErrorKind::NotFinite);
    }
    match field {
        CanonicalField::Eccentricity if !(0.0..1.0).contains(&value) => {
            Some(ValidationErrorKind::OutOfRange { min: 0.0, max: 1.0 })
        }
        CanonicalField::RightAscension if !(0.0..360.0).contains(&value) => {
            Some(ValidationErrorKind::OutOfRange {
                min: 0.0,
                max: 360.0,
            })
        }
        CanonicalField::Declination if !(-90.0..=90.0).contains(&value) => {
            Some(ValidationErrorKind::OutOfRange {
                min: -90.0,
                max: 90.0,
            })
        }
        CanonicalField::Distance
        | CanonicalField::StellarTeff
        | CanonicalField::StellarRadius
        | CanonicalField::StellarMass
        | CanonicalField::PlanetRadius
        | CanonicalField::PlanetMass
        | CanonicalField::OrbitalPeriod
        | CanonicalField::SemiMajorAxis
        | CanonicalField::EquilibriumTemperature
        | CanonicalField::DiscoveryYear
            if value <= 0.0 =>
        {
            Some(ValidationErrorKind::NotPositive)
        }
        _ => None,
    }
}
