//! Canonical field catalog: aliases, units and plausible value ranges.
//!
//! The built-in catalog covers the column names used by the NASA Exoplanet
//! Archive, the Habitable Worlds Observatory target lists and common ad hoc
//! spreadsheets. A catalog can also be loaded from TOML so new aliases do not
//! need a rebuild.

use std::collections::BTreeSet;
use std::path::Path;

use hwo_model::CanonicalField;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::utils::{compact, normalize_text};

/// A unit symbol accepted for a field and the factor that converts it into
/// the field's canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub symbol: String,
    #[serde(default = "unit_factor")]
    pub factor: f64,
}

fn unit_factor() -> f64 {
    1.0
}

/// Shape of the values expected in a column, used for plausibility checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueKind {
    /// Free text such as target names.
    Text,
    /// A real number within `[min, max]` once converted to the canonical unit.
    Number { min: f64, max: f64 },
    /// A whole number within `[min, max]`.
    Integer { min: i64, max: i64 },
    /// Text containing one of the vocabulary terms.
    Category { vocabulary: Vec<String> },
    /// A spectral type beginning with one of O B A F G K M.
    SpectralType,
}

/// Everything the reconciler knows about one canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field: CanonicalField,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: String,
    pub aliases: Vec<String>,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
    pub value: ValueKind,
}

impl FieldSpec {
    /// Conversion factor for a compact unit symbol, if this field accepts it.
    pub fn unit_factor(&self, unit: &str) -> Option<f64> {
        self.units
            .iter()
            .find(|spec| compact(&normalize_text(&spec.symbol)) == unit)
            .map(|spec| spec.factor)
    }

    pub fn accepts_unit(&self, unit: &str) -> bool {
        self.unit_factor(unit).is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub fields: Vec<FieldSpec>,
}

impl FieldCatalog {
    /// Builds a catalog and checks its invariants.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, CatalogError> {
        let catalog = Self { fields };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, CatalogError> {
        let catalog: FieldCatalog = toml::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn get(&self, field: CanonicalField) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.field == field)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.fields
            .iter()
            .filter(|spec| spec.required)
            .map(|spec| spec.field)
    }

    pub fn optional_fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.fields
            .iter()
            .filter(|spec| !spec.required)
            .map(|spec| spec.field)
    }

    /// True if any field in the catalog lists this compact unit symbol.
    pub fn is_known_unit(&self, unit: &str) -> bool {
        self.fields.iter().any(|spec| spec.accepts_unit(unit))
    }

    /// Checks uniqueness, aliases, value ranges and unit factors.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = BTreeSet::new();
        for spec in &self.fields {
            if !seen.insert(spec.field) {
                return Err(CatalogError::DuplicateField(spec.field));
            }
            if spec.aliases.iter().all(|alias| normalize_text(alias).is_empty()) {
                return Err(CatalogError::EmptyAliases(spec.field));
            }
            let bad_range = match &spec.value {
                ValueKind::Number { min, max } => !(min.is_finite() && max.is_finite() && min <= max),
                ValueKind::Integer { min, max } => min > max,
                ValueKind::Category { vocabulary } => vocabulary.is_empty(),
                ValueKind::Text | ValueKind::SpectralType => false,
            };
            if bad_range {
                return Err(CatalogError::InvalidValueKind(spec.field));
            }
            if spec
                .units
                .iter()
                .any(|unit| !(unit.factor.is_finite() && unit.factor > 0.0))
            {
                return Err(CatalogError::InvalidUnitFactor(spec.field));
            }
        }
        match self.get(CanonicalField::Identifier) {
            Some(spec) if spec.required => Ok(()),
            _ => Err(CatalogError::MissingIdentifier),
        }
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self {
            fields: default_fields(),
        }
    }
}

fn spec(
    field: CanonicalField,
    required: bool,
    description: &str,
    aliases: &[&str],
    units: &[(&str, f64)],
    value: ValueKind,
) -> FieldSpec {
    let mut all_aliases = vec![field.as_str().to_string()];
    all_aliases.extend(
        aliases
            .iter()
            .filter(|alias| **alias != field.as_str())
            .map(|alias| (*alias).to_string()),
    );
    FieldSpec {
        field,
        required,
        description: description.to_string(),
        aliases: all_aliases,
        units: units
            .iter()
            .map(|(symbol, factor)| UnitSpec {
                symbol: (*symbol).to_string(),
                factor: *factor,
            })
            .collect(),
        value,
    }
}

fn number(min: f64, max: f64) -> ValueKind {
    ValueKind::Number { min, max }
}

fn category(terms: &[&str]) -> ValueKind {
    ValueKind::Category {
        vocabulary: terms.iter().map(|term| (*term).to_string()).collect(),
    }
}

const EARTH_RADII_PER_JUPITER: f64 = 11.209;
const EARTH_MASSES_PER_JUPITER: f64 = 317.83;
const LIGHT_YEARS_PER_PARSEC: f64 = 3.261_56;

fn default_fields() -> Vec<FieldSpec> {
    use CanonicalField as F;
    vec![
        spec(
            F::Identifier,
            true,
            "Target or planet designation",
            &[
                "name", "planet_name", "pl_name", "target_name", "object_name", "designation",
                "common_name", "planet", "target", "object", "source_name", "exoplanet_name",
                "hostname_planet", "id",
            ],
            &[],
            ValueKind::Text,
        ),
        spec(
            F::Distance,
            true,
            "Distance from the Sun",
            &[
                "distance", "dist", "sy_dist", "distance_pc", "dist_pc", "system_distance",
                "star_distance", "stellar_distance", "parallax_distance", "dist_parsec",
                "parsecs",
            ],
            &[
                ("pc", 1.0),
                ("parsec", 1.0),
                ("parsecs", 1.0),
                ("ly", 1.0 / LIGHT_YEARS_PER_PARSEC),
                ("lyr", 1.0 / LIGHT_YEARS_PER_PARSEC),
            ],
            number(0.5, 10_000.0),
        ),
        spec(
            F::StellarTeff,
            false,
            "Host star effective temperature",
            &[
                "st_teff", "teff", "t_eff", "star_teff", "stellar_temperature", "star_temp",
                "effective_temperature", "host_teff", "teff_k",
            ],
            &[("k", 1.0), ("kelvin", 1.0)],
            number(2_000.0, 50_000.0),
        ),
        spec(
            F::StellarRadius,
            false,
            "Host star radius",
            &[
                "st_rad", "star_radius", "r_star", "rstar", "host_radius", "radius_star",
                "st_radius", "rs",
            ],
            &[("rsun", 1.0), ("r_sun", 1.0), ("rsol", 1.0), ("solar", 1.0)],
            number(0.05, 1_500.0),
        ),
        spec(
            F::StellarMass,
            true,
            "Host star mass",
            &[
                "star_mass", "st_mass", "host_mass", "host_star_mass", "m_star", "mstar",
                "mass_star", "stellar_m", "st_m", "ms", "mass_stellar",
            ],
            &[("msun", 1.0), ("m_sun", 1.0), ("msol", 1.0), ("solar", 1.0)],
            number(0.05, 150.0),
        ),
        spec(
            F::PlanetRadius,
            true,
            "Planet radius",
            &[
                "pl_rade", "pl_radius", "r_planet", "rp", "planet_r", "radius_earth",
                "earth_radius", "r_earth", "radius_e", "pl_rad", "planet_size", "radius",
            ],
            &[
                ("re", 1.0),
                ("rearth", 1.0),
                ("r_earth", 1.0),
                ("earth", 1.0),
                ("rj", EARTH_RADII_PER_JUPITER),
                ("rjup", EARTH_RADII_PER_JUPITER),
                ("r_jup", EARTH_RADII_PER_JUPITER),
            ],
            number(0.1, 30.0),
        ),
        spec(
            F::PlanetMass,
            false,
            "Planet mass",
            &[
                "pl_masse", "pl_mass", "m_planet", "mp", "planet_m", "mass_earth", "earth_mass",
                "m_earth", "mass_e", "pl_m", "pl_bmasse", "mass",
            ],
            &[
                ("me", 1.0),
                ("mearth", 1.0),
                ("m_earth", 1.0),
                ("earth", 1.0),
                ("mj", EARTH_MASSES_PER_JUPITER),
                ("mjup", EARTH_MASSES_PER_JUPITER),
                ("m_jup", EARTH_MASSES_PER_JUPITER),
            ],
            number(0.01, 10_000.0),
        ),
        spec(
            F::OrbitalPeriod,
            true,
            "Orbital period",
            &[
                "period", "pl_orbper", "orbit_period", "period_days", "orbital_period_days",
                "pl_period", "porb", "orbit_p", "period_d", "per",
            ],
            &[
                ("d", 1.0),
                ("day", 1.0),
                ("days", 1.0),
                ("yr", 365.25),
                ("year", 365.25),
                ("h", 1.0 / 24.0),
                ("hr", 1.0 / 24.0),
            ],
            number(0.05, 10_000_000.0),
        ),
        spec(
            F::SemiMajorAxis,
            false,
            "Orbital semi-major axis",
            &[
                "pl_orbsmax", "sma", "a_au", "semimajor_axis", "orbital_distance",
                "orbit_distance",
            ],
            &[("au", 1.0)],
            number(0.001, 10_000.0),
        ),
        spec(
            F::Eccentricity,
            false,
            "Orbital eccentricity",
            &["pl_orbeccen", "ecc", "orbital_eccentricity", "eccen"],
            &[],
            number(0.0, 0.999),
        ),
        spec(
            F::EquilibriumTemperature,
            false,
            "Planet equilibrium temperature",
            &[
                "pl_eqt", "teq", "t_eq", "eq_temp", "temp_eq", "planet_temp", "pl_temp",
                "temperature", "temp",
            ],
            &[("k", 1.0), ("kelvin", 1.0)],
            number(10.0, 5_000.0),
        ),
        spec(
            F::DataQuality,
            false,
            "Measurement quality grade",
            &["quality", "data_flag", "quality_flag", "reliability", "grade", "dq"],
            &[],
            category(&["excellent", "good", "fair", "limited", "poor"]),
        ),
        spec(
            F::DiscoveryYear,
            false,
            "Year of discovery",
            &[
                "disc_year", "year", "discovery_date", "found_year", "year_discovered",
            ],
            &[],
            ValueKind::Integer {
                min: 1989,
                max: 2100,
            },
        ),
        spec(
            F::DetectionMethod,
            false,
            "Discovery technique",
            &[
                "discovery_method", "discoverymethod", "method", "detection_technique",
                "discovery_technique", "technique", "disc_method",
            ],
            &[],
            category(&[
                "transit", "radial", "velocity", "imaging", "microlens", "astrometry",
                "timing", "pulsar", "rv",
            ]),
        ),
        spec(
            F::SpectralType,
            false,
            "Host star spectral type",
            &[
                "st_spectype", "spectype", "sptype", "spec_type", "stellar_type", "star_type",
                "stellar_class", "star_class", "host_star_type",
            ],
            &[],
            ValueKind::SpectralType,
        ),
        spec(
            F::RightAscension,
            false,
            "Right ascension",
            &["ra_deg", "right_ascension", "raj2000"],
            &[("deg", 1.0)],
            number(0.0, 360.0),
        ),
        spec(
            F::Declination,
            false,
            "Declination",
            &["dec_deg", "declination", "dej2000", "decj2000"],
            &[("deg", 1.0)],
            number(-90.0, 90.0),
        ),
    ]
}
