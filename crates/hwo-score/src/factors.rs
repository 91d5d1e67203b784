//! Factor curves and derived quantities.
//!
//! Every factor maps a physical value into [0, 1]. Inputs are assumed to have
//! passed domain validation (finite, positive where physical).

use hwo_model::{DataQuality, SpectralClass};

use crate::config::{
    DataQualityScores, DistanceCurve, EccentricityCurve, HabitableZoneCurve, PlanetSizeCurve,
    StellarMassCurve, StellarTypeScores,
};

pub const DAYS_PER_YEAR: f64 = 365.25;
pub const SOLAR_RADIUS_AU: f64 = 0.004_650_47;
pub const EARTH_EQUILIBRIUM_K: f64 = 288.0;
pub const SOLAR_TEFF_K: f64 = 5778.0;

/// Linear interpolation from `(x0, y0)` to `(x1, y1)` evaluated at `x`.
fn lerp(x: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    if (x1 - x0).abs() < f64::EPSILON {
        return y1;
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

/// 1.0 up to `full_score_pc`, linear to `tail_start` at `linear_limit_pc`, then
/// `tail_start · linear_limit / d`.
pub fn distance(distance_pc: f64, curve: &DistanceCurve) -> f64 {
    if distance_pc <= curve.full_score_pc {
        1.0
    } else if distance_pc <= curve.linear_limit_pc {
        lerp(
            distance_pc,
            curve.full_score_pc,
            1.0,
            curve.linear_limit_pc,
            curve.tail_start,
        )
    } else {
        curve.tail_start * curve.linear_limit_pc / distance_pc
    }
}

pub fn stellar_type(class: Option<SpectralClass>, scores: &StellarTypeScores) -> f64 {
    match class {
        Some(SpectralClass::O) => scores.o,
        Some(SpectralClass::B) => scores.b,
        Some(SpectralClass::A) => scores.a,
        Some(SpectralClass::F) => scores.f,
        Some(SpectralClass::G) => scores.g,
        Some(SpectralClass::K) => scores.k,
        Some(SpectralClass::M) => scores.m,
        None => scores.unknown,
    }
}

/// Peak at the optimal radius, linear to `edge_value` at both band edges,
/// linear to `outer_value` across the secondary regime, `floor` beyond.
pub fn planet_size(radius_rearth: f64, curve: &PlanetSizeCurve) -> f64 {
    let r = radius_rearth;
    let value = if r < curve.lower_edge {
        lerp(r, 0.0, 0.0, curve.lower_edge, curve.edge_value)
    } else if r <= curve.optimal {
        lerp(r, curve.lower_edge, curve.edge_value, curve.optimal, 1.0)
    } else if r <= curve.upper_edge {
        lerp(r, curve.optimal, 1.0, curve.upper_edge, curve.edge_value)
    } else if r <= curve.outer_edge {
        lerp(
            r,
            curve.upper_edge,
            curve.edge_value,
            curve.outer_edge,
            curve.outer_value,
        )
    } else {
        curve.floor
    };
    value.max(curve.floor)
}

/// Semi-major axis in AU from Kepler's third law.
pub fn kepler_semi_major_axis(period_days: f64, stellar_mass_msun: f64) -> f64 {
    let years = period_days / DAYS_PER_YEAR;
    (years * years * stellar_mass_msun).cbrt()
}

/// Habitable zone `[inner, outer]` in AU for a star of the given mass.
pub fn habitable_zone_bounds(stellar_mass_msun: f64, curve: &HabitableZoneCurve) -> (f64, f64) {
    let scale = stellar_mass_msun.sqrt();
    (curve.inner_factor * scale, curve.outer_factor * scale)
}

/// 1.0 at the zone midpoint, falling linearly to zero at the bounds; `floor`
/// everywhere outside.
pub fn habitable_zone(
    semi_major_axis_au: f64,
    stellar_mass_msun: f64,
    curve: &HabitableZoneCurve,
) -> f64 {
    let (inner, outer) = habitable_zone_bounds(stellar_mass_msun, curve);
    let mid = (inner + outer) / 2.0;
    let half_width = (outer - inner) / 2.0;
    if half_width <= 0.0 {
        return curve.floor;
    }
    (1.0 - (semi_major_axis_au - mid).abs() / half_width).max(curve.floor)
}

/// 1.0 inside the band, falling to zero `decay_width` outside it.
pub fn stellar_mass(mass_msun: f64, curve: &StellarMassCurve) -> f64 {
    let outside = if mass_msun < curve.lower {
        curve.lower - mass_msun
    } else if mass_msun > curve.upper {
        mass_msun - curve.upper
    } else {
        0.0
    };
    (1.0 - outside / curve.decay_width).max(0.0)
}

pub fn data_quality(quality: DataQuality, scores: &DataQualityScores) -> f64 {
    match quality {
        DataQuality::Excellent => scores.excellent,
        DataQuality::Good => scores.good,
        DataQuality::Fair => scores.fair,
        DataQuality::Limited => scores.limited,
    }
}

/// Liquid-water temperature fit around 288 K.
pub fn temperature_zone(equilibrium_k: f64) -> f64 {
    let offset = (equilibrium_k - EARTH_EQUILIBRIUM_K).abs();
    let value = if (250.0..=350.0).contains(&equilibrium_k) {
        1.0 - offset / 100.0
    } else if (150.0..=450.0).contains(&equilibrium_k) {
        0.5 - offset / 200.0
    } else {
        0.0
    };
    value.clamp(0.0, 1.0)
}

/// Rocky-planet size fit, halved when the bulk density is far from Earth's.
pub fn size_fit(radius_rearth: f64, mass_mearth: Option<f64>) -> f64 {
    let offset = (radius_rearth - 1.0).abs();
    let mut value = if (0.8..=1.4).contains(&radius_rearth) {
        1.0 - offset / 0.6
    } else if (0.5..=2.5).contains(&radius_rearth) {
        0.5 - offset / 2.0
    } else {
        0.0
    };
    if let Some(mass) = mass_mearth {
        let density = mass / radius_rearth.powi(3);
        if !(0.7..=1.5).contains(&density) {
            value *= 0.5;
        }
    }
    value.clamp(0.0, 1.0)
}

/// 1.0 for near-circular orbits, linear down to `floor` at e = 1.
pub fn eccentricity(e: f64, curve: &EccentricityCurve) -> f64 {
    if e <= curve.circular_limit {
        1.0
    } else {
        lerp(e, curve.circular_limit, 1.0, 1.0, curve.floor).max(curve.floor)
    }
}

/// Host temperature suitability around the solar value.
pub fn stellar_temperature(teff_k: f64) -> f64 {
    let offset = (teff_k - SOLAR_TEFF_K).abs();
    let value = if (4500.0..=6500.0).contains(&teff_k) {
        1.0 - offset / 2000.0
    } else if (2400.0..=7500.0).contains(&teff_k) {
        0.5 - offset / 4000.0
    } else {
        0.0
    };
    value.clamp(0.0, 1.0)
}

/// Equilibrium temperature in K for a given Bond albedo.
pub fn equilibrium_temperature(
    teff_k: f64,
    stellar_radius_rsun: f64,
    semi_major_axis_au: f64,
    bond_albedo: f64,
) -> f64 {
    let radius_au = stellar_radius_rsun * SOLAR_RADIUS_AU;
    teff_k * (radius_au / (2.0 * semi_major_axis_au)).sqrt() * (1.0 - bond_albedo).powf(0.25)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn distance_curve_segments() {
        let curve = DistanceCurve::default();
        assert_eq!(distance(3.0, &curve), 1.0);
        assert!(close(distance(27.5, &curve), 0.55));
        assert!(close(distance(50.0, &curve), 0.1));
        assert!(close(distance(500.0, &curve), 0.01));
        assert!(distance(10.0, &curve) > distance(60.0, &curve));
    }

    #[test]
    fn planet_size_peaks_at_one_earth_radius() {
        let curve = PlanetSizeCurve::default();
        assert_eq!(planet_size(1.0, &curve), 1.0);
        assert!(close(planet_size(0.5, &curve), 0.4));
        assert!(close(planet_size(2.0, &curve), 0.4));
        assert!(close(planet_size(3.0, &curve), 0.25));
        assert_eq!(planet_size(11.0, &curve), 0.02);
        assert_eq!(planet_size(0.01, &curve), 0.02);
    }

    #[test]
    fn kepler_gives_one_au_for_earth() {
        assert!(close(kepler_semi_major_axis(365.25, 1.0), 1.0));
    }

    #[test]
    fn habitable_zone_midpoint_and_floor() {
        let curve = HabitableZoneCurve::default();
        assert!(close(habitable_zone(1.16, 1.0, &curve), 1.0));
        assert!(close(habitable_zone(1.055, 1.0, &curve), 0.5));
        assert!(close(habitable_zone(0.95, 1.0, &curve), 0.05));
        assert!(close(habitable_zone(1.37, 1.0, &curve), 0.05));
        assert_eq!(habitable_zone(1.47, 1.0, &curve), 0.05);
        assert_eq!(habitable_zone(0.5, 1.0, &curve), 0.05);
        assert_eq!(habitable_zone(5.0, 1.0, &curve), 0.05);
        // Bounds scale with sqrt(M).
        assert!(close(habitable_zone(1.16 * 2.0, 4.0, &curve), 1.0));
    }

    #[test]
    fn stellar_mass_band() {
        let curve = StellarMassCurve::default();
        assert_eq!(stellar_mass(1.0, &curve), 1.0);
        assert!(close(stellar_mass(0.4, &curve), 0.5));
        assert_eq!(stellar_mass(3.0, &curve), 0.0);
    }

    #[test]
    fn temperature_zone_prefers_earth() {
        assert_eq!(temperature_zone(288.0), 1.0);
        assert!(close(temperature_zone(200.0), 0.06));
        assert_eq!(temperature_zone(700.0), 0.0);
    }

    #[test]
    fn dense_planet_halves_size_fit() {
        assert_eq!(size_fit(1.0, Some(1.0)), 1.0);
        assert_eq!(size_fit(1.0, Some(5.0)), 0.5);
    }

    #[test]
    fn eccentricity_decays_to_floor() {
        let curve = EccentricityCurve::default();
        assert_eq!(eccentricity(0.05, &curve), 1.0);
        assert!(close(eccentricity(0.55, &curve), 0.525));
        assert!(eccentricity(0.99, &curve) >= 0.05);
    }

    #[test]
    fn earth_equilibrium_temperature() {
        let teq = equilibrium_temperature(5778.0, 1.0, 1.0, 0.3);
        assert!((teq - 255.0).abs() < 1.0, "teq {teq}");
    }
}
