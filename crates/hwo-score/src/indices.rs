//! Published habitability indices: CDHS and SEPHI.

use crate::config::{CdhsCriteria, OptimumBand};
use crate::factors;

/// Insolation relative to Earth from stellar radius, Teff and orbit.
pub fn stellar_flux(teff_k: f64, stellar_radius_rsun: f64, semi_major_axis_au: f64) -> f64 {
    let luminosity = stellar_radius_rsun.powi(2) * (teff_k / factors::SOLAR_TEFF_K).powi(4);
    luminosity / semi_major_axis_au.powi(2)
}

/// 1 at the optimum, falling linearly to 0 at the farther bound; 0 outside.
fn band_score(value: f64, band: &OptimumBand) -> f64 {
    if value < band.min || value > band.max {
        return 0.0;
    }
    let reach = (band.optimal - band.min).max(band.max - band.optimal);
    1.0 - (value - band.optimal).abs() / reach
}

fn period_stability(period_days: Option<f64>) -> f64 {
    match period_days {
        None => 1.0,
        Some(period) if (100.0..=1000.0).contains(&period) => 1.0,
        Some(period) => (1.0 - (period - 365.0).abs() / 1000.0).max(0.0),
    }
}

/// Orbital stability term: mostly eccentricity, partly period.
///
/// A missing eccentricity counts as circular and a missing period as stable.
pub fn orbital_stability(eccentricity: Option<f64>, period_days: Option<f64>) -> f64 {
    let circular = (1.0 - eccentricity.unwrap_or(0.0)).max(0.0);
    0.6 * circular + 0.4 * period_stability(period_days)
}

/// Comprehensive distance habitability score in [0, 1].
pub fn cdhs(
    equilibrium_temp_k: f64,
    radius_rearth: f64,
    flux_earth: f64,
    eccentricity: Option<f64>,
    period_days: Option<f64>,
    criteria: &CdhsCriteria,
) -> f64 {
    let terms = [
        (
            band_score(equilibrium_temp_k, &criteria.temperature),
            criteria.temperature_weight,
        ),
        (band_score(radius_rearth, &criteria.radius), criteria.radius_weight),
        (band_score(flux_earth, &criteria.flux), criteria.flux_weight),
        (
            orbital_stability(eccentricity, period_days),
            criteria.stability_weight,
        ),
    ];
    let weight_sum: f64 = terms.iter().map(|(_, weight)| weight).sum();
    let total: f64 = terms.iter().map(|(value, weight)| value * weight).sum();
    (total / weight_sum).clamp(0.0, 1.0)
}

/// Orbital period fit around one Earth year.
pub fn orbital_period_fit(period_days: f64) -> f64 {
    let offset = (period_days - 365.0).abs();
    let value = if (200.0..=500.0).contains(&period_days) {
        1.0 - offset / 300.0
    } else if (50.0..=700.0).contains(&period_days) {
        0.5 - offset / 600.0
    } else {
        0.0
    };
    value.clamp(0.0, 1.0)
}

/// Standard exoplanet planetary habitability index in [0, 1].
pub fn sephi(
    equilibrium_temp_k: f64,
    radius_rearth: f64,
    mass_mearth: Option<f64>,
    teff_k: f64,
    period_days: f64,
) -> f64 {
    let value = 0.35 * factors::temperature_zone(equilibrium_temp_k)
        + 0.25 * factors::size_fit(radius_rearth, mass_mearth)
        + 0.20 * factors::stellar_temperature(teff_k)
        + 0.20 * orbital_period_fit(period_days);
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sun_delivers_unit_flux_at_one_au() {
        assert!(close(stellar_flux(5778.0, 1.0, 1.0), 1.0));
        assert!(close(stellar_flux(5778.0, 1.0, 2.0), 0.25));
        assert!(close(stellar_flux(5778.0, 2.0, 1.0), 4.0));
    }

    #[test]
    fn earth_scores_full_cdhs() {
        let criteria = CdhsCriteria::default();
        let earth = cdhs(288.0, 1.0, 1.0, Some(0.0167), Some(365.25), &criteria);
        assert!(close(earth, 1.0 - 0.2 * 0.6 * 0.0167));
        assert!(close(cdhs(288.0, 1.0, 1.0, None, None, &criteria), 1.0));
    }

    #[test]
    fn cdhs_terms_vanish_outside_their_band() {
        let criteria = CdhsCriteria::default();
        // Too hot, too large and over-irradiated leaves only stability.
        assert!(close(cdhs(500.0, 3.0, 5.0, None, None, &criteria), 0.2));
        // The temperature band reaches 85 K above its optimum.
        assert!(close(band_score(330.5, &criteria.temperature), 0.5));
    }

    #[test]
    fn stability_penalizes_eccentric_and_extreme_orbits() {
        assert!(close(orbital_stability(Some(0.5), None), 0.7));
        assert!(close(orbital_stability(None, Some(2365.0)), 0.6));
        assert!(close(orbital_stability(None, Some(10.0)), 0.6 + 0.4 * 0.645));
    }

    #[test]
    fn period_fit_has_two_plateaus() {
        assert!(close(orbital_period_fit(365.0), 1.0));
        assert!(close(orbital_period_fit(515.0), 0.25));
        assert!(close(orbital_period_fit(35.0), 0.0));
    }

    #[test]
    fn earth_scores_full_sephi() {
        assert!(close(sephi(288.0, 1.0, Some(1.0), 5778.0, 365.0), 1.0));
        // 400 K is past the temperature fit's outer plateau.
        assert!(close(sephi(400.0, 1.0, Some(1.0), 5778.0, 365.0), 0.65));
    }
}
