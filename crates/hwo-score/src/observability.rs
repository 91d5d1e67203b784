//! Direct-imaging observability for a reference coronagraph.
//!
//! Reported alongside the merit scores; nothing here feeds them.

use hwo_model::ObservabilityEstimate;

use crate::config::{ObservabilityConfig, WavelengthBand};

pub const AU_METERS: f64 = 1.496e11;
pub const PARSEC_METERS: f64 = 3.086e16;
pub const RAD_TO_MAS: f64 = 206_265_000.0;
/// Mean Earth radius in AU.
pub const EARTH_RADIUS_AU: f64 = 4.258_75e-5;

/// Rayleigh criterion coefficient.
const RAYLEIGH: f64 = 1.22;
const MIN_CONTRAST: f64 = 1e-20;

/// Maximum planet-star separation in milliarcseconds; 0 for a degenerate
/// geometry.
pub fn angular_separation_mas(semi_major_axis_au: f64, distance_pc: f64) -> f64 {
    if semi_major_axis_au <= 0.0 || distance_pc <= 0.0 {
        return 0.0;
    }
    semi_major_axis_au * AU_METERS / (distance_pc * PARSEC_METERS) * RAD_TO_MAS
}

/// Reflected-light flux ratio at quadrature for a Lambertian sphere.
pub fn contrast_ratio(radius_rearth: f64, semi_major_axis_au: f64, geometric_albedo: f64) -> f64 {
    if semi_major_axis_au <= 0.0 {
        return 0.0;
    }
    let ratio = radius_rearth * EARTH_RADIUS_AU / semi_major_axis_au;
    geometric_albedo * ratio * ratio / std::f64::consts::PI
}

/// Aperture in metres that resolves `separation_mas` with `iwa_factor`
/// resolution elements to spare.
pub fn required_diameter_m(separation_mas: f64, band: WavelengthBand, iwa_factor: f64) -> Option<f64> {
    if separation_mas <= 0.0 {
        return None;
    }
    let theta = separation_mas / RAD_TO_MAS;
    Some(RAYLEIGH * band.microns() * 1e-6 / theta * iwa_factor)
}

/// 0 for a planet ten times fainter than the sensitivity limit, 0.5 at the
/// limit, 1 for ten times brighter.
pub fn spectroscopic_feasibility(contrast: f64, sensitivity: f64) -> f64 {
    let margin = (contrast.max(MIN_CONTRAST) / sensitivity).log10();
    ((margin + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// 0 inside half the inner working angle, 1 beyond one and a half.
pub fn iwa_score(separation_mas: f64, inner_working_angle_mas: f64) -> f64 {
    (separation_mas / inner_working_angle_mas - 0.5).clamp(0.0, 1.0)
}

/// Fraction of the required aperture the telescope provides, capped at 1.
fn aperture_score(required_m: Option<f64>, diameter_m: f64) -> f64 {
    required_m.map_or(0.0, |required| (diameter_m / required).min(1.0))
}

/// Full estimate for one planet.
pub fn assess(
    semi_major_axis_au: f64,
    distance_pc: f64,
    radius_rearth: f64,
    config: &ObservabilityConfig,
) -> ObservabilityEstimate {
    let separation_mas = angular_separation_mas(semi_major_axis_au, distance_pc);
    let contrast = contrast_ratio(radius_rearth, semi_major_axis_au, config.geometric_albedo);
    let required = required_diameter_m(separation_mas, config.band, config.iwa_factor);
    let spectroscopic_score = spectroscopic_feasibility(contrast, config.contrast_sensitivity);
    let iwa = iwa_score(separation_mas, config.inner_working_angle_mas);

    let w = &config.weights;
    let total = w.iwa + w.spectroscopy + w.aperture;
    let combined = (w.iwa * iwa
        + w.spectroscopy * spectroscopic_score
        + w.aperture * aperture_score(required, config.telescope_diameter_m))
        / total;

    ObservabilityEstimate {
        separation_mas,
        contrast_ratio: contrast,
        required_diameter_m: required,
        spectroscopic_score,
        iwa_score: iwa,
        observability_score: combined.clamp(0.0, 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn one_au_at_ten_parsecs_is_a_tenth_of_an_arcsecond() {
        assert!(close(angular_separation_mas(1.0, 10.0), 100.0, 0.1));
        assert!(close(angular_separation_mas(2.0, 10.0), 200.0, 0.2));
        assert_eq!(angular_separation_mas(0.0, 10.0), 0.0);
        assert_eq!(angular_separation_mas(1.0, 0.0), 0.0);
    }

    #[test]
    fn earth_reflects_about_two_parts_in_ten_billion() {
        let contrast = contrast_ratio(1.0, 1.0, 0.3);
        assert!(close(contrast, 1.73e-10, 0.01e-10), "contrast {contrast}");
        // Flux ratio scales with (Rp / a)^2.
        assert!(close(contrast_ratio(2.0, 1.0, 0.3) / contrast, 4.0, 1e-9));
        assert!(close(contrast / contrast_ratio(1.0, 2.0, 0.3), 4.0, 1e-9));
    }

    #[test]
    fn required_aperture_follows_the_diffraction_limit() {
        let visible = required_diameter_m(100.0, WavelengthBand::Visible, 2.0).unwrap();
        assert!(close(visible, 2.768, 0.005), "diameter {visible}");
        let nir = required_diameter_m(100.0, WavelengthBand::Nir, 2.0).unwrap();
        assert!(close(nir / visible, 1.6 / 0.55, 1e-9));
        assert_eq!(required_diameter_m(0.0, WavelengthBand::Uv, 2.0), None);
    }

    #[test]
    fn spectroscopy_scores_margin_over_sensitivity() {
        assert!(close(spectroscopic_feasibility(1e-10, 1e-10), 0.5, 1e-12));
        assert!(close(spectroscopic_feasibility(1e-9, 1e-10), 1.0, 1e-12));
        assert!(close(spectroscopic_feasibility(1e-11, 1e-10), 0.0, 1e-12));
        assert_eq!(spectroscopic_feasibility(0.0, 1e-10), 0.0);
    }

    #[test]
    fn iwa_score_ramps_across_the_working_angle() {
        assert_eq!(iwa_score(30.0, 75.0), 0.0);
        assert!(close(iwa_score(75.0, 75.0), 0.5, 1e-12));
        assert_eq!(iwa_score(112.5, 75.0), 1.0);
        assert_eq!(iwa_score(400.0, 75.0), 1.0);
    }

    #[test]
    fn earth_at_ten_parsecs_is_observable() {
        let estimate = assess(1.0, 10.0, 1.0, &ObservabilityConfig::default());
        assert!(close(estimate.iwa_score, 0.833, 0.002));
        assert!(close(estimate.spectroscopic_score, 0.619, 0.002));
        // 6 m clears the ~2.8 m requirement, so the aperture term is full.
        assert!(close(estimate.observability_score, 0.781, 0.002));
    }

    #[test]
    fn unresolved_planet_scores_no_aperture_credit() {
        let config = ObservabilityConfig::default();
        let estimate = assess(1.0, 1e9, 1.0, &config);
        assert_eq!(estimate.iwa_score, 0.0);
        assert!(close(estimate.spectroscopic_score, 0.619, 0.002));
        assert!(estimate.required_diameter_m.unwrap() > config.telescope_diameter_m);
        assert!(estimate.observability_score < 0.5);
    }
}
