//! Scoring properties: bounds, renormalization, monotonicity, batches.

use hwo_model::{
    CanonicalField, CanonicalRecord, DataQuality, MeritScore, PriorityTier, ScoreFactor, TargetId,
    ValidationErrorKind,
};
use hwo_score::{ScoringConfig, ScoringEngine, factors};
use proptest::prelude::*;

fn record(id: &str) -> CanonicalRecord {
    CanonicalRecord::new(TargetId::new(id).unwrap())
}

fn kepler_like(id: &str, distance: f64) -> CanonicalRecord {
    record(id)
        .with(CanonicalField::Distance, distance)
        .with(CanonicalField::StellarTeff, 5700.0)
        .with(CanonicalField::StellarRadius, 1.0)
        .with(CanonicalField::StellarMass, 1.0)
        .with(CanonicalField::PlanetRadius, 1.1)
        .with(CanonicalField::OrbitalPeriod, 300.0)
}

#[test]
fn missing_factor_renormalizes_over_present_weights() {
    let rec = record("Sparse")
        .with(CanonicalField::Distance, 27.5)
        .with(CanonicalField::PlanetRadius, 1.0)
        .with_data_quality(DataQuality::Good);
    let scored = ScoringEngine::default().score(&rec).unwrap();

    // (0.25·0.55 + 0.20·1.0 + 0.10·0.8) / (0.25 + 0.20 + 0.10) = 0.7591
    assert_eq!(scored.characterizability_score, 76.0);
    let present: Vec<ScoreFactor> = scored
        .breakdown
        .characterizability
        .iter()
        .map(|f| f.factor)
        .collect();
    assert_eq!(
        present,
        vec![
            ScoreFactor::Distance,
            ScoreFactor::PlanetSize,
            ScoreFactor::DataQuality
        ]
    );
}

#[test]
fn record_without_scoring_inputs_sits_at_neutral() {
    let rec = record("MassOnly")
        .with(CanonicalField::PlanetMass, 5.0)
        .with(CanonicalField::StellarRadius, 0.9);
    let scored = ScoringEngine::default().score(&rec).unwrap();

    assert_eq!(scored.characterizability_score, 50.0);
    assert_eq!(scored.habitability_score, 50.0);
    assert_eq!(scored.tier, PriorityTier::Medium);
    assert_eq!(scored.confidence, 20.0);
    assert_eq!(
        scored.breakdown.neutral,
        vec![MeritScore::Characterizability, MeritScore::Habitability]
    );
}

#[test]
fn habitable_zone_peaks_mid_zone_and_floors_at_its_edges() {
    let curve = ScoringConfig::default().habitable_zone;
    let (inner, outer) = factors::habitable_zone_bounds(1.0, &curve);
    let mid = (inner + outer) / 2.0;

    assert!((factors::habitable_zone(mid, 1.0, &curve) - 1.0).abs() < 1e-12);
    for a in [inner, outer, outer + 0.1, inner / 2.0] {
        let value = factors::habitable_zone(a, 1.0, &curve);
        assert!((value - curve.floor).abs() < 1e-12, "{a} AU scored {value}");
    }
    let quarter = factors::habitable_zone(inner + (outer - inner) / 4.0, 1.0, &curve);
    assert!((quarter - 0.5).abs() < 1e-9);
}

#[test]
fn closer_targets_have_higher_distance_factor() {
    let curve = ScoringConfig::default().distance;
    assert!(factors::distance(10.0, &curve) > factors::distance(60.0, &curve));

    let engine = ScoringEngine::default();
    let near = engine.score(&kepler_like("Near", 10.0)).unwrap();
    let far = engine.score(&kepler_like("Far", 60.0)).unwrap();
    let near_factor = near.breakdown.factor(ScoreFactor::Distance).unwrap().value;
    let far_factor = far.breakdown.factor(ScoreFactor::Distance).unwrap().value;
    assert!(near_factor > far_factor);
}

#[test]
fn nearby_record_outscores_same_record_at_500_pc() {
    let engine = ScoringEngine::default();
    let near = engine.score(&kepler_like("Kepler-X", 30.0)).unwrap();
    let far = engine.score(&kepler_like("Kepler-X", 500.0)).unwrap();
    assert!(
        near.characterizability_score > far.characterizability_score,
        "{} <= {}",
        near.characterizability_score,
        far.characterizability_score
    );
    assert_eq!(near.habitability_score, far.habitability_score);
}

#[test]
fn batch_rejects_only_the_invalid_record() {
    let records: Vec<CanonicalRecord> = (0..10)
        .map(|i| {
            let radius = if i == 6 { -1.0 } else { 1.0 + i as f64 * 0.1 };
            kepler_like(&format!("T-{i}"), 10.0 + i as f64).with(CanonicalField::PlanetRadius, radius)
        })
        .collect();
    let batch = ScoringEngine::default().score_batch(&records);

    assert_eq!(batch.scored.len(), 9);
    assert_eq!(batch.errors.len(), 1);
    let err = &batch.errors[0];
    assert_eq!(err.record_id.as_ref().unwrap().as_str(), "T-6");
    assert_eq!(err.field, CanonicalField::PlanetRadius);
    assert_eq!(err.kind, ValidationErrorKind::NotPositive);
    assert!(batch.scored.iter().all(|s| s.id().as_str() != "T-6"));
}

#[test]
fn parallel_batch_matches_sequential() {
    let records: Vec<CanonicalRecord> = (0..200)
        .map(|i| {
            let mut rec = kepler_like(&format!("P-{i}"), 1.0 + i as f64 * 2.5)
                .with(CanonicalField::Eccentricity, (i % 9) as f64 / 10.0);
            if i % 7 == 0 {
                rec = rec.with(CanonicalField::StellarMass, -0.5);
            }
            rec
        })
        .collect();
    let engine = ScoringEngine::default();
    let sequential = engine.score_batch(&records);
    let parallel = engine.score_batch_parallel(&records);
    assert_eq!(sequential, parallel);
    assert_eq!(sequential.errors.len(), 29);
}

#[test]
fn scoring_from_many_threads_is_deterministic() {
    let engine = ScoringEngine::default();
    let records: Vec<CanonicalRecord> = (0..50)
        .map(|i| kepler_like(&format!("S-{i}"), 3.0 + i as f64))
        .collect();
    let expected = engine.score_batch(&records);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| engine.score_batch(&records)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn scored_record_serializes() {
    let scored = ScoringEngine::default()
        .score(&kepler_like("Json", 12.0))
        .unwrap();
    let json = serde_json::to_value(&scored).unwrap();
    assert_eq!(json["record"]["id"], "Json");
    assert_eq!(json["tier"], serde_json::to_value(scored.tier).unwrap());
    assert!(json["breakdown"]["characterizability"].is_array());
}

fn positive(max: f64) -> impl Strategy<Value = Option<f64>> {
    proptest::option::of(0.001..max)
}

prop_compose! {
    fn arb_record()(
        distance in positive(5_000.0),
        teff in positive(40_000.0),
        stellar_radius in positive(100.0),
        stellar_mass in positive(50.0),
        planet_radius in positive(50.0),
        planet_mass in positive(5_000.0),
        period in positive(100_000.0),
        sma in positive(100.0),
        eccentricity in proptest::option::of(0.0..0.999),
        teq in positive(3_000.0),
        quality in proptest::option::of(0usize..4),
    ) -> CanonicalRecord {
        let mut rec = record("Arb");
        rec.distance_pc = distance;
        rec.stellar_teff_k = teff;
        rec.stellar_radius_rsun = stellar_radius;
        rec.stellar_mass_msun = stellar_mass;
        rec.planet_radius_rearth = planet_radius;
        rec.planet_mass_mearth = planet_mass;
        rec.orbital_period_days = period;
        rec.semi_major_axis_au = sma;
        rec.eccentricity = eccentricity;
        rec.equilibrium_temp_k = teq;
        rec.data_quality = quality.map(|q| {
            [DataQuality::Limited, DataQuality::Fair, DataQuality::Good, DataQuality::Excellent][q]
        });
        rec
    }
}

proptest! {
    #[test]
    fn scores_stay_within_bounds(rec in arb_record()) {
        let scored = ScoringEngine::default().score(&rec).unwrap();
        for value in [
            scored.characterizability_score,
            scored.habitability_score,
            scored.confidence,
        ] {
            prop_assert!((0.0..=100.0).contains(&value), "{value} out of bounds");
        }
        for factor in scored
            .breakdown
            .characterizability
            .iter()
            .chain(scored.breakdown.habitability.iter())
        {
            prop_assert!((0.0..=1.0).contains(&factor.value));
        }
        if let Some(estimate) = &scored.breakdown.observability {
            prop_assert!((0.0..=1.0).contains(&estimate.observability_score));
            prop_assert!(estimate.separation_mas > 0.0);
        }
        let indices = scored.breakdown.indices;
        for index in [indices.cdhs, indices.sephi].into_iter().flatten() {
            prop_assert!((0.0..=1.0).contains(&index), "index {index} out of bounds");
        }
    }

    #[test]
    fn scoring_is_deterministic(rec in arb_record()) {
        let engine = ScoringEngine::default();
        prop_assert_eq!(engine.score(&rec).unwrap(), engine.score(&rec).unwrap());
    }
}
