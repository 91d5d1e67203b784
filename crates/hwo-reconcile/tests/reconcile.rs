//! Reconciliation behavior on realistic header sets.

use std::collections::BTreeMap;

use hwo_model::{CanonicalField, CellValue, RawRow};
use hwo_reconcile::{
    FieldCatalog, MappingError, MappingSource, ReconcileConfig, ReconcileEngine,
    ReconciliationStatus,
};

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn samples(values: &[&str]) -> Vec<Vec<CellValue>> {
    values.iter().map(|value| vec![CellValue::from(*value)]).collect()
}

fn engine() -> ReconcileEngine {
    ReconcileEngine::default()
}

#[test]
fn mixed_catalog_headers_reconcile() {
    let headers = headers(&[
        "Planet",
        "Dist(pc)",
        "Teff(K)",
        "Rad(Rsun)",
        "Mass(Msun)",
        "Rp(Re)",
        "Porb(d)",
    ]);
    let samples = samples(&["Kepler-X", "30", "5700", "1.0", "1.0", "1.1", "300"]);
    let result = engine().reconcile(&headers, &samples);

    assert!(result.can_proceed(), "status: {:?}", result.status);
    assert!(result.mapping_quality >= 0.7, "quality {}", result.mapping_quality);
    let expected = [
        (CanonicalField::Identifier, "Planet"),
        (CanonicalField::Distance, "Dist(pc)"),
        (CanonicalField::StellarTeff, "Teff(K)"),
        (CanonicalField::StellarRadius, "Rad(Rsun)"),
        (CanonicalField::StellarMass, "Mass(Msun)"),
        (CanonicalField::PlanetRadius, "Rp(Re)"),
        (CanonicalField::OrbitalPeriod, "Porb(d)"),
    ];
    for (field, column) in expected {
        assert_eq!(result.column_for(field), Some(column), "{field}");
    }
    assert!(result.unmapped_columns.is_empty());
    assert_eq!(result.status.as_str(), "valid");
}

#[test]
fn archive_column_names_reconcile() {
    let headers = headers(&[
        "pl_name",
        "sy_dist",
        "st_teff",
        "st_rad",
        "st_mass",
        "pl_rade",
        "pl_orbper",
        "pl_orbeccen",
        "pl_eqt",
        "disc_year",
        "discoverymethod",
        "st_spectype",
    ]);
    let samples = samples(&[
        "TOI-700 d",
        "31.1",
        "3480",
        "0.42",
        "0.42",
        "1.19",
        "37.4",
        "0.03",
        "269",
        "2020",
        "Transit",
        "M2V",
    ]);
    let result = engine().reconcile(&headers, &samples);
    assert!(result.can_proceed());
    assert_eq!(result.column_for(CanonicalField::Eccentricity), Some("pl_orbeccen"));
    assert_eq!(
        result.column_for(CanonicalField::EquilibriumTemperature),
        Some("pl_eqt")
    );
    assert_eq!(result.column_for(CanonicalField::DiscoveryYear), Some("disc_year"));
    assert_eq!(
        result.column_for(CanonicalField::DetectionMethod),
        Some("discoverymethod")
    );
    assert_eq!(result.column_for(CanonicalField::SpectralType), Some("st_spectype"));
    assert_eq!(result.mapping_quality, 1.0);
}

#[test]
fn canonical_names_map_with_full_confidence() {
    let names: Vec<String> = CanonicalField::ALL
        .iter()
        .map(|field| field.as_str().to_string())
        .collect();

    let without_samples = engine().reconcile(&names, &[]);
    assert!(without_samples.can_proceed());
    for mapping in without_samples.mappings() {
        assert_eq!(mapping.column.as_deref(), Some(mapping.field.as_str()));
        assert_eq!(mapping.confidence, 1.0, "{}", mapping.field);
    }

    let sample_row = samples(&[
        "Tau Ceti e", "3.65", "5344", "0.79", "0.78", "1.8", "4.2", "162.9", "0.54", "0.18",
        "285", "Good", "2017", "Radial Velocity", "G8V", "26.02", "-15.94",
    ]);
    let with_samples = engine().reconcile(&names, &sample_row);
    for mapping in &with_samples.required {
        assert_eq!(mapping.confidence, 1.0, "{}", mapping.field);
    }
    assert_eq!(with_samples.mapping_quality, 1.0);
}

#[test]
fn duplicate_headers_keep_first_occurrence() {
    let headers = headers(&[
        "Planet", "planet", "Dist(pc)", "Mass(Msun)", "Rp(Re)", "Porb(d)",
    ]);
    let samples = samples(&["A", "B", "10", "1.0", "1.0", "365"]);
    let result = engine().reconcile(&headers, &samples);

    let identifier = result.mapping(CanonicalField::Identifier).unwrap();
    assert_eq!(identifier.column_index, Some(0));
    assert_eq!(result.unmapped_columns, vec!["planet".to_string()]);
}

#[test]
fn empty_sample_decides_on_headers_alone() {
    let headers = headers(&["name", "distance", "stellar_mass", "planet_radius", "period"]);
    let result = engine().reconcile(&headers, &[]);
    assert!(result.can_proceed());
    assert_eq!(result.column_for(CanonicalField::OrbitalPeriod), Some("period"));

    let explained = engine()
        .score_column(CanonicalField::Distance, "distance", &[])
        .unwrap();
    assert_eq!(explained.plausibility, None);
    assert_eq!(explained.score, explained.header);
}

#[test]
fn no_columns_cannot_proceed() {
    let result = engine().reconcile(&[], &[]);
    assert_eq!(result.status, ReconciliationStatus::NoColumns);
    assert!(!result.can_proceed());
    assert_eq!(result.mapping_quality, 0.0);
    assert!(result.mappings().all(|mapping| !mapping.is_mapped()));
    assert_eq!(result.column_mapping(), Err(MappingError::NoColumns));
}

#[test]
fn unmapped_required_field_lists_top_three_alternatives() {
    let headers = headers(&["Planet", "Dst", "D_st", "Far", "Mass(Msun)", "Rp(Re)", "Porb(d)"]);
    let result = engine().reconcile(&headers, &[]);

    assert_eq!(
        result.status,
        ReconciliationStatus::MissingRequired {
            fields: vec![CanonicalField::Distance]
        }
    );
    assert!(!result.can_proceed());
    assert_eq!(result.mapping_quality, 0.0);

    let distance = result.mapping(CanonicalField::Distance).unwrap();
    let columns: Vec<&str> = distance
        .alternatives
        .iter()
        .map(|candidate| candidate.column.as_str())
        .collect();
    assert_eq!(columns, vec!["Dst", "D_st", "Far"]);
    assert!(
        distance
            .alternatives
            .windows(2)
            .all(|pair| pair[0].confidence >= pair[1].confidence)
    );

    match result.column_mapping() {
        Err(MappingError::MissingRequired {
            fields,
            suggestions,
        }) => {
            assert_eq!(fields, vec![CanonicalField::Distance]);
            assert_eq!(suggestions[&CanonicalField::Distance].len(), 3);
        }
        other => panic!("expected missing required, got {other:?}"),
    }
}

#[test]
fn override_pins_field_with_full_confidence() {
    let headers = headers(&["Planet", "Xyz", "Mass(Msun)", "Rp(Re)", "Porb(d)"]);
    let samples = samples(&["A", "12", "1.0", "1.0", "365"]);
    let engine = engine();
    assert!(!engine.reconcile(&headers, &samples).can_proceed());

    let overrides = BTreeMap::from([(CanonicalField::Distance, "xyz".to_string())]);
    let result = engine
        .reconcile_with_override(&headers, &samples, &overrides)
        .unwrap();
    assert!(result.can_proceed());
    let distance = result.mapping(CanonicalField::Distance).unwrap();
    assert_eq!(distance.column.as_deref(), Some("Xyz"));
    assert_eq!(distance.confidence, 1.0);
    assert_eq!(distance.source, MappingSource::Override);
}

#[test]
fn override_errors_name_the_problem() {
    let headers = headers(&["Planet", "Dist(pc)", "Mass(Msun)", "Rp(Re)", "Porb(d)"]);
    let engine = engine();

    let unknown = BTreeMap::from([(CanonicalField::Distance, "Parallax".to_string())]);
    assert_eq!(
        engine.reconcile_with_override(&headers, &[], &unknown),
        Err(MappingError::OverrideColumnNotFound {
            field: CanonicalField::Distance,
            column: "Parallax".to_string(),
        })
    );

    let twice = BTreeMap::from([
        (CanonicalField::Distance, "Dist(pc)".to_string()),
        (CanonicalField::SemiMajorAxis, "dist(pc)".to_string()),
    ]);
    assert!(matches!(
        engine.reconcile_with_override(&headers, &[], &twice),
        Err(MappingError::DuplicateOverrideColumn { .. })
    ));
}

#[test]
fn override_column_is_removed_from_detection() {
    let headers = headers(&["Planet", "Dist(pc)", "Mass(Msun)", "Rp(Re)", "Porb(d)"]);
    let overrides = BTreeMap::from([(CanonicalField::Identifier, "Porb(d)".to_string())]);
    let result = engine()
        .reconcile_with_override(&headers, &[], &overrides)
        .unwrap();
    assert_eq!(result.column_for(CanonicalField::Identifier), Some("Porb(d)"));
    assert_ne!(result.column_for(CanonicalField::OrbitalPeriod), Some("Porb(d)"));
    assert!(!result.can_proceed());
}

#[test]
fn stricter_threshold_leaves_weak_matches_unmapped() {
    let config = ReconcileConfig {
        match_threshold: 0.99,
        ..ReconcileConfig::default()
    };
    let engine = ReconcileEngine::new(FieldCatalog::default(), config);
    let headers = headers(&["Planet", "Dist(pc)", "Mass(Msun)", "Rp(Re)", "Porb(d)"]);
    let result = engine.reconcile(&headers, &[]);
    assert!(result.column_for(CanonicalField::StellarMass).is_none());
    assert_eq!(result.column_for(CanonicalField::Distance), Some("Dist(pc)"));
}

#[test]
fn rows_are_sampled_per_column() {
    let headers = headers(&["Planet", "Dist(pc)"]);
    let rows = vec![
        RawRow::from_values(&headers, vec![CellValue::from("A"), CellValue::Empty]),
        RawRow::from_values(&headers, vec![CellValue::from("B"), CellValue::from("12")]),
    ];
    let samples = hwo_reconcile::column_samples(&rows, headers.len(), 5);
    assert_eq!(samples[0].len(), 2);
    assert_eq!(samples[1], vec![CellValue::from("12")]);
}
