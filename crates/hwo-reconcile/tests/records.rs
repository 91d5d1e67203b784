//! Conversion of reconciled rows into canonical records.

use hwo_model::{CanonicalField, CellValue, DataQuality, DetectionMethod, RawRow, ValidationErrorKind};
use hwo_reconcile::{ReconcileEngine, build_records};

fn table(headers: &[&str], rows: &[&[&str]]) -> (Vec<String>, Vec<RawRow>) {
    let headers: Vec<String> = headers.iter().map(|h| (*h).to_string()).collect();
    let rows = rows
        .iter()
        .map(|values| {
            RawRow::from_values(&headers, values.iter().map(|v| CellValue::from(*v)).collect())
        })
        .collect();
    (headers, rows)
}

const HEADERS: &[&str] = &[
    "Planet",
    "Dist(pc)",
    "Mass(Msun)",
    "Rp(Rjup)",
    "Porb(d)",
    "quality",
    "discovery_method",
    "disc_year",
];

#[test]
fn converts_units_and_categories() {
    let (headers, rows) = table(
        HEADERS,
        &[&["HD 1 b", "12.5", "1.1", "0.5", "300", "Good", "RV", "2004"]],
    );
    let engine = ReconcileEngine::default();
    let mapping = engine
        .reconcile_rows(&headers, &rows)
        .column_mapping()
        .expect("mapping ready");
    let batch = build_records(&mapping, &rows);

    assert!(batch.errors.is_empty(), "{:?}", batch.errors);
    let record = &batch.records[0];
    assert_eq!(record.id.as_str(), "HD 1 b");
    assert_eq!(record.distance_pc, Some(12.5));
    let radius = record.planet_radius_rearth.unwrap();
    assert!((radius - 5.6045).abs() < 1e-9, "radius {radius}");
    assert_eq!(record.data_quality, Some(DataQuality::Good));
    assert_eq!(record.detection_method, Some(DetectionMethod::RadialVelocity));
    assert_eq!(record.discovery_year, Some(2004));
    assert_eq!(record.eccentricity, None);
}

#[test]
fn bad_rows_are_rejected_individually() {
    let (headers, rows) = table(
        HEADERS,
        &[
            &["A", "10", "1.0", "0.1", "365", "Excellent", "Transit", "2010"],
            &["B", "far", "1.0", "0.1", "365", "", "", ""],
            &["", "10", "1.0", "0.1", "365", "", "", ""],
            &["A", "11", "1.0", "0.1", "365", "", "", ""],
            &["C", "10", "1.0", "0.1", "365", "Superb", "", ""],
            &["D", "10", "1.0", "0.1", "365", "", "Disk kinematics", "2011.5"],
            &["E", "", "", "", "", "", "", ""],
        ],
    );
    let engine = ReconcileEngine::default();
    let mapping = engine
        .reconcile_rows(&headers, &rows)
        .column_mapping()
        .expect("mapping ready");
    let batch = build_records(&mapping, &rows);

    let ids: Vec<&str> = batch.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "E"]);

    let kinds: Vec<(Option<usize>, CanonicalField, ValidationErrorKind)> = batch
        .errors
        .iter()
        .map(|err| (err.row, err.field, err.kind.clone()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (Some(1), CanonicalField::Distance, ValidationErrorKind::NotNumeric),
            (Some(2), CanonicalField::Identifier, ValidationErrorKind::MissingIdentifier),
            (Some(3), CanonicalField::Identifier, ValidationErrorKind::DuplicateIdentifier),
            (Some(4), CanonicalField::DataQuality, ValidationErrorKind::UnknownCategory),
            (Some(5), CanonicalField::DiscoveryYear, ValidationErrorKind::NotInteger),
        ]
    );
    assert_eq!(batch.errors[2].subject(), "A");
    assert_eq!(batch.errors[1].subject(), "row 3");

    let sparse = &batch.records[1];
    assert_eq!(sparse.distance_pc, None);
    assert_eq!(sparse.stellar_mass_msun, None);
}
