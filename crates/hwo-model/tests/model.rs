//! Tests for hwo-model types.

use hwo_model::{
    CanonicalField, CanonicalRecord, CellValue, DataQuality, ModelError, RawRow, TargetId,
    ValidationError, ValidationErrorKind,
};

#[test]
fn target_id_trims_and_rejects_blank() {
    assert_eq!(TargetId::new("  HD 40307 g ").unwrap().as_str(), "HD 40307 g");
    assert!(matches!(
        TargetId::new("   "),
        Err(ModelError::InvalidTargetId(_))
    ));
}

#[test]
fn target_id_deserialization_validates() {
    let ok: TargetId = serde_json::from_str("\"TRAPPIST-1 e\"").expect("valid id");
    assert_eq!(ok.as_str(), "TRAPPIST-1 e");
    assert!(serde_json::from_str::<TargetId>("\"  \"").is_err());
}

#[test]
fn cell_placeholders_are_empty() {
    for raw in ["", "  ", "NaN", "n/a", "NULL", "-"] {
        assert!(CellValue::from_text(raw).is_empty(), "{raw:?} should be empty");
    }
    assert_eq!(CellValue::from_text("NA").as_number(), Ok(None));
}

#[test]
fn cell_numeric_parsing() {
    assert_eq!(CellValue::from(" 4.24 ").as_number(), Ok(Some(4.24)));
    assert_eq!(CellValue::Number(12.0).as_number(), Ok(Some(12.0)));
    assert!(matches!(
        CellValue::from("far").as_number(),
        Err(ModelError::NotNumeric(_))
    ));
    assert_eq!(CellValue::from("2016.0").as_integer(), Ok(Some(2016)));
    assert!(matches!(
        CellValue::from("2016.5").as_integer(),
        Err(ModelError::NotInteger(_))
    ));
}

#[test]
fn raw_row_lookup_by_position_and_name() {
    let headers = vec!["Planet".to_string(), "planet".to_string(), "Dist".to_string()];
    let row = RawRow::from_values(&headers, vec![CellValue::from("a"), CellValue::from("b")]);
    assert_eq!(row.len(), 3);
    assert_eq!(row.get(1), Some(&CellValue::from("b")));
    assert_eq!(row.get(2), Some(&CellValue::Empty));
    assert_eq!(row.get_by_name("PLANET"), Some(&CellValue::from("a")));
}

#[test]
fn record_serializes_absent_values_as_null() {
    let record = CanonicalRecord::new(TargetId::new("Proxima Cen b").unwrap())
        .with(CanonicalField::Distance, 1.3)
        .with_data_quality(DataQuality::Excellent);
    let json = serde_json::to_value(&record).expect("serialize record");
    assert_eq!(json["distance_pc"], 1.3);
    assert!(json["planet_radius_rearth"].is_null());
    let round: CanonicalRecord = serde_json::from_value(json).expect("deserialize record");
    assert_eq!(round, record);
}

#[test]
fn validation_error_serializes_kind_tag() {
    let err = ValidationError::new(
        Some(TargetId::new("X").unwrap()),
        CanonicalField::Eccentricity,
        "1.2",
        ValidationErrorKind::OutOfRange { min: 0.0, max: 1.0 },
    );
    let json = serde_json::to_value(&err).expect("serialize error");
    assert_eq!(json["field"], "eccentricity");
    assert_eq!(json["kind"]["kind"], "out_of_range");
    assert_eq!(json["record_id"], "X");
}

#[test]
fn populated_counts_present_fields() {
    let record = CanonicalRecord::new(TargetId::new("X").unwrap())
        .with(CanonicalField::Distance, 10.0)
        .with(CanonicalField::StellarMass, 0.9);
    let fields = [
        CanonicalField::Distance,
        CanonicalField::StellarMass,
        CanonicalField::PlanetRadius,
    ];
    assert_eq!(record.populated(&fields), 2);
}
