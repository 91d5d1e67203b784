//! CSV reading for the command line.

use hwo_cli::input::{override_map, parse_override, read_table_from, read_windows_from};
use hwo_core::model::{CanonicalField, TargetId};
use hwo_core::sequence::TimeWindow;

const ARCHIVE_EXPORT: &str = "\
# This file was produced by an archive query
# COLUMN pl_name: Planet Name
\u{feff}pl_name, sy_dist ,pl_rade
Kepler-22 b,190.0,2.1

,,
Proxima Cen b,1.30,1.07
TOI-700 d,31.1
";

#[test]
fn archive_export_reads_headers_and_rows() {
    let table = read_table_from(ARCHIVE_EXPORT.as_bytes()).unwrap();
    assert_eq!(table.headers, vec!["pl_name", "sy_dist", "pl_rade"]);
    assert_eq!(table.rows.len(), 3);

    let proxima = &table.rows[1];
    assert_eq!(
        proxima.get_by_name("sy_dist").unwrap().as_number().unwrap(),
        Some(1.30)
    );
    // Short rows keep the cells they have.
    assert!(table.rows[2].get_by_name("pl_rade").unwrap().is_empty());
}

#[test]
fn empty_input_yields_an_empty_table() {
    let table = read_table_from("# only comments\n\n".as_bytes()).unwrap();
    assert!(table.headers.is_empty());
    assert!(table.rows.is_empty());
}

#[test]
fn repeated_override_is_rejected() {
    let pairs = vec![
        parse_override("distance=Dist").unwrap(),
        parse_override("distance=Range").unwrap(),
    ];
    let err = override_map(&pairs).unwrap_err();
    assert!(err.to_string().contains("mapped twice"));

    let map = override_map(&pairs[..1]).unwrap();
    assert_eq!(map.get(&CanonicalField::Distance).map(String::as_str), Some("Dist"));
}

#[test]
fn windows_are_keyed_by_target() {
    let csv = "ID, Earliest, Latest\nA,0,3\nB,2,2\n";
    let windows = read_windows_from(csv.as_bytes()).unwrap();
    assert_eq!(windows.len(), 2);
    assert_eq!(
        windows[&TargetId::new("B").unwrap()],
        TimeWindow::new(2, 2)
    );
}

#[test]
fn windows_reject_bad_rows() {
    assert!(read_windows_from("id,earliest\nA,0\n".as_bytes()).is_err());
    assert!(read_windows_from("id,earliest,latest\nA,soon,3\n".as_bytes()).is_err());
    assert!(read_windows_from("id,earliest,latest\nA,0,3\nA,1,2\n".as_bytes()).is_err());
}
