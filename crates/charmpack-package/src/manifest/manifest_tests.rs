#![allow(non_snake_case)]

use super::*;
use chrono::TimeZone;

fn fixed_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 5, 4, 10, 11, 12).unwrap()
        + chrono::Duration::microseconds(345_678)
}

#[test]
fn format_timestamp___utc_with_trailing_z() {
    assert_eq!(format_timestamp(fixed_start()), "2021-05-04T10:11:12.345678Z");
}

#[test]
fn format_timestamp___whole_second___omits_fraction() {
    let start = Utc.with_ymd_and_hms(2020, 3, 14, 0, 0, 0).unwrap();

    assert_eq!(format_timestamp(start), "2020-03-14T00:00:00Z");
}

#[test]
fn format_timestamp___sub_microsecond_remainder___omits_fraction() {
    let start = Utc.with_ymd_and_hms(2020, 3, 14, 0, 0, 0).unwrap()
        + chrono::Duration::nanoseconds(999);

    assert_eq!(format_timestamp(start), "2020-03-14T00:00:00Z");
}

#[test]
fn format_timestamp___leading_zero_micros___keeps_six_digits() {
    let start = Utc.with_ymd_and_hms(2020, 3, 14, 0, 0, 0).unwrap()
        + chrono::Duration::microseconds(42);

    assert_eq!(format_timestamp(start), "2020-03-14T00:00:00.000042Z");
}

#[test]
fn ManifestRecord___new___records_start_and_version() {
    let record = ManifestRecord::new(fixed_start());

    assert_eq!(record.started_at, "2021-05-04T10:11:12.345678Z");
    assert_eq!(record.version, env!("CARGO_PKG_VERSION"));
    assert!(record.extra.is_empty());
}

#[test]
fn ManifestRecord___to_yaml___uses_dashed_keys() {
    let record = ManifestRecord::new(fixed_start());

    let yaml = record.to_yaml().unwrap();
    let parsed: serde_yaml::Mapping = serde_yaml::from_str(&yaml).unwrap();

    assert_eq!(
        parsed.get("charmcraft-started-at").and_then(|v| v.as_str()),
        Some("2021-05-04T10:11:12.345678Z")
    );
    assert!(parsed.contains_key("charmcraft-version"));
}

#[test]
fn ManifestRecord___set___adds_flattened_field() {
    let mut record = ManifestRecord::new(fixed_start());
    record.set("bases", "ubuntu-22.04");

    let parsed = ManifestRecord::from_yaml(&record.to_yaml().unwrap()).unwrap();

    assert_eq!(parsed, record);
    assert_eq!(
        parsed.extra.get("bases").and_then(|v| v.as_str()),
        Some("ubuntu-22.04")
    );
}

#[test]
fn ManifestRecord___write_into___creates_manifest_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let record = ManifestRecord::new(fixed_start());

    let path = record.write_into(temp_dir.path()).unwrap();

    assert_eq!(path, temp_dir.path().join("manifest.yaml"));
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.contains("charmcraft-started-at"));
}
