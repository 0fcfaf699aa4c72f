use std::fs;
use std::path::PathBuf;

use polars::prelude::*;

use crate::errors::ParserError;
use crate::formats::{DbaParser, ErddapCsvParser};
use crate::model::{StreamFormat, TIMESTAMP_COLUMN};
use crate::parse_glider_file;
use crate::registry::GliderParser;

fn fixture(path: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

fn floats(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap_or_else(|err| panic!("missing column {name}: {err}"))
        .f64()
        .expect("column is not Float64")
        .into_iter()
        .collect()
}

#[test]
fn parses_dba_header_labels_and_rows() {
    let content = fixture("unit_191-2016-113-2-0.dba");
    let parsed = parse_glider_file(&content).expect("dba parse failed");

    assert_eq!(parsed.format, StreamFormat::Dba);
    assert_eq!(parsed.row_count(), 11);
    assert_eq!(parsed.metadata.header.len(), 14);
    assert_eq!(
        parsed.metadata.header.get("fileopen_time").map(String::as_str),
        Some("Fri_Apr_22_17:18:54_2016")
    );
    assert_eq!(
        parsed.metadata.sensor_names,
        vec![
            "m_present_time",
            "m_depth",
            "sci_water_pressure_dbar",
            "sci_m_present_time"
        ]
    );
    assert_eq!(parsed.metadata.unit_of("sci_water_pressure_dbar"), Some("dbar"));
    assert_eq!(parsed.metadata.sensor_bytes, vec!["8", "4", "4", "8"]);
    assert_eq!(parsed.metadata.time_sensor, "m_present_time");

    let depth = floats(&parsed.df, "m_depth");
    assert_eq!(depth[0], Some(0.5));
    assert_eq!(depth[2], None);
    assert_eq!(depth[5], Some(20.0));

    let timestamp = floats(&parsed.df, TIMESTAMP_COLUMN);
    assert_eq!(timestamp, floats(&parsed.df, "m_present_time"));
}

#[test]
fn dba_time_sensor_override_and_fallback() {
    let content = fixture("unit_191-2016-113-2-0.dba");
    let parsed = DbaParser::with_time_sensor("sci_m_present_time")
        .parse(&content)
        .expect("dba parse with override failed");
    assert_eq!(parsed.metadata.time_sensor, "sci_m_present_time");
    assert_eq!(floats(&parsed.df, TIMESTAMP_COLUMN)[0], Some(1461391200.1));

    let sci_only = fixture("unit_191-sci-only.dba");
    let parsed = parse_glider_file(&sci_only).expect("science-only dba parse failed");
    assert_eq!(parsed.metadata.time_sensor, "sci_m_present_time");
    assert_eq!(parsed.row_count(), 2);
}

#[test]
fn dba_rejects_unknown_time_sensor() {
    let content = fixture("unit_191-2016-113-2-0.dba");
    match DbaParser::with_time_sensor("m_gps_time").parse(&content) {
        Err(ParserError::TimeSensorMissing(sensor)) => assert_eq!(sensor, "m_gps_time"),
        other => panic!("expected missing time sensor, got {other:?}"),
    }
}

#[test]
fn dba_reports_short_rows() {
    let mut content = fixture("unit_191-sci-only.dba");
    content.push_str("4.0\n");
    match DbaParser::default().parse(&content) {
        Err(ParserError::BadRecord { line_index, .. }) => assert_eq!(line_index, 8),
        other => panic!("expected bad record, got {other:?}"),
    }
}

#[test]
fn dba_tag_count_must_match() {
    let content =
        fixture("unit_191-sci-only.dba").replace("num_ascii_tags: 3", "num_ascii_tags: 4");
    assert!(matches!(
        DbaParser::default().parse(&content),
        Err(ParserError::TagCountMismatch {
            declared: 4,
            found: 3
        })
    ));
}

#[test]
fn dba_label_problems_are_named() {
    let content = fixture("unit_191-2016-113-2-0.dba");
    let names_only: String = content.lines().take(15).map(|line| format!("{line}\n")).collect();
    match DbaParser::default().parse(&names_only) {
        Err(ParserError::MissingLabelLine { label, line_index }) => {
            assert_eq!(label, "sensor unit");
            assert_eq!(line_index, 15);
        }
        other => panic!("expected missing label line, got {other:?}"),
    }

    let short_bytes = fixture("unit_191-sci-only.dba").replace("4 8 \n", "4 \n");
    assert!(matches!(
        DbaParser::default().parse(&short_bytes),
        Err(ParserError::LabelMismatch {
            names: 2,
            units: 2,
            bytes: 1
        })
    ));

    let odd_labels = content.replace("num_label_lines: 3", "num_label_lines: two");
    match DbaParser::default().parse(&odd_labels) {
        Err(ParserError::BadTag { tag, value }) => {
            assert_eq!(tag, "num_label_lines");
            assert_eq!(value, "two");
        }
        other => panic!("expected bad tag, got {other:?}"),
    }
}

#[test]
fn dba_without_master_time_sensor_is_rejected() {
    let content = fixture("unit_191-sci-only.dba").replace("sci_m_present_time", "sci_other");
    match DbaParser::default().parse(&content) {
        Err(err @ ParserError::NoTimeSensor { .. }) => {
            assert!(err.to_string().contains("m_present_time"));
        }
        other => panic!("expected no time sensor, got {other:?}"),
    }
}

#[test]
fn parses_erddap_csv_with_units_row() {
    let content = fixture("unit_191_erddap.csv");
    let parsed = parse_glider_file(&content).expect("erddap parse failed");

    assert_eq!(parsed.format, StreamFormat::ErddapCsv);
    assert_eq!(parsed.row_count(), 4);
    assert_eq!(parsed.metadata.unit_of("depth"), Some("m"));
    assert_eq!(parsed.metadata.unit_of("time"), Some("UTC"));

    let timestamp = floats(&parsed.df, TIMESTAMP_COLUMN);
    assert_eq!(
        timestamp,
        vec![
            Some(1461391200.0),
            Some(1461391210.0),
            Some(1461391220.0),
            None
        ]
    );
    assert_eq!(floats(&parsed.df, "temperature")[1], None);
    assert_eq!(
        parsed.df.column("trajectory").unwrap().dtype(),
        &DataType::String
    );
}

#[test]
fn erddap_accepts_numeric_time_without_units() {
    let content = fixture("erddap_numeric_time.csv");
    let parsed = ErddapCsvParser.parse(&content).expect("numeric time parse failed");

    assert!(parsed.metadata.sensor_units.iter().all(String::is_empty));
    assert_eq!(
        floats(&parsed.df, TIMESTAMP_COLUMN),
        vec![Some(1461391200.0), Some(1461391210.5)]
    );
}

#[test]
fn erddap_rejects_bad_time_after_first_row() {
    let content = "time,depth\n2016-04-23T06:00:00Z,1.0\nyesterday,2.0\n";
    match ErddapCsvParser.parse(content) {
        Err(ParserError::BadRecord { line_index, .. }) => assert_eq!(line_index, 2),
        other => panic!("expected bad record, got {other:?}"),
    }
}

#[test]
fn unknown_content_lists_every_rejection() {
    match parse_glider_file("lat,lon\n1,2\n") {
        Err(err @ ParserError::Unrecognized { .. }) => {
            let message = err.to_string();
            assert!(message.contains("DBA: file has no 'key: value' header"));
            assert!(message.contains("ERDDAP_CSV: header has no 'time' column"));
            if let ParserError::Unrecognized { rejections } = err {
                let names: Vec<_> = rejections.iter().map(|r| r.parser).collect();
                assert_eq!(names, vec!["DBA", "ERDDAP_CSV"]);
            }
        }
        other => panic!("expected unrecognized file, got {other:?}"),
    }
}

#[test]
fn header_only_files_are_empty() {
    assert!(matches!(
        ErddapCsvParser.parse("time,depth\n"),
        Err(ParserError::NoRecords { .. })
    ));
}
