mod support;

use std::fs::File;
use std::path::Path;

use arrow::array::{Float64Array, UInt32Array, UInt64Array};
use dispatch_core::ecs::SequentialId;
use dispatch_core::telemetry::SimTelemetry;
use dispatch_core::telemetry_export::write_completed_rides_parquet;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use support::fleet::{assigned_ride, online_driver, rider_at};
use support::world::TestSimBuilder;

fn parquet_field_specs(path: &Path) -> Vec<(String, String, bool)> {
    let file = File::open(path).expect("parquet file should exist");
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).expect("parquet reader should build");
    builder
        .schema()
        .fields()
        .iter()
        .map(|field| {
            (
                field.name().to_string(),
                field.data_type().to_string(),
                field.is_nullable(),
            )
        })
        .collect()
}

#[test]
fn completed_rides_schema_and_rows() {
    let mut sim = TestSimBuilder::new().build();
    online_driver(&mut sim, 0.0, 0.0);
    online_driver(&mut sim, 30.0, 0.0);
    let first = rider_at(&mut sim, 0.0, 0.0);
    let second = rider_at(&mut sim, 30.0, 0.0);
    let short = assigned_ride(&mut sim, first, 3.0, 4.0);
    let long = assigned_ride(&mut sim, second, 30.0, 12.0);
    sim.run_until_idle(1_000);

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("completed_rides.parquet");
    write_completed_rides_parquet(&path, sim.telemetry()).expect("export");

    let specs = parquet_field_specs(&path);
    let expected = [
        ("ride_id", "UInt32"),
        ("rider_id", "UInt32"),
        ("driver_id", "UInt32"),
        ("fare", "Float64"),
        ("distance", "Float64"),
        ("requested_at", "UInt64"),
        ("assigned_at", "UInt64"),
        ("pickup_at", "UInt64"),
        ("completed_at", "UInt64"),
    ];
    assert_eq!(specs.len(), expected.len());
    for ((name, data_type, nullable), (expected_name, expected_type)) in
        specs.iter().zip(expected.iter())
    {
        assert_eq!(name, expected_name);
        assert_eq!(data_type, expected_type);
        assert!(!nullable);
    }

    let file = File::open(&path).expect("parquet file");
    let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .expect("reader builder")
        .build()
        .expect("reader");
    let batch = reader.next().expect("one batch").expect("valid batch");
    assert_eq!(batch.num_rows(), 2);

    let ride_ids = batch
        .column(0)
        .as_any()
        .downcast_ref::<UInt32Array>()
        .expect("ride ids");
    assert_eq!(ride_ids.value(0), short.raw());
    assert_eq!(ride_ids.value(1), long.raw());

    let fares = batch
        .column(3)
        .as_any()
        .downcast_ref::<Float64Array>()
        .expect("fares");
    assert_eq!(fares.value(0), 60.0);
    assert_eq!(fares.value(1), 116.0);

    let completed_at = batch
        .column(8)
        .as_any()
        .downcast_ref::<UInt64Array>()
        .expect("completed_at");
    assert!(completed_at.value(0) < completed_at.value(1));
}

#[test]
fn empty_telemetry_writes_empty_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("empty.parquet");
    write_completed_rides_parquet(&path, &SimTelemetry::default()).expect("export");
    assert_eq!(parquet_field_specs(&path).len(), 9);
}

#[test]
fn unwritable_path_is_an_export_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("missing").join("rides.parquet");
    let err = write_completed_rides_parquet(&path, &SimTelemetry::default())
        .expect_err("parent directory does not exist");
    assert!(matches!(err, dispatch_core::DispatchError::Export(_)));
}
