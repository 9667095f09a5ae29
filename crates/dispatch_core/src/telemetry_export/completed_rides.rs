use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, UInt32Array, UInt64Array};
use arrow::datatypes::Schema;
use log::info;

use crate::ecs::SequentialId;
use crate::error::DispatchResult;
use crate::telemetry::SimTelemetry;

use super::utils::{f64_field, u32_field, u64_field, write_record_batch};

/// Writes one row per completed ride, in completion order.
pub fn write_completed_rides_parquet<P: AsRef<Path>>(
    path: P,
    telemetry: &SimTelemetry,
) -> DispatchResult<()> {
    let rows = telemetry.completed_rides.len();
    let mut ride_ids = Vec::with_capacity(rows);
    let mut rider_ids = Vec::with_capacity(rows);
    let mut driver_ids = Vec::with_capacity(rows);
    let mut fares = Vec::with_capacity(rows);
    let mut distances = Vec::with_capacity(rows);
    let mut requested_at = Vec::with_capacity(rows);
    let mut assigned_at = Vec::with_capacity(rows);
    let mut pickup_at = Vec::with_capacity(rows);
    let mut completed_at = Vec::with_capacity(rows);

    for record in &telemetry.completed_rides {
        ride_ids.push(record.ride_id.raw());
        rider_ids.push(record.rider_id.raw());
        driver_ids.push(record.driver_id.raw());
        fares.push(record.fare);
        distances.push(record.distance);
        requested_at.push(record.requested_at);
        assigned_at.push(record.assigned_at);
        pickup_at.push(record.pickup_at);
        completed_at.push(record.completed_at);
    }

    let schema = Schema::new(vec![
        u32_field("ride_id"),
        u32_field("rider_id"),
        u32_field("driver_id"),
        f64_field("fare"),
        f64_field("distance"),
        u64_field("requested_at"),
        u64_field("assigned_at"),
        u64_field("pickup_at"),
        u64_field("completed_at"),
    ]);

    let arrays: Vec<ArrayRef> = vec![
        Arc::new(UInt32Array::from(ride_ids)),
        Arc::new(UInt32Array::from(rider_ids)),
        Arc::new(UInt32Array::from(driver_ids)),
        Arc::new(Float64Array::from(fares)),
        Arc::new(Float64Array::from(distances)),
        Arc::new(UInt64Array::from(requested_at)),
        Arc::new(UInt64Array::from(assigned_at)),
        Arc::new(UInt64Array::from(pickup_at)),
        Arc::new(UInt64Array::from(completed_at)),
    ];

    let path = path.as_ref();
    write_record_batch(path, schema, arrays)?;
    info!("Exported {} completed rides to {}", rows, path.display());
    Ok(())
}
