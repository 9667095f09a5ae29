//! Parquet export of completed-ride telemetry.

mod completed_rides;
mod utils;

pub use completed_rides::write_completed_rides_parquet;
