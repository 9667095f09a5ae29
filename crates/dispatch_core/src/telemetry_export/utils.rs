use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use crate::error::{DispatchError, DispatchResult};

pub(super) fn u32_field(name: &'static str) -> Field {
    Field::new(name, DataType::UInt32, false)
}

pub(super) fn u64_field(name: &'static str) -> Field {
    Field::new(name, DataType::UInt64, false)
}

pub(super) fn f64_field(name: &'static str) -> Field {
    Field::new(name, DataType::Float64, false)
}

fn export_error(err: impl std::fmt::Display) -> DispatchError {
    DispatchError::Export(err.to_string())
}

pub(super) fn write_record_batch<P: AsRef<Path>>(
    path: P,
    schema: Schema,
    arrays: Vec<ArrayRef>,
) -> DispatchResult<()> {
    let schema = Arc::new(schema);
    let batch = RecordBatch::try_new(schema.clone(), arrays).map_err(export_error)?;
    let file = File::create(path).map_err(export_error)?;
    let mut writer = ArrowWriter::try_new(file, schema, None).map_err(export_error)?;
    writer.write(&batch).map_err(export_error)?;
    writer.close().map_err(export_error)?;
    Ok(())
}
