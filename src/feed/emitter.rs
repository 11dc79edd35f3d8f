//! Deterministic CSV emission of a record set.
//!
//! One header row with the schema's output fields in configured order,
//! then one data row per record in ascending key order. An output field
//! absent from a record (typically an unfilled FOR slot) emits an empty
//! cell. Quoting is the csv crate's default: fields containing a comma,
//! quote, or newline are quoted, with embedded quotes doubled.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::EmitResult;
use crate::feed::aggregator::RecordSet;
use crate::schema::FieldSchema;

/// Write the header and all records to `writer`, then flush.
pub fn emit<W: Write>(schema: &FieldSchema, records: &RecordSet, writer: W) -> EmitResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(&schema.output_fields)?;

    // BTreeMap iteration is ascending by key, so identical input always
    // produces byte-identical output.
    for record in records.values() {
        let row = schema
            .output_fields
            .iter()
            .map(|field| record.get(field).map(String::as_str).unwrap_or(""));
        csv.write_record(row)?;
    }

    csv.flush()?;
    Ok(())
}

/// Write the CSV to a file, creating or truncating it.
pub fn emit_to_path(
    schema: &FieldSchema,
    records: &RecordSet,
    path: impl AsRef<Path>,
) -> EmitResult<()> {
    let file = File::create(path.as_ref())?;
    emit(schema, records, file)
}
