//! Collapse raw rows into one flattened record per key.
//!
//! A query that joins a repeating attribute returns one row per
//! (key, FOR code) pair. The aggregator folds those back together:
//!
//! ```text
//! Raw rows (one per FOR code)        Record set (one per key)
//! ┌──────────────────────────┐       ┌───────────────────────────────┐
//! │ id: A, desc: d1, for: X  │       │ A: {id, desc, for_1:X,        │
//! │ id: A, desc: d1, for: Y  │  →    │         for_2:Y}              │
//! │ id: B, desc: d2, for: Z  │       ├───────────────────────────────┤
//! └──────────────────────────┘       │ B: {id, desc, for_1:Z}        │
//!                                    └───────────────────────────────┘
//! ```
//!
//! FOR values fill numbered slots (`for_1`, `for_2`, ...) in row arrival
//! order, up to the schema's bound; excess values are dropped with a
//! warning, never an error. Duplicate keys on a feed with no FOR field are
//! dropped with a warning too. Both conditions are also counted on the
//! returned [`Aggregation`] so callers need not scrape logs.

use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

use crate::error::{AggregateError, AggregateResult};
use crate::schema::FieldSchema;
use crate::source::RawRow;

/// One flattened record: field name to trimmed text.
pub type Record = HashMap<String, String>;

/// All records of a feed, keyed and iterated in ascending key order.
///
/// The ordered map is what makes emission deterministic across runs.
pub type RecordSet = BTreeMap<String, Record>;

/// Result of aggregating a row stream.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// One record per distinct key.
    pub records: RecordSet,
    /// Rows dropped because their key already existed and the feed has
    /// no FOR field.
    pub duplicates_dropped: u64,
    /// FOR values dropped because every slot was already occupied.
    pub overflow_dropped: u64,
}

/// Aggregate a stream of raw rows into a record set.
///
/// Rows are processed in arrival order; no ordering is assumed from the
/// source. A row whose cell count does not match the schema aborts with
/// [`AggregateError::MalformedRow`].
pub fn aggregate(
    schema: &FieldSchema,
    rows: impl IntoIterator<Item = RawRow>,
) -> AggregateResult<Aggregation> {
    let mut agg = Aggregation::default();

    for (row_idx, row) in rows.into_iter().enumerate() {
        if row.len() != schema.input_fields.len() {
            return Err(AggregateError::MalformedRow {
                row: row_idx,
                expected: schema.input_fields.len(),
                actual: row.len(),
            });
        }

        let cells: Vec<String> = row.into_iter().map(normalize_cell).collect();
        let key = cells[schema.key_field].trim().to_string();
        debug!(row = row_idx, key = %key, "aggregating row");

        match agg.records.get_mut(&key) {
            None => {
                let mut record = Record::new();
                for (i, name) in schema.input_fields.iter().enumerate() {
                    // The FOR column goes through the slot policy below,
                    // not under its base name. The key column is always
                    // stored, even when it doubles as the FOR column.
                    let is_for = schema.for_field.as_ref().is_some_and(|f| f.index == i);
                    if is_for && i != schema.key_field {
                        continue;
                    }
                    record.insert(name.clone(), cells[i].trim().to_string());
                }
                if let Some(ref fors) = schema.for_field {
                    // A fresh record always has a free slot.
                    set_for(&mut record, cells[fors.index].trim(), fors);
                }
                agg.records.insert(key, record);
            }
            Some(record) => {
                if let Some(ref fors) = schema.for_field {
                    let value = cells[fors.index].trim();
                    if !set_for(record, value, fors) {
                        warn!(
                            key = %key,
                            max_slots = fors.max_slots,
                            value = %value,
                            "dropping FOR code: all slots occupied"
                        );
                        agg.overflow_dropped += 1;
                    }
                } else {
                    warn!(key = %key, "dropping duplicate row: key already seen");
                    agg.duplicates_dropped += 1;
                }
            }
        }
    }

    Ok(agg)
}

/// Store a FOR value in the first free slot. Returns false when all
/// `max_slots` slots are already occupied and the value was dropped.
fn set_for(record: &mut Record, value: &str, fors: &crate::schema::ForField) -> bool {
    for slot in fors.slot_names() {
        if !record.contains_key(&slot) {
            record.insert(slot, value.to_string());
            return true;
        }
    }
    false
}

/// Normalize one cell: NULL becomes empty text, newlines become a
/// literal `<br />` marker, carriage returns are removed.
fn normalize_cell(cell: Option<String>) -> String {
    match cell {
        None => String::new(),
        Some(text) => text.replace('\n', "<br />").replace('\r', ""),
    }
}
