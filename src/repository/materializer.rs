//! Row materializer: result rows into record instances
//!
//! Slots come from the same descriptor field order that produced the SELECT
//! list, so column `i` always lands in field `i`.

use crate::error::{RepoError, RepoResult};
use crate::record::{Descriptor, Record, Row};

/// Fills `record` from one row.
///
/// Fails with a scan error when the row width differs from the field count
/// or a column value does not fit its field.
pub fn scan_one<R: Record>(descriptor: &Descriptor<R>, record: &mut R, row: Row) -> RepoResult<()> {
    let table = descriptor.table_name();
    let slots = descriptor.slots(record)?;
    if row.len() != slots.len() {
        return Err(RepoError::scan(
            table,
            format!("expected {} columns, got {}", slots.len(), row.len()),
        ));
    }

    for ((field, slot), value) in slots.into_iter().zip(row.into_values()) {
        slot.assign(value)
            .map_err(|reason| RepoError::scan(table, format!("{}: {}", field.column(), reason)))?;
    }
    Ok(())
}

/// Materializes every row into a fresh record.
///
/// `expected` is the caller's row-count estimate and only sizes the
/// output allocation.
pub fn scan_many<R: Record>(
    descriptor: &Descriptor<R>,
    rows: Vec<Row>,
    expected: i64,
) -> RepoResult<Vec<R>> {
    let mut records = Vec::with_capacity(initial_capacity(expected));
    for row in rows {
        let mut record = R::default();
        scan_one(descriptor, &mut record, row)?;
        records.push(record);
    }
    Ok(records)
}

/// Bucketed capacity hint for an expected row count
pub fn initial_capacity(expected: i64) -> usize {
    match expected {
        i64::MIN..=10 => 10,
        11..=25 => 20,
        26..=50 => 35,
        51..=100 => 75,
        101..=200 => 150,
        201..=300 => 250,
        301..=500 => 400,
        501..=1000 => 900,
        1001..=2000 => 1800,
        2001..=5000 => 2500,
        _ => 5000,
    }
}
