use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::config::ExportOptions;
use crate::constants::transport::{FIELD_DELIMITER, ROW_SEPARATOR};
use crate::data::{Coreset, Record, RecordStore};
use crate::errors::CoresetError;
use crate::utils::format_float;

/// Write selected records as tab-delimited rows in selection order.
///
/// Rows are separated by `\n` with no leading or trailing newline, so an empty
/// coreset writes nothing. Returns the number of rows written.
pub fn write_coreset<W: Write>(
    writer: &mut W,
    store: &RecordStore,
    coreset: &Coreset,
    options: ExportOptions,
) -> Result<usize, CoresetError> {
    let rows = resolve_rows(store, coreset)?;
    for (position, (record, weight)) in rows.iter().enumerate() {
        if position > 0 {
            write!(writer, "{ROW_SEPARATOR}")?;
        }
        write_row(writer, record, options.include_weights.then_some(*weight))?;
    }
    Ok(rows.len())
}

/// Export selected records to `path`, replacing any existing file.
///
/// Every index is resolved before the file is created, so an invalid coreset
/// leaves nothing behind.
pub fn export_coreset(
    store: &RecordStore,
    coreset: &Coreset,
    path: impl AsRef<Path>,
    options: ExportOptions,
) -> Result<usize, CoresetError> {
    let path = path.as_ref();
    resolve_rows(store, coreset)?;
    info!("[coreset:export] exporting lightweight coreset to {}", path.display());
    let mut writer = BufWriter::new(File::create(path)?);
    let rows = write_coreset(&mut writer, store, coreset, options)?;
    writer.flush()?;
    info!("[coreset:export] export complete (rows={})", rows);
    Ok(rows)
}

fn resolve_rows<'a>(
    store: &'a RecordStore,
    coreset: &Coreset,
) -> Result<Vec<(&'a Record, f64)>, CoresetError> {
    coreset
        .entries()
        .map(|(index, weight)| {
            store
                .get(index)
                .map(|record| (record, weight))
                .ok_or(CoresetError::IndexOutOfRange {
                    index,
                    len: store.len(),
                })
        })
        .collect()
}

fn write_row<W: Write>(
    writer: &mut W,
    record: &Record,
    weight: Option<f64>,
) -> Result<(), CoresetError> {
    write!(
        writer,
        "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
        record.group_id, record.example_id, record.label
    )?;
    for value in &record.features {
        write!(writer, "{FIELD_DELIMITER}{}", format_float(*value))?;
    }
    if let Some(weight) = weight {
        write!(writer, "{FIELD_DELIMITER}{}", format_float(weight))?;
    }
    Ok(())
}
