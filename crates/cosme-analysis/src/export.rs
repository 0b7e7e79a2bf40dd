//! Dataset serialization: spreadsheet-friendly CSV or JSON.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use cosme_core::Dataset;

use crate::error::ExportError;

/// UTF-8 byte-order mark. Spreadsheet tools need it to detect the encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column headers in dataset column order: rating, age, gender, skin type,
/// body, date.
pub const CSV_HEADERS: [&str; 6] = ["評価", "年齢", "性別", "肌質", "本文", "日付"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Writes `dataset` as BOM-prefixed UTF-8 CSV. A missing rating is an empty cell.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] if writing fails.
pub fn write_csv<W: Write>(dataset: &Dataset, mut writer: W) -> Result<(), ExportError> {
    writer
        .write_all(UTF8_BOM)
        .map_err(|e| ExportError::Csv(e.into()))?;

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADERS)?;
    for row in dataset.rows() {
        let rating = row.rating.map(|r| r.to_string()).unwrap_or_default();
        csv.write_record([
            rating.as_str(),
            row.age_bracket.as_str(),
            row.gender.as_str(),
            row.skin_type.as_str(),
            row.body_text.as_str(),
            row.posted_at.as_str(),
        ])?;
    }
    csv.flush().map_err(|e| ExportError::Csv(e.into()))?;
    Ok(())
}

/// Writes `dataset` as pretty-printed JSON: `{ "layout": ..., "rows": [...] }`.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization or writing fails.
pub fn write_json<W: Write>(dataset: &Dataset, writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, dataset)?;
    Ok(())
}

/// Writes `dataset` to `path` in `format`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the file cannot be created, or the
/// format's error if writing fails.
pub fn export_to_path(
    dataset: &Dataset,
    path: &Path,
    format: ExportFormat,
) -> Result<(), ExportError> {
    let io_error = |source: std::io::Error| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    match format {
        ExportFormat::Csv => write_csv(dataset, &mut writer)?,
        ExportFormat::Json => write_json(dataset, &mut writer)?,
    }
    writer.flush().map_err(io_error)?;

    tracing::info!(
        path = %path.display(),
        rows = dataset.len(),
        format = ?format,
        "dataset exported"
    );
    Ok(())
}
