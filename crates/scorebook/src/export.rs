use std::io::Write;

use shared::protocol::LogEntry;
use thiserror::Error;

/// Lets spreadsheet tools pick UTF-8 for non-ASCII team names.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_HEADER: [&str; 8] = [
    "time",
    "set_number",
    "team",
    "player",
    "category",
    "reason",
    "outcome",
    "score_snapshot",
];

pub const EXPORT_FILENAME: &str = "match_log.csv";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write csv: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes `entries` in the order given, header first, without a BOM.
pub fn write_csv<W: Write>(entries: &[LogEntry], out: W) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;
    for entry in entries {
        let time = entry.local_time();
        let set_number = entry.set_number.to_string();
        writer.write_record([
            time.as_str(),
            set_number.as_str(),
            entry.team_name.as_str(),
            entry.player.as_str(),
            entry.category.as_str(),
            entry.reason.as_str(),
            entry.outcome.label(),
            entry.score_snapshot.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// BOM-prefixed CSV of the whole log in chronological order.
pub fn to_csv_bytes(entries: &[LogEntry]) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::with_capacity(UTF8_BOM.len() + 64 * (entries.len() + 1));
    buf.extend_from_slice(UTF8_BOM);
    write_csv(entries, &mut buf)?;
    Ok(buf)
}
