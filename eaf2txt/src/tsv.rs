//! Tab-separated writer for output rows
//!
//! No header, `\n` line endings, integers in plain decimal. A field holding
//! a tab, quote or line break is wrapped in double quotes with inner quotes
//! doubled, so every row stays on one line.

use eaf2txt_common::OutputRow;
use std::borrow::Cow;
use std::io::{self, Write};

/// Write rows in column order `tier_id, participant, start, end, duration, value`
pub fn write_rows<W: Write>(mut writer: W, rows: &[OutputRow]) -> io::Result<()> {
    for row in rows {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            quote_field(&row.tier_id),
            quote_field(&row.participant),
            row.start,
            row.end,
            row.duration,
            quote_field(&row.value),
        )?;
    }
    writer.flush()
}

fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains(['\t', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
