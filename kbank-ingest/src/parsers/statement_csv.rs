//! Statement CSV export decoder.
//!
//! The portal's export looks like:
//!
//! ```text
//! <7 lines of preamble: bank name, account, period, column titles...>
//! 01/02/24 09:15,Transfer Deposit,,500.00,1500.00,K PLUS,From X1234,
//! 02/02/24 12:00,Payment,120.00,,1380.00,K PLUS,,
//!
//! ```
//!
//! Bytes arrive in arbitrary chunks, so the decoder buffers until a full
//! record is available. A record whose quotes are still open at end of line
//! continues onto the next line.

use anyhow::{Context, Result};
use std::io::Read;

use crate::types::{StatementRow, StatementSchema};

#[derive(Debug)]
pub struct StatementDecoder {
    schema: StatementSchema,
    /// Bytes not yet terminated by a newline.
    buf: Vec<u8>,
    /// Lines of a record with an open quoted field.
    pending: Vec<u8>,
    skipped: usize,
}

impl StatementDecoder {
    pub fn new(schema: StatementSchema) -> Self {
        Self {
            schema,
            buf: Vec::new(),
            pending: Vec::new(),
            skipped: 0,
        }
    }

    /// Feed the next chunk; returns the rows it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<StatementRow>> {
        self.buf.extend_from_slice(chunk);

        let mut out = Vec::new();
        while let Some(pos) = self.buf.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            if let Some(row) = self.feed_line(&line)? {
                out.push(row);
            }
        }
        Ok(out)
    }

    /// Flush whatever is left once the input has ended.
    pub fn finish(mut self) -> Result<Vec<StatementRow>> {
        let mut out = Vec::new();

        let rest = std::mem::take(&mut self.buf);
        if !rest.is_empty() {
            if let Some(row) = self.feed_line(&rest)? {
                out.push(row);
            }
        }

        // Unterminated quote at EOF: decode what we have.
        let pending = std::mem::take(&mut self.pending);
        if !pending.is_empty() {
            if let Some(row) = self.decode_record(&pending)? {
                out.push(row);
            }
        }

        Ok(out)
    }

    fn feed_line(&mut self, line: &[u8]) -> Result<Option<StatementRow>> {
        if self.skipped < self.schema.skip_lines {
            self.skipped += 1;
            return Ok(None);
        }

        self.pending.extend_from_slice(line);
        let quotes = self.pending.iter().filter(|b| **b == b'"').count();
        if quotes % 2 == 1 {
            return Ok(None);
        }

        let record = std::mem::take(&mut self.pending);
        self.decode_record(&record)
    }

    fn decode_record(&self, record: &[u8]) -> Result<Option<StatementRow>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(record);

        let mut cells = csv::ByteRecord::new();
        if !rdr
            .read_byte_record(&mut cells)
            .context("decoding statement record")?
        {
            return Ok(None);
        }

        // Blank and footer lines come through short.
        let columns = self.schema.columns;
        if cells.len() < columns.len() {
            return Ok(None);
        }

        let fields = columns
            .iter()
            .zip(cells.iter())
            .filter(|(column, _)| !StatementSchema::is_placeholder(column))
            .map(|(column, value)| {
                (
                    column.to_string(),
                    String::from_utf8_lossy(value).into_owned(),
                )
            })
            .collect();

        Ok(Some(StatementRow::from_fields(fields)))
    }
}

/// Decode a whole export already on disk or in memory.
pub fn decode_statement<R: Read>(mut reader: R, schema: StatementSchema) -> Result<Vec<StatementRow>> {
    let mut decoder = StatementDecoder::new(schema);
    let mut rows = Vec::new();
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("reading statement export")?;
        if n == 0 {
            break;
        }
        rows.extend(decoder.push(&chunk[..n])?);
    }
    rows.extend(decoder.finish()?);

    Ok(rows)
}
