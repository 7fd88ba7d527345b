//! kbank-ingest: statement export schemas and the CSV row decoder.

pub mod parsers;
pub mod types;

pub use parsers::statement_csv::{StatementDecoder, decode_statement};
pub use types::{StatementKind, StatementRow, StatementSchema};
