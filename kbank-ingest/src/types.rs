use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Columns whose name starts with this are dropped before a row is yielded.
pub const PLACEHOLDER_PREFIX: &str = "ignored";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Date-range export from the statement inquiry page.
    History,
    /// Same-day export from the today's statement page.
    Today,
}

impl StatementKind {
    pub fn schema(self) -> StatementSchema {
        match self {
            StatementKind::History => HISTORY_SCHEMA,
            StatementKind::Today => TODAY_SCHEMA,
        }
    }
}

/// Layout of a downloaded statement CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementSchema {
    /// Lines of preamble before the first transaction row.
    pub skip_lines: usize,
    pub columns: &'static [&'static str],
}

impl StatementSchema {
    pub fn is_placeholder(column: &str) -> bool {
        column.starts_with(PLACEHOLDER_PREFIX)
    }
}

pub const HISTORY_SCHEMA: StatementSchema = StatementSchema {
    skip_lines: 7,
    columns: &[
        "datetime",   // Date
        "type",       // Transaction Type
        "withdrawal", // Withdrawal (THB)
        "deposit",    // Deposit (THB)
        "balance",    // Outstanding Balance (THB)
        "channel",    // Service Channel
        "note",
        "ignored",
    ],
};

pub const TODAY_SCHEMA: StatementSchema = StatementSchema {
    skip_lines: 7,
    columns: &[
        "datetime",
        "channel",
        "type",
        "withdrawal",
        "deposit",
        "ignored1",
        "ignored2", // Note
    ],
};

/// One transaction line, as ordered `(column, value)` pairs.
///
/// Values are passed through exactly as exported; amounts stay text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatementRow {
    fields: Vec<(String, String)>,
}

impl StatementRow {
    pub fn from_fields(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn into_fields(self) -> Vec<(String, String)> {
        self.fields
    }
}

impl Serialize for StatementRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
