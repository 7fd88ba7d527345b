//! Account and balance records scraped from the retail portal.

use serde::{Deserialize, Serialize};

use crate::extract::Record;

/// An account as listed in the statement-inquiry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Internal reference the portal's forms use (`acctId`).
    pub id: String,
    /// Masked display number, e.g. `123-4-56789-0`.
    pub number: String,
    pub name: String,
}

impl Account {
    pub fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            id: record.get("id")?.clone(),
            number: record.get("number")?.clone(),
            name: record.get("name")?.clone(),
        })
    }
}

/// One row of the account summary table. Every cell is passed through as scraped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub number: String,
    pub name: String,
    pub balance: String,
}

impl Balance {
    pub fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            number: record.get("number")?.clone(),
            name: record.get("name")?.clone(),
            balance: record.get("balance")?.clone(),
        })
    }
}

/// Strip the dashes from a canonical account number.
pub fn clean_number(number: &str) -> String {
    number.replace('-', "")
}

/// `NNN-N-NNNNN-N`
pub fn is_canonical_number(number: &str) -> bool {
    let parts: Vec<&str> = number.split('-').collect();
    let lens = [3, 1, 5, 1];
    parts.len() == lens.len()
        && parts
            .iter()
            .zip(lens)
            .all(|(p, n)| p.len() == n && p.bytes().all(|b| b.is_ascii_digit()))
}
