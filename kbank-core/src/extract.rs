//! Regex match → plain record helpers shared by every scrape site.
//!
//! Patterns with named groups produce a [`Record`] keyed by group name;
//! patterns without named groups produce the positional captures.

use regex::{Captures, Regex};
use std::collections::BTreeMap;

/// Named-group captures of one match. Unmatched optional groups map to "".
pub type Record = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Captured {
    /// Capture groups 1..n, in order.
    Positional(Vec<String>),
    Named(Record),
}

impl Captured {
    /// First capture group for positional matches.
    pub fn first(&self) -> Option<&str> {
        match self {
            Captured::Positional(groups) => groups.first().map(String::as_str),
            Captured::Named(_) => None,
        }
    }

    /// Named group value for named matches.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Captured::Positional(_) => None,
            Captured::Named(record) => record.get(name).map(String::as_str),
        }
    }
}

fn has_named_groups(re: &Regex) -> bool {
    re.capture_names().flatten().next().is_some()
}

fn to_record(re: &Regex, caps: &Captures<'_>) -> Record {
    re.capture_names()
        .flatten()
        .map(|name| {
            let value = caps.name(name).map(|m| m.as_str()).unwrap_or("");
            (name.to_string(), value.to_string())
        })
        .collect()
}

/// First match of `re` in `text`, or `None`.
pub fn extract_one(text: &str, re: &Regex) -> Option<Captured> {
    let caps = re.captures(text)?;

    if has_named_groups(re) {
        return Some(Captured::Named(to_record(re, &caps)));
    }

    let groups = caps
        .iter()
        .skip(1)
        .map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
        .collect();
    Some(Captured::Positional(groups))
}

/// Every match of `re` in `text`, as named-group records in document order.
pub fn extract_all(text: &str, re: &Regex) -> Vec<Record> {
    re.captures_iter(text)
        .map(|caps| to_record(re, &caps))
        .collect()
}
