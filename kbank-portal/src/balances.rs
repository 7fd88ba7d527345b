//! Account summary table scrape.

use anyhow::Result;
use regex::Regex;
use reqwest::StatusCode;
use tracing::warn;

use kbank_core::{Balance, extract_all};

use crate::endpoints::ACCOUNT_SUMMARY;
use crate::portal::Portal;

pub const BALANCE_PATTERN: &str = concat!(
    r#"<td class="inner_table_center">(?P<number>[0-9]{3}-[0-9]-[0-9]{5}-[0-9])</td>"#,
    r#"[\s\S]*?<td class="inner_table_center" colspan="2">(?P<name>.*?)</td>"#,
    r#"[\s\S]*?<td class="inner_table_right">(?P<balance>.*?)</td>"#,
);

pub(crate) fn parse_balances(html: &str) -> Result<Vec<Balance>> {
    let re = Regex::new(BALANCE_PATTERN)?;
    Ok(extract_all(html, &re)
        .iter()
        .filter_map(Balance::from_record)
        .collect())
}

impl Portal {
    /// Current balances, in the order the summary page lists them.
    pub async fn balances(&self) -> Result<Option<Vec<Balance>>> {
        let query = [("action", "list_domain2".to_string())];
        let url = self.endpoints.ebank(ACCOUNT_SUMMARY);
        let resp = self.session.submit(&url, Some(&query[..]), None).await?;
        if resp.status() != StatusCode::OK {
            warn!(status = resp.status().as_u16(), "account summary unavailable");
            return Ok(None);
        }

        Ok(Some(parse_balances(&resp.text().await?)?))
    }
}
