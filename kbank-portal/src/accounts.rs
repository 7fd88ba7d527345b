//! Account directory scraped from the statement-inquiry account selector.

use anyhow::Result;
use regex::Regex;
use reqwest::StatusCode;
use tracing::{debug, warn};

use kbank_core::{Account, extract_all};

use crate::endpoints::STATEMENT_INQUIRY;
use crate::portal::Portal;

pub const ACCOUNT_PATTERN: &str = r#"<option value="(?P<id>[0-9]+)">(?P<number>[0-9]{3}-[0-9]-[0-9]{5}-[0-9]) (?P<name>.*?)</option>"#;

pub(crate) fn parse_accounts(html: &str) -> Result<Vec<Account>> {
    let re = Regex::new(ACCOUNT_PATTERN)?;
    Ok(extract_all(html, &re)
        .iter()
        .filter_map(Account::from_record)
        .collect())
}

impl Portal {
    /// Fetch the account list and replace the cached copy.
    ///
    /// `Ok(None)` when the page is not served (usually: not logged in); the
    /// previous cache is left as it was.
    pub async fn accounts(&mut self) -> Result<Option<Vec<Account>>> {
        let url = self.endpoints.ebank(STATEMENT_INQUIRY);
        let resp = self.session.submit(&url, None, None).await?;
        if resp.status() != StatusCode::OK {
            warn!(status = resp.status().as_u16(), "account list unavailable");
            return Ok(None);
        }

        let accounts = parse_accounts(&resp.text().await?)?;
        debug!(count = accounts.len(), "account list refreshed");
        self.accounts = Some(accounts.clone());
        Ok(Some(accounts))
    }

    /// Accounts from the last successful [`Portal::accounts`] call, without I/O.
    pub fn cached_accounts(&self) -> Option<&[Account]> {
        self.accounts.as_deref()
    }

    /// Look up an account by canonical number, fetching the list on first use.
    pub async fn find_account(&mut self, number: &str) -> Result<Option<Account>> {
        if self.accounts.is_none() {
            self.accounts().await?;
        }
        Ok(self
            .cached_accounts()
            .and_then(|accounts| accounts.iter().find(|a| a.number == number))
            .cloned())
    }
}
