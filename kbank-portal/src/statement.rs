//! Statement downloads, decoded into rows as the body streams in.

use anyhow::{Context, Result};
use async_stream::try_stream;
use chrono::{Datelike, NaiveDate};
use futures_util::stream::{self, Stream, StreamExt};
use reqwest::{Response, StatusCode};
use std::pin::Pin;
use tracing::{debug, warn};

use kbank_core::clean_number;
use kbank_ingest::{StatementDecoder, StatementKind, StatementRow};

use crate::endpoints::{STATEMENT_INQUIRY, TODAY_STATEMENT};
use crate::portal::Portal;

/// Forward-only sequence of rows; ends with the response body.
pub type StatementStream = Pin<Box<dyn Stream<Item = Result<StatementRow>> + Send>>;

fn empty() -> StatementStream {
    Box::pin(stream::empty())
}

fn decode_rows(resp: Response, kind: StatementKind) -> impl Stream<Item = Result<StatementRow>> + Send {
    try_stream! {
        let mut body = resp.bytes_stream();
        let mut decoder = StatementDecoder::new(kind.schema());

        while let Some(chunk) = body.next().await {
            let chunk = chunk.context("reading statement body")?;
            for row in decoder.push(&chunk)? {
                yield row;
            }
        }
        for row in decoder.finish()? {
            yield row;
        }
    }
}

/// `|<digits>||||||`, the account selector value of the download form.
fn account_selector(number: &str) -> String {
    format!("|{}||||||", clean_number(number))
}

impl Portal {
    /// Statement for `number` between `start` and `end` inclusive.
    ///
    /// An empty stream when the portal refuses the download.
    pub async fn statement(
        &self,
        number: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<StatementStream> {
        let form = [
            ("action", "sa_download".to_string()),
            ("selAccountNo", account_selector(number)),
            ("selDayFrom", start.day().to_string()),
            ("selMonthFrom", start.month().to_string()),
            ("selYearFrom", start.year().to_string()),
            ("selDayTo", end.day().to_string()),
            ("selMonthTo", end.month().to_string()),
            ("selYearTo", end.year().to_string()),
            ("period", "3".to_string()),
        ];
        let url = self.endpoints.ebank(STATEMENT_INQUIRY);
        let resp = self.session.submit(&url, None, Some(&form[..])).await?;
        if resp.status() != StatusCode::OK {
            warn!(status = resp.status().as_u16(), number, "statement download refused");
            return Ok(empty());
        }

        debug!(number, %start, %end, "decoding statement");
        Ok(Box::pin(decode_rows(resp, StatementKind::History)))
    }

    /// Today's transactions for `number`.
    ///
    /// The account id comes from the (lazily fetched) account cache; an
    /// unknown number gives an empty stream without touching the statement
    /// endpoint. The portal only serves the download after the detail view
    /// for the same account has been requested.
    pub async fn today_statement(&mut self, number: &str) -> Result<StatementStream> {
        let Some(account) = self.find_account(number).await? else {
            warn!(number, "no such account");
            return Ok(empty());
        };

        let url = self.endpoints.ebank(TODAY_STATEMENT);
        let detail = [
            ("acctId", account.id.clone()),
            ("action", "detail".to_string()),
        ];
        let resp = self.session.submit(&url, None, Some(&detail[..])).await?;
        if resp.status() != StatusCode::OK {
            warn!(status = resp.status().as_u16(), number, "today's statement detail refused");
            return Ok(empty());
        }

        let download = [
            ("acctId", account.id.clone()),
            ("action", "download".to_string()),
        ];
        let resp = self.session.submit(&url, None, Some(&download[..])).await?;
        if resp.status() != StatusCode::OK {
            warn!(status = resp.status().as_u16(), number, "today's statement download refused");
            return Ok(empty());
        }

        debug!(number, "decoding today's statement");
        Ok(Box::pin(decode_rows(resp, StatementKind::Today)))
    }
}
