//! Two-domain login/logout handshake.
//!
//! K-Online authenticates the user, then hands the session to K-eBank by
//! way of a hex token embedded in an intermediate page. Login carries the
//! token in a hidden input; logout carries it in a query string.

use anyhow::Result;
use regex::Regex;
use reqwest::StatusCode;
use tracing::{info, warn};

use kbank_core::extract_one;

use crate::endpoints::{CHECK_SESSION, EBANK_LOGOUT, LOGIN, LOGOUT, REDIRECT_TO_IB, WELCOME};
use crate::portal::Portal;

pub const LOGIN_TOKEN_PATTERN: &str = r#"name="txtParam" value="([a-fA-F0-9]*)""#;
pub const LOGOUT_TOKEN_PATTERN: &str = r"txtParam=([a-fA-F0-9]*)";

/// First capture of `pattern`, if present and non-empty.
fn handshake_token(text: &str, pattern: &str) -> Result<Option<String>> {
    let re = Regex::new(pattern)?;
    Ok(extract_one(text, &re)
        .and_then(|captured| captured.first().map(str::to_string))
        .filter(|token| !token.is_empty()))
}

fn expect(step: &str, got: StatusCode, want: StatusCode) -> bool {
    if got != want {
        warn!(step, got = got.as_u16(), want = want.as_u16(), "unexpected portal status");
        return false;
    }
    true
}

impl Portal {
    /// Ask the session-check page; 200 means the jar holds a live session.
    pub async fn is_logged_in(&self) -> Result<bool> {
        let url = self.endpoints.online(CHECK_SESSION);
        let resp = self.session.submit(&url, None, None).await?;
        Ok(resp.status() == StatusCode::OK)
    }

    /// Run the full handshake. `Ok(false)` when any hop is rejected.
    pub async fn login(&self) -> Result<bool> {
        let form = [
            ("tokenId", "0".to_string()),
            ("cmd", "authenticate".to_string()),
            ("userName", self.credentials.username().to_string()),
            ("password", self.credentials.password().to_string()),
            ("locale", "en".to_string()),
        ];
        let url = self.endpoints.online(LOGIN);
        let resp = self.session.submit(&url, None, Some(&form[..])).await?;
        if !expect("login", resp.status(), StatusCode::FOUND) {
            return Ok(false);
        }

        let url = self.endpoints.online(REDIRECT_TO_IB);
        let resp = self.session.submit(&url, None, None).await?;
        if !expect("redirect to ebank", resp.status(), StatusCode::OK) {
            return Ok(false);
        }
        let text = resp.text().await?;
        let Some(token) = handshake_token(&text, LOGIN_TOKEN_PATTERN)? else {
            warn!("login handshake token not found");
            return Ok(false);
        };

        let form = [("txtParam", token)];
        let url = self.endpoints.ebank(WELCOME);
        let resp = self.session.submit(&url, None, Some(&form[..])).await?;
        let ok = expect("ebank welcome", resp.status(), StatusCode::FOUND);
        if ok {
            info!(user = self.credentials.username(), "logged in");
        }
        Ok(ok)
    }

    /// Log out of both domains. `Ok(false)` when either hop is rejected.
    pub async fn logout(&self) -> Result<bool> {
        let query = [("cmd", "success".to_string())];
        let url = self.endpoints.online(LOGOUT);
        let resp = self.session.submit(&url, Some(&query[..]), None).await?;
        if !expect("logout", resp.status(), StatusCode::OK) {
            return Ok(false);
        }
        let text = resp.text().await?;
        let Some(token) = handshake_token(&text, LOGOUT_TOKEN_PATTERN)? else {
            warn!("logout handshake token not found");
            return Ok(false);
        };

        let query = [("action", "retailuser".to_string()), ("txtParam", token)];
        let url = self.endpoints.ebank(EBANK_LOGOUT);
        let resp = self.session.submit(&url, Some(&query[..]), None).await?;
        let ok = expect("ebank logout", resp.status(), StatusCode::FOUND);
        if ok {
            info!(user = self.credentials.username(), "logged out");
        }
        Ok(ok)
    }
}
