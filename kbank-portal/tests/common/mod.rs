#![allow(dead_code)]

use kbank_portal::{Endpoints, Portal};
use wiremock::MockServer;

pub const ONLINE: &str = "/K-Online";
pub const EBANK: &str = "/retail";

pub fn endpoints(server: &MockServer) -> Endpoints {
    Endpoints::new(
        format!("{}{ONLINE}/", server.uri()),
        format!("{}{EBANK}/", server.uri()),
    )
}

pub fn portal(server: &MockServer) -> Portal {
    Portal::connect("alice", "s3cret", None)
        .unwrap()
        .with_endpoints(endpoints(server))
}

pub fn online(path: &str) -> String {
    format!("{ONLINE}/{path}")
}

pub fn ebank(path: &str) -> String {
    format!("{EBANK}/{path}")
}

pub const ACCOUNT_PAGE: &str = r#"
<select name="selAccountNo">
  <option value="">-- Please select --</option>
  <option value="7001">123-4-56789-0 SAVINGS MR TEST</option>
  <option value="7002">222-2-22222-2 CURRENT MR TEST</option>
</select>"#;

pub const PREAMBLE: &str = "KASIKORNBANK\n\
Account,123-4-56789-0\n\
Name,MR TEST\n\
Period,today\n\
\n\
Today's Statement\n\
Date,Service Channel,Transaction Type,Withdrawal,Deposit,,Note\n";
