//! Portal base URLs and the paths under them.

use serde::{Deserialize, Serialize};

pub const ONLINE_URL: &str = "https://online.kasikornbankgroup.com/K-Online/";
pub const EBANK_URL: &str = "https://ebank.kasikornbankgroup.com/retail/";

// K-Online (primary domain)
pub const CHECK_SESSION: &str = "checkSession.jsp";
pub const LOGIN: &str = "login.do";
pub const REDIRECT_TO_IB: &str = "ib/redirectToIB.jsp";
pub const LOGOUT: &str = "logout.do";

// K-eBank retail (secondary domain)
pub const WELCOME: &str = "security/Welcome.do";
pub const EBANK_LOGOUT: &str = "security/Logout.do";
pub const STATEMENT_INQUIRY: &str = "accountinfo/AccountStatementInquiry.do";
pub const ACCOUNT_SUMMARY: &str = "cashmanagement/inquiry/AccountSummary.do";
pub const TODAY_STATEMENT: &str = "cashmanagement/TodayAccountStatementInquiry.do";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    pub online: String,
    pub ebank: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(ONLINE_URL, EBANK_URL)
    }
}

impl Endpoints {
    pub fn new(online: impl Into<String>, ebank: impl Into<String>) -> Self {
        Self {
            online: with_trailing_slash(online.into()),
            ebank: with_trailing_slash(ebank.into()),
        }
    }

    pub fn online(&self, path: &str) -> String {
        format!("{}{}", with_trailing_slash(self.online.clone()), path)
    }

    pub fn ebank(&self, path: &str) -> String {
        format!("{}{}", with_trailing_slash(self.ebank.clone()), path)
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
