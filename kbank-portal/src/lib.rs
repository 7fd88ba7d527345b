//! kbank-portal: cookie-session client for the K-Online / K-eBank retail portal.
//!
//! Every operation goes through one [`Session`], so a login performed by
//! [`Portal::login`] is visible to the scrapes that follow it, and to other
//! processes sharing the same cookie file.

pub mod accounts;
pub mod auth;
pub mod balances;
pub mod endpoints;
pub mod error;
pub mod portal;
pub mod session;
pub mod statement;

pub use endpoints::Endpoints;
pub use error::PortalError;
pub use portal::Portal;
pub use session::Session;
pub use statement::StatementStream;

pub use kbank_core::{Account, Balance, Credentials};
pub use kbank_ingest::{StatementKind, StatementRow};
