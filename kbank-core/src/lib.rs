//! kbank-core: portal record types, credentials, and pattern extraction.

pub mod account;
pub mod credentials;
pub mod extract;

pub use account::{Account, Balance, clean_number, is_canonical_number};
pub use credentials::{CredentialError, Credentials};
pub use extract::{Captured, Record, extract_all, extract_one};
