use std::path::PathBuf;
use thiserror::Error;

use kbank_core::CredentialError;

/// Failures that happen before any request is made.
///
/// Portal-side rejections are not errors: operations report them as
/// `false`, `None`, or an empty row stream.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error("cookie store {}", path.display())]
    CookieStore {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("could not build HTTP client")]
    Client(#[from] reqwest::Error),
}
