use std::path::PathBuf;

use kbank_core::{Account, Credentials};

use crate::endpoints::Endpoints;
use crate::error::PortalError;
use crate::session::Session;

/// Logged-in (or not yet logged-in) view of one user's portal session.
///
/// Operations that refresh the account cache take `&mut self`; everything
/// else only needs the shared cookie session.
pub struct Portal {
    pub(crate) credentials: Credentials,
    pub(crate) endpoints: Endpoints,
    pub(crate) session: Session,
    /// Unset until the first successful account fetch; replaced on refresh.
    pub(crate) accounts: Option<Vec<Account>>,
}

impl Portal {
    /// Portal client with an in-memory cookie jar and the production endpoints.
    pub fn new(credentials: Credentials) -> Result<Self, PortalError> {
        Ok(Self {
            credentials,
            endpoints: Endpoints::default(),
            session: Session::new(None)?,
            accounts: None,
        })
    }

    /// Validate and build in one step.
    pub fn connect(
        username: impl Into<String>,
        password: impl Into<String>,
        cookie_path: Option<PathBuf>,
    ) -> Result<Self, PortalError> {
        let mut portal = Self::new(Credentials::new(username, password)?)?;
        if cookie_path.is_some() {
            portal.set_cookie_path(cookie_path)?;
        }
        Ok(portal)
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_cookie_file(mut self, path: impl Into<PathBuf>) -> Result<Self, PortalError> {
        self.set_cookie_path(Some(path.into()))?;
        Ok(self)
    }

    pub fn set_credentials(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<(), PortalError> {
        self.credentials = Credentials::new(username, password)?;
        Ok(())
    }

    /// Swap the cookie jar. `None` switches to an in-memory jar.
    pub fn set_cookie_path(&mut self, path: Option<PathBuf>) -> Result<(), PortalError> {
        self.session = Session::new(path)?;
        Ok(())
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
