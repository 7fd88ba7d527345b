//! HTTP client sharing a single cookie jar across every request.
//!
//! Redirects are never followed: the portal answers "step accepted, go to
//! the next hop" with a 302, and callers need to see that status.

use anyhow::{Context, Result, anyhow};
use cookie_store::CookieStore;
use reqwest::Response;
use reqwest::multipart::Form;
use reqwest::redirect::Policy;
use reqwest_cookie_store::CookieStoreMutex;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, MutexGuard};
use tracing::debug;

use crate::error::PortalError;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/131.0.0.0 Safari/537.36";

/// Request fields, sent either as a query string or as multipart form parts.
pub type Fields<'a> = &'a [(&'a str, String)];

pub struct Session {
    client: reqwest::Client,
    jar: Arc<CookieStoreMutex>,
    cookie_path: Option<PathBuf>,
}

impl Session {
    /// In-memory jar when `cookie_path` is `None`; otherwise the jar is
    /// loaded from (and written back to) that file, creating it if absent.
    pub fn new(cookie_path: Option<PathBuf>) -> Result<Self, PortalError> {
        let store = match &cookie_path {
            Some(path) => load_cookie_file(path)?,
            None => CookieStore::default(),
        };
        let jar = Arc::new(CookieStoreMutex::new(store));

        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .user_agent(USER_AGENT)
            .cookie_provider(Arc::clone(&jar))
            .build()?;

        Ok(Self {
            client,
            jar,
            cookie_path,
        })
    }

    pub fn cookie_path(&self) -> Option<&Path> {
        self.cookie_path.as_deref()
    }

    /// Number of unexpired cookies currently held.
    pub fn cookie_count(&self) -> Result<usize> {
        let store = self.lock_jar()?;
        Ok(store.iter_unexpired().count())
    }

    fn lock_jar(&self) -> Result<MutexGuard<'_, CookieStore>> {
        self.jar.lock().map_err(|_| anyhow!("cookie jar lock poisoned"))
    }

    /// GET `url` (with `query` appended), or multipart POST when `form` is given.
    pub async fn submit(
        &self,
        url: &str,
        query: Option<Fields<'_>>,
        form: Option<Fields<'_>>,
    ) -> Result<Response> {
        let mut req = match form {
            Some(fields) => {
                let body = fields.iter().fold(Form::new(), |form, (name, value)| {
                    form.text(name.to_string(), value.clone())
                });
                self.client.post(url).multipart(body)
            }
            None => self.client.get(url),
        };
        if let Some(query) = query {
            req = req.query(query);
        }

        let method = if form.is_some() { "POST" } else { "GET" };
        let resp = req
            .send()
            .await
            .with_context(|| format!("{method} {url}"))?;
        debug!(method, url, status = resp.status().as_u16(), "portal response");

        self.persist()?;
        Ok(resp)
    }

    /// Write the jar to the cookie file, session cookies included.
    pub fn persist(&self) -> Result<()> {
        let Some(path) = &self.cookie_path else {
            return Ok(());
        };

        let store = self.lock_jar()?;
        let file = File::create(path).with_context(|| format!("write {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        cookie_store::serde::json::save_incl_expired_and_nonpersistent(&store, &mut writer)
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("serialize cookies to {}", path.display()))?;
        Ok(())
    }
}

fn load_cookie_file(path: &Path) -> Result<CookieStore, PortalError> {
    let store_err = |source: Box<dyn std::error::Error + Send + Sync>| PortalError::CookieStore {
        path: path.to_path_buf(),
        source,
    };

    if !path.exists() {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| store_err(e.into()))?;
        }
        File::create(path).map_err(|e| store_err(e.into()))?;
        debug!(path = %path.display(), "created empty cookie file");
        return Ok(CookieStore::default());
    }

    let len = fs::metadata(path).map_err(|e| store_err(e.into()))?.len();
    if len == 0 {
        return Ok(CookieStore::default());
    }

    let file = File::open(path).map_err(|e| store_err(e.into()))?;
    cookie_store::serde::json::load(BufReader::new(file)).map_err(store_err)
}
