//! Session identifier and store abstraction.
//!
//! A [`SessionStore`] owns the cookie attributes for a session and
//! delegates persistence to a swappable [`SessionBackend`]. Stores are
//! shared by reference: several routers may point at one store.
//!
//! Session data is an opaque byte blob; the core round-trips it without
//! interpreting it.

pub mod file;
pub mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::config::SessionConfig;
use crate::http::cookie::Cookie;
use async_trait::async_trait;

pub const DEFAULT_NAME: &str = "sessionid";
pub const DEFAULT_GC_TIME: i64 = 7 * 86400;

/// Persistence operations behind a session store.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Fetch the blob stored under `id`, if any.
    async fn read(&self, id: &str) -> Option<Vec<u8>>;
    /// Store `data` under `id`, replacing any previous blob.
    async fn write(&self, id: &str, data: &[u8]) -> anyhow::Result<()>;
    /// Remove the blob stored under `id`.
    async fn destroy(&self, id: &str) -> anyhow::Result<()>;
}

/// A session store: cookie attributes plus a persistence backend.
pub struct SessionStore {
    name: String,
    gc_time: i64,
    cookie_expired: i64,
    cookie_path: String,
    cookie_domain: Option<String>,
    cookie_secure: bool,
    cookie_httponly: bool,
    backend: Box<dyn SessionBackend>,
}

impl SessionStore {
    pub fn new(backend: Box<dyn SessionBackend>) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            gc_time: DEFAULT_GC_TIME,
            cookie_expired: 0,
            cookie_path: "/".to_string(),
            cookie_domain: None,
            cookie_secure: false,
            cookie_httponly: false,
            backend,
        }
    }

    /// A store keeping sessions in process memory.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryBackend::new()))
    }

    /// A store keeping one file per session in `directory`.
    pub fn file(directory: impl Into<String>) -> Self {
        Self::new(Box::new(FileBackend::new(directory)))
    }

    /// Build a store from the config's session section.
    pub fn from_config(cfg: &SessionConfig) -> Self {
        match cfg.backend.as_str() {
            "file" => Self::file(cfg.directory.clone()),
            _ => Self::in_memory(),
        }
    }

    /// The session cookie name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gc_time(&self) -> i64 {
        self.gc_time
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_gc_time(&mut self, gc_time: i64) {
        self.gc_time = gc_time;
    }

    pub fn set_cookie_expired(&mut self, expired: i64) {
        self.cookie_expired = expired;
    }

    pub fn set_cookie_path(&mut self, path: impl Into<String>) {
        self.cookie_path = path.into();
    }

    pub fn set_cookie_domain(&mut self, domain: impl Into<String>) {
        self.cookie_domain = Some(domain.into());
    }

    pub fn set_cookie_secure(&mut self, secure: bool) {
        self.cookie_secure = secure;
    }

    pub fn set_cookie_httponly(&mut self, httponly: bool) {
        self.cookie_httponly = httponly;
    }

    /// Mint a fresh opaque session id.
    ///
    /// Ids are random (not derived from time or pid) and at least 16
    /// characters long.
    pub fn create_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    pub async fn read(&self, id: &str) -> Option<Vec<u8>> {
        self.backend.read(id).await
    }

    pub async fn write(&self, id: &str, data: &[u8]) -> anyhow::Result<()> {
        self.backend.write(id, data).await
    }

    pub async fn destroy(&self, id: &str) -> anyhow::Result<()> {
        self.backend.destroy(id).await
    }

    /// Build the session cookie for `id` from this store's attributes.
    pub fn cookie_for(&self, id: &str) -> Cookie {
        let mut cookie = Cookie::new(self.name.clone(), id);
        cookie.set_path(self.cookie_path.clone());
        if let Some(domain) = &self.cookie_domain {
            cookie.set_domain(domain.clone());
        }
        if self.cookie_expired > 0 {
            cookie.set_expired(self.cookie_expired);
        }
        cookie.set_secure(self.cookie_secure);
        cookie.set_httponly(self.cookie_httponly);
        cookie
    }
}
