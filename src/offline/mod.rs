//! Offline asset cache
//!
//! Cache-first serving of the game's own files so it keeps working with no
//! connection. The browser's cache and network are collaborators behind
//! [`CacheStorage`] and [`Network`]; [`web`] implements them for the service
//! worker and the worker script only forwards events.
//!
//! Lifecycle:
//! - `install`: download every asset into the versioned cache, all or nothing
//! - `activate`: drop caches left behind by older versions
//! - `fetch`: cache, then network (repopulating), then the offline page

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::BTreeMap;

use thiserror::Error;

/// Versioned cache name; bump to invalidate every client's copy
pub const CACHE_NAME: &str = "flappy-pwa-v2";

/// Files needed to play offline (the page plus the bundle it loads)
pub const ASSETS: [&str; 8] = [
    "./",
    "./index.html",
    "./styles.css",
    "./flappy-pwa.js",
    "./flappy-pwa_bg.wasm",
    "./manifest.webmanifest",
    "./icon-192.png",
    "./icon-512.png",
];

/// Served when both the cache and the network miss
pub const OFFLINE_FALLBACK: &str = "./index.html";

/// Fetch error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network request for {url} failed: {reason}")]
    Network { url: String, reason: String },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not store {key}: {reason}")]
    Storage { key: String, reason: String },
}

/// An intercepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Scheme + host + port, e.g. `https://example.org`
    pub origin: String,
    /// URL path relative to the app root, e.g. `/index.html`
    pub path: String,
}

impl Request {
    pub fn new(origin: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            path: path.into(),
        }
    }

    /// Request for `pathname` made under a worker registered at `scope_path`
    pub fn scoped(origin: impl Into<String>, pathname: &str, scope_path: &str) -> Self {
        let base = scope_path.trim_end_matches('/');
        let path = match pathname.strip_prefix(base) {
            Some(rest) if rest.is_empty() => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => pathname,
        };
        Self::new(origin, path)
    }

    /// Cache key in the same relative form as [`ASSETS`]
    pub fn key(&self) -> String {
        match self.path.strip_prefix('/') {
            Some(rest) => format!("./{rest}"),
            None => self.path.clone(),
        }
    }

    /// Absolute URL
    pub fn url(&self) -> String {
        format!("{}{}", self.origin, self.path)
    }
}

/// A stored or fetched response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Where a fetch was answered from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Network,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub response: Response,
    pub source: Source,
}

/// Named caches of key -> response
pub trait CacheStorage {
    fn cache_names(&self) -> impl Future<Output = Vec<String>>;
    fn lookup(&self, cache: &str, key: &str) -> impl Future<Output = Option<Response>>;
    fn store(
        &mut self,
        cache: &str,
        key: &str,
        response: Response,
    ) -> impl Future<Output = Result<(), FetchError>>;
    /// Resolves to whether a cache by that name existed
    fn delete_cache(&mut self, cache: &str) -> impl Future<Output = bool>;
}

/// Outbound requests
pub trait Network {
    fn fetch(&mut self, url: &str) -> impl Future<Output = Result<Response, FetchError>>;
}

/// In-memory cache storage (native hosts and tests)
#[derive(Debug, Default, Clone)]
pub struct MemoryCacheStorage {
    caches: BTreeMap<String, BTreeMap<String, Response>>,
}

impl MemoryCacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in a cache (0 if absent)
    pub fn len(&self, cache: &str) -> usize {
        self.caches.get(cache).map_or(0, BTreeMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.caches.values().all(BTreeMap::is_empty)
    }
}

impl CacheStorage for MemoryCacheStorage {
    async fn cache_names(&self) -> Vec<String> {
        self.caches.keys().cloned().collect()
    }

    async fn lookup(&self, cache: &str, key: &str) -> Option<Response> {
        self.caches.get(cache)?.get(key).cloned()
    }

    async fn store(&mut self, cache: &str, key: &str, response: Response) -> Result<(), FetchError> {
        self.caches
            .entry(cache.to_string())
            .or_default()
            .insert(key.to_string(), response);
        Ok(())
    }

    async fn delete_cache(&mut self, cache: &str) -> bool {
        self.caches.remove(cache).is_some()
    }
}

/// Cache-first asset server
pub struct OfflineCache<C: CacheStorage, N: Network> {
    storage: C,
    network: N,
    origin: String,
}

impl<C: CacheStorage, N: Network> OfflineCache<C, N> {
    pub fn new(storage: C, network: N, origin: impl Into<String>) -> Self {
        Self {
            storage,
            network,
            origin: origin.into(),
        }
    }

    /// Download every asset, then store them together
    ///
    /// Nothing stays cached unless every download and every write succeeds.
    pub async fn install(&mut self) -> Result<usize, FetchError> {
        let mut fetched = Vec::with_capacity(ASSETS.len());
        for url in ASSETS {
            let response = self.network.fetch(url).await?;
            if !response.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: response.status,
                });
            }
            fetched.push((url, response));
        }

        let count = fetched.len();
        for (url, response) in fetched {
            if let Err(e) = self.storage.store(CACHE_NAME, url, response).await {
                self.storage.delete_cache(CACHE_NAME).await;
                return Err(e);
            }
        }
        log::info!("Installed {} assets into {}", count, CACHE_NAME);
        Ok(count)
    }

    /// Delete every cache except the current version
    pub async fn activate(&mut self) -> Vec<String> {
        let stale: Vec<String> = self
            .storage
            .cache_names()
            .await
            .into_iter()
            .filter(|name| name != CACHE_NAME)
            .collect();
        for name in &stale {
            if self.storage.delete_cache(name).await {
                log::info!("Deleted stale cache {}", name);
            }
        }
        stale
    }

    /// Only same-origin requests are served from the cache
    pub fn handles(&self, request: &Request) -> bool {
        request.origin == self.origin
    }

    pub async fn fetch(&mut self, request: &Request) -> Result<Served, FetchError> {
        // Foreign requests go out untouched and are never cached
        if !self.handles(request) {
            let response = self.network.fetch(&request.url()).await?;
            return Ok(Served {
                response,
                source: Source::Network,
            });
        }

        let key = request.key();

        if let Some(response) = self.storage.lookup(CACHE_NAME, &key).await {
            return Ok(Served {
                response,
                source: Source::Cache,
            });
        }

        match self.network.fetch(&key).await {
            Ok(response) => {
                if response.is_success() {
                    if let Err(e) = self.storage.store(CACHE_NAME, &key, response.clone()).await {
                        log::warn!("{}", e);
                    }
                }
                Ok(Served {
                    response,
                    source: Source::Network,
                })
            }
            Err(e) => match self.storage.lookup(CACHE_NAME, OFFLINE_FALLBACK).await {
                Some(response) => {
                    log::debug!("Offline, serving fallback for {}", key);
                    Ok(Served {
                        response,
                        source: Source::Fallback,
                    })
                }
                None => {
                    log::warn!("Offline with no fallback cached: {}", e);
                    Err(e)
                }
            },
        }
    }
}
