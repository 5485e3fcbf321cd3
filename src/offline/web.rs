//! Service worker backend
//!
//! [`CacheStorage`] and [`Network`] over the worker's `caches` and `fetch`,
//! plus the install/activate/fetch handlers the worker script forwards to.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::ServiceWorkerGlobalScope;

use super::{
    CACHE_NAME, CacheStorage, FetchError, Network, OfflineCache, Request, Response,
};

/// Statuses whose responses may not carry a body
const NULL_BODY_STATUSES: [u16; 4] = [101, 204, 205, 304];

fn describe(err: &JsValue) -> String {
    match err.dyn_ref::<js_sys::Error>() {
        Some(e) => String::from(e.message()),
        None => format!("{err:?}"),
    }
}

fn worker_scope() -> Result<ServiceWorkerGlobalScope, JsValue> {
    js_sys::global()
        .dyn_into::<ServiceWorkerGlobalScope>()
        .map_err(|_| JsValue::from_str("not running in a service worker"))
}

async fn read_response(response: web_sys::Response) -> Result<Response, JsValue> {
    let status = response.status();
    let content_type = response.headers().get("content-type")?;
    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(Response {
        status,
        content_type,
        body: js_sys::Uint8Array::new(&buffer).to_vec(),
    })
}

fn to_web_response(response: &Response) -> Result<web_sys::Response, JsValue> {
    let init = web_sys::ResponseInit::new();
    init.set_status(response.status);
    let headers = web_sys::Headers::new()?;
    if let Some(ref content_type) = response.content_type {
        headers.set("content-type", content_type)?;
    }
    init.set_headers(&headers);

    if NULL_BODY_STATUSES.contains(&response.status) {
        return web_sys::Response::new_with_opt_buffer_source_and_init(None, &init);
    }
    let body = js_sys::Uint8Array::from(response.body.as_slice());
    web_sys::Response::new_with_opt_buffer_source_and_init(Some(&*body), &init)
}

/// The worker's `caches`
pub struct BrowserCaches {
    caches: web_sys::CacheStorage,
}

impl BrowserCaches {
    async fn open(&self, cache: &str) -> Result<web_sys::Cache, JsValue> {
        JsFuture::from(self.caches.open(cache)).await?.dyn_into()
    }
}

impl CacheStorage for BrowserCaches {
    async fn cache_names(&self) -> Vec<String> {
        match JsFuture::from(self.caches.keys()).await {
            Ok(names) => js_sys::Array::from(&names)
                .iter()
                .filter_map(|name| name.as_string())
                .collect(),
            Err(e) => {
                log::warn!("Listing caches failed: {}", describe(&e));
                Vec::new()
            }
        }
    }

    async fn lookup(&self, cache: &str, key: &str) -> Option<Response> {
        let cache = self.open(cache).await.ok()?;
        let found = JsFuture::from(cache.match_with_str(key)).await.ok()?;
        if found.is_undefined() {
            return None;
        }
        let response: web_sys::Response = found.dyn_into().ok()?;
        match read_response(response).await {
            Ok(response) => Some(response),
            Err(e) => {
                log::warn!("Unreadable cache entry {}: {}", key, describe(&e));
                None
            }
        }
    }

    async fn store(&mut self, cache: &str, key: &str, response: Response) -> Result<(), FetchError> {
        let storage_error = |e: JsValue| FetchError::Storage {
            key: key.to_string(),
            reason: describe(&e),
        };
        let cache = self.open(cache).await.map_err(storage_error)?;
        let response = to_web_response(&response).map_err(storage_error)?;
        JsFuture::from(cache.put_with_str(key, &response))
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn delete_cache(&mut self, cache: &str) -> bool {
        JsFuture::from(self.caches.delete(cache))
            .await
            .ok()
            .and_then(|deleted| deleted.as_bool())
            .unwrap_or(false)
    }
}

/// The worker's `fetch`; relative URLs resolve against the worker script
pub struct BrowserNetwork {
    scope: ServiceWorkerGlobalScope,
}

impl Network for BrowserNetwork {
    async fn fetch(&mut self, url: &str) -> Result<Response, FetchError> {
        let network_error = |e: JsValue| FetchError::Network {
            url: url.to_string(),
            reason: describe(&e),
        };
        let response: web_sys::Response = JsFuture::from(self.scope.fetch_with_str(url))
            .await
            .map_err(network_error)?
            .dyn_into()
            .map_err(network_error)?;
        read_response(response).await.map_err(network_error)
    }
}

type WorkerCache = OfflineCache<BrowserCaches, BrowserNetwork>;

fn worker_cache(scope: &ServiceWorkerGlobalScope) -> Result<WorkerCache, JsValue> {
    let caches = BrowserCaches {
        caches: scope.caches()?,
    };
    let network = BrowserNetwork {
        scope: scope.clone(),
    };
    Ok(OfflineCache::new(caches, network, scope.location().origin()))
}

/// `install` event: cache every asset or fail the install
pub async fn install() -> Result<JsValue, JsValue> {
    let scope = worker_scope()?;
    let count = worker_cache(&scope)?
        .install()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(JsValue::from(count as u32))
}

/// `activate` event: delete caches other than [`CACHE_NAME`]
pub async fn activate() -> Result<JsValue, JsValue> {
    let scope = worker_scope()?;
    let deleted = worker_cache(&scope)?.activate().await;
    log::info!("{} active, {} stale caches removed", CACHE_NAME, deleted.len());
    Ok(JsValue::from(deleted.len() as u32))
}

/// Split a request URL into origin and a path relative to the worker's scope
fn scoped_request(scope: &ServiceWorkerGlobalScope, url: &str) -> Result<Request, JsValue> {
    let url = web_sys::Url::new(url)?;
    let scope_url = web_sys::Url::new(&scope.registration().scope())?;
    Ok(Request::scoped(url.origin(), &url.pathname(), &scope_url.pathname()))
}

/// `fetch` event
///
/// Non-GET and foreign requests go to the network untouched; the rest are
/// answered cache-first.
pub async fn respond(request: web_sys::Request) -> Result<web_sys::Response, JsValue> {
    let scope = worker_scope()?;
    let mut cache = worker_cache(&scope)?;
    let scoped = scoped_request(&scope, &request.url())?;

    if request.method() != "GET" || !cache.handles(&scoped) {
        return JsFuture::from(scope.fetch_with_request(&request))
            .await?
            .dyn_into();
    }

    match cache.fetch(&scoped).await {
        Ok(served) => {
            log::debug!("{} from {:?}", scoped.path, served.source);
            to_web_response(&served.response)
        }
        Err(e) => Err(JsValue::from_str(&e.to_string())),
    }
}
