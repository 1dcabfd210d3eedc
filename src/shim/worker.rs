//! The offline shim itself: generation lifecycle and request handling.
//!
//! One `OfflineShim` sits between the page's resource requests and the
//! network. Installing fetches the fixed asset manifest into a fresh cache
//! generation; activating promotes it, purges every other generation, and
//! claims open clients. Request handling is cache-first for same-origin
//! GETs (with an offline document fallback) and stale-while-revalidate for
//! cross-origin GETs. Non-GET requests pass through untouched.

use std::sync::{Arc, Mutex};

use futures::stream::{self, StreamExt};
use reqwest::{StatusCode, Url};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::cache::CacheStore;
use super::clients::ClientRegistry;
use super::fetch::{Destination, FetchError, Network, Request, Response};
use super::push::{Notification, NotificationSink, PushPayload};

/// Live cache generation tag. Bump the suffix to supersede deployed caches.
pub const CACHE_NAME: &str = "rollcall-v1";

/// Static assets the shim must be able to serve offline, relative to the
/// app origin.
pub const STATIC_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/style.min.css",
    "/script.min.js",
    "/manifest.json",
    "/assets/icon-72x72.png",
    "/assets/icon-96x96.png",
    "/assets/icon-128x128.png",
    "/assets/icon-144x144.png",
    "/assets/icon-152x152.png",
    "/assets/icon-192x192.png",
    "/assets/icon-384x384.png",
    "/assets/icon-512x512.png",
    "/assets/favicon-16x16.png",
    "/assets/favicon-32x32.png",
    "/assets/apple-touch-icon.png",
];

/// External font stylesheet cached alongside the static assets.
pub const FONT_STYLESHEET_URL: &str =
    "https://fonts.googleapis.com/css2?family=Poppins:wght@300;400;500;600;700&display=swap";

/// Path of the document served as the offline fallback.
const DOCUMENT_PATH: &str = "/index.html";

/// Background sync tag the shim recognizes.
const SYNC_ATTENDANCE_TAG: &str = "sync-attendance";

/// Bound on concurrent asset fetches during install.
const MAX_CONCURRENT_INSTALL_FETCHES: usize = 4;

#[derive(Error, Debug)]
pub enum ShimError {
    #[error("Install failed fetching {url}: {reason}")]
    InstallFailed { url: String, reason: String },

    #[error("No waiting cache generation to activate")]
    NothingWaiting,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid push payload: {0}")]
    PushPayload(#[from] serde_json::Error),

    #[error("Cache error: {0}")]
    Cache(anyhow::Error),
}

/// Control messages the page can send to the shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    SkipWaiting,
}

impl ControlMessage {
    /// The single recognized message value; everything else is ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        (raw == "skipWaiting").then_some(Self::SkipWaiting)
    }
}

#[derive(Default)]
struct Lifecycle {
    active: Option<String>,
    waiting: Option<String>,
}

pub struct OfflineShim<N> {
    net: Arc<N>,
    store: Arc<CacheStore>,
    origin: Url,
    clients: Arc<ClientRegistry>,
    lifecycle: Mutex<Lifecycle>,
}

impl<N: Network> OfflineShim<N> {
    pub fn new(
        net: Arc<N>,
        store: Arc<CacheStore>,
        origin: Url,
        clients: Arc<ClientRegistry>,
    ) -> Self {
        // A generation surviving on disk from a previous run stays live
        // until a new install supersedes it.
        let active = store
            .generations()
            .ok()
            .and_then(|tags| tags.into_iter().next());
        if let Some(ref tag) = active {
            debug!(tag, "resuming existing cache generation");
        }

        Self {
            net,
            store,
            origin,
            clients,
            lifecycle: Mutex::new(Lifecycle {
                active,
                waiting: None,
            }),
        }
    }

    pub fn active_generation(&self) -> Option<String> {
        self.lifecycle.lock().expect("lifecycle poisoned").active.clone()
    }

    /// Full manifest of URLs an install must capture.
    pub fn asset_urls(&self) -> Result<Vec<Url>, ShimError> {
        let mut urls = Vec::with_capacity(STATIC_ASSETS.len() + 1);
        for path in STATIC_ASSETS {
            let url = self.origin.join(path).map_err(|e| ShimError::InstallFailed {
                url: path.to_string(),
                reason: e.to_string(),
            })?;
            urls.push(url);
        }
        let font = Url::parse(FONT_STYLESHEET_URL).map_err(|e| ShimError::InstallFailed {
            url: FONT_STYLESHEET_URL.to_string(),
            reason: e.to_string(),
        })?;
        urls.push(font);
        Ok(urls)
    }

    /// Fetch the whole asset manifest into a new cache generation.
    ///
    /// All-or-nothing: any failed fetch aborts the install, removes the
    /// partial generation, and leaves the previously active generation (if
    /// any) untouched. On success the generation waits for activation.
    pub async fn install(&self, tag: &str) -> Result<(), ShimError> {
        info!(tag, "installing cache generation");
        self.store.open_generation(tag).map_err(ShimError::Cache)?;

        let fetches = stream::iter(self.asset_urls()?.into_iter().map(|url| {
            let net = Arc::clone(&self.net);
            async move {
                let result = net.fetch(Request::get(url.clone())).await;
                (url, result)
            }
        }))
        .buffer_unordered(MAX_CONCURRENT_INSTALL_FETCHES)
        .collect::<Vec<_>>()
        .await;

        for (url, result) in fetches {
            let response = match result {
                Ok(response) if response.is_success() => response,
                Ok(response) => {
                    return Err(self.abort_install(tag, &url, format!("status {}", response.status)));
                }
                Err(e) => return Err(self.abort_install(tag, &url, e.to_string())),
            };
            if let Err(e) = self.store.put(tag, url.as_str(), &response) {
                return Err(self.abort_install(tag, &url, e.to_string()));
            }
        }

        let mut lifecycle = self.lifecycle.lock().expect("lifecycle poisoned");
        lifecycle.waiting = Some(tag.to_string());
        info!(tag, "install complete, generation waiting");
        Ok(())
    }

    fn abort_install(&self, tag: &str, url: &Url, reason: String) -> ShimError {
        warn!(tag, url = %url, reason = %reason, "install failed");
        // Never wipe a generation that is already serving requests; stray
        // refreshed entries in it are still individually valid.
        let active = self.active_generation();
        if active.as_deref() != Some(tag) {
            if let Err(e) = self.store.delete_generation(tag) {
                debug!(tag, error = %e, "failed to remove partial generation");
            }
        }
        ShimError::InstallFailed {
            url: url.to_string(),
            reason,
        }
    }

    /// Promote the waiting generation, purge every other generation, and
    /// take control of all open clients immediately.
    pub fn activate(&self) -> Result<Vec<String>, ShimError> {
        let tag = {
            let mut lifecycle = self.lifecycle.lock().expect("lifecycle poisoned");
            let Some(tag) = lifecycle.waiting.take() else {
                return Err(ShimError::NothingWaiting);
            };
            lifecycle.active = Some(tag.clone());
            tag
        };

        let purged = self.store.purge_except(&tag).map_err(ShimError::Cache)?;
        self.clients.claim();
        info!(tag, purged = ?purged, "cache generation activated");
        Ok(purged)
    }

    /// Handle a control message from the page.
    pub fn handle_message(&self, raw: &str) {
        match ControlMessage::parse(raw) {
            Some(ControlMessage::SkipWaiting) => match self.activate() {
                Ok(_) => info!("skip-waiting: generation activated immediately"),
                Err(ShimError::NothingWaiting) => {
                    debug!("skip-waiting with no waiting generation")
                }
                Err(e) => warn!(error = %e, "skip-waiting activation failed"),
            },
            None => debug!(message = raw, "ignoring unrecognized control message"),
        }
    }

    /// Handle one intercepted resource request.
    pub async fn handle_request(&self, request: Request) -> Result<Response, ShimError> {
        if !request.is_get() {
            return Ok(self.net.fetch(request).await?);
        }
        let Some(tag) = self.active_generation() else {
            // Nothing active yet; the shim is transparent.
            return Ok(self.net.fetch(request).await?);
        };

        if request.is_same_origin(&self.origin) {
            self.cache_first(&tag, request).await
        } else {
            self.stale_while_revalidate(&tag, request).await
        }
    }

    /// Same-origin strategy: cached entry first (refreshed in the
    /// background), then network, then the offline document fallback.
    async fn cache_first(&self, tag: &str, request: Request) -> Result<Response, ShimError> {
        let url = request.url.as_str().to_string();

        if let Some(cached) = self.store.get(tag, &url).map_err(ShimError::Cache)? {
            debug!(url = %url, age_minutes = cached.age_minutes(), "cache hit");
            self.spawn_revalidate(tag.to_string(), request);
            return Ok(cached.response);
        }

        match self.net.fetch(request.clone()).await {
            Ok(response) => {
                if response.status == StatusCode::OK {
                    if let Err(e) = self.store.put(tag, &url, &response) {
                        debug!(url = %url, error = %e, "failed to store fetched response");
                    }
                }
                Ok(response)
            }
            Err(e) => {
                if request.destination == Destination::Document {
                    if let Some(cached) = self.document_fallback(tag)? {
                        warn!(url = %url, "network unreachable, serving offline document fallback");
                        return Ok(cached.response);
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Cross-origin strategy: serve the cached entry immediately while
    /// refreshing it; with no cached entry, wait on the network.
    async fn stale_while_revalidate(
        &self,
        tag: &str,
        request: Request,
    ) -> Result<Response, ShimError> {
        let url = request.url.as_str().to_string();

        if let Some(cached) = self.store.get(tag, &url).map_err(ShimError::Cache)? {
            debug!(url = %url, age_minutes = cached.age_minutes(), "serving stale, revalidating");
            self.spawn_revalidate(tag.to_string(), request);
            return Ok(cached.response);
        }

        let response = self.net.fetch(request).await?;
        if response.is_success() {
            if let Err(e) = self.store.put(tag, &url, &response) {
                debug!(url = %url, error = %e, "failed to store fetched response");
            }
        }
        Ok(response)
    }

    fn document_fallback(&self, tag: &str) -> Result<Option<super::cache::CachedResponse>, ShimError> {
        let fallback_url = self
            .origin
            .join(DOCUMENT_PATH)
            .expect("document path is a valid relative url");
        self.store
            .get(tag, fallback_url.as_str())
            .map_err(ShimError::Cache)
    }

    /// Refresh one cache entry from the network, ignoring failures.
    fn spawn_revalidate(&self, tag: String, request: Request) {
        let net = Arc::clone(&self.net);
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            let url = request.url.as_str().to_string();
            match net.fetch(request).await {
                Ok(response) if response.is_success() => {
                    if let Err(e) = store.put(&tag, &url, &response) {
                        debug!(url = %url, error = %e, "failed to refresh cache entry");
                    }
                }
                Ok(response) => {
                    debug!(url = %url, status = %response.status, "not refreshing from non-success response")
                }
                Err(e) => debug!(url = %url, error = %e, "background refresh failed"),
            }
        });
    }

    /// Background sync hook. There is no server to sync with, so the
    /// recognized tag is a deliberate no-op; it never fails or blocks.
    pub fn handle_sync(&self, tag: &str) {
        if tag == SYNC_ATTENDANCE_TAG {
            debug!("background sync requested");
        } else {
            debug!(tag, "ignoring unknown sync tag");
        }
    }

    /// Handle a push message: decode the optional payload and display a
    /// notification through the sink.
    pub fn handle_push(
        &self,
        data: Option<&str>,
        sink: &impl NotificationSink,
    ) -> Result<(), ShimError> {
        let Some(raw) = data else {
            // Push with no payload shows nothing
            return Ok(());
        };
        let payload = PushPayload::parse(raw)?;
        sink.show(Notification::from_payload(&payload));
        Ok(())
    }

    /// A notification was clicked: bring an existing page instance to the
    /// foreground or open a new one. Returns the focused client's id.
    pub fn handle_notification_click(&self) -> u64 {
        self.clients.focus_or_open(self.origin.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicBool, Ordering};

    use futures::future::BoxFuture;
    use reqwest::Method;
    use tempfile::TempDir;

    use super::*;

    const ORIGIN: &str = "https://tracker.example";

    /// In-memory network serving canned bodies per URL.
    #[derive(Default)]
    struct StubNetwork {
        bodies: Mutex<HashMap<String, Vec<u8>>>,
        missing: Mutex<HashSet<String>>,
        offline: AtomicBool,
        hits: Mutex<Vec<String>>,
    }

    impl StubNetwork {
        fn serve(&self, url: &str, body: &str) {
            self.bodies
                .lock()
                .unwrap()
                .insert(url.to_string(), body.as_bytes().to_vec());
        }

        fn drop_asset(&self, url: &str) {
            self.bodies.lock().unwrap().remove(url);
            self.missing.lock().unwrap().insert(url.to_string());
        }

        fn set_offline(&self, offline: bool) {
            self.offline.store(offline, Ordering::SeqCst);
        }

        fn hit_count(&self) -> usize {
            self.hits.lock().unwrap().len()
        }
    }

    impl Network for StubNetwork {
        fn fetch(&self, request: Request) -> BoxFuture<'static, Result<Response, FetchError>> {
            let url = request.url.as_str().to_string();
            self.hits.lock().unwrap().push(url.clone());

            let result = if self.offline.load(Ordering::SeqCst) {
                Err(FetchError::Unreachable("stub offline".to_string()))
            } else if self.missing.lock().unwrap().contains(&url) {
                Ok(Response {
                    status: StatusCode::NOT_FOUND,
                    content_type: None,
                    body: Vec::new(),
                })
            } else if let Some(body) = self.bodies.lock().unwrap().get(&url) {
                Ok(Response {
                    status: StatusCode::OK,
                    content_type: Some("text/plain".to_string()),
                    body: body.clone(),
                })
            } else {
                Err(FetchError::Unreachable(format!("no stub for {}", url)))
            };

            Box::pin(async move { result })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        shown: Mutex<Vec<Notification>>,
    }

    impl NotificationSink for RecordingSink {
        fn show(&self, notification: Notification) {
            self.shown.lock().unwrap().push(notification);
        }
    }

    fn make_shim(dir: &TempDir, net: Arc<StubNetwork>) -> OfflineShim<StubNetwork> {
        let store = Arc::new(CacheStore::new(dir.path().to_path_buf()).unwrap());
        OfflineShim::new(
            net,
            store,
            ORIGIN.parse().unwrap(),
            Arc::new(ClientRegistry::default()),
        )
    }

    fn serve_manifest(shim: &OfflineShim<StubNetwork>, net: &StubNetwork) {
        for url in shim.asset_urls().unwrap() {
            net.serve(url.as_str(), &format!("body of {}", url));
        }
    }

    fn url(path: &str) -> Url {
        format!("{}{}", ORIGIN, path).parse().unwrap()
    }

    #[tokio::test]
    async fn test_install_then_activate() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);

        shim.install(CACHE_NAME).await.unwrap();
        assert_eq!(shim.active_generation(), None);

        shim.activate().unwrap();
        assert_eq!(shim.active_generation(), Some(CACHE_NAME.to_string()));
    }

    #[tokio::test]
    async fn test_activate_claims_clients() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let clients = Arc::new(ClientRegistry::default());
        let store = Arc::new(CacheStore::new(dir.path().to_path_buf()).unwrap());
        let shim = OfflineShim::new(
            Arc::clone(&net),
            store,
            ORIGIN.parse().unwrap(),
            Arc::clone(&clients),
        );
        serve_manifest(&shim, &net);
        clients.register(&format!("{}/", ORIGIN));

        shim.install(CACHE_NAME).await.unwrap();
        shim.activate().unwrap();
        assert_eq!(clients.controlled_count(), 1);
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);
        net.drop_asset(url("/style.min.css").as_str());

        let err = shim.install(CACHE_NAME).await.unwrap_err();
        assert!(matches!(err, ShimError::InstallFailed { .. }));
        assert_eq!(shim.active_generation(), None);
    }

    #[tokio::test]
    async fn test_failed_install_keeps_previous_generation() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);

        shim.install("rollcall-v1").await.unwrap();
        shim.activate().unwrap();

        net.drop_asset(url("/index.html").as_str());
        assert!(shim.install("rollcall-v2").await.is_err());

        // v1 still active and still serving
        assert_eq!(shim.active_generation(), Some("rollcall-v1".to_string()));
        net.set_offline(true);
        let response = shim
            .handle_request(Request::get(url("/style.min.css")))
            .await
            .unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_cache_first_serves_cached_entry() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);

        shim.install(CACHE_NAME).await.unwrap();
        shim.activate().unwrap();

        // The network now has newer content, but the cached copy is served
        net.serve(url("/style.min.css").as_str(), "updated");
        let response = shim
            .handle_request(Request::get(url("/style.min.css")))
            .await
            .unwrap();
        assert_eq!(
            response.body,
            format!("body of {}", url("/style.min.css")).into_bytes()
        );
    }

    #[tokio::test]
    async fn test_cache_hit_ignores_refresh_failure() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);

        shim.install(CACHE_NAME).await.unwrap();
        shim.activate().unwrap();

        net.set_offline(true);
        let response = shim
            .handle_request(Request::get(url("/script.min.js")))
            .await
            .unwrap();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_cache_miss_fetches_and_stores() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);

        shim.install(CACHE_NAME).await.unwrap();
        shim.activate().unwrap();

        net.serve(url("/extra.css").as_str(), "extra");
        let first = shim
            .handle_request(Request::get(url("/extra.css")))
            .await
            .unwrap();
        assert_eq!(first.body, b"extra");

        // Stored copy survives losing the network
        net.set_offline(true);
        let second = shim
            .handle_request(Request::get(url("/extra.css")))
            .await
            .unwrap();
        assert_eq!(second.body, b"extra");
    }

    #[tokio::test]
    async fn test_offline_document_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);

        shim.install(CACHE_NAME).await.unwrap();
        shim.activate().unwrap();

        net.set_offline(true);
        let response = shim
            .handle_request(Request::document(url("/some/uncached/page")))
            .await
            .unwrap();
        assert_eq!(
            response.body,
            format!("body of {}", url("/index.html")).into_bytes()
        );
    }

    #[tokio::test]
    async fn test_offline_non_document_propagates_failure() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);

        shim.install(CACHE_NAME).await.unwrap();
        shim.activate().unwrap();

        net.set_offline(true);
        let result = shim
            .handle_request(Request::get(url("/uncached.png")))
            .await;
        assert!(matches!(result, Err(ShimError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_cross_origin_stale_while_revalidate() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);

        shim.install(CACHE_NAME).await.unwrap();
        shim.activate().unwrap();

        // Cached at install; stale copy served even though network changed
        net.serve(FONT_STYLESHEET_URL, "fresh font css");
        let response = shim
            .handle_request(Request::get(FONT_STYLESHEET_URL.parse().unwrap()))
            .await
            .unwrap();
        assert_eq!(
            response.body,
            format!("body of {}", FONT_STYLESHEET_URL).into_bytes()
        );
    }

    #[tokio::test]
    async fn test_cross_origin_miss_waits_on_network() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);

        shim.install(CACHE_NAME).await.unwrap();
        shim.activate().unwrap();

        let cross = "https://cdn.example/lib.js";
        net.serve(cross, "lib");
        let response = shim
            .handle_request(Request::get(cross.parse().unwrap()))
            .await
            .unwrap();
        assert_eq!(response.body, b"lib");

        net.set_offline(true);
        let result = shim
            .handle_request(Request::get("https://cdn.example/other.js".parse().unwrap()))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_non_get_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);

        shim.install(CACHE_NAME).await.unwrap();
        shim.activate().unwrap();

        // POST to a cached URL must still hit the network
        net.set_offline(true);
        let before = net.hit_count();
        let result = shim
            .handle_request(Request::new(
                Method::POST,
                url("/index.html"),
                Destination::Other,
            ))
            .await;
        assert!(result.is_err());
        assert_eq!(net.hit_count(), before + 1);
    }

    #[tokio::test]
    async fn test_no_active_generation_is_transparent() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));

        net.serve(url("/index.html").as_str(), "direct");
        let response = shim
            .handle_request(Request::get(url("/index.html")))
            .await
            .unwrap();
        assert_eq!(response.body, b"direct");
    }

    #[tokio::test]
    async fn test_skip_waiting_message_activates() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);

        shim.install(CACHE_NAME).await.unwrap();
        shim.handle_message("skipWaiting");
        assert_eq!(shim.active_generation(), Some(CACHE_NAME.to_string()));
    }

    #[tokio::test]
    async fn test_unrecognized_message_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, Arc::clone(&net));
        serve_manifest(&shim, &net);

        shim.install(CACHE_NAME).await.unwrap();
        shim.handle_message("something-else");
        assert_eq!(shim.active_generation(), None);
    }

    #[tokio::test]
    async fn test_sync_hook_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, net);

        // Neither tag can fail or block
        shim.handle_sync("sync-attendance");
        shim.handle_sync("unknown-tag");
    }

    #[tokio::test]
    async fn test_push_with_payload() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, net);
        let sink = RecordingSink::default();

        shim.handle_push(Some(r#"{"title":"Reminder"}"#), &sink).unwrap();
        let shown = sink.shown.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Reminder");
    }

    #[tokio::test]
    async fn test_push_without_payload_shows_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, net);
        let sink = RecordingSink::default();

        shim.handle_push(None, &sink).unwrap();
        assert!(sink.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_push_invalid_payload_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let shim = make_shim(&dir, net);
        let sink = RecordingSink::default();

        assert!(shim.handle_push(Some("not json"), &sink).is_err());
        assert!(sink.shown.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_click_focuses_or_opens() {
        let dir = tempfile::tempdir().unwrap();
        let net = Arc::new(StubNetwork::default());
        let clients = Arc::new(ClientRegistry::default());
        let store = Arc::new(CacheStore::new(dir.path().to_path_buf()).unwrap());
        let shim = OfflineShim::new(net, store, ORIGIN.parse().unwrap(), Arc::clone(&clients));

        // No open instance: a new one is opened and focused
        let opened = shim.handle_notification_click();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients.focused(), Some(opened));

        // An existing instance gets focused instead of opening another
        let again = shim.handle_notification_click();
        assert_eq!(again, opened);
        assert_eq!(clients.len(), 1);
    }
}
