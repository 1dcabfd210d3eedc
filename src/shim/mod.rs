//! Offline cache shim for the tracker's companion web assets.
//!
//! This subsystem plays the role of a service worker for the app: it keeps
//! a versioned on-disk snapshot of the static assets, answers intercepted
//! requests cache-first (same-origin) or stale-while-revalidate
//! (cross-origin), and falls back to the cached document when the network
//! is unreachable. It shares no state with the attendance model.

pub mod cache;
pub mod clients;
pub mod fetch;
pub mod push;
pub mod worker;

pub use cache::CacheStore;
pub use clients::ClientRegistry;
pub use fetch::{HttpNetwork, Network, Request, Response};
pub use worker::{OfflineShim, ShimError, CACHE_NAME};
