//! Headless event collector — the library rendition of the browser snippet.
//!
//! An embedder (webview shell, SSR host, instrumentation harness) feeds it
//! page context and interaction signals; the collector builds fully-enriched
//! events and hands them to a fire-and-forget beacon. Nothing in this crate
//! ever blocks the caller on network I/O: geolocation is best-effort and
//! cached, and beacon delivery runs on a detached task.

pub mod beacon;
pub mod geo;
pub mod identity;
pub mod interaction;
pub mod navigation;
pub mod page;
pub mod tracker;

pub use beacon::{Beacon, HttpBeacon, MemoryBeacon};
pub use geo::GeoClient;
pub use identity::{Identity, IdentityStore, MemoryStore};
pub use navigation::NavigationWatcher;
pub use page::PageContext;
pub use tracker::Tracker;
