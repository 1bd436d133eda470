use chrono::Utc;
use serde_json::Value;

use compass_core::event::{Event, EventKind};
use compass_core::params::UrlParams;
use compass_core::ua::{classify_device, parse_browser, parse_os};

use crate::beacon::Beacon;
use crate::geo::GeoClient;
use crate::identity::Identity;
use crate::interaction::{click_target, form_submit, Element, FormInfo};
use crate::page::PageContext;

/// Orchestrates event construction, enrichment, and delivery.
///
/// One tracker per page view: the geolocation cache inside [`GeoClient`]
/// lives as long as the tracker, so every event on the page reuses the same
/// lookup. Delivery is handed to the beacon and forgotten — `track` never
/// reports delivery failure because there is none to observe.
pub struct Tracker {
    identity: Identity,
    geo: GeoClient,
    beacon: Box<dyn Beacon>,
}

impl Tracker {
    pub fn new(identity: Identity, geo: GeoClient, beacon: Box<dyn Beacon>) -> Self {
        Self {
            identity,
            geo,
            beacon,
        }
    }

    /// Build, enrich, and send one event.
    ///
    /// The geolocation await is the only async step; it is bounded by the
    /// client's timeout and degrades to "no location" on any failure, so
    /// the beacon is invoked in every case.
    pub async fn track(&self, page: &PageContext, kind: EventKind) {
        let mut event = self.build_event(page, kind);
        event.location = self.geo.lookup().await;
        match event.to_json() {
            Ok(body) => self.beacon.send(body),
            Err(e) => tracing::error!(error = %e, "failed to serialize event"),
        }
    }

    pub async fn track_page_view(&self, page: &PageContext) {
        self.track(page, EventKind::PageView).await;
    }

    /// Track a click if `path` (target element up to the root) contains an
    /// interactive element; non-interactive clicks are dropped silently.
    pub async fn track_click(&self, page: &PageContext, path: &[Element]) {
        if let Some(kind) = click_target(path) {
            self.track(page, kind).await;
        }
    }

    pub async fn track_form_submit(&self, page: &PageContext, form: &FormInfo) {
        self.track(page, form_submit(form)).await;
    }

    pub async fn track_scroll(&self, page: &PageContext, depth: f64) {
        self.track(page, EventKind::Scroll { depth: Some(depth) }).await;
    }

    /// Signup with the method used; defaults to `"email"`.
    pub async fn track_signup(&self, page: &PageContext, method: Option<&str>) {
        let method = Some(method.unwrap_or("email").to_string());
        self.track(page, EventKind::Signup { method }).await;
    }

    /// Login with the method used; defaults to `"email"`.
    pub async fn track_login(&self, page: &PageContext, method: Option<&str>) {
        let method = Some(method.unwrap_or("email").to_string());
        self.track(page, EventKind::Login { method }).await;
    }

    /// Purchase with an amount; currency defaults to `"USD"`.
    pub async fn track_purchase(&self, page: &PageContext, amount: f64, currency: Option<&str>) {
        let kind = EventKind::Purchase {
            amount: Some(amount),
            currency: Some(currency.unwrap_or("USD").to_string()),
        };
        self.track(page, kind).await;
    }

    /// Arbitrary named event with an optional JSON payload.
    pub async fn track_custom(&self, page: &PageContext, name: &str, data: Option<Value>) {
        let kind = EventKind::Custom {
            name: Some(name.to_string()),
            data,
        };
        self.track(page, kind).await;
    }

    /// Everything except the location, which is the one async enrichment.
    fn build_event(&self, page: &PageContext, kind: EventKind) -> Event {
        Event {
            kind,
            path: Some(page.path.clone()),
            url: Some(page.url.clone()),
            title: page.title.clone(),
            referrer: Some(page.referrer_or_direct()),
            timestamp: Some(Utc::now()),
            session_id: Some(self.identity.session_id()),
            anonymous_id: Some(self.identity.anonymous_id()),
            device_type: Some(classify_device(&page.user_agent)),
            browser: Some(parse_browser(&page.user_agent).to_string()),
            os: Some(parse_os(&page.user_agent).to_string()),
            params: UrlParams::from_raw_url(&page.url),
            page_load_time: page.page_load_time(),
            location: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::Value;

    use super::*;
    use crate::beacon::MemoryBeacon;
    use crate::identity::MemoryStore;

    fn page() -> PageContext {
        PageContext {
            path: "/pricing".to_string(),
            url: "https://example.com/pricing?utm_source=twitter&ref=hn".to_string(),
            title: Some("Pricing".to_string()),
            referrer: None,
            user_agent:
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36"
                    .to_string(),
            navigation_start: Some(0.0),
            load_event_end: Some(420.0),
        }
    }

    fn tracker(beacon: MemoryBeacon) -> Tracker {
        let identity = Identity::new(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()));
        // Unroutable geo endpoint: every lookup fails fast.
        let geo = GeoClient::new("http://127.0.0.1:9/json/", Duration::from_millis(250))
            .expect("build geo client");
        Tracker::new(identity, geo, Box::new(beacon))
    }

    #[tokio::test]
    async fn geo_failure_still_sends_the_beacon() {
        let beacon = MemoryBeacon::new();
        let tracker = tracker(beacon.clone());

        tracker.track_page_view(&page()).await;

        let sent = beacon.sent();
        assert_eq!(sent.len(), 1, "beacon must fire despite the failed geo lookup");
        let payload: Value = serde_json::from_str(&sent[0]).expect("valid JSON payload");
        assert_eq!(payload["type"], "page_view");
        assert!(
            payload.get("location").is_none(),
            "payload should lack only the location field"
        );
    }

    #[tokio::test]
    async fn page_view_is_fully_enriched() {
        let beacon = MemoryBeacon::new();
        let tracker = tracker(beacon.clone());

        tracker.track_page_view(&page()).await;

        let payload: Value = serde_json::from_str(&beacon.sent()[0]).expect("valid JSON");
        assert_eq!(payload["path"], "/pricing");
        assert_eq!(payload["referrer"], "direct");
        assert_eq!(payload["device_type"], "desktop");
        assert_eq!(payload["browser"], "Chrome");
        assert_eq!(payload["os"], "Windows");
        assert_eq!(payload["utm_source"], "twitter");
        assert_eq!(payload["ref"], "hn");
        assert_eq!(payload["utm_medium"], Value::Null);
        assert_eq!(payload["page_load_time"], 420.0);
        assert!(payload["sessionId"].as_str().is_some_and(|s| s.starts_with("session_")));
        assert!(payload["anonymous_id"].as_str().is_some_and(|s| s.starts_with("anon_")));
        assert!(payload["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn events_on_one_page_share_a_session_id() {
        let beacon = MemoryBeacon::new();
        let tracker = tracker(beacon.clone());
        let page = page();

        tracker.track_page_view(&page).await;
        tracker.track_scroll(&page, 25.0).await;

        let sent = beacon.sent();
        let first: Value = serde_json::from_str(&sent[0]).expect("json");
        let second: Value = serde_json::from_str(&sent[1]).expect("json");
        assert_eq!(first["sessionId"], second["sessionId"]);
        assert_eq!(second["type"], "scroll");
        assert_eq!(second["depth"], 25.0);
    }

    #[tokio::test]
    async fn signup_and_login_default_to_email_method() {
        let beacon = MemoryBeacon::new();
        let tracker = tracker(beacon.clone());
        let page = page();

        tracker.track_signup(&page, None).await;
        tracker.track_login(&page, None).await;
        tracker.track_signup(&page, Some("google")).await;

        let sent = beacon.sent();
        let signup: Value = serde_json::from_str(&sent[0]).expect("json");
        let login: Value = serde_json::from_str(&sent[1]).expect("json");
        let google: Value = serde_json::from_str(&sent[2]).expect("json");
        assert_eq!(signup["type"], "signup");
        assert_eq!(signup["method"], "email");
        assert_eq!(login["type"], "login");
        assert_eq!(login["method"], "email");
        assert_eq!(google["method"], "google");
    }

    #[tokio::test]
    async fn purchase_defaults_to_usd() {
        let beacon = MemoryBeacon::new();
        let tracker = tracker(beacon.clone());
        let page = page();

        tracker.track_purchase(&page, 49.99, None).await;
        tracker.track_purchase(&page, 30.0, Some("EUR")).await;

        let sent = beacon.sent();
        let first: Value = serde_json::from_str(&sent[0]).expect("json");
        let second: Value = serde_json::from_str(&sent[1]).expect("json");
        assert_eq!(first["type"], "purchase");
        assert_eq!(first["amount"], 49.99);
        assert_eq!(first["currency"], "USD");
        assert_eq!(second["currency"], "EUR");
    }

    #[tokio::test]
    async fn custom_event_carries_name_and_data() {
        let beacon = MemoryBeacon::new();
        let tracker = tracker(beacon.clone());

        tracker
            .track_custom(&page(), "plan_selected", Some(serde_json::json!({ "plan": "pro" })))
            .await;

        let payload: Value = serde_json::from_str(&beacon.sent()[0]).expect("json");
        assert_eq!(payload["type"], "custom");
        assert_eq!(payload["name"], "plan_selected");
        assert_eq!(payload["data"]["plan"], "pro");
    }

    #[tokio::test]
    async fn non_interactive_click_sends_nothing() {
        let beacon = MemoryBeacon::new();
        let tracker = tracker(beacon.clone());

        let path = [Element {
            tag: "div".to_string(),
            ..Element::default()
        }];
        tracker.track_click(&page(), &path).await;

        assert!(beacon.sent().is_empty());
    }
}
