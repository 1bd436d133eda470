use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::params::UrlParams;
use crate::ua::DeviceType;

/// Per-kind event payload, tagged by the wire field `type`.
///
/// The tag is flattened into the top-level event object, so a click event
/// serializes as `{"type":"click","element":"a",...}` — the same flat shape
/// the original snippet produced by spreading extra fields into the event.
/// Modelling it as a tagged union means the storage mapping can enumerate
/// exactly what each kind may carry instead of silently dropping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    PageView,
    Click {
        element: Option<String>,
        element_text: Option<String>,
        element_id: Option<String>,
        element_class: Option<String>,
        href: Option<String>,
    },
    FormSubmit {
        form_id: Option<String>,
        form_action: Option<String>,
        form_method: Option<String>,
    },
    Scroll {
        /// Scroll depth as a percentage of the page, 0–100.
        depth: Option<f64>,
    },
    Signup {
        method: Option<String>,
    },
    Login {
        method: Option<String>,
    },
    Purchase {
        amount: Option<f64>,
        currency: Option<String>,
    },
    Custom {
        name: Option<String>,
        data: Option<Value>,
    },
}

impl EventKind {
    /// The wire/storage value of the `type` field.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::PageView => "page_view",
            Self::Click { .. } => "click",
            Self::FormSubmit { .. } => "form_submit",
            Self::Scroll { .. } => "scroll",
            Self::Signup { .. } => "signup",
            Self::Login { .. } => "login",
            Self::Purchase { .. } => "purchase",
            Self::Custom { .. } => "custom",
        }
    }
}

/// Best-effort IP geolocation attached to an event.
///
/// Canonical representation uses a single `region` field. `state` is accepted
/// as an alias on the wire (older snippets sent it) but never emitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub ip: Option<String>,
    pub country: Option<String>,
    #[serde(alias = "state")]
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
}

/// One telemetry event, the unit both sides of the pipeline speak.
///
/// The collector constructs it fully populated; the server accepts it with
/// every field optional except the `type` tag (and, in strict mode, `path`
/// and `timestamp`, enforced by the handler). The client-supplied timestamp
/// is authoritative — the server never overwrites it with its own clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(flatten)]
    pub kind: EventKind,
    pub path: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    /// `"direct"` when the browser reported no referrer.
    pub referrer: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
    pub anonymous_id: Option<String>,
    pub device_type: Option<DeviceType>,
    pub browser: Option<String>,
    pub os: Option<String>,
    /// UTM / click-id bag. All eight keys are always present on the wire,
    /// `null` when absent from the page URL.
    #[serde(flatten)]
    pub params: UrlParams,
    /// Milliseconds, `null` when navigation timing was unavailable or
    /// produced a non-positive duration.
    pub page_load_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Event {
    /// Compact JSON encoding handed to the beacon.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The flattened, stored form of an event — mirrors the `compass_events`
/// table columns exactly. Optional columns bind SQL NULL, never omitted.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub event_type: String,
    pub path: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub referrer: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub session_id: Option<String>,
    pub anonymous_id: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
    pub gclid: Option<String>,
    pub fbclid: Option<String>,
    pub ref_param: Option<String>,
    pub page_load_time: Option<f64>,
    pub ip: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub element: Option<String>,
    pub element_text: Option<String>,
    pub element_id: Option<String>,
    pub element_class: Option<String>,
    pub href: Option<String>,
    pub form_id: Option<String>,
    pub form_action: Option<String>,
    pub form_method: Option<String>,
    pub scroll_depth: Option<f64>,
    pub signup_method: Option<String>,
    pub login_method: Option<String>,
    pub purchase_amount: Option<f64>,
    pub purchase_currency: Option<String>,
    pub custom_name: Option<String>,
    /// Arbitrary custom payload, serialized to a JSON string for storage.
    pub custom_data: Option<String>,
    pub received_at: DateTime<Utc>,
}

impl EventRow {
    /// Flatten a wire event into the fixed column set.
    ///
    /// A missing client timestamp falls back to `received_at` (the strict
    /// handler rejects such events before this point; the lenient one keeps
    /// the original's `timestamp || now` behavior).
    pub fn from_event(event: Event, received_at: DateTime<Utc>) -> Self {
        let location = event.location.unwrap_or_default();
        let mut row = Self {
            event_type: event.kind.type_name().to_string(),
            path: event.path,
            url: event.url,
            title: event.title,
            referrer: event.referrer,
            timestamp: event.timestamp.unwrap_or(received_at),
            session_id: event.session_id,
            anonymous_id: event.anonymous_id,
            device_type: event.device_type.map(|d| d.as_str().to_string()),
            browser: event.browser,
            os: event.os,
            utm_source: event.params.utm_source,
            utm_medium: event.params.utm_medium,
            utm_campaign: event.params.utm_campaign,
            utm_term: event.params.utm_term,
            utm_content: event.params.utm_content,
            gclid: event.params.gclid,
            fbclid: event.params.fbclid,
            ref_param: event.params.ref_param,
            page_load_time: event.page_load_time,
            ip: location.ip,
            country: location.country,
            region: location.region,
            city: location.city,
            latitude: location.latitude,
            longitude: location.longitude,
            timezone: location.timezone,
            element: None,
            element_text: None,
            element_id: None,
            element_class: None,
            href: None,
            form_id: None,
            form_action: None,
            form_method: None,
            scroll_depth: None,
            signup_method: None,
            login_method: None,
            purchase_amount: None,
            purchase_currency: None,
            custom_name: None,
            custom_data: None,
            received_at,
        };

        match event.kind {
            EventKind::PageView => {}
            EventKind::Click {
                element,
                element_text,
                element_id,
                element_class,
                href,
            } => {
                row.element = element;
                row.element_text = element_text;
                row.element_id = element_id;
                row.element_class = element_class;
                row.href = href;
            }
            EventKind::FormSubmit {
                form_id,
                form_action,
                form_method,
            } => {
                row.form_id = form_id;
                row.form_action = form_action;
                row.form_method = form_method;
            }
            EventKind::Scroll { depth } => row.scroll_depth = depth,
            EventKind::Signup { method } => row.signup_method = method,
            EventKind::Login { method } => row.login_method = method,
            EventKind::Purchase { amount, currency } => {
                row.purchase_amount = amount;
                row.purchase_currency = currency;
            }
            EventKind::Custom { name, data } => {
                row.custom_name = name;
                row.custom_data = data.map(|v| v.to_string());
            }
        }

        row
    }
}
