use compass_core::event::EventKind;

/// Visible text on click payloads is bounded to this many characters.
pub const MAX_TEXT_LEN: usize = 100;

/// A DOM element as seen by the embedder's click listener.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub class: Option<String>,
    pub href: Option<String>,
    pub text: Option<String>,
}

/// A form as seen by the embedder's submit listener.
#[derive(Debug, Clone, Default)]
pub struct FormInfo {
    pub id: Option<String>,
    pub action: Option<String>,
    pub method: Option<String>,
}

fn is_interactive(tag: &str) -> bool {
    tag.eq_ignore_ascii_case("button") || tag.eq_ignore_ascii_case("a")
}

/// Resolve a click into an event payload.
///
/// `path` is the element chain from the event target up to the document
/// root. The nearest enclosing button or link wins; clicks that hit nothing
/// interactive produce no event at all.
pub fn click_target(path: &[Element]) -> Option<EventKind> {
    let element = path.iter().find(|el| is_interactive(&el.tag))?;
    let text = element
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.chars().take(MAX_TEXT_LEN).collect::<String>());
    Some(EventKind::Click {
        element: Some(element.tag.to_ascii_lowercase()),
        element_text: text,
        element_id: element.id.clone(),
        element_class: element.class.clone(),
        href: element.href.clone(),
    })
}

/// Resolve a form submission into an event payload.
pub fn form_submit(form: &FormInfo) -> EventKind {
    EventKind::FormSubmit {
        form_id: form.id.clone(),
        form_action: form.action.clone(),
        form_method: form.method.clone(),
    }
}

/// Scroll-depth tracker reporting 25% breakpoints, each at most once and
/// only in increasing order.
#[derive(Debug, Default)]
pub struct ScrollTracker {
    max_depth: u32,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current scroll percentage; returns a depth to report when a
    /// new 25% breakpoint is crossed.
    pub fn observe(&mut self, percent: f64) -> Option<f64> {
        if !percent.is_finite() {
            return None;
        }
        let depth = percent.round().clamp(0.0, 100.0) as u32;
        if depth > self.max_depth && depth % 25 == 0 {
            self.max_depth = depth;
            return Some(f64::from(depth));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(text: &str) -> Element {
        Element {
            tag: "a".to_string(),
            id: Some("nav-docs".to_string()),
            class: Some("nav-link".to_string()),
            href: Some("/docs".to_string()),
            text: Some(text.to_string()),
        }
    }

    fn span() -> Element {
        Element {
            tag: "span".to_string(),
            text: Some("icon".to_string()),
            ..Element::default()
        }
    }

    #[test]
    fn click_walks_up_to_nearest_interactive_ancestor() {
        let path = [span(), link("Docs"), Element { tag: "body".to_string(), ..Element::default() }];
        match click_target(&path) {
            Some(EventKind::Click { element, element_text, href, .. }) => {
                assert_eq!(element.as_deref(), Some("a"));
                assert_eq!(element_text.as_deref(), Some("Docs"));
                assert_eq!(href.as_deref(), Some("/docs"));
            }
            other => panic!("expected a click payload, got {other:?}"),
        }
    }

    #[test]
    fn click_on_non_interactive_path_yields_nothing() {
        let path = [span(), Element { tag: "div".to_string(), ..Element::default() }];
        assert!(click_target(&path).is_none());
    }

    #[test]
    fn click_text_is_trimmed_and_bounded() {
        let long = format!("  {}  ", "x".repeat(500));
        let path = [link(&long)];
        match click_target(&path) {
            Some(EventKind::Click { element_text, .. }) => {
                assert_eq!(element_text.map(|t| t.len()), Some(MAX_TEXT_LEN));
            }
            other => panic!("expected a click payload, got {other:?}"),
        }
    }

    #[test]
    fn whitespace_only_text_becomes_none() {
        let path = [link("   ")];
        match click_target(&path) {
            Some(EventKind::Click { element_text, .. }) => assert!(element_text.is_none()),
            other => panic!("expected a click payload, got {other:?}"),
        }
    }

    #[test]
    fn form_fields_carry_through() {
        let kind = form_submit(&FormInfo {
            id: Some("signup".to_string()),
            action: Some("/api/signup".to_string()),
            method: Some("post".to_string()),
        });
        assert_eq!(kind.type_name(), "form_submit");
    }

    #[test]
    fn scroll_reports_each_breakpoint_once_in_order() {
        let mut tracker = ScrollTracker::new();
        assert_eq!(tracker.observe(10.0), None);
        assert_eq!(tracker.observe(25.0), Some(25.0));
        assert_eq!(tracker.observe(25.0), None);
        assert_eq!(tracker.observe(60.0), None); // not a breakpoint
        assert_eq!(tracker.observe(75.0), Some(75.0));
        // Scrolling back up and down again does not re-report.
        assert_eq!(tracker.observe(50.0), None);
        assert_eq!(tracker.observe(100.0), Some(100.0));
    }
}
