/// Snapshot of the browser state at event-construction time.
///
/// The embedder captures this once per page view and hands it to the
/// tracker; everything derived from it (UA classification, URL params,
/// load time) is computed per event without further environment access.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub path: String,
    pub url: String,
    pub title: Option<String>,
    /// `None` when the browser reported an empty referrer.
    pub referrer: Option<String>,
    pub user_agent: String,
    /// Navigation-timing marks in milliseconds, when available.
    pub navigation_start: Option<f64>,
    pub load_event_end: Option<f64>,
}

impl PageContext {
    /// The referrer with the `"direct"` sentinel applied.
    pub fn referrer_or_direct(&self) -> String {
        match self.referrer.as_deref() {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => "direct".to_string(),
        }
    }

    /// Page load duration derived from navigation timing.
    ///
    /// `None` when either mark is missing or the difference is non-positive
    /// (a page still loading reports `load_event_end = 0`).
    pub fn page_load_time(&self) -> Option<f64> {
        let start = self.navigation_start?;
        let end = self.load_event_end?;
        let elapsed = end - start;
        if elapsed > 0.0 {
            Some(elapsed)
        } else {
            None
        }
    }
}
