use std::sync::{Mutex, PoisonError};

/// Client-side navigation detector.
///
/// Three independent signals can observe the same route transition: a
/// history pop-state event, the host router's navigation-complete hook, and
/// a low-frequency polling fallback. All of them funnel into one last-seen
/// path guard, so a transition emits exactly one page view no matter how
/// many signals report it.
pub struct NavigationWatcher {
    last_path: Mutex<String>,
}

impl NavigationWatcher {
    /// `initial_path` is the path of the page view emitted at load time.
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            last_path: Mutex::new(initial_path.into()),
        }
    }

    /// Returns `true` exactly once per distinct path transition.
    fn observe(&self, path: &str) -> bool {
        let mut last = self
            .last_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *last == path {
            return false;
        }
        *last = path.to_string();
        true
    }

    /// History pop-state (back/forward buttons).
    pub fn on_pop_state(&self, path: &str) -> bool {
        self.observe(path)
    }

    /// Router navigation-complete hook, when the host framework exposes one.
    pub fn on_route_change_complete(&self, path: &str) -> bool {
        self.observe(path)
    }

    /// Polling fallback comparing the current path to the last-known one.
    pub fn on_poll_tick(&self, path: &str) -> bool {
        self.observe(path)
    }

    pub fn current_path(&self) -> String {
        self.last_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
