//! In-page navigation history of the surface.

/// A single entry in the navigation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
}

/// Back stack of pages visited since the surface was mounted.
#[derive(Debug, Default)]
pub struct NavigationController {
    back_stack: Vec<HistoryEntry>,
    current: Option<HistoryEntry>,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to a new URL. Pushes the current page to the back stack.
    pub fn navigate(&mut self, url: &str, title: &str) {
        if let Some(entry) = self.current.take() {
            self.back_stack.push(entry);
        }
        self.current = Some(HistoryEntry {
            url: url.to_string(),
            title: title.to_string(),
        });
    }

    /// Go back in history. Returns the entry to load, or `None`.
    pub fn go_back(&mut self) -> Option<HistoryEntry> {
        let prev = self.back_stack.pop()?;
        self.current = Some(prev.clone());
        Some(prev)
    }

    /// Replace the current entry's URL and title (after redirects / load).
    pub fn update_current(&mut self, url: &str, title: &str) {
        if let Some(entry) = self.current.as_mut() {
            entry.url = url.to_string();
            entry.title = title.to_string();
        }
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current.as_ref().map(|e| e.url.as_str())
    }

    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    /// Drop all history.
    pub fn reset(&mut self) {
        self.back_stack.clear();
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_controller_is_empty() {
        let nav = NavigationController::new();
        assert!(nav.current_url().is_none());
        assert!(!nav.can_go_back());
    }

    #[test]
    fn navigate_pushes_history() {
        let mut nav = NavigationController::new();
        nav.navigate("https://a.example/", "A");
        assert!(!nav.can_go_back());
        nav.navigate("https://b.example/", "B");
        assert!(nav.can_go_back());
        assert_eq!(nav.current_url(), Some("https://b.example/"));
    }

    #[test]
    fn go_back_restores_previous() {
        let mut nav = NavigationController::new();
        nav.navigate("https://a.example/", "A");
        nav.navigate("https://b.example/", "B");
        let entry = nav.go_back().unwrap();
        assert_eq!(entry.url, "https://a.example/");
        assert_eq!(entry.title, "A");
        assert_eq!(nav.current_url(), Some("https://a.example/"));
        assert!(!nav.can_go_back());
        assert!(nav.go_back().is_none());
    }

    #[test]
    fn update_current_rewrites_entry() {
        let mut nav = NavigationController::new();
        nav.navigate("http://a.example/", "");
        nav.update_current("https://a.example/home", "Home");
        assert_eq!(nav.current_url(), Some("https://a.example/home"));
        nav.navigate("https://b.example/", "B");
        assert_eq!(
            nav.go_back(),
            Some(HistoryEntry {
                url: "https://a.example/home".into(),
                title: "Home".into(),
            })
        );
    }

    #[test]
    fn reset_clears_everything() {
        let mut nav = NavigationController::new();
        nav.navigate("https://a.example/", "A");
        nav.navigate("https://b.example/", "B");
        nav.reset();
        assert!(nav.current_url().is_none());
        assert!(!nav.can_go_back());
    }
}
