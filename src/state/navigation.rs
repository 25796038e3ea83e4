// Navigation state - history and current location
//
// Locations are root-relative strings like `guide/install.md`, optionally
// carrying a `#fragment`. The empty string is the book root.

pub struct NavigationState {
    pub current: String,
    pub history: Vec<String>,
    pub history_index: usize,
    /// Fragment waiting for the page body to load before the content
    /// view can scroll to it.
    pub pending_fragment: Option<String>,
}

impl NavigationState {
    pub fn new(start: String) -> Self {
        Self {
            current: start.clone(),
            history: vec![start],
            history_index: 0,
            pending_fragment: None,
        }
    }

    pub fn push_history(&mut self, location: String) {
        // Remove any forward history when navigating to a new location
        self.history.truncate(self.history_index + 1);
        self.history.push(location.clone());
        self.history_index += 1;
        self.current = location;
    }

    pub fn go_back(&mut self) -> Option<String> {
        if self.history_index > 0 {
            self.history_index -= 1;
            self.current = self.history[self.history_index].clone();
            Some(self.current.clone())
        } else {
            None
        }
    }

    pub fn go_forward(&mut self) -> Option<String> {
        if self.history_index < self.history.len() - 1 {
            self.history_index += 1;
            self.current = self.history[self.history_index].clone();
            Some(self.current.clone())
        } else {
            None
        }
    }
}

/// Resolves a link found in page content against the page it appeared
/// on. `link` is relative to the page's directory unless it starts with
/// `/`, which makes it root-relative; fragments ride along unchanged.
/// A fragment-only link stays on the current page.
pub fn resolve_relative(base: &str, link: &str) -> String {
    let (path, fragment) = match link.find('#') {
        Some(pos) => (&link[..pos], &link[pos..]),
        None => (link, ""),
    };
    let base_page = match base.find('#') {
        Some(pos) => &base[..pos],
        None => base,
    };
    if path.is_empty() {
        return format!("{base_page}{fragment}");
    }

    let mut parts: Vec<&str> = Vec::new();
    if !path.starts_with('/') {
        if let Some(pos) = base_page.rfind('/') {
            parts.extend(base_page[..pos].split('/'));
        }
    }
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(segment),
        }
    }
    format!("{}{fragment}", parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branching_truncates_forward_history() {
        let mut nav = NavigationState::new("index.md".to_string());
        nav.push_history("setup.md".to_string());
        nav.push_history("guide.md".to_string());

        assert_eq!(nav.go_back(), Some("setup.md".to_string()));
        nav.push_history("reference.md".to_string());

        // The old forward entry (guide.md) is gone.
        assert_eq!(nav.history, vec!["index.md", "setup.md", "reference.md"]);
        assert_eq!(nav.go_forward(), None);
        assert_eq!(nav.go_back(), Some("setup.md".to_string()));
        assert_eq!(nav.go_forward(), Some("reference.md".to_string()));
    }

    #[test]
    fn back_stops_at_the_first_entry() {
        let mut nav = NavigationState::new("index.md".to_string());
        assert_eq!(nav.go_back(), None);
        assert_eq!(nav.current, "index.md");
    }

    #[test]
    fn relative_links_resolve_against_the_page_directory() {
        assert_eq!(
            resolve_relative("guide/install.md", "advanced.md"),
            "guide/advanced.md"
        );
        assert_eq!(resolve_relative("guide/install.md", "../setup.md"), "setup.md");
        assert_eq!(
            resolve_relative("guide/install.md", "./notes/tips.md"),
            "guide/notes/tips.md"
        );
        assert_eq!(resolve_relative("index.md", "guide/install.md"), "guide/install.md");
        assert_eq!(resolve_relative("a/b/c.md", "/top.md"), "top.md");
    }

    #[test]
    fn fragments_ride_along() {
        assert_eq!(
            resolve_relative("guide/install.md", "advanced.md#tuning"),
            "guide/advanced.md#tuning"
        );
        assert_eq!(
            resolve_relative("guide/install.md#old", "#requirements"),
            "guide/install.md#requirements"
        );
    }
}
