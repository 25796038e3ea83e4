// Sidebar state - table-of-contents presentation and the per-page attach pass
use std::collections::HashSet;

use crate::state::session::SessionState;
use crate::toc::{NodeId, Toc, TocItem};

/// Document a trailing-slash or empty location falls back to.
pub const INDEX_DOC: &str = "index.md";

/// How the sidebar viewport should move on the next rendered frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollRequest {
    /// Restore the offset remembered before the last sidebar click.
    Restore(f32),
    /// Bring the active entry to the middle of the viewport.
    CenterActive,
}

pub struct SidebarState {
    /// Prefix prepended to relative targets, supplied by the host before
    /// the first attach. The reader mounts books at the root, so this
    /// stays empty in normal operation.
    pub root_prefix: String,
    pub active: Option<NodeId>,
    pub expanded: HashSet<NodeId>,
    pub scroll_request: Option<ScrollRequest>,
    /// Offset observed after the last rendered frame; this is the
    /// pre-click value a link click writes into session memory.
    pub scroll_offset: f32,
    pub filter: String,
    fold_enable: bool,
    fold_level: usize,
}

impl SidebarState {
    pub fn new(fold_enable: bool, fold_level: usize) -> Self {
        Self {
            root_prefix: String::new(),
            active: None,
            expanded: HashSet::new(),
            scroll_request: None,
            scroll_offset: 0.0,
            filter: String::new(),
            fold_enable,
            fold_level,
        }
    }

    /// One-shot setup pass, run every time a page is shown: resolve the
    /// active link for `location`, expand its ancestor chain on top of
    /// the fold defaults, and decide how to move the viewport. A missing
    /// match is a silent no-op; scroll memory is consumed here even when
    /// nothing is active.
    pub fn attach(&mut self, toc: &Toc, location: &str, session: &mut SessionState) {
        let current = normalize_location(location);
        self.active = self.find_active(toc, &current);

        self.reset_expansion(toc);
        if let Some(id) = self.active {
            self.expanded.insert(id);
            for ancestor in toc.ancestors(id) {
                self.expanded.insert(ancestor);
            }
        }

        self.scroll_request = match session.take_sidebar_scroll() {
            Some(offset) => Some(ScrollRequest::Restore(offset)),
            None => self.active.map(|_| ScrollRequest::CenterActive),
        };
    }

    /// Exact-equality scan over the link list. The root index document
    /// aliases the first link when no prefix is in play, so opening a
    /// book lands on a highlighted first chapter.
    fn find_active(&self, toc: &Toc, current: &str) -> Option<NodeId> {
        for (i, &id) in toc.links().iter().enumerate() {
            let Some(target) = toc.target(id) else {
                continue;
            };
            if resolve_target(&self.root_prefix, target) == current
                || (i == 0 && self.root_prefix.is_empty() && current == INDEX_DOC)
            {
                return Some(id);
            }
        }
        None
    }

    /// Forgets everything tied to the previous table of contents. Node
    /// ids do not survive a book reload, so a freshly loaded tree must
    /// not be indexed with them; the next attach re-marks the active
    /// chain against the new tree.
    pub fn reset(&mut self, toc: &Toc) {
        self.active = None;
        self.reset_expansion(toc);
    }

    /// Collapses everything back to the configured fold defaults.
    pub fn reset_expansion(&mut self, toc: &Toc) {
        self.expanded.clear();
        for id in 0..toc.node_count() {
            let node = toc.node(id);
            if !node.children.is_empty() && self.default_expanded(node.depth) {
                self.expanded.insert(id);
            }
        }
    }

    fn default_expanded(&self, depth: usize) -> bool {
        !self.fold_enable || depth < self.fold_level
    }

    /// Flips one entry's expanded state. Purely presentational; nothing
    /// else changes.
    pub fn toggle(&mut self, id: NodeId) {
        if self.expanded.contains(&id) {
            self.expanded.remove(&id);
        } else {
            self.expanded.insert(id);
        }
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn is_active(&self, id: NodeId) -> bool {
        self.active == Some(id)
    }

    /// Target of a chapter after prefix resolution; what a click on the
    /// row navigates to.
    pub fn resolved_target(&self, toc: &Toc, id: NodeId) -> Option<String> {
        toc.target(id).map(|t| resolve_target(&self.root_prefix, t))
    }

    pub fn take_scroll_request(&mut self) -> Option<ScrollRequest> {
        self.scroll_request.take()
    }

    /// Rows to show while the TOC filter is active: chapters whose title
    /// contains the query (case-insensitive), each with its ancestor
    /// chain so hits keep their context. `None` means no filter.
    pub fn filter_matches(&self, toc: &Toc) -> Option<HashSet<NodeId>> {
        let needle = self.filter.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        let mut visible = HashSet::new();
        for id in 0..toc.node_count() {
            if let TocItem::Chapter { title, .. } = &toc.node(id).item {
                if title.to_lowercase().contains(&needle) {
                    visible.insert(id);
                    visible.extend(toc.ancestors(id));
                }
            }
        }
        Some(visible)
    }
}

/// Derives the current page identity from a navigable location: the
/// fragment is stripped, and a trailing slash (or an empty path) falls
/// back to the index document.
pub fn normalize_location(location: &str) -> String {
    let page = match location.find('#') {
        Some(pos) => &location[..pos],
        None => location,
    };
    if page.is_empty() || page.ends_with('/') {
        format!("{page}{INDEX_DOC}")
    } else {
        page.to_string()
    }
}

/// Resolves a target against the root prefix. Fragment-only targets and
/// absolute ones (optional `[a-z+]+` scheme followed by `//`) pass
/// through unchanged.
pub fn resolve_target(root_prefix: &str, target: &str) -> String {
    if target.starts_with('#') || is_absolute_target(target) {
        target.to_string()
    } else {
        format!("{root_prefix}{target}")
    }
}

fn is_absolute_target(target: &str) -> bool {
    let rest = match target.find(':') {
        Some(pos) if pos > 0 && target[..pos].chars().all(|c| c.is_ascii_lowercase() || c == '+') => {
            &target[pos + 1..]
        }
        _ => target,
    };
    rest.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::parse_summary;

    const SUMMARY: &str = "\
[Introduction](index.md)

- [Setup](setup.md)
- [Guide](guide.md)
  - [Install](guide/install.md)
  - [Advanced](guide/advanced.md)
    - [Tuning](guide/advanced/tuning.md)
- [Reference](reference.md)
";

    fn link_by_target(toc: &Toc, target: &str) -> NodeId {
        toc.links()
            .iter()
            .copied()
            .find(|&id| toc.target(id) == Some(target))
            .unwrap()
    }

    // Fold disabled so defaults do not interfere unless a test wants them.
    fn folded_sidebar() -> SidebarState {
        SidebarState::new(true, 0)
    }

    #[test]
    fn matching_location_marks_link_and_ancestors() {
        let toc = parse_summary(SUMMARY);
        let mut sidebar = folded_sidebar();
        let mut session = SessionState::new();

        sidebar.attach(&toc, "guide/advanced/tuning.md", &mut session);

        let tuning = link_by_target(&toc, "guide/advanced/tuning.md");
        let advanced = link_by_target(&toc, "guide/advanced.md");
        let guide = link_by_target(&toc, "guide.md");
        assert_eq!(sidebar.active, Some(tuning));

        // Exactly the active entry and its ancestor chain are expanded.
        let expect: HashSet<NodeId> = [tuning, advanced, guide].into_iter().collect();
        assert_eq!(sidebar.expanded, expect);
    }

    #[test]
    fn unknown_location_is_a_silent_no_op() {
        let toc = parse_summary(SUMMARY);
        let mut sidebar = folded_sidebar();
        let mut session = SessionState::new();

        sidebar.attach(&toc, "missing/page.md", &mut session);

        assert_eq!(sidebar.active, None);
        assert!(sidebar.expanded.is_empty());
        assert_eq!(sidebar.scroll_request, None);
    }

    #[test]
    fn root_index_aliases_the_first_link() {
        let toc = parse_summary(SUMMARY);
        let mut session = SessionState::new();

        // Empty location normalizes to the index document.
        let mut sidebar = folded_sidebar();
        sidebar.attach(&toc, "", &mut session);
        assert_eq!(sidebar.active, Some(toc.links()[0]));

        // A bare fragment strips down to the root index as well.
        let mut sidebar = folded_sidebar();
        sidebar.attach(&toc, "#getting-started", &mut session);
        assert_eq!(sidebar.active, Some(toc.links()[0]));

        // A nested index document is not the root one.
        let mut sidebar = folded_sidebar();
        sidebar.attach(&toc, "guide/", &mut session);
        assert_eq!(sidebar.active, None);
    }

    #[test]
    fn alias_is_disabled_under_a_prefix() {
        let toc = parse_summary(SUMMARY);
        let mut sidebar = folded_sidebar();
        sidebar.root_prefix = "book/".to_string();
        let mut session = SessionState::new();

        sidebar.attach(&toc, "index.md", &mut session);
        assert_eq!(sidebar.active, None);

        // Prefixed targets still match exactly.
        sidebar.attach(&toc, "book/guide/install.md", &mut session);
        assert_eq!(
            sidebar.active,
            Some(link_by_target(&toc, "guide/install.md"))
        );
    }

    #[test]
    fn fragments_are_stripped_before_matching() {
        let toc = parse_summary(SUMMARY);
        let mut sidebar = folded_sidebar();
        let mut session = SessionState::new();

        sidebar.attach(&toc, "setup.md#prerequisites", &mut session);
        assert_eq!(sidebar.active, Some(link_by_target(&toc, "setup.md")));
    }

    #[test]
    fn relative_targets_resolve_against_the_prefix() {
        assert_eq!(resolve_target("", "guide.md"), "guide.md");
        assert_eq!(
            resolve_target("../../", "guide/install.md"),
            "../../guide/install.md"
        );
        // Fragment-only and absolute targets are untouched.
        assert_eq!(resolve_target("../../", "#top"), "#top");
        assert_eq!(
            resolve_target("../../", "https://example.com/docs"),
            "https://example.com/docs"
        );
        assert_eq!(
            resolve_target("../../", "//cdn.example.com/logo.png"),
            "//cdn.example.com/logo.png"
        );
        assert_eq!(
            resolve_target("../../", "git+ssh://host/repo"),
            "git+ssh://host/repo"
        );
        // A scheme without `//` does not count as absolute.
        assert_eq!(
            resolve_target("../../", "mailto:docs@example.com"),
            "../../mailto:docs@example.com"
        );
    }

    #[test]
    fn remembered_scroll_is_restored_then_consumed() {
        let toc = parse_summary(SUMMARY);
        let mut sidebar = folded_sidebar();
        let mut session = SessionState::new();

        // A click wrote the pre-click offset into the session store.
        sidebar.scroll_offset = 142.0;
        session.remember_sidebar_scroll(sidebar.scroll_offset);

        sidebar.attach(&toc, "setup.md", &mut session);
        assert_eq!(sidebar.scroll_request, Some(ScrollRequest::Restore(142.0)));
        assert_eq!(sidebar.take_scroll_request(), Some(ScrollRequest::Restore(142.0)));
        assert_eq!(sidebar.take_scroll_request(), None);

        // The next attach finds the store empty and centers instead.
        sidebar.attach(&toc, "setup.md", &mut session);
        assert_eq!(sidebar.scroll_request, Some(ScrollRequest::CenterActive));
    }

    #[test]
    fn toggle_flips_exactly_once_per_activation() {
        let toc = parse_summary(SUMMARY);
        let mut sidebar = folded_sidebar();
        let guide = link_by_target(&toc, "guide.md");

        assert!(!sidebar.is_expanded(guide));
        sidebar.toggle(guide);
        assert!(sidebar.is_expanded(guide));
        sidebar.toggle(guide);
        assert!(!sidebar.is_expanded(guide));
    }

    #[test]
    fn fold_defaults_follow_the_configured_level() {
        let toc = parse_summary(SUMMARY);
        let guide = link_by_target(&toc, "guide.md");
        let advanced = link_by_target(&toc, "guide/advanced.md");

        // Level 1: top-level parents open, nested ones closed.
        let mut sidebar = SidebarState::new(true, 1);
        sidebar.reset_expansion(&toc);
        assert!(sidebar.is_expanded(guide));
        assert!(!sidebar.is_expanded(advanced));

        // Folding disabled: every parent open.
        let mut sidebar = SidebarState::new(false, 0);
        sidebar.reset_expansion(&toc);
        assert!(sidebar.is_expanded(guide));
        assert!(sidebar.is_expanded(advanced));
    }

    #[test]
    fn book_reload_discards_ids_from_the_old_tree() {
        let toc = parse_summary(SUMMARY);
        let mut sidebar = SidebarState::new(false, 0);
        let mut session = SessionState::new();
        sidebar.attach(&toc, "guide/advanced/tuning.md", &mut session);
        assert!(sidebar.active.is_some());

        // An edit shrank the summary; ids remembered from the old tree
        // are out of range for the new one.
        let reloaded = parse_summary("- [Only](only.md)\n  - [Sub](only/sub.md)\n");
        sidebar.reset(&reloaded);

        assert_eq!(sidebar.active, None);
        assert!(!sidebar.expanded.is_empty());
        assert!(sidebar
            .expanded
            .iter()
            .all(|&id| id < reloaded.node_count()));

        // The next attach works entirely in the new tree.
        sidebar.attach(&reloaded, "only.md", &mut session);
        assert_eq!(sidebar.active, Some(reloaded.links()[0]));
    }

    #[test]
    fn filter_keeps_hits_with_their_ancestors() {
        let toc = parse_summary(SUMMARY);
        let mut sidebar = folded_sidebar();

        assert_eq!(sidebar.filter_matches(&toc), None);

        sidebar.filter = "tun".to_string();
        let visible = sidebar.filter_matches(&toc).unwrap();
        let expect: HashSet<NodeId> = [
            link_by_target(&toc, "guide/advanced/tuning.md"),
            link_by_target(&toc, "guide/advanced.md"),
            link_by_target(&toc, "guide.md"),
        ]
        .into_iter()
        .collect();
        assert_eq!(visible, expect);

        sidebar.filter = "TUNING".to_string();
        assert_eq!(sidebar.filter_matches(&toc).unwrap(), expect);
    }

    #[test]
    fn normalize_strips_fragments_and_defaults_to_index() {
        assert_eq!(normalize_location("guide.md"), "guide.md");
        assert_eq!(normalize_location("guide.md#install"), "guide.md");
        assert_eq!(normalize_location(""), "index.md");
        assert_eq!(normalize_location("#section"), "index.md");
        assert_eq!(normalize_location("guide/"), "guide/index.md");
    }
}
