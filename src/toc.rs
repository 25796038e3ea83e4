// Table-of-contents tree for a book
//
// The TOC is built once when a book loads and is immutable afterwards.
// Nodes live in a flat arena so that walking ancestor chains is cheap;
// `links` keeps the document-order list of navigable chapters, which is
// what active-page matching and prev/next navigation iterate over.

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

pub type NodeId = usize;

#[derive(Clone, Debug, PartialEq)]
pub enum TocItem {
    /// A chapter row. Draft chapters have no target and render unlinked.
    Chapter {
        title: String,
        target: Option<String>,
        number: Option<String>,
    },
    /// An unnumbered part heading between chapter groups.
    Part(String),
    /// A visual separator row.
    Spacer,
}

#[derive(Clone, Debug)]
pub struct TocNode {
    pub item: TocItem,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub depth: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Toc {
    nodes: Vec<TocNode>,
    roots: Vec<NodeId>,
    links: Vec<NodeId>,
}

impl Toc {
    pub fn node(&self, id: NodeId) -> &TocNode {
        &self.nodes[id]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Navigable chapters in document order. "The first link" is index 0.
    pub fn links(&self) -> &[NodeId] {
        &self.links
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total node count; arena ids are `0..node_count()`.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn chapter_count(&self) -> usize {
        self.links.len()
    }

    pub fn title(&self, id: NodeId) -> &str {
        match &self.nodes[id].item {
            TocItem::Chapter { title, .. } => title,
            TocItem::Part(title) => title,
            TocItem::Spacer => "",
        }
    }

    pub fn target(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].item {
            TocItem::Chapter { target, .. } => target.as_deref(),
            _ => None,
        }
    }

    /// Walks the parent chain from `id` towards the roots, excluding `id`.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            toc: self,
            next: self.nodes[id].parent,
        }
    }

    fn push(&mut self, item: TocItem, parent: Option<NodeId>) -> NodeId {
        let depth = parent.map(|p| self.nodes[p].depth + 1).unwrap_or(0);
        let id = self.nodes.len();
        self.nodes.push(TocNode {
            item,
            parent,
            children: Vec::new(),
            depth,
        });
        match parent {
            Some(p) => self.nodes[p].children.push(id),
            None => self.roots.push(id),
        }
        if matches!(
            &self.nodes[id].item,
            TocItem::Chapter { target: Some(_), .. }
        ) {
            self.links.push(id);
        }
        id
    }
}

pub struct Ancestors<'a> {
    toc: &'a Toc,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.toc.node(id).parent;
        Some(id)
    }
}

/// Parses a SUMMARY.md into a [`Toc`].
///
/// Recognized structure, in the order mdBook-style summaries use it:
/// prefix chapters (bare links before the first list), numbered chapters
/// (nested bullet lists, dotted numbers assigned by position), draft
/// chapters (links with an empty target), part titles (headings between
/// lists) and separators (rules). Anything else is ignored.
pub fn parse_summary(text: &str) -> Toc {
    let mut toc = Toc::default();

    // Stack of enclosing chapter ids, one per open list item chain.
    let mut parents: Vec<NodeId> = Vec::new();
    // One counter per open list level; the top-level counter survives
    // across sibling lists so numbering continues after a part title.
    let mut counters: Vec<u64> = Vec::new();
    let mut top_count: u64 = 0;
    let mut list_depth = 0usize;

    let mut in_item = false;
    let mut in_link = false;
    let mut pending_title = String::new();
    let mut pending_target: Option<String> = None;
    let mut item_done = false;

    // Heading text accumulates into a part title; the document title
    // heading ("# Summary") is conventional noise and is skipped.
    let mut heading: Option<String> = None;
    let mut seen_content = false;

    for event in Parser::new(text) {
        match event {
            Event::Start(Tag::List(_)) => {
                if list_depth == 0 {
                    counters.push(top_count);
                } else {
                    counters.push(0);
                }
                list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                list_depth -= 1;
                let finished = counters.pop().unwrap_or(0);
                if list_depth == 0 {
                    top_count = finished;
                }
            }
            Event::Start(Tag::Item) => {
                in_item = true;
                item_done = false;
                pending_title.clear();
                pending_target = None;
                if let Some(c) = counters.last_mut() {
                    *c += 1;
                }
            }
            Event::End(TagEnd::Item) => {
                // Enclosing items contributed one parent per list level.
                parents.truncate(list_depth.saturating_sub(1));
                in_item = false;
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                in_link = true;
                pending_title.clear();
                let dest = dest_url.into_string();
                pending_target = if dest.is_empty() { None } else { Some(dest) };
            }
            Event::End(TagEnd::Link) => {
                in_link = false;
                seen_content = true;
                let title = pending_title.trim().to_string();
                let target = pending_target.take();
                if in_item && !item_done {
                    let number = Some(format_number(&counters));
                    let parent = parents.last().copied();
                    let id = toc.push(
                        TocItem::Chapter {
                            title,
                            target,
                            number,
                        },
                        parent,
                    );
                    parents.push(id);
                    item_done = true;
                } else if !in_item {
                    // Prefix or suffix chapter: unnumbered, always a root.
                    toc.push(
                        TocItem::Chapter {
                            title,
                            target,
                            number: None,
                        },
                        None,
                    );
                }
            }
            Event::Start(Tag::Heading { level, .. }) => {
                // The conventional "# Summary" document title is not a part.
                if level == HeadingLevel::H1 && !seen_content {
                    seen_content = true;
                } else {
                    heading = Some(String::new());
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(title) = heading.take() {
                    let title = title.trim().to_string();
                    if !title.is_empty() {
                        toc.push(TocItem::Part(title), None);
                    }
                }
            }
            Event::Rule => {
                if list_depth == 0 {
                    toc.push(TocItem::Spacer, None);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(h) = heading.as_mut() {
                    h.push_str(&text);
                } else if in_link {
                    pending_title.push_str(&text);
                } else if in_item && !item_done {
                    // Bare text items become drafts, like empty links.
                    let title = text.trim().to_string();
                    if !title.is_empty() {
                        let number = Some(format_number(&counters));
                        let parent = parents.last().copied();
                        let id = toc.push(
                            TocItem::Chapter {
                                title,
                                target: None,
                                number,
                            },
                            parent,
                        );
                        parents.push(id);
                        item_done = true;
                        seen_content = true;
                    }
                }
            }
            _ => {}
        }
    }

    toc
}

fn format_number(counters: &[u64]) -> String {
    let mut out = String::new();
    for c in counters {
        out.push_str(&c.to_string());
        out.push('.');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY: &str = "\
# Summary

[Introduction](index.md)

---

- [Quick Primer](primer.md)
- [Actor Systems](actor_systems.md)
  - [What is an Actor System?](actor_systems/what_is.md)
  - [Why Actors?](actor_systems/why.md)
- [Dead Letters]()

# Reference

- [Design Patterns](design_patterns.md)
  - [Resilience](design_patterns/resilience.md)

[Contributors](misc/contributors.md)
";

    fn chapter<'a>(toc: &'a Toc, id: NodeId) -> (&'a str, Option<&'a str>, Option<&'a str>) {
        match &toc.node(id).item {
            TocItem::Chapter {
                title,
                target,
                number,
            } => (title.as_str(), target.as_deref(), number.as_deref()),
            other => panic!("expected chapter, got {:?}", other),
        }
    }

    #[test]
    fn parses_prefix_numbered_and_suffix_chapters() {
        let toc = parse_summary(SUMMARY);

        let roots = toc.roots();
        // Introduction, spacer, three numbered chapters, part title,
        // one more numbered chapter, suffix chapter.
        assert_eq!(roots.len(), 8);

        let (title, target, number) = chapter(&toc, roots[0]);
        assert_eq!(title, "Introduction");
        assert_eq!(target, Some("index.md"));
        assert_eq!(number, None);

        assert_eq!(toc.node(roots[1]).item, TocItem::Spacer);

        let (title, _, number) = chapter(&toc, roots[2]);
        assert_eq!(title, "Quick Primer");
        assert_eq!(number, Some("1."));

        assert_eq!(toc.node(roots[5]).item, TocItem::Part("Reference".into()));

        let (title, target, number) = chapter(&toc, roots[7]);
        assert_eq!(title, "Contributors");
        assert_eq!(target, Some("misc/contributors.md"));
        assert_eq!(number, None);
    }

    #[test]
    fn nested_chapters_get_dotted_numbers() {
        let toc = parse_summary(SUMMARY);
        let actors = toc.roots()[3];
        let (_, _, number) = chapter(&toc, actors);
        assert_eq!(number, Some("2."));

        let children = &toc.node(actors).children;
        assert_eq!(children.len(), 2);
        let (title, target, number) = chapter(&toc, children[0]);
        assert_eq!(title, "What is an Actor System?");
        assert_eq!(target, Some("actor_systems/what_is.md"));
        assert_eq!(number, Some("2.1."));
        let (_, _, number) = chapter(&toc, children[1]);
        assert_eq!(number, Some("2.2."));
        assert_eq!(toc.node(children[1]).depth, 1);
    }

    #[test]
    fn drafts_are_numbered_but_not_links() {
        let toc = parse_summary(SUMMARY);
        let draft = toc.roots()[4];
        let (title, target, number) = chapter(&toc, draft);
        assert_eq!(title, "Dead Letters");
        assert_eq!(target, None);
        assert_eq!(number, Some("3."));
        assert!(!toc.links().contains(&draft));
    }

    #[test]
    fn numbering_continues_across_part_titles() {
        let toc = parse_summary(SUMMARY);
        let after_part = toc
            .roots()
            .iter()
            .copied()
            .find(|&id| toc.title(id) == "Design Patterns")
            .unwrap();
        let (_, _, number) = chapter(&toc, after_part);
        assert_eq!(number, Some("4."));
        let child = toc.node(after_part).children[0];
        let (_, _, number) = chapter(&toc, child);
        assert_eq!(number, Some("4.1."));
    }

    #[test]
    fn links_follow_document_order() {
        let toc = parse_summary(SUMMARY);
        let targets: Vec<&str> = toc
            .links()
            .iter()
            .map(|&id| toc.target(id).unwrap())
            .collect();
        assert_eq!(
            targets,
            vec![
                "index.md",
                "primer.md",
                "actor_systems.md",
                "actor_systems/what_is.md",
                "actor_systems/why.md",
                "design_patterns.md",
                "design_patterns/resilience.md",
                "misc/contributors.md",
            ]
        );
    }

    #[test]
    fn ancestors_walk_to_the_root() {
        let toc = parse_summary(SUMMARY);
        let why = toc
            .links()
            .iter()
            .copied()
            .find(|&id| toc.target(id) == Some("actor_systems/why.md"))
            .unwrap();
        let chain: Vec<NodeId> = toc.ancestors(why).collect();
        assert_eq!(chain.len(), 1);
        assert_eq!(toc.title(chain[0]), "Actor Systems");
    }

    #[test]
    fn empty_summary_yields_empty_toc() {
        let toc = parse_summary("");
        assert!(toc.is_empty());
        assert_eq!(toc.chapter_count(), 0);
    }
}
