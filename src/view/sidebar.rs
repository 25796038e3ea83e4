// Sidebar rendering for Shiori
// Table-of-contents tree with active-page highlight and fold toggles

use crate::app::Shiori;
use crate::state::{AppMode, ScrollRequest, SessionState, SidebarState};
use crate::style;
use crate::toc::{NodeId, Toc, TocItem};
use eframe::egui;
use std::cell::RefCell;
use std::collections::HashSet;

impl Shiori {
    pub(crate) fn render_sidebar(
        &mut self,
        ui: &mut egui::Ui,
        next_navigation: &RefCell<Option<String>>,
    ) {
        ui.add_space(4.0);
        ui.vertical_centered(|ui| {
            ui.heading("Contents");
        });
        ui.separator();

        if self.mode.mode == AppMode::Filtering {
            let response = ui.text_edit_singleline(&mut self.sidebar.filter);
            if self.mode.focus_filter {
                response.request_focus();
                self.mode.set_filter_focus(false);
            }
            ui.separator();
        }

        let book = match &self.book {
            Some(book) => book,
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label("No book loaded");
                });
                return;
            }
        };
        let toc = &book.toc;
        if toc.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label("Empty table of contents");
            });
            return;
        }

        let visible = self.sidebar.filter_matches(toc);
        let show_drafts = self.ui.show_drafts;

        // The pending request decides this frame's viewport: a remembered
        // offset is applied directly, centering rides on the active row.
        let request = self.sidebar.take_scroll_request();
        let center_active = request == Some(ScrollRequest::CenterActive);

        let mut scroll = egui::ScrollArea::vertical()
            .id_salt("sidebar_scroll")
            .auto_shrink([false, false])
            .max_height(ui.available_height());
        if let Some(ScrollRequest::Restore(offset)) = request {
            scroll = scroll.vertical_scroll_offset(offset);
        }

        let output = scroll.show(ui, |ui| {
            ui.set_max_width(ui.available_width());
            for &root in toc.roots() {
                render_node(
                    ui,
                    toc,
                    root,
                    &mut self.sidebar,
                    &mut self.session,
                    show_drafts,
                    center_active,
                    visible.as_ref(),
                    next_navigation,
                );
            }
        });

        // Remembered before any click lands next frame.
        self.sidebar.scroll_offset = output.state.offset.y;
    }
}

fn render_node(
    ui: &mut egui::Ui,
    toc: &Toc,
    id: NodeId,
    sidebar: &mut SidebarState,
    session: &mut SessionState,
    show_drafts: bool,
    center_active: bool,
    visible: Option<&HashSet<NodeId>>,
    next_navigation: &RefCell<Option<String>>,
) {
    if let Some(set) = visible {
        if !set.contains(&id) {
            return;
        }
    }

    let node = toc.node(id);
    let hidden = row_hidden(&node.item, show_drafts);
    match &node.item {
        TocItem::Spacer => {
            ui.separator();
        }
        TocItem::Part(title) => {
            ui.add_space(6.0);
            style::truncated_label(
                ui,
                egui::RichText::new(title).strong().size(13.0),
            );
            ui.add_space(2.0);
        }
        // A suppressed draft stays transparent: no row, but the children
        // are real chapters and render in its place.
        TocItem::Chapter { title, target, number } if !hidden => {
            let accent = egui::Color32::from_rgb(120, 180, 255);
            let has_children = !node.children.is_empty();
            let is_active = sidebar.is_active(id);

            ui.horizontal(|ui| {
                ui.set_min_height(style::ROW_HEIGHT);
                ui.add_space(node.depth as f32 * style::INDENT_PER_LEVEL);

                // Toggle control; hidden while the filter decides visibility.
                if has_children && visible.is_none() {
                    let glyph = if sidebar.is_expanded(id) { "⏷" } else { "⏵" };
                    let toggle = ui.add_sized(
                        [style::TOGGLE_COL_WIDTH, style::ROW_HEIGHT],
                        egui::Button::new(glyph).frame(false),
                    );
                    if toggle.clicked() {
                        sidebar.toggle(id);
                    }
                } else {
                    ui.add_space(style::TOGGLE_COL_WIDTH);
                }

                let label = match number {
                    Some(number) => format!("{} {}", number, title),
                    None => title.clone(),
                };

                match target {
                    Some(_) => {
                        let mut text = egui::RichText::new(label);
                        if is_active {
                            text = text.color(accent).strong();
                        }
                        let response = style::truncated_label_with_sense(
                            ui,
                            text,
                            egui::Sense::click(),
                        );
                        if is_active && center_active {
                            response.scroll_to_me(Some(egui::Align::Center));
                        }
                        if response.clicked() {
                            // Write scroll memory before navigation proceeds.
                            session.remember_sidebar_scroll(sidebar.scroll_offset);
                            if let Some(target) = sidebar.resolved_target(toc, id) {
                                *next_navigation.borrow_mut() = Some(target);
                            }
                        }
                    }
                    None => {
                        // Draft chapter: listed but not navigable.
                        style::truncated_label(
                            ui,
                            egui::RichText::new(label).weak().italics(),
                        );
                    }
                }
            });
        }
        TocItem::Chapter { .. } => {}
    }

    let expand_children = match visible {
        Some(_) => true,
        None => hidden || sidebar.is_expanded(id),
    };
    if expand_children {
        for &child in &toc.node(id).children {
            render_node(
                ui,
                toc,
                child,
                sidebar,
                session,
                show_drafts,
                center_active,
                visible,
                next_navigation,
            );
        }
    }
}

/// Whether a chapter's own row is suppressed. Only drafts can be
/// hidden, and hiding one never takes its subtree with it.
fn row_hidden(item: &TocItem, show_drafts: bool) -> bool {
    matches!(item, TocItem::Chapter { target: None, .. }) && !show_drafts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::parse_summary;

    #[test]
    fn hidden_drafts_stay_transparent_to_their_children() {
        let toc = parse_summary(
            "- [Draft]()\n  - [Real](real.md)\n- [Visible](visible.md)\n",
        );
        let draft = toc.roots()[0];
        let child = toc.node(draft).children[0];

        // The draft row disappears when drafts are off and comes back
        // when they are on.
        assert!(row_hidden(&toc.node(draft).item, false));
        assert!(!row_hidden(&toc.node(draft).item, true));

        // Its child is a linked chapter and renders either way.
        assert!(!row_hidden(&toc.node(child).item, false));
        assert_eq!(toc.target(child), Some("real.md"));

        // Linked chapters are never suppressed.
        assert!(!row_hidden(&toc.node(toc.roots()[1]).item, false));
    }
}
