// Top bar and status bar for Shiori

use crate::app::Shiori;
use crate::state::AppMode;
use crate::style;
use bytesize::ByteSize;
use chrono::{DateTime, Local};
use eframe::egui;

impl Shiori {
    pub(crate) fn render_top_bar(&mut self, ctx: &egui::Context) {
        let title = self
            .book
            .as_ref()
            .map(|book| book.title.clone())
            .unwrap_or_else(|| "Shiori".to_string());
        let position = self.chapter_position();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui
                    .button("☰")
                    .on_hover_text("Toggle sidebar (t)")
                    .clicked()
                {
                    self.ui.show_sidebar = !self.ui.show_sidebar;
                }
                ui.separator();

                let can_back = self.navigation.history_index > 0;
                if ui
                    .add_enabled(can_back, egui::Button::new("⬅"))
                    .on_hover_text("Back (Alt+←)")
                    .clicked()
                {
                    self.navigate_back();
                }
                let can_forward = self.navigation.history_index + 1
                    < self.navigation.history.len();
                if ui
                    .add_enabled(can_forward, egui::Button::new("➡"))
                    .on_hover_text("Forward (Alt+→)")
                    .clicked()
                {
                    self.navigate_forward();
                }
                ui.separator();

                let has_prev = matches!(position, Some((index, _)) if index > 0);
                if ui
                    .add_enabled(has_prev, egui::Button::new("◀"))
                    .on_hover_text("Previous chapter (←)")
                    .clicked()
                {
                    self.previous_chapter();
                }
                let has_next =
                    matches!(position, Some((index, total)) if index + 1 < total);
                if ui
                    .add_enabled(has_next, egui::Button::new("▶"))
                    .on_hover_text("Next chapter (→)")
                    .clicked()
                {
                    self.next_chapter();
                }
                ui.separator();

                ui.with_layout(
                    egui::Layout::right_to_left(egui::Align::Center),
                    |ui| {
                        if ui.button("?").on_hover_text("Help (?)").clicked() {
                            self.mode.set_mode(AppMode::Help);
                        }
                        let theme_icon = match self.ui.theme {
                            style::Theme::Dark => "☀",
                            style::Theme::Light => "🌙",
                        };
                        if ui
                            .button(theme_icon)
                            .on_hover_text("Switch theme")
                            .clicked()
                        {
                            self.toggle_theme();
                        }
                        if ui
                            .button("⟳")
                            .on_hover_text("Reload (r)")
                            .clicked()
                        {
                            self.reload_page();
                        }
                        ui.separator();

                        ui.with_layout(
                            egui::Layout::left_to_right(egui::Align::Center),
                            |ui| {
                                style::truncated_label(
                                    ui,
                                    egui::RichText::new(title).strong(),
                                );
                            },
                        );
                    },
                );
            });
            ui.add_space(4.0);
        });
    }

    pub(crate) fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.add_space(2.0);
            ui.horizontal(|ui| {
                let mode_text = match self.mode.mode {
                    AppMode::Normal => "NORMAL",
                    AppMode::Filtering => "FILTER",
                    AppMode::Help => "HELP",
                };
                ui.label(egui::RichText::new(mode_text).monospace().weak());
                ui.separator();

                if let Some((index, total)) = self.chapter_position() {
                    ui.label(format!("Chapter {}/{}", index + 1, total));
                    ui.separator();
                }
                if let (Some(book), Some(active)) = (&self.book, self.sidebar.active) {
                    style::truncated_label(
                        ui,
                        egui::RichText::new(book.toc.title(active)).weak(),
                    );
                    ui.separator();
                }

                if let Some(page) = &self.page {
                    ui.label(ByteSize(page.size).to_string());
                    if let Some(modified) = page.modified {
                        let datetime: DateTime<Local> = modified.into();
                        ui.separator();
                        ui.label(
                            datetime.format("%Y-%m-%d %H:%M").to_string(),
                        );
                    }
                }

                if !self.sidebar.filter.is_empty() {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!(
                            "filter: {}",
                            self.sidebar.filter
                        ))
                        .weak(),
                    );
                }

                ui.with_layout(
                    egui::Layout::right_to_left(egui::Align::Center),
                    |ui| {
                        if let Some((message, _)) = &self.ui.error_message {
                            ui.colored_label(egui::Color32::LIGHT_RED, message);
                        } else if let Some((message, _)) = &self.ui.info_message
                        {
                            ui.colored_label(
                                egui::Color32::LIGHT_GREEN,
                                message,
                            );
                        }
                    },
                );
            });
            ui.add_space(2.0);
        });
    }
}
