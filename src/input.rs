// Input handling for Shiori
// Keyboard input processing

use crate::app::Shiori;
use crate::state::AppMode;
use eframe::egui;

impl Shiori {
    pub fn handle_input(&mut self, ctx: &egui::Context) {
        // 1. Filter input
        if self.mode.mode == AppMode::Filtering {
            if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
                // Keep the filter, give the keys back to the page
                self.mode.set_mode(AppMode::Normal);
            }
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                self.sidebar.filter.clear();
                self.mode.set_mode(AppMode::Normal);
            }
            return;
        }

        // 2. Help modal
        if self.mode.mode == AppMode::Help {
            if ctx.input(|i| {
                i.key_pressed(egui::Key::Escape)
                    || i.key_pressed(egui::Key::Q)
                    || i.key_pressed(egui::Key::Questionmark)
            }) {
                self.mode.set_mode(AppMode::Normal);
            }
            return;
        }

        // 3. History keys
        if ctx.input(|i| i.modifiers.alt && i.key_pressed(egui::Key::ArrowLeft)) {
            self.navigate_back();
            return;
        }
        if ctx.input(|i| i.modifiers.alt && i.key_pressed(egui::Key::ArrowRight)) {
            self.navigate_forward();
            return;
        }

        // 4. Chapter navigation
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowLeft)) {
            self.previous_chapter();
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::ArrowRight)) {
            self.next_chapter();
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Home)) {
            self.first_chapter();
            return;
        }

        // 5. Normal mode triggers
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.sidebar.filter.clear();
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Slash)) {
            self.ui.show_sidebar = true;
            self.sidebar.filter.clear();
            self.mode.set_mode(AppMode::Filtering);
            self.mode.set_filter_focus(true);
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::T)) {
            self.ui.show_sidebar = !self.ui.show_sidebar;
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::R)) {
            self.reload_page();
            return;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Questionmark)) {
            self.mode.set_mode(AppMode::Help);
        }
    }
}
