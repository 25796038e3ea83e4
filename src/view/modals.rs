// Modal rendering for Shiori

use crate::app::Shiori;
use crate::state::AppMode;
use crate::style;
use eframe::egui;

impl Shiori {
    pub(crate) fn render_help_modal(&mut self, ctx: &egui::Context) {
        if self.mode.mode == AppMode::Help {
            egui::Window::new("Help")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .default_width(style::modal_width(ctx))
                .show(ctx, |ui| {
                    ui.set_max_height(style::modal_max_height(ctx));
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        ui.heading("Key Bindings");
                        ui.separator();
                        egui::Grid::new("help_grid").striped(true).show(ui, |ui| {
                            ui.label("Left / Right Arrow");
                            ui.label("Previous / Next Chapter");
                            ui.end_row();
                            ui.label("Alt + Arrows");
                            ui.label("History Back / Forward");
                            ui.end_row();
                            ui.label("Home");
                            ui.label("First Chapter");
                            ui.end_row();
                            ui.label("t");
                            ui.label("Toggle Sidebar");
                            ui.end_row();
                            ui.label("/");
                            ui.label("Filter Table of Contents");
                            ui.end_row();
                            ui.label("Enter");
                            ui.label("Accept Filter");
                            ui.end_row();
                            ui.label("Esc");
                            ui.label("Clear Filter / Close Dialogs");
                            ui.end_row();
                            ui.label("r");
                            ui.label("Reload Current Page");
                            ui.end_row();
                            ui.label("?");
                            ui.label("Toggle Help");
                            ui.end_row();
                        });
                        ui.add_space(10.0);
                        if ui.button("Close").clicked() {
                            self.mode.set_mode(AppMode::Normal);
                        }
                    });
                });
        }
    }
}
