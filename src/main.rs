// Shiori - a desktop reader for mdBook-style books

mod app;
mod config;
mod input;
mod io;
mod state;
mod style;
mod toc;
mod view;

use app::Shiori;
use config::Config;
use eframe::egui;
use std::env;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::init();

    if let Err(e) = Config::create_default() {
        eprintln!("Failed to create default config: {}", e);
    }
    let config = Config::load();

    // Book root: first argument, or the working directory.
    let book_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_title("Shiori"),
        ..Default::default()
    };

    eframe::run_native(
        "Shiori",
        options,
        Box::new(move |cc| Ok(Box::new(Shiori::new(cc, config, book_path)))),
    )
}
