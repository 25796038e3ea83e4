// Application state and the per-frame update loop

use crate::config::Config;
use crate::io::{self, Book, IoCommand, IoResult, PageData};
use crate::state::sidebar::{normalize_location, INDEX_DOC};
use crate::state::{ModeState, NavigationState, SessionState, SidebarState, UIState};
use crate::style::{self, Theme};
use eframe::egui;
use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

pub struct Shiori {
    pub(crate) config: Config,

    // Loaded book
    pub(crate) book: Option<Book>,
    pub(crate) page: Option<PageData>,

    // Grouped state
    pub(crate) navigation: NavigationState,
    pub(crate) sidebar: SidebarState,
    pub(crate) session: SessionState,
    pub(crate) ui: UIState,
    pub(crate) mode: ModeState,

    // IO worker channels
    command_tx: Sender<IoCommand>,
    result_rx: Receiver<IoResult>,

    // Highlighting assets, loaded once
    pub(crate) syntax_set: SyntaxSet,
    pub(crate) theme_set: ThemeSet,
}

impl Shiori {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Config,
        book_path: PathBuf,
    ) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);
        let (command_tx, result_rx) = io::spawn_worker(cc.egui_ctx.clone());

        let theme = match config.theme.mode.as_str() {
            "light" => Theme::Light,
            _ => Theme::Dark,
        };
        let width = config.sidebar.width;
        let sidebar_width = if (style::SIDEBAR_MIN..=style::SIDEBAR_MAX).contains(&width)
        {
            width
        } else {
            style::SIDEBAR_DEFAULT
        };

        let mut app = Self {
            book: None,
            page: None,
            navigation: NavigationState::new(INDEX_DOC.to_string()),
            sidebar: SidebarState::new(
                config.sidebar.fold_enable,
                config.sidebar.fold_level,
            ),
            session: SessionState::new(),
            ui: UIState::new(theme, sidebar_width, config.ui.show_drafts),
            mode: ModeState::new(),
            command_tx,
            result_rx,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            config,
        };
        app.ui.is_loading = true;
        let _ = app.command_tx.send(IoCommand::LoadBook(book_path));
        app
    }

    /// Navigates to a location as written in a link: an optional page
    /// path plus an optional `#fragment`. Fragment-only targets scroll
    /// the current page without touching history.
    pub(crate) fn navigate_to(&mut self, target: String) {
        if let Some(fragment) = target.strip_prefix('#') {
            self.navigation.pending_fragment = Some(fragment.to_string());
            return;
        }
        let (page, fragment) = match target.split_once('#') {
            Some((page, fragment)) => (page.to_string(), Some(fragment.to_string())),
            None => (target, None),
        };
        let location = normalize_location(&page);
        self.navigation.pending_fragment = fragment;
        if location == self.navigation.current {
            return;
        }
        self.navigation.push_history(location.clone());
        self.request_page(location);
    }

    pub(crate) fn navigate_back(&mut self) {
        if let Some(location) = self.navigation.go_back() {
            self.request_page(location);
        }
    }

    pub(crate) fn navigate_forward(&mut self) {
        if let Some(location) = self.navigation.go_forward() {
            self.request_page(location);
        }
    }

    /// Index of the active chapter in reading order, with the total.
    pub(crate) fn chapter_position(&self) -> Option<(usize, usize)> {
        let book = self.book.as_ref()?;
        let links = book.toc.links();
        let active = self.sidebar.active?;
        let index = links.iter().position(|&id| id == active)?;
        Some((index, links.len()))
    }

    pub(crate) fn previous_chapter(&mut self) {
        let target = self.book.as_ref().and_then(|book| {
            let (index, _) = self.chapter_position()?;
            let &id = book.toc.links().get(index.checked_sub(1)?)?;
            self.sidebar.resolved_target(&book.toc, id)
        });
        if let Some(target) = target {
            self.navigate_to(target);
        }
    }

    pub(crate) fn next_chapter(&mut self) {
        let target = self.book.as_ref().and_then(|book| {
            let (index, _) = self.chapter_position()?;
            let &id = book.toc.links().get(index + 1)?;
            self.sidebar.resolved_target(&book.toc, id)
        });
        if let Some(target) = target {
            self.navigate_to(target);
        }
    }

    pub(crate) fn first_chapter(&mut self) {
        let target = self.book.as_ref().and_then(|book| {
            let &id = book.toc.links().first()?;
            self.sidebar.resolved_target(&book.toc, id)
        });
        if let Some(target) = target {
            self.navigate_to(target);
        }
    }

    pub(crate) fn reload_page(&mut self) {
        let location = self.navigation.current.clone();
        self.request_page(location);
        self.ui.set_info("Reloaded".to_string());
    }

    pub(crate) fn toggle_theme(&mut self) {
        self.ui.theme = match self.ui.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
    }

    fn request_page(&mut self, location: String) {
        let Some(book) = &self.book else {
            return;
        };
        self.ui.is_loading = true;
        let _ = self.command_tx.send(IoCommand::LoadPage {
            source_dir: book.source_dir.clone(),
            location,
        });
    }

    fn drain_results(&mut self, ctx: &egui::Context) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                IoResult::BookLoaded(book) => self.on_book_loaded(ctx, book),
                IoResult::PageLoaded(page) => {
                    if page.location != self.navigation.current {
                        // A newer request is already in flight.
                        continue;
                    }
                    self.ui.is_loading = false;
                    if let Some(book) = &self.book {
                        self.sidebar.attach(
                            &book.toc,
                            &self.navigation.current,
                            &mut self.session,
                        );
                    }
                    self.page = Some(page);
                }
                IoResult::BookChanged(path) => self.on_book_changed(path),
                IoResult::Error(message) => {
                    self.ui.is_loading = false;
                    self.ui.set_error(message);
                }
            }
        }
    }

    fn on_book_loaded(&mut self, ctx: &egui::Context, book: Book) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
            "{} - Shiori",
            book.title
        )));

        let first_visit = self.book.is_none();
        let start = if first_visit {
            book.toc
                .links()
                .first()
                .and_then(|&id| book.toc.target(id))
                .map(normalize_location)
                .unwrap_or_else(|| INDEX_DOC.to_string())
        } else {
            self.navigation.current.clone()
        };

        // The status bar and chapter arrows draw before the page result
        // lands; they must not see ids from the replaced tree.
        self.sidebar.reset(&book.toc);
        self.book = Some(book);
        if first_visit {
            self.navigation = NavigationState::new(start.clone());
        }
        self.request_page(start);
    }

    /// A file under the book root changed on disk. Structural files
    /// reload the whole book; the page on screen reloads itself;
    /// anything else waits until it is opened again.
    fn on_book_changed(&mut self, path: PathBuf) {
        let Some(book) = &self.book else {
            return;
        };
        if book.is_structural_file(&path) {
            let _ = self.command_tx.send(IoCommand::LoadBook(book.root.clone()));
            return;
        }
        if let Some(current) =
            io::resolve_page_path(&book.source_dir, &self.navigation.current)
        {
            if path == current {
                self.reload_page();
            }
        }
    }
}

impl eframe::App for Shiori {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);
        self.drain_results(ctx);
        self.ui.clear_expired_messages(style::MESSAGE_TIMEOUT_SECS);
        if self.ui.error_message.is_some() || self.ui.info_message.is_some() {
            ctx.request_repaint_after(Duration::from_secs(1));
        }

        match self.ui.theme {
            Theme::Dark => ctx.set_visuals(egui::Visuals::dark()),
            Theme::Light => ctx.set_visuals(egui::Visuals::light()),
        }

        // Clicks inside panel closures land after every panel has drawn.
        let next_navigation: RefCell<Option<String>> = RefCell::new(None);

        self.render_help_modal(ctx);
        self.render_top_bar(ctx);
        self.render_status_bar(ctx);

        if self.ui.show_sidebar {
            let panel = egui::SidePanel::left("sidebar")
                .resizable(true)
                .default_width(self.ui.sidebar_width)
                .width_range(style::SIDEBAR_MIN..=style::SIDEBAR_MAX);
            let response = panel.show(ctx, |ui| {
                self.render_sidebar(ui, &next_navigation);
            });
            self.ui.sidebar_width = response.response.rect.width();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_content(ui, &next_navigation);
        });

        if let Some(target) = next_navigation.into_inner() {
            self.navigate_to(target);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.config.theme.mode = match self.ui.theme {
            Theme::Dark => "dark".to_string(),
            Theme::Light => "light".to_string(),
        };
        self.config.sidebar.width = self.ui.sidebar_width;
        if let Err(e) = self.config.save() {
            log::warn!("Failed to save config: {}", e);
        }
    }
}
