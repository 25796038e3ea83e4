use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use super::book::{load_book, read_page, Book, PageData};

pub enum IoCommand {
    LoadBook(PathBuf),
    LoadPage {
        source_dir: PathBuf,
        location: String,
    },
}

pub enum IoResult {
    BookLoaded(Book),
    PageLoaded(PageData),
    /// A file under the book root changed on disk.
    BookChanged(PathBuf),
    Error(String),
}

pub fn spawn_worker(ctx: eframe::egui::Context) -> (Sender<IoCommand>, Receiver<IoResult>) {
    let (cmd_tx, cmd_rx) = channel();
    let (res_tx, res_rx) = channel();

    let ctx_clone = ctx.clone();
    thread::spawn(move || {
        // Kept alive here; replaced whenever a new book loads.
        let mut watcher: Option<RecommendedWatcher> = None;

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                IoCommand::LoadBook(root) => match load_book(&root) {
                    Ok(book) => {
                        log::debug!(
                            "loaded book '{}' ({} chapters)",
                            book.title,
                            book.toc.chapter_count()
                        );
                        watcher = spawn_watcher(&book.root, res_tx.clone(), ctx_clone.clone());
                        let _ = res_tx.send(IoResult::BookLoaded(book));
                    }
                    Err(e) => {
                        let _ = res_tx.send(IoResult::Error(format!(
                            "Failed to open book {}: {}",
                            root.display(),
                            e
                        )));
                    }
                },
                IoCommand::LoadPage {
                    source_dir,
                    location,
                } => match read_page(&source_dir, &location) {
                    Ok(page) => {
                        let _ = res_tx.send(IoResult::PageLoaded(page));
                    }
                    Err(e) => {
                        let _ = res_tx.send(IoResult::Error(format!(
                            "Failed to load {}: {}",
                            location, e
                        )));
                    }
                },
            }
            ctx_clone.request_repaint();
        }

        drop(watcher);
    });

    (cmd_tx, res_rx)
}

fn spawn_watcher(
    dir: &std::path::Path,
    tx: Sender<IoResult>,
    ctx: eframe::egui::Context,
) -> Option<RecommendedWatcher> {
    let result = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) => {
            // Access events include our own page reads.
            if matches!(
                event.kind,
                EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
            ) {
                for path in event.paths {
                    let _ = tx.send(IoResult::BookChanged(path));
                }
                ctx.request_repaint();
            }
        }
        Err(e) => log::warn!("watch error: {}", e),
    });

    match result {
        Ok(mut watcher) => match watcher.watch(dir, RecursiveMode::Recursive) {
            Ok(()) => Some(watcher),
            Err(e) => {
                log::warn!("failed to watch {}: {}", dir.display(), e);
                None
            }
        },
        Err(e) => {
            log::warn!("failed to create watcher: {}", e);
            None
        }
    }
}
