// IO layer: book loading and the worker thread

mod book;
mod worker;

pub use book::{resolve_page_path, Book, PageContent, PageData};
pub use worker::{spawn_worker, IoCommand, IoResult};
