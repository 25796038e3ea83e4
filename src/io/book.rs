use serde::Deserialize;
use std::fs;
use std::io::{Error, ErrorKind};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

use crate::style::MAX_PAGE_SIZE;
use crate::toc::{parse_summary, Toc};

/// A loaded book: manifest metadata plus the parsed table of contents.
#[derive(Debug)]
pub struct Book {
    pub root: PathBuf,
    pub source_dir: PathBuf,
    pub title: String,
    pub toc: Toc,
}

impl Book {
    /// True for the files that define the book's structure, whose edits
    /// invalidate the whole table of contents. Matches the exact paths;
    /// files with the same name elsewhere in the tree are ordinary
    /// content.
    pub fn is_structural_file(&self, path: &Path) -> bool {
        path == self.source_dir.join("SUMMARY.md") || path == self.root.join("book.toml")
    }
}

#[derive(Debug)]
pub struct PageData {
    /// Root-relative location this page was loaded for, fragment-free.
    pub location: String,
    pub content: PageContent,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

#[derive(Debug)]
pub enum PageContent {
    Markdown(String),
    /// Refused to read the body; the view shows a size notice instead.
    TooLarge(u64),
}

#[derive(Deserialize, Default)]
struct Manifest {
    #[serde(default)]
    book: ManifestBook,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ManifestBook {
    title: Option<String>,
    src: Option<String>,
}

/// Reads `book.toml` and `SUMMARY.md` under `root`. A missing manifest
/// is fine (mdBook defaults apply); a missing summary is not a book.
pub fn load_book(root: &Path) -> Result<Book, Error> {
    let manifest_path = root.join("book.toml");
    let manifest = if manifest_path.exists() {
        parse_manifest(&fs::read_to_string(&manifest_path)?)
            .map_err(|e| Error::new(ErrorKind::InvalidData, format!("book.toml: {}", e)))?
    } else {
        Manifest::default()
    };

    let source_dir = root.join(manifest.book.src.as_deref().unwrap_or("src"));
    let summary = fs::read_to_string(source_dir.join("SUMMARY.md"))?;
    let toc = parse_summary(&summary);

    let title = manifest
        .book
        .title
        .filter(|t| !t.is_empty())
        .or_else(|| {
            root.file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "Untitled book".to_string());

    Ok(Book {
        root: root.to_path_buf(),
        source_dir,
        title,
        toc,
    })
}

fn parse_manifest(text: &str) -> Result<Manifest, toml::de::Error> {
    toml::from_str(text)
}

/// Maps a root-relative location onto a file below the source directory.
/// Absolute locations and anything stepping outside (`..`) are rejected.
pub fn resolve_page_path(source_dir: &Path, location: &str) -> Option<PathBuf> {
    let relative = Path::new(location);
    if relative.is_absolute() {
        return None;
    }
    let mut clean = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(source_dir.join(clean))
    }
}

/// Loads one page body. Oversized files are reported, not read.
pub fn read_page(source_dir: &Path, location: &str) -> Result<PageData, Error> {
    let path = resolve_page_path(source_dir, location).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("invalid page location: {}", location),
        )
    })?;

    let metadata = fs::metadata(&path)?;
    let size = metadata.len();
    let modified = metadata.modified().ok();

    let content = if size > MAX_PAGE_SIZE {
        PageContent::TooLarge(size)
    } else {
        PageContent::Markdown(fs::read_to_string(&path)?)
    };

    Ok(PageData {
        location: location.to_string(),
        content,
        size,
        modified,
    })
}
