// Content rendering for Shiori
// Walks pulldown-cmark events and lays the page out as egui widgets

use crate::app::Shiori;
use crate::io::{resolve_page_path, PageContent};
use crate::state::navigation;
use crate::style::{self, Theme};
use bytesize::ByteSize;
use eframe::egui;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::cell::RefCell;
use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

const CONTENT_MAX_WIDTH: f32 = 800.0;
const BLOCK_SPACING: f32 = 8.0;
const LIST_INDENT: f32 = 18.0;

impl Shiori {
    pub(crate) fn render_content(
        &mut self,
        ui: &mut egui::Ui,
        next_navigation: &RefCell<Option<String>>,
    ) {
        if self.ui.is_loading {
            ui.centered_and_justified(|ui| {
                ui.add(egui::Spinner::new().size(32.0));
            });
            return;
        }

        let page = match &self.page {
            Some(page) => page,
            None => {
                ui.centered_and_justified(|ui| {
                    ui.label("No page loaded");
                });
                return;
            }
        };

        match &page.content {
            PageContent::TooLarge(size) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.heading("Page Too Large");
                    ui.add_space(10.0);
                    ui.label(format!("Size: {}", ByteSize(*size)));
                    ui.label(format!("Limit: {}", ByteSize(style::MAX_PAGE_SIZE)));
                });
            }
            PageContent::Markdown(text) => {
                let book = match &self.book {
                    Some(book) => book,
                    None => return,
                };
                // Consumed whether or not a matching heading turns up.
                let wanted = self.navigation.pending_fragment.take();
                let mut renderer = MarkdownRenderer {
                    source_dir: &book.source_dir,
                    location: &self.navigation.current,
                    theme: self.ui.theme,
                    font_size: self.config.font.font_size,
                    code_font_size: self.config.font.code_font_size,
                    syntax_set: &self.syntax_set,
                    theme_set: &self.theme_set,
                    next_navigation,
                    wanted_fragment: wanted,
                    errors: Vec::new(),
                    state: WalkState::default(),
                };

                egui::ScrollArea::vertical()
                    .id_salt(("content_scroll", &page.location))
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.vertical_centered(|ui| {
                            let width = ui.available_width().min(CONTENT_MAX_WIDTH);
                            ui.set_max_width(width);
                            ui.with_layout(
                                egui::Layout::top_down(egui::Align::Min),
                                |ui| {
                                    ui.add_space(BLOCK_SPACING);
                                    renderer.render(ui, text);
                                    ui.add_space(BLOCK_SPACING);
                                },
                            );
                        });
                    });

                for message in renderer.errors {
                    self.ui.set_error(message);
                }
            }
        }
    }
}

/// One styled stretch of inline text, flushed as part of a wrapped line.
struct InlineRun {
    text: String,
    strong: bool,
    emphasis: bool,
    strikethrough: bool,
    code: bool,
    link: Option<String>,
}

/// Mutable position within the event stream: which inline styles are
/// open, what block we are inside, and the text gathered so far.
#[derive(Default)]
struct WalkState {
    runs: Vec<InlineRun>,
    strong: u32,
    emphasis: u32,
    strikethrough: u32,
    link: Option<String>,
    heading: Option<(HeadingLevel, Option<String>)>,
    heading_plain: String,
    code_block: Option<Option<String>>,
    code_buf: String,
    lists: Vec<Option<u64>>,
    quote_depth: u32,
    in_image: bool,
}

struct MarkdownRenderer<'a> {
    source_dir: &'a Path,
    location: &'a str,
    theme: Theme,
    font_size: f32,
    code_font_size: f32,
    syntax_set: &'a SyntaxSet,
    theme_set: &'a ThemeSet,
    next_navigation: &'a RefCell<Option<String>>,
    wanted_fragment: Option<String>,
    errors: Vec<String>,
    state: WalkState,
}

impl MarkdownRenderer<'_> {
    fn render(&mut self, ui: &mut egui::Ui, text: &str) {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_HEADING_ATTRIBUTES;

        for event in Parser::new_ext(text, options) {
            match event {
                Event::Start(tag) => self.start_tag(ui, tag),
                Event::End(tag) => self.end_tag(ui, tag),
                Event::Text(text) => {
                    if self.state.in_image {
                        // Alt text; the image itself was placed on Start.
                    } else if self.state.code_block.is_some() {
                        self.state.code_buf.push_str(&text);
                    } else {
                        if self.state.heading.is_some() {
                            self.state.heading_plain.push_str(&text);
                        }
                        self.push_run(text.to_string(), false);
                    }
                }
                Event::Code(code) => {
                    if self.state.heading.is_some() {
                        self.state.heading_plain.push_str(&code);
                    }
                    self.push_run(code.to_string(), true);
                }
                Event::SoftBreak => self.push_run(" ".to_string(), false),
                Event::HardBreak => self.flush_line(ui),
                Event::Rule => {
                    ui.add_space(BLOCK_SPACING);
                    ui.separator();
                    ui.add_space(BLOCK_SPACING);
                }
                Event::TaskListMarker(checked) => {
                    let marker = if checked { "☑ " } else { "☐ " };
                    self.push_run(marker.to_string(), false);
                }
                Event::FootnoteReference(name) => {
                    self.push_run(format!("[{}]", name), false);
                }
                _ => {}
            }
        }
        self.flush_line(ui);
    }

    fn start_tag(&mut self, ui: &mut egui::Ui, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, id, .. } => {
                self.state.heading = Some((level, id.map(|id| id.to_string())));
                self.state.heading_plain.clear();
                ui.add_space(BLOCK_SPACING);
            }
            Tag::CodeBlock(kind) => {
                self.flush_line(ui);
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => {
                        Some(lang.to_string())
                    }
                    _ => None,
                };
                self.state.code_block = Some(lang);
                self.state.code_buf.clear();
            }
            Tag::List(start) => {
                self.flush_line(ui);
                self.state.lists.push(start);
            }
            Tag::Item => {
                let marker = match self.state.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.push_run(marker, false);
            }
            Tag::BlockQuote(_) => {
                self.flush_line(ui);
                self.state.quote_depth += 1;
            }
            Tag::Emphasis => self.state.emphasis += 1,
            Tag::Strong => self.state.strong += 1,
            Tag::Strikethrough => self.state.strikethrough += 1,
            Tag::Link { dest_url, .. } => {
                self.state.link = Some(dest_url.to_string());
            }
            Tag::Image { dest_url, .. } => {
                self.state.in_image = true;
                self.flush_line(ui);
                self.place_image(ui, &dest_url);
            }
            Tag::FootnoteDefinition(name) => {
                self.flush_line(ui);
                self.push_run(format!("[{}]: ", name), false);
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, ui: &mut egui::Ui, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush_line(ui);
                ui.add_space(BLOCK_SPACING);
            }
            TagEnd::Heading(_) => {
                self.place_heading(ui);
                ui.add_space(BLOCK_SPACING);
            }
            TagEnd::CodeBlock => {
                let lang = self.state.code_block.take().flatten();
                self.place_code_block(ui, lang.as_deref());
                ui.add_space(BLOCK_SPACING);
            }
            TagEnd::List(_) => {
                self.state.lists.pop();
                if self.state.lists.is_empty() {
                    ui.add_space(BLOCK_SPACING);
                }
            }
            TagEnd::Item => self.flush_line(ui),
            TagEnd::BlockQuote(_) => {
                self.state.quote_depth = self.state.quote_depth.saturating_sub(1);
                ui.add_space(BLOCK_SPACING);
            }
            TagEnd::Emphasis => {
                self.state.emphasis = self.state.emphasis.saturating_sub(1)
            }
            TagEnd::Strong => self.state.strong = self.state.strong.saturating_sub(1),
            TagEnd::Strikethrough => {
                self.state.strikethrough = self.state.strikethrough.saturating_sub(1)
            }
            TagEnd::Link => self.state.link = None,
            TagEnd::Image => self.state.in_image = false,
            TagEnd::FootnoteDefinition => self.flush_line(ui),
            TagEnd::TableCell => self.push_run("  |  ".to_string(), false),
            TagEnd::TableHead | TagEnd::TableRow => self.flush_line(ui),
            TagEnd::Table => ui.add_space(BLOCK_SPACING),
            _ => {}
        }
    }

    fn push_run(&mut self, text: String, code: bool) {
        if text.is_empty() {
            return;
        }
        self.state.runs.push(InlineRun {
            text,
            strong: self.state.strong > 0,
            emphasis: self.state.emphasis > 0,
            strikethrough: self.state.strikethrough > 0,
            code,
            link: self.state.link.clone(),
        });
    }

    /// Lays out the accumulated inline runs as one wrapped line.
    fn flush_line(&mut self, ui: &mut egui::Ui) {
        if self.state.runs.is_empty() {
            return;
        }
        let runs = std::mem::take(&mut self.state.runs);
        let indent = {
            let lists = self.state.lists.len().saturating_sub(1) as f32;
            (lists + self.state.quote_depth as f32) * LIST_INDENT
        };
        let quoted = self.state.quote_depth > 0;
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            if indent > 0.0 {
                ui.add_space(indent);
            }
            for run in runs {
                self.place_run(ui, run, quoted);
            }
        });
    }

    fn place_run(&mut self, ui: &mut egui::Ui, run: InlineRun, quoted: bool) {
        let mut text = egui::RichText::new(&run.text).size(self.font_size);
        if run.code {
            text = egui::RichText::new(&run.text)
                .monospace()
                .size(self.code_font_size)
                .background_color(ui.visuals().extreme_bg_color);
        }
        if run.strong {
            text = text.strong();
        }
        if run.emphasis {
            text = text.italics();
        }
        if run.strikethrough {
            text = text.strikethrough();
        }
        if quoted {
            text = text.weak();
        }

        match run.link {
            Some(dest) => {
                let response = ui.link(text);
                if response.clicked() {
                    self.follow_link(&dest);
                }
                if !dest.starts_with('#') {
                    response.on_hover_text(&dest);
                }
            }
            None => {
                ui.label(text);
            }
        }
    }

    /// In-book links navigate, schemes open externally, fragments scroll.
    fn follow_link(&mut self, dest: &str) {
        if dest.starts_with('#') {
            *self.next_navigation.borrow_mut() = Some(dest.to_string());
        } else if has_scheme(dest) {
            if let Err(e) = open::that(dest) {
                self.errors.push(format!("Failed to open {}: {}", dest, e));
            }
        } else {
            let resolved = navigation::resolve_relative(self.location, dest);
            *self.next_navigation.borrow_mut() = Some(resolved);
        }
    }

    fn place_heading(&mut self, ui: &mut egui::Ui) {
        let Some((level, explicit_id)) = self.state.heading.take() else {
            return;
        };
        let size = match level {
            HeadingLevel::H1 => 24.0,
            HeadingLevel::H2 => 20.0,
            HeadingLevel::H3 => 18.0,
            HeadingLevel::H4 => 16.0,
            _ => 14.0,
        };
        let anchor =
            explicit_id.unwrap_or_else(|| heading_slug(&self.state.heading_plain));
        let runs = std::mem::take(&mut self.state.runs);
        let response = ui
            .horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                for run in runs {
                    let mut text = egui::RichText::new(&run.text).size(size).strong();
                    if run.code {
                        text = text.monospace();
                    }
                    if run.emphasis {
                        text = text.italics();
                    }
                    ui.label(text);
                }
            })
            .response;
        if self.wanted_fragment.as_deref() == Some(anchor.as_str()) {
            response.scroll_to_me(Some(egui::Align::TOP));
            self.wanted_fragment = None;
        }
        self.state.heading_plain.clear();
    }

    fn place_code_block(&mut self, ui: &mut egui::Ui, lang: Option<&str>) {
        let code = std::mem::take(&mut self.state.code_buf);
        let syntax = lang
            .and_then(|token| self.syntax_set.find_syntax_by_token(token))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let theme_name = match self.theme {
            Theme::Dark => "base16-ocean.dark",
            Theme::Light => "base16-ocean.light",
        };
        let mut highlighter =
            HighlightLines::new(syntax, &self.theme_set.themes[theme_name]);

        let mut job = egui::text::LayoutJob::default();
        for line in LinesWithEndings::from(&code) {
            let Ok(ranges) = highlighter.highlight_line(line, self.syntax_set) else {
                continue;
            };
            for (style, piece) in ranges {
                let color = egui::Color32::from_rgb(
                    style.foreground.r,
                    style.foreground.g,
                    style.foreground.b,
                );
                job.append(
                    piece,
                    0.0,
                    egui::TextFormat {
                        font_id: egui::FontId::monospace(self.code_font_size),
                        color,
                        ..Default::default()
                    },
                );
            }
        }

        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.add(egui::Label::new(job));
            });
    }

    fn place_image(&mut self, ui: &mut egui::Ui, dest: &str) {
        let uri = if has_scheme(dest) {
            dest.to_string()
        } else {
            let relative = navigation::resolve_relative(self.location, dest);
            match resolve_page_path(self.source_dir, &relative) {
                Some(path) => format!("file://{}", path.display()),
                None => return,
            }
        };
        ui.add(
            egui::Image::from_uri(uri)
                .max_width(ui.available_width())
                .fit_to_original_size(1.0),
        );
        ui.add_space(BLOCK_SPACING);
    }
}

fn has_scheme(dest: &str) -> bool {
    dest.split_once(':').is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme.chars().all(|c| c.is_ascii_alphabetic() || c == '+')
    })
}

/// Matching anchor for a heading title, built the way documentation
/// tooling usually does it: alphanumerics lowercased, whitespace folded
/// to dashes, the rest dropped.
fn heading_slug(title: &str) -> String {
    let mut slug = String::new();
    for ch in title.trim().chars() {
        if ch.is_alphanumeric() || ch == '_' {
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else if ch.is_whitespace() || ch == '-' {
            slug.push('-');
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_match_rendered_anchor_ids() {
        assert_eq!(heading_slug("Getting Started"), "getting-started");
        assert_eq!(heading_slug("What's new in 2.0?"), "whats-new-in-20");
        assert_eq!(heading_slug("  Flags  "), "flags");
        assert_eq!(heading_slug("snake_case_name"), "snake_case_name");
    }

    #[test]
    fn schemes_are_detected_for_external_links() {
        assert!(has_scheme("https://example.com"));
        assert!(has_scheme("mailto:docs@example.com"));
        assert!(has_scheme("git+ssh://host/repo"));
        assert!(!has_scheme("guide/install.md"));
        assert!(!has_scheme("../reference.md"));
        assert!(!has_scheme("a space: not a scheme"));
    }
}
