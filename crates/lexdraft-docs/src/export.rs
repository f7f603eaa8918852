use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument};
use thiserror::Error;

use crate::preview::{Block, DocumentView};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("pdf rendering failed: {0}")]
    Pdf(String),
}

// A4 portrait geometry, all in millimetres.
const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_H: f32 = 6.0;

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 11.0;
/// Word-wrap budget for body text at 11pt Helvetica on a 170mm column.
const WRAP_COLS: usize = 88;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Title,
    Heading,
    Body,
    Blank,
}

#[derive(Debug, Clone)]
struct Line {
    text: String,
    style: Style,
}

fn line(text: impl Into<String>, style: Style) -> Line {
    Line {
        text: text.into(),
        style,
    }
}

fn blank() -> Line {
    line("", Style::Blank)
}

/// Greedy word wrap. Words longer than the budget get a line of their own.
fn wrap(text: &str, cols: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.split('\n') {
        let mut current = String::new();
        for word in raw.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= cols {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        lines.push(current);
    }
    lines
}

/// Flatten a view into styled lines, the unit of pagination.
fn layout(view: &DocumentView) -> Vec<Line> {
    let mut lines = vec![line(&view.title, Style::Title)];
    if let Some(subtitle) = &view.subtitle {
        lines.push(line(subtitle, Style::Body));
    }
    for section in &view.sections {
        lines.push(blank());
        if let Some(heading) = &section.heading {
            lines.push(line(heading, Style::Heading));
        }
        for block in &section.blocks {
            match block {
                Block::Paragraph { text } => {
                    for wrapped in wrap(text, WRAP_COLS) {
                        lines.push(line(wrapped, Style::Body));
                    }
                    lines.push(blank());
                }
                Block::Items { items } => {
                    for item in items {
                        for (idx, wrapped) in wrap(item, WRAP_COLS - 2).into_iter().enumerate() {
                            let prefix = if idx == 0 { "- " } else { "  " };
                            lines.push(line(format!("{prefix}{wrapped}"), Style::Body));
                        }
                    }
                    lines.push(blank());
                }
                Block::Table { columns, rows } => {
                    lines.push(line(columns.join(" | "), Style::Heading));
                    for row in rows {
                        lines.push(line(row.join(" | "), Style::Body));
                    }
                    lines.push(blank());
                }
                Block::Signature { name, caption } => {
                    lines.push(blank());
                    lines.push(line("_______________________________", Style::Body));
                    lines.push(line(name, Style::Body));
                    lines.push(line(format!("({caption})"), Style::Body));
                    lines.push(blank());
                }
            }
        }
    }
    while matches!(lines.last().map(|l| l.style), Some(Style::Blank)) {
        lines.pop();
    }
    lines
}

/// Lines that fit on one page body.
pub(crate) fn lines_per_page() -> usize {
    ((PAGE_H - 2.0 * MARGIN) / LINE_H) as usize
}

/// Page count for a given content length: `ceil(content / page body)`.
pub(crate) fn page_count(total_lines: usize, per_page: usize) -> usize {
    total_lines.div_ceil(per_page).max(1)
}

/// Render a document view into a paginated A4 PDF.
///
/// The view is laid out as wrapped, styled lines and sliced into
/// page-height chunks, one PDF page per chunk. Any failure aborts the
/// export; no partial artifact is produced.
pub fn export_pdf(view: &DocumentView) -> Result<Vec<u8>, ExportError> {
    let lines = layout(view);
    let per_page = lines_per_page();
    let pages = page_count(lines.len(), per_page);

    let (doc, first_page, first_layer) =
        PdfDocument::new(&view.title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let body_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let bold_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    for page_idx in 0..pages {
        let layer = if page_idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
            doc.get_page(page).get_layer(layer)
        };

        let chunk = lines
            .iter()
            .skip(page_idx * per_page)
            .take(per_page);
        for (row, l) in chunk.enumerate() {
            if l.style == Style::Blank || l.text.is_empty() {
                continue;
            }
            let (size, font): (f32, &IndirectFontRef) = match l.style {
                Style::Title => (TITLE_SIZE, &bold_font),
                Style::Heading => (HEADING_SIZE, &bold_font),
                _ => (BODY_SIZE, &body_font),
            };
            let y = PAGE_H - MARGIN - (row as f32 + 1.0) * LINE_H;
            layer.use_text(l.text.clone(), size, Mm(MARGIN), Mm(y), font);
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_is_ceiling_of_content_over_page_height() {
        let per_page = lines_per_page();
        assert_eq!(page_count(1, per_page), 1);
        assert_eq!(page_count(per_page, per_page), 1);
        assert_eq!(page_count(per_page + 1, per_page), 2);
        assert_eq!(page_count(3 * per_page, per_page), 3);
        // An empty document still produces one (blank) page.
        assert_eq!(page_count(0, per_page), 1);
    }

    #[test]
    fn wrap_respects_column_budget_and_keeps_words_whole() {
        let text = "the quick brown fox jumps over the lazy dog";
        let wrapped = wrap(text, 15);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 15));
        assert_eq!(wrapped.join(" "), text);
    }

    #[test]
    fn wrap_preserves_explicit_newlines() {
        let wrapped = wrap("first\nsecond", 80);
        assert_eq!(wrapped, vec!["first".to_string(), "second".to_string()]);
    }
}
