//! Plain-text to PDF rendering.
//!
//! Layout is computed first as a list of [`PdfLine`]s (pure, testable),
//! then drawn onto A4 pages with the built-in Helvetica fonts.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use salesinsights_shared::{Result, SalesInsightsError};
use tracing::{debug, warn};

/// Maximum characters per rendered body line.
pub const WRAP_WIDTH: usize = 90;

/// Substitute for characters outside Latin-1.
const PLACEHOLDER: char = '?';

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const BOTTOM_MARGIN_MM: f32 = 20.0;

const TITLE_FONT_PT: f32 = 16.0;
const TITLE_HEIGHT_MM: f32 = 10.0;
const TITLE_SPACING_MM: f32 = 10.0;
const BODY_FONT_PT: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 5.0;
const GAP_HEIGHT_MM: f32 = 3.0;

const PT_TO_MM: f32 = 0.3528;
/// Average Helvetica-Bold glyph width as a fraction of the font size.
const BOLD_AVG_GLYPH_EM: f32 = 0.55;

const LAYER_NAME: &str = "Layer 1";

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// One rendered body line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfLine {
    Text(String),
    /// Small vertical gap for a blank input line.
    Gap,
}

/// Lossy transliteration to Latin-1: every character above U+00FF becomes `?`.
pub fn to_latin1(line: &str) -> String {
    line.chars()
        .map(|c| if (c as u32) <= 0xFF { c } else { PLACEHOLDER })
        .collect()
}

/// Turn report text into body lines.
///
/// Whitespace-only lines become [`PdfLine::Gap`]. Other lines are
/// transliterated; those longer than [`WRAP_WIDTH`] are greedily wrapped on
/// spaces, and single words longer than the width are hard-split.
pub fn layout_lines(report: &str) -> Vec<PdfLine> {
    let mut out = Vec::new();

    for line in report.split('\n') {
        if line.trim().is_empty() {
            out.push(PdfLine::Gap);
            continue;
        }

        let safe = to_latin1(line);
        if safe.chars().count() > WRAP_WIDTH {
            out.extend(wrap_line(&safe).into_iter().map(PdfLine::Text));
        } else {
            out.push(PdfLine::Text(safe));
        }
    }

    out
}

fn wrap_line(line: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split(' ') {
        let word_len = word.chars().count();

        if current_len + word_len < WRAP_WIDTH {
            current.push_str(word);
            current.push(' ');
            current_len += word_len + 1;
            continue;
        }

        if !current.is_empty() {
            lines.push(current.trim().to_string());
        }

        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(WRAP_WIDTH).peekable();
        current.clear();
        current_len = 0;
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current_len = chunk.len() + 1;
                current = piece;
                current.push(' ');
            }
        }
    }

    if !current.is_empty() {
        lines.push(current.trim().to_string());
    }

    lines
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Title drawn centered at the top of the first page.
pub fn report_title(company_name: &str) -> String {
    to_latin1(&format!("Sales Insights Report - {company_name}"))
}

/// Renders report text into a PDF byte stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextToPdfSerializer;

impl TextToPdfSerializer {
    /// Render the report. Returns `None` when the document cannot be built;
    /// the error is logged and no partial file is produced.
    pub fn render(&self, report: &str, company_name: &str) -> Option<Vec<u8>> {
        match self.try_render(report, company_name) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(error = %e, company = company_name, "error creating PDF");
                None
            }
        }
    }

    /// Render the report, surfacing the failure cause.
    pub fn try_render(&self, report: &str, company_name: &str) -> Result<Vec<u8>> {
        let title = report_title(company_name);
        let lines = layout_lines(report);

        let (doc, page, layer) =
            PdfDocument::new(title.as_str(), Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;

        let mut cursor = PageCursor {
            layer: doc.get_page(page).get_layer(layer),
            top_mm: MARGIN_MM,
            pages: 1,
        };

        let title_x = centered_x(&title, TITLE_FONT_PT);
        cursor.layer.use_text(
            title.as_str(),
            TITLE_FONT_PT,
            Mm(title_x),
            Mm(PAGE_HEIGHT_MM - cursor.top_mm - TITLE_HEIGHT_MM * 0.7),
            &bold,
        );
        cursor.top_mm += TITLE_HEIGHT_MM + TITLE_SPACING_MM;

        for line in &lines {
            match line {
                PdfLine::Gap => cursor.top_mm += GAP_HEIGHT_MM,
                PdfLine::Text(text) => {
                    cursor.ensure_room(&doc, LINE_HEIGHT_MM);
                    cursor.write(text, &regular);
                }
            }
        }

        debug!(lines = lines.len(), pages = cursor.pages, "PDF laid out");
        drop(cursor);
        doc.save_to_bytes().map_err(pdf_error)
    }
}

/// Current drawing position, measured from the top of the page.
struct PageCursor {
    layer: PdfLayerReference,
    top_mm: f32,
    pages: usize,
}

impl PageCursor {
    fn ensure_room(&mut self, doc: &PdfDocumentReference, height_mm: f32) {
        if self.top_mm + height_mm > PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
            self.layer = doc.get_page(page).get_layer(layer);
            self.top_mm = MARGIN_MM;
            self.pages += 1;
        }
    }

    fn write(&mut self, text: &str, font: &IndirectFontRef) {
        let baseline = PAGE_HEIGHT_MM - self.top_mm - LINE_HEIGHT_MM * 0.7;
        self.layer
            .use_text(text, BODY_FONT_PT, Mm(MARGIN_MM), Mm(baseline), font);
        self.top_mm += LINE_HEIGHT_MM;
    }
}

fn centered_x(text: &str, font_pt: f32) -> f32 {
    let width = text.chars().count() as f32 * font_pt * BOLD_AVG_GLYPH_EM * PT_TO_MM;
    ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM)
}

fn pdf_error(e: printpdf::Error) -> SalesInsightsError {
    SalesInsightsError::Serialization(format!("PDF generation failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[PdfLine]) -> Vec<&str> {
        lines
            .iter()
            .filter_map(|l| match l {
                PdfLine::Text(t) => Some(t.as_str()),
                PdfLine::Gap => None,
            })
            .collect()
    }

    #[test]
    fn blank_lines_become_gaps() {
        let lines = layout_lines("## Title\n   \n\nbody");
        assert_eq!(
            lines,
            vec![
                PdfLine::Text("## Title".into()),
                PdfLine::Gap,
                PdfLine::Gap,
                PdfLine::Text("body".into()),
            ]
        );
    }

    #[test]
    fn short_lines_are_kept_verbatim() {
        let line = "- bullet with  double space";
        assert_eq!(layout_lines(line), vec![PdfLine::Text(line.into())]);
    }

    #[test]
    fn long_lines_wrap_under_width() {
        let words: Vec<String> = (0..60).map(|i| format!("word{i}")).collect();
        let long = words.join(" ");
        let lines = layout_lines(&long);

        assert!(lines.len() > 1);
        for t in texts(&lines) {
            assert!(t.chars().count() <= WRAP_WIDTH, "line too long: {t}");
        }
        // Nothing is lost or reordered.
        assert_eq!(texts(&lines).join(" "), long);
    }

    #[test]
    fn oversized_word_is_hard_split() {
        let long = format!("intro {} outro", "x".repeat(250));
        let lines = layout_lines(&long);
        for t in texts(&lines) {
            assert!(t.chars().count() <= WRAP_WIDTH, "line too long: {t}");
        }
        let joined: String = texts(&lines).concat();
        assert_eq!(joined.matches('x').count(), 250);
    }

    #[test]
    fn non_latin1_is_replaced() {
        assert_eq!(to_latin1("café ✓ 📈"), "café ? ?");
        let lines = layout_lines("Growth 📈 strong");
        assert_eq!(lines, vec![PdfLine::Text("Growth ? strong".into())]);
    }

    #[test]
    fn empty_report_renders_title_only_document() {
        let bytes = TextToPdfSerializer
            .render("", "Acme")
            .expect("document for empty report");
        assert!(bytes.starts_with(b"%PDF"));

        // The body contributes no text, so the title is the only line drawn.
        let body = layout_lines("");
        assert!(body.iter().all(|l| *l == PdfLine::Gap));
        assert!(texts(&body).is_empty());
        assert_eq!(report_title("Acme"), "Sales Insights Report - Acme");
    }

    #[test]
    fn title_is_transliterated() {
        assert_eq!(report_title("Acme ✓"), "Sales Insights Report - Acme ?");
    }

    #[test]
    fn long_report_spans_multiple_pages() {
        let report = (0..200)
            .map(|i| format!("- line number {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let bytes = TextToPdfSerializer.render(&report, "Acme Ünïcode ✓").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
