//! Export artifacts for generated reports.
//!
//! Produces:
//! - a plain-text copy of the report (`sales_report_<company>.txt`)
//! - a paginated PDF rendering (`sales_report_<company>.pdf`)

mod export;
mod pdf;

pub use export::{export_file_stem, write_pdf_export, write_text_export};
pub use pdf::{PdfLine, TextToPdfSerializer, WRAP_WIDTH, layout_lines, report_title, to_latin1};
