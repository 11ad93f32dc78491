//! Export file naming and writing.

use std::path::{Path, PathBuf};

use salesinsights_shared::{Result, SalesInsightsError};
use tracing::info;

/// `sales_report_<company>` with spaces replaced by underscores.
pub fn export_file_stem(company_name: &str) -> String {
    format!("sales_report_{}", company_name.replace(' ', "_"))
}

/// Write the report text to `<dir>/<stem>.txt`.
pub fn write_text_export(dir: &Path, company_name: &str, content: &str) -> Result<PathBuf> {
    write_export(dir, company_name, "txt", content.as_bytes())
}

/// Write rendered PDF bytes to `<dir>/<stem>.pdf`.
pub fn write_pdf_export(dir: &Path, company_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    write_export(dir, company_name, "pdf", bytes)
}

fn write_export(dir: &Path, company_name: &str, ext: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| SalesInsightsError::io(dir, e))?;

    let path = dir.join(format!("{}.{ext}", export_file_stem(company_name)));
    std::fs::write(&path, bytes).map_err(|e| SalesInsightsError::io(&path, e))?;

    info!(path = %path.display(), bytes = bytes.len(), "export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("si_export_{}", Uuid::now_v7()))
    }

    #[test]
    fn stem_replaces_spaces_only() {
        assert_eq!(export_file_stem("Acme Widgets Inc."), "sales_report_Acme_Widgets_Inc.");
        assert_eq!(export_file_stem("Acme"), "sales_report_Acme");
    }

    #[test]
    fn text_export_writes_content() {
        let dir = temp_dir();
        let path = write_text_export(&dir, "Beta Corp", "## Executive Summary").unwrap();
        assert_eq!(path.file_name().unwrap(), "sales_report_Beta_Corp.txt");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "## Executive Summary");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn pdf_export_writes_bytes() {
        let dir = temp_dir();
        let path = write_pdf_export(&dir, "Acme", b"%PDF-1.3").unwrap();
        assert_eq!(path.extension().unwrap(), "pdf");
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3");
        std::fs::remove_dir_all(&dir).ok();
    }
}
