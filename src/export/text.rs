use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    errors::Result,
    preview::{render_text, InvoiceDocument},
    utils::persistence::{ensure_dir, write_text_atomic},
};

use super::{ExportOptions, Rasterizer};

/// Writes the plain-text rendition as `<stem>.txt` into a directory.
#[derive(Debug, Clone)]
pub struct PlainTextRasterizer {
    dir: PathBuf,
    currency_symbol: String,
}

impl PlainTextRasterizer {
    pub fn new(dir: impl Into<PathBuf>, currency_symbol: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            currency_symbol: currency_symbol.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Rasterizer for PlainTextRasterizer {
    fn rasterize(
        &mut self,
        document: &InvoiceDocument,
        options: &ExportOptions,
        file_stem: &str,
    ) -> Result<PathBuf> {
        ensure_dir(&self.dir)?;
        let path = self.dir.join(format!("{}.txt", file_stem));
        let body = render_text(document, &self.currency_symbol);
        write_text_atomic(&path, &body)?;
        debug!(
            page = %options.page,
            orientation = %options.orientation,
            path = %path.display(),
            "wrote text rendition"
        );
        Ok(path)
    }
}
